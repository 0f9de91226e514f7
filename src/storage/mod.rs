mod fixture;
mod store;

pub use fixture::*;
pub use store::*;
