// Application layer: validation, orchestration and report assembly.
// Pure computation lives in `domain`; mutation lives in `storage::Store`.

pub mod error;
pub mod query;
pub mod reporting;
pub mod service;

pub use error::*;
pub use query::*;
pub use reporting::*;
pub use service::*;
