mod breakdown;
mod budget;
mod category;
mod money;
mod notice;
mod overview;
mod projection;
mod recommendation;
mod recurring;
mod stats;
mod transaction;
mod trend;
mod window;

pub use breakdown::*;
pub use budget::*;
pub use category::*;
pub use money::*;
pub use notice::*;
pub use overview::*;
pub use projection::*;
pub use recommendation::*;
pub use recurring::*;
pub use stats::*;
pub use transaction::*;
pub use trend::*;
pub use window::*;
