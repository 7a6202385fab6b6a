pub mod types;
pub mod actor;

pub use types::*;
pub use actor::*;
