pub mod types;
pub mod decider;

pub use types::*;
pub use decider::*;
