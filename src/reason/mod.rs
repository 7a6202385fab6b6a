pub mod types;
pub mod deterministic;
pub mod prompt;
pub mod normalize;
pub mod reasoner;

pub use types::*;
pub use reasoner::*;
