pub mod types;
pub mod observer;

pub use types::*;
pub use observer::*;
