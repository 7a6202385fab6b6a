//! Incident-triage agent core.
//!
//! One cycle per signal batch: Observe -> Reason -> Decide -> Act -> Memory.
//! Each stage consumes only the previous stage's output and returns a fresh value;
//! the action log and the incident memory are the only durable state.

pub mod signals;
pub mod observe;
pub mod reason;
pub mod decide;
pub mod act;
pub mod memory;
pub mod store;
pub mod services;
pub mod config;
pub mod agent;

pub use agent::{AgentRunner, CycleError, CycleReport};
pub use config::AgentConfig;
