pub mod client;

pub use client::*;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Why a single delegate call produced no usable reasoning.
#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("delegate server error: {0}")]
    Status(reqwest::StatusCode),

    #[error("delegate timed out after {0:?}")]
    Timeout(Duration),

    #[error("delegate returned empty response")]
    EmptyResponse,

    #[error("delegate returned invalid JSON: {text}")]
    InvalidJson {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("delegate JSON root must be an object, got {0}")]
    NonObjectRoot(&'static str),

    #[error("delegate response violates schema: {0}")]
    SchemaViolation(String),
}

/// External text-completion service consulted for ambiguous observations.
/// Implementations return the parsed JSON object or fail; they never coerce.
#[async_trait]
pub trait Delegate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Map<String, Value>, DelegateError>;
}

/// Strict parse of the delegate's completion text into a JSON object.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, DelegateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DelegateError::EmptyResponse);
    }

    let parsed: Value = serde_json::from_str(text).map_err(|source| DelegateError::InvalidJson {
        text: text.to_string(),
        source,
    })?;

    match parsed {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(DelegateError::NonObjectRoot("array")),
        Value::String(_) => Err(DelegateError::NonObjectRoot("string")),
        Value::Number(_) => Err(DelegateError::NonObjectRoot("number")),
        Value::Bool(_) => Err(DelegateError::NonObjectRoot("boolean")),
        Value::Null => Err(DelegateError::NonObjectRoot("null")),
    }
}
