//! Coercion of a delegate's JSON object into a `Reasoning`.
//!
//! Rules:
//! - root `confidence`: missing defaults to 0.5, non-numeric is a schema violation,
//!   numbers are clamped to 0.0 - 1.0.
//! - `hypotheses`, `assumptions`, `unknowns`: missing means empty, anything other than
//!   an array is a schema violation.
//! - a hypothesis entry survives if it is an object with a non-empty string `cause`, or a
//!   bare non-empty string (taken as the cause). Entry confidence defaults to the root
//!   confidence. Every other entry is dropped.
//! - with no survivors, a single `unknown` hypothesis at 0.4 is substituted.
//! - assumption and unknown entries are rendered to text, never dropped.

use serde_json::{Map, Value};

use super::types::{Cause, Hypothesis, Reasoning, ReasoningMode};
use crate::services::llm::DelegateError;

const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.4;

pub fn normalize(response: &Map<String, Value>) -> Result<Reasoning, DelegateError> {
    let confidence = match response.get("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE,
        Some(value) => value
            .as_f64()
            .map(clamp_unit)
            .ok_or_else(|| schema("`confidence` must be a number"))?,
    };

    let mut hypotheses: Vec<Hypothesis> = array_field(response, "hypotheses")?
        .iter()
        .filter_map(|entry| hypothesis(entry, confidence))
        .collect();

    if hypotheses.is_empty() {
        hypotheses.push(placeholder());
    }

    let assumptions = array_field(response, "assumptions")?
        .iter()
        .map(stringify)
        .collect();
    let unknowns = array_field(response, "unknowns")?
        .iter()
        .map(stringify)
        .collect();

    Ok(Reasoning {
        mode: ReasoningMode::Llm,
        hypotheses,
        assumptions,
        unknowns,
        confidence,
        error: None,
    })
}

fn placeholder() -> Hypothesis {
    Hypothesis::new(
        Cause::Unknown,
        "Delegate did not return a valid hypothesis",
        PLACEHOLDER_CONFIDENCE,
    )
}

fn hypothesis(entry: &Value, default_confidence: f64) -> Option<Hypothesis> {
    match entry {
        Value::String(cause) if !cause.trim().is_empty() => Some(Hypothesis::new(
            Cause::from(cause.trim()),
            "",
            default_confidence,
        )),
        Value::Object(fields) => {
            let cause = fields
                .get("cause")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())?;
            let explanation = fields
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let confidence = match fields.get("confidence") {
                None | Some(Value::Null) => default_confidence,
                Some(value) => clamp_unit(value.as_f64()?),
            };
            Some(Hypothesis::new(Cause::from(cause), explanation, confidence))
        }
        _ => None,
    }
}

fn array_field<'a>(response: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], DelegateError> {
    match response.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(schema(format!("`{key}` must be an array"))),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(fields) => ["description", "explanation", "justification"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn schema(reason: impl Into<String>) -> DelegateError {
    DelegateError::SchemaViolation(reason.into())
}
