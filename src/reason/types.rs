use serde::{Deserialize, Serialize};
use std::fmt;

/// Root-cause tag. Known causes drive the policy table; anything the delegate invents
/// is kept verbatim as `Other` and treated cautiously downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cause {
    MigrationMisconfiguration,
    WebhookAuthFailure,
    FrontendBackendMismatch,
    PlatformRegression,
    NormalOperation,
    Unknown,
    Other(String),
}

impl Cause {
    pub fn as_str(&self) -> &str {
        match self {
            Cause::MigrationMisconfiguration => "migration_misconfiguration",
            Cause::WebhookAuthFailure => "webhook_auth_failure",
            Cause::FrontendBackendMismatch => "frontend_backend_mismatch",
            Cause::PlatformRegression => "platform_regression",
            Cause::NormalOperation => "normal_operation",
            Cause::Unknown => "unknown",
            Cause::Other(tag) => tag,
        }
    }
}

impl From<&str> for Cause {
    fn from(tag: &str) -> Self {
        match tag {
            "migration_misconfiguration" => Cause::MigrationMisconfiguration,
            "webhook_auth_failure" => Cause::WebhookAuthFailure,
            "frontend_backend_mismatch" => Cause::FrontendBackendMismatch,
            "platform_regression" => Cause::PlatformRegression,
            "normal_operation" => Cause::NormalOperation,
            "unknown" => Cause::Unknown,
            other => Cause::Other(other.to_string()),
        }
    }
}

impl From<String> for Cause {
    fn from(tag: String) -> Self {
        Cause::from(tag.as_str())
    }
}

impl From<Cause> for String {
    fn from(cause: Cause) -> Self {
        match cause {
            Cause::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub cause: Cause,
    pub explanation: String,
    /// 0.0 to 1.0
    pub confidence: f64,
}

impl Hypothesis {
    pub fn new(cause: Cause, explanation: impl Into<String>, confidence: f64) -> Self {
        Self {
            cause,
            explanation: explanation.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningMode {
    Deterministic,
    Llm,
    LlmFailed,
}

/// Ranked root-cause hypotheses for one Observation.
/// Invariant: `hypotheses` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reasoning {
    pub mode: ReasoningMode,
    pub hypotheses: Vec<Hypothesis>,
    pub assumptions: Vec<String>,
    pub unknowns: Vec<String>,
    pub confidence: f64,
    /// Why the delegate path degraded, when it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reasoning {
    /// Highest-confidence hypothesis; the first one wins a tie.
    pub fn top_hypothesis(&self) -> Option<&Hypothesis> {
        self.hypotheses.iter().fold(None, |best, h| match best {
            Some(b) if b.confidence >= h.confidence => Some(b),
            _ => Some(h),
        })
    }
}
