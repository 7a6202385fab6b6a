use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::act::ActionReport;
use crate::decide::DecisionSet;
use crate::observe::Observation;
use crate::reason::Reasoning;

/// Feedback attached after the fact by an external process.
/// `details` is stored verbatim under its own key, so caller fields never collide
/// with the attachment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub timestamp: DateTime<Utc>,
    pub details: Map<String, Value>,
}

/// The unit of record: one full cycle, append-only.
/// Only `outcome` may change, and only once (None -> Some).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub observation: Observation,
    pub reasoning: Reasoning,
    pub decision: DecisionSet,
    pub action: ActionReport,
    pub outcome: Option<Outcome>,
}

impl Incident {
    /// Fresh id and timestamp, no outcome yet.
    pub fn new(
        observation: Observation,
        reasoning: Reasoning,
        decision: DecisionSet,
        action: ActionReport,
    ) -> Self {
        Self {
            incident_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            observation,
            reasoning,
            decision,
            action,
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeUpdate {
    Attached,
    /// First outcome wins; the existing one was left as is.
    AlreadyAttached,
    NotFound,
}
