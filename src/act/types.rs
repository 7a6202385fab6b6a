use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decide::{Decision, RiskLevel};
use crate::observe::Severity;

/// The effect of executing one Decision that needed no approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Monitoring {
        note: String,
    },
    SupportGuidancePrepared {
        message: String,
        reason: String,
    },
    EngineeringEscalationCreated {
        severity: Severity,
        summary: String,
    },
}

/// What the Actor did for one DecisionSet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub timestamp: DateTime<Utc>,
    pub observation_id: u64,
    pub actions_taken: Vec<Action>,
    /// Decisions held for a human, untouched.
    pub pending_approvals: Vec<Decision>,
    pub risk_level: RiskLevel,
}
