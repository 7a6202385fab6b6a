use serde::{Deserialize, Serialize};

use crate::observe::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// The closed set of things the policy may ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionKind {
    MonitorOnly,
    SupportGuidance,
    EscalateEngineering { severity: Severity },
    DocumentationUpdateSuggestion,
    BlockAutoActions,
}

impl DecisionKind {
    pub fn name(&self) -> &'static str {
        match self {
            DecisionKind::MonitorOnly => "monitor_only",
            DecisionKind::SupportGuidance => "support_guidance",
            DecisionKind::EscalateEngineering { .. } => "escalate_engineering",
            DecisionKind::DocumentationUpdateSuggestion => "documentation_update_suggestion",
            DecisionKind::BlockAutoActions => "block_auto_actions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(flatten)]
    pub kind: DecisionKind,
    pub reason: String,
    pub requires_human_approval: bool,
}

impl Decision {
    pub fn monitor_only(reason: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::MonitorOnly,
            reason: reason.into(),
            requires_human_approval: false,
        }
    }

    pub fn support_guidance(reason: impl Into<String>, requires_human_approval: bool) -> Self {
        Self {
            kind: DecisionKind::SupportGuidance,
            reason: reason.into(),
            requires_human_approval,
        }
    }

    pub fn escalate_engineering(
        severity: Severity,
        reason: impl Into<String>,
        requires_human_approval: bool,
    ) -> Self {
        Self {
            kind: DecisionKind::EscalateEngineering { severity },
            reason: reason.into(),
            requires_human_approval,
        }
    }

    /// Always gated on a human.
    pub fn documentation_update(reason: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::DocumentationUpdateSuggestion,
            reason: reason.into(),
            requires_human_approval: true,
        }
    }

    /// Always gated on a human.
    pub fn block_auto_actions(reason: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::BlockAutoActions,
            reason: reason.into(),
            requires_human_approval: true,
        }
    }
}

/// Confidence inputs the policy saw, kept verbatim for audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub observation_confidence: f64,
    pub reasoning_confidence: f64,
}

/// Output of one policy evaluation. Never modified after the Decider returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSet {
    pub observation_id: u64,
    pub decisions: Vec<Decision>,
    pub risk_level: RiskLevel,
    pub trace: DecisionTrace,
}
