use tracing::info;

use super::types::{Decision, DecisionKind, DecisionSet, DecisionTrace, RiskLevel};
use crate::observe::{Observation, Severity};
use crate::reason::{Cause, Reasoning};

/// Observations below this confidence never reach the policy table.
pub const SAFETY_GATE_CONFIDENCE: f64 = 0.6;

/// Pure policy layer: (Observation, Reasoning) -> DecisionSet. No I/O, no state.
#[derive(Debug, Default)]
pub struct Decider;

impl Decider {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(&self, observation: &Observation, reasoning: &Reasoning) -> DecisionSet {
        let trace = DecisionTrace {
            observation_confidence: observation.confidence,
            reasoning_confidence: reasoning.confidence,
        };

        // SAFETY GATE: hypotheses are not even consulted.
        if observation.confidence < SAFETY_GATE_CONFIDENCE {
            info!(
                "Safety gate blocked observation {} (confidence {:.2})",
                observation.observation_id, observation.confidence
            );
            return DecisionSet {
                observation_id: observation.observation_id,
                decisions: vec![Decision::block_auto_actions("Low observation confidence")],
                risk_level: RiskLevel::High,
                trace,
            };
        }

        let cause = reasoning
            .top_hypothesis()
            .map(|h| h.cause.clone())
            .unwrap_or(Cause::Unknown);

        let decisions = policy(&cause);
        let risk_level = assess_risk(&decisions);

        info!(
            "Observation {}: top cause {}, {} decisions, risk {:?}",
            observation.observation_id,
            cause,
            decisions.len(),
            risk_level
        );

        DecisionSet {
            observation_id: observation.observation_id,
            decisions,
            risk_level,
            trace,
        }
    }
}

/// Fixed cause -> decisions table. Unrecognized causes get cautious monitoring.
pub fn policy(cause: &Cause) -> Vec<Decision> {
    match cause {
        Cause::PlatformRegression => vec![Decision::escalate_engineering(
            Severity::High,
            "Suspected platform regression across services",
            false,
        )],
        Cause::WebhookAuthFailure => vec![Decision::support_guidance(
            "Webhook authentication failures detected",
            false,
        )],
        Cause::FrontendBackendMismatch => vec![
            Decision::documentation_update("Frontend and backend state mismatch observed"),
            Decision::monitor_only("Mismatch may resolve after configuration sync"),
        ],
        Cause::MigrationMisconfiguration => vec![Decision::support_guidance(
            "Likely merchant-side migration misconfiguration",
            false,
        )],
        Cause::NormalOperation => vec![Decision::monitor_only("System operating normally")],
        Cause::Unknown | Cause::Other(_) => vec![Decision::monitor_only(
            "Root cause unclear, monitoring for changes",
        )],
    }
}

pub fn assess_risk(decisions: &[Decision]) -> RiskLevel {
    if decisions
        .iter()
        .any(|d| matches!(d.kind, DecisionKind::EscalateEngineering { .. }))
    {
        RiskLevel::High
    } else if decisions.iter().any(|d| d.requires_human_approval) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
