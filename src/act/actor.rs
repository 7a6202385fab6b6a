use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::types::{Action, ActionReport};
use crate::decide::{Decision, DecisionKind, DecisionSet};
use crate::store::{JsonLog, StoreError};

const SUPPORT_GUIDANCE_MESSAGE: &str = "Provide merchant with migration checklist, \
     webhook verification steps, and API credential validation.";
const ESCALATION_SUMMARY: &str =
    "Potential platform regression detected during headless migration.";

#[derive(Debug, Error)]
pub enum ActError {
    /// A decision kind that is only valid behind human approval arrived without it.
    #[error("no executor for unapproved `{kind}` decision")]
    UnhandledVariant { kind: &'static str },

    /// The actions were decided but the report could not be made durable.
    #[error("failed to persist action report: {source}")]
    Persist {
        report: Box<ActionReport>,
        #[source]
        source: StoreError,
    },
}

/// Executes approved-by-policy decisions and appends each report to the action log.
/// Anything requiring approval is queued, never executed.
pub struct Actor {
    log: JsonLog<ActionReport>,
}

impl Actor {
    pub fn new(log: JsonLog<ActionReport>) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &JsonLog<ActionReport> {
        &self.log
    }

    pub fn act(&self, decision_set: &DecisionSet) -> Result<ActionReport, ActError> {
        let mut actions_taken = Vec::new();
        let mut pending_approvals = Vec::new();

        for decision in &decision_set.decisions {
            if decision.requires_human_approval {
                pending_approvals.push(decision.clone());
                continue;
            }
            actions_taken.push(execute(decision)?);
        }

        let report = ActionReport {
            timestamp: Utc::now(),
            observation_id: decision_set.observation_id,
            actions_taken,
            pending_approvals,
            risk_level: decision_set.risk_level,
        };

        if !report.pending_approvals.is_empty() {
            info!(
                "Observation {}: {} decisions awaiting human approval",
                report.observation_id,
                report.pending_approvals.len()
            );
        }

        if let Err(source) = self.log.append(&report) {
            warn!("Action log write failed: {}", source);
            return Err(ActError::Persist {
                report: Box::new(report),
                source,
            });
        }

        Ok(report)
    }
}

fn execute(decision: &Decision) -> Result<Action, ActError> {
    match &decision.kind {
        DecisionKind::MonitorOnly => Ok(Action::Monitoring {
            note: decision.reason.clone(),
        }),
        DecisionKind::SupportGuidance => Ok(Action::SupportGuidancePrepared {
            message: SUPPORT_GUIDANCE_MESSAGE.to_string(),
            reason: decision.reason.clone(),
        }),
        DecisionKind::EscalateEngineering { severity } => {
            Ok(Action::EngineeringEscalationCreated {
                severity: *severity,
                summary: ESCALATION_SUMMARY.to_string(),
            })
        }
        DecisionKind::DocumentationUpdateSuggestion | DecisionKind::BlockAutoActions => {
            Err(ActError::UnhandledVariant {
                kind: decision.kind.name(),
            })
        }
    }
}
