use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::act::{ActError, ActionReport, Actor};
use crate::config::AgentConfig;
use crate::decide::{DecisionSet, Decider};
use crate::memory::{Incident, Memory};
use crate::observe::{Observation, Observer};
use crate::reason::{Reasoner, Reasoning};
use crate::services::llm::OllamaClient;
use crate::signals::RawSignals;
use crate::store::{JsonLog, StoreError};

/// Everything one cycle produced in memory, returned even when persisting it failed.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub observation: Observation,
    pub reasoning: Reasoning,
    pub decision: DecisionSet,
    pub action: Option<ActionReport>,
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("actor cannot execute `{kind}` without approval")]
    UnhandledDecision {
        kind: &'static str,
        cycle: Box<CycleReport>,
    },

    #[error("action log write failed: {source}")]
    ActionLog {
        cycle: Box<CycleReport>,
        #[source]
        source: StoreError,
    },

    #[error("incident was not recorded: {source}")]
    Record {
        cycle: Box<CycleReport>,
        #[source]
        source: StoreError,
    },
}

impl CycleError {
    /// The in-memory result of the failed cycle.
    pub fn cycle(&self) -> &CycleReport {
        match self {
            CycleError::UnhandledDecision { cycle, .. }
            | CycleError::ActionLog { cycle, .. }
            | CycleError::Record { cycle, .. } => cycle,
        }
    }
}

/// Observe -> Reason -> Decide -> Act -> Memory, one batch at a time.
/// `&mut self` keeps cycles from overlapping on one runner.
pub struct AgentRunner {
    observer: Observer,
    reasoner: Reasoner,
    decider: Decider,
    actor: Actor,
    memory: Memory,
}

impl AgentRunner {
    pub fn new(reasoner: Reasoner, actor: Actor, memory: Memory) -> Self {
        Self {
            observer: Observer::new(),
            reasoner,
            decider: Decider::new(),
            actor,
            memory,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        let reasoner = if config.delegate.enabled {
            let client = OllamaClient::new(&config.delegate);
            Reasoner::with_delegate(Arc::new(client), &config.delegate)
        } else {
            Reasoner::deterministic()
        };

        Self::new(
            reasoner,
            Actor::new(JsonLog::new(&config.action_log_path)),
            Memory::new(&config.memory_path),
        )
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Runs one full cycle and returns the recorded incident id.
    pub async fn run_once(&mut self, raw_signals: RawSignals) -> Result<Uuid, CycleError> {
        let observation = self.observer.observe(raw_signals);
        let reasoning = self.reasoner.reason(&observation).await;
        let decision = self.decider.decide(&observation, &reasoning);

        let action = match self.actor.act(&decision) {
            Ok(report) => report,
            Err(ActError::UnhandledVariant { kind }) => {
                error!(
                    "Observation {} produced unhandled decision {}",
                    observation.observation_id, kind
                );
                return Err(CycleError::UnhandledDecision {
                    kind,
                    cycle: Box::new(CycleReport {
                        observation,
                        reasoning,
                        decision,
                        action: None,
                    }),
                });
            }
            Err(ActError::Persist { report, source }) => {
                return Err(CycleError::ActionLog {
                    cycle: Box::new(CycleReport {
                        observation,
                        reasoning,
                        decision,
                        action: Some(*report),
                    }),
                    source,
                });
            }
        };

        let incident = Incident::new(observation, reasoning, decision, action);

        match self.memory.record(&incident) {
            Ok(()) => {
                info!(
                    "Cycle complete: incident {} (risk {:?})",
                    incident.incident_id, incident.decision.risk_level
                );
                Ok(incident.incident_id)
            }
            Err(source) => {
                error!("Failed to record incident: {}", source);
                Err(CycleError::Record {
                    cycle: Box::new(CycleReport {
                        observation: incident.observation,
                        reasoning: incident.reasoning,
                        decision: incident.decision,
                        action: Some(incident.action),
                    }),
                    source,
                })
            }
        }
    }
}
