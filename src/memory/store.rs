use chrono::Utc;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use super::types::{Incident, Outcome, OutcomeUpdate};
use crate::act::ActionReport;
use crate::decide::DecisionSet;
use crate::observe::Observation;
use crate::reason::{Cause, Reasoning};
use crate::store::{JsonLog, StoreError};

/// Append-only incident memory backed by one JSON document.
///
/// Every call goes through the log's single writer, so concurrent cycles in one
/// process cannot interleave their read-modify-write.
pub struct Memory {
    log: JsonLog<Incident>,
}

impl Memory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: JsonLog::new(path),
        }
    }

    /// Store a complete cycle snapshot and return its fresh id.
    pub fn record_incident(
        &self,
        observation: Observation,
        reasoning: Reasoning,
        decision: DecisionSet,
        action: ActionReport,
    ) -> Result<Uuid, StoreError> {
        let incident = Incident::new(observation, reasoning, decision, action);
        self.record(&incident)?;
        Ok(incident.incident_id)
    }

    /// Append an already built incident. The caller keeps it, even on failure.
    pub fn record(&self, incident: &Incident) -> Result<(), StoreError> {
        self.log.append(incident)?;
        info!("Recorded incident {}", incident.incident_id);
        Ok(())
    }

    /// Attach outcome feedback once. Missing ids and repeat attachments are reported,
    /// not treated as errors.
    pub fn update_outcome(
        &self,
        incident_id: Uuid,
        details: Map<String, Value>,
    ) -> Result<OutcomeUpdate, StoreError> {
        let update = self.log.modify(|incidents| {
            match incidents.iter_mut().find(|i| i.incident_id == incident_id) {
                None => OutcomeUpdate::NotFound,
                Some(incident) if incident.outcome.is_some() => OutcomeUpdate::AlreadyAttached,
                Some(incident) => {
                    incident.outcome = Some(Outcome {
                        timestamp: Utc::now(),
                        details,
                    });
                    OutcomeUpdate::Attached
                }
            }
        })?;

        match update {
            OutcomeUpdate::Attached => info!("Outcome attached to incident {}", incident_id),
            OutcomeUpdate::AlreadyAttached => {
                warn!("Incident {} already has an outcome; keeping the first", incident_id)
            }
            OutcomeUpdate::NotFound => warn!("Outcome for unknown incident {}", incident_id),
        }
        Ok(update)
    }

    /// Past incidents with at least one hypothesis matching `cause` (when given) at or
    /// above `min_confidence`.
    pub fn query_similar(
        &self,
        cause: Option<&Cause>,
        min_confidence: f64,
    ) -> Result<Vec<Incident>, StoreError> {
        let incidents = self.log.load()?;
        Ok(incidents
            .into_iter()
            .filter(|incident| {
                incident.reasoning.hypotheses.iter().any(|h| {
                    cause.map_or(true, |c| &h.cause == c) && h.confidence >= min_confidence
                })
            })
            .collect())
    }

    pub fn get(&self, incident_id: Uuid) -> Result<Option<Incident>, StoreError> {
        Ok(self
            .log
            .load()?
            .into_iter()
            .find(|i| i.incident_id == incident_id))
    }

    pub fn incidents(&self) -> Result<Vec<Incident>, StoreError> {
        self.log.load()
    }
}
