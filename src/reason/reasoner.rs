use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::normalize::{normalize, PLACEHOLDER_CONFIDENCE};
use super::types::{Cause, Hypothesis, Reasoning, ReasoningMode};
use super::{deterministic, prompt};
use crate::config::DelegateConfig;
use crate::observe::Observation;
use crate::services::llm::{Delegate, DelegateError};

/// Below this observation confidence the case is ambiguous enough to ask the delegate.
const DELEGATE_CONFIDENCE_THRESHOLD: f64 = 0.85;
const DELEGATE_ANOMALY_THRESHOLD: usize = 2;

/// Hybrid reasoner: deterministic rules by default, delegate for ambiguous cases.
///
/// The delegate is advisory. Any failure on that path (transport, timeout, malformed
/// output) degrades to an `llm_failed` Reasoning and is never returned as an error.
pub struct Reasoner {
    delegate: Option<Arc<dyn Delegate>>,
    enabled: bool,
    timeout: Duration,
}

impl Reasoner {
    /// Deterministic only.
    pub fn deterministic() -> Self {
        Self {
            delegate: None,
            enabled: false,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_delegate(delegate: Arc<dyn Delegate>, config: &DelegateConfig) -> Self {
        Self {
            delegate: Some(delegate),
            enabled: config.enabled,
            timeout: config.timeout,
        }
    }

    pub async fn reason(&self, observation: &Observation) -> Reasoning {
        match &self.delegate {
            Some(delegate) if self.enabled && needs_delegate(observation) => {
                info!("Delegate reasoning for observation {}", observation.observation_id);
                match self.reason_with_delegate(delegate.as_ref(), observation).await {
                    Ok(reasoning) => reasoning,
                    Err(e) => {
                        warn!("Delegate failure: {}", e);
                        fallback(&e)
                    }
                }
            }
            _ => {
                info!("Deterministic reasoning for observation {}", observation.observation_id);
                deterministic::reason(&observation.stats)
            }
        }
    }

    async fn reason_with_delegate(
        &self,
        delegate: &dyn Delegate,
        observation: &Observation,
    ) -> Result<Reasoning, DelegateError> {
        let prompt = prompt::build(observation);

        // Hard bound on the only blocking call in a cycle.
        let response = tokio::time::timeout(self.timeout, delegate.generate(&prompt))
            .await
            .map_err(|_| DelegateError::Timeout(self.timeout))??;

        normalize(&response)
    }
}

pub fn needs_delegate(observation: &Observation) -> bool {
    observation.confidence < DELEGATE_CONFIDENCE_THRESHOLD
        || observation.anomalies.len() >= DELEGATE_ANOMALY_THRESHOLD
}

fn fallback(error: &DelegateError) -> Reasoning {
    Reasoning {
        mode: ReasoningMode::LlmFailed,
        hypotheses: vec![Hypothesis::new(
            Cause::Unknown,
            "Delegate failed or returned malformed output",
            PLACEHOLDER_CONFIDENCE,
        )],
        assumptions: Vec::new(),
        unknowns: vec!["Delegate reasoning failed".to_string()],
        confidence: PLACEHOLDER_CONFIDENCE,
        error: Some(error.to_string()),
    }
}
