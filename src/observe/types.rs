use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

/// The five normalized signal buckets. Never null; an absent bucket is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBuckets {
    pub tickets: Vec<Value>,
    pub errors: Vec<Value>,
    pub checkouts: Vec<Value>,
    pub webhooks: Vec<Value>,
    pub migration_states: Vec<Value>,
}

impl SignalBuckets {
    pub fn empty_count(&self) -> usize {
        [
            &self.tickets,
            &self.errors,
            &self.checkouts,
            &self.webhooks,
            &self.migration_states,
        ]
        .iter()
        .filter(|bucket| bucket.is_empty())
        .count()
    }
}

/// Counts derived from the buckets. No inference happens here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub ticket_count: usize,
    pub error_count: usize,
    pub failed_checkouts: usize,
    pub error_types: BTreeMap<String, usize>,
    pub migration_stage_distribution: BTreeMap<String, usize>,
}

impl SignalStats {
    pub fn error_type_count(&self, error_type: &str) -> usize {
        self.error_types.get(error_type).copied().unwrap_or(0)
    }
}

/// A surface-level anomaly. Says what was counted, not why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Anomaly {
    CheckoutFailures {
        count: usize,
        severity: Severity,
    },
    RepeatedError {
        error_type: String,
        count: usize,
        severity: Severity,
    },
}

/// Snapshot produced once per cycle. Immutable after the Observer returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub observation_id: u64,
    pub timestamp: DateTime<Utc>,
    pub signals: SignalBuckets,
    pub stats: SignalStats,
    pub anomalies: Vec<Anomaly>,
    /// 0.5 - 1.0, lowered by 0.1 per empty bucket.
    pub confidence: f64,
}
