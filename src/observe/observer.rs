use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use super::types::{Anomaly, Observation, Severity, SignalBuckets, SignalStats};
use crate::signals::RawSignals;

const REPEATED_ERROR_THRESHOLD: usize = 5;
const CONFIDENCE_FLOOR: f64 = 0.5;
const UNKNOWN_LABEL: &str = "unknown";

/// The Observer turns a raw batch into a normalized Observation.
/// Invariant: It DOES NOT interpret or decide. Stats, anomalies and confidence are
/// pure functions of the buckets; the only state is the id counter.
#[derive(Debug, Default)]
pub struct Observer {
    last_id: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { last_id: 0 }
    }

    pub fn observe(&mut self, raw: RawSignals) -> Observation {
        self.last_id += 1;

        // 1. Ingest
        let signals = ingest(raw);
        // 2. Count
        let stats = compute_stats(&signals);
        // 3. Flag
        let anomalies = detect_anomalies(&stats);
        // 4. Coverage
        let confidence = estimate_confidence(&signals);

        debug!(
            "Observation {}: {} anomalies, confidence {:.2}",
            self.last_id,
            anomalies.len(),
            confidence
        );

        Observation {
            observation_id: self.last_id,
            timestamp: Utc::now(),
            signals,
            stats,
            anomalies,
            confidence,
        }
    }
}

fn ingest(raw: RawSignals) -> SignalBuckets {
    SignalBuckets {
        tickets: raw.tickets.unwrap_or_default(),
        errors: raw.errors.unwrap_or_default(),
        checkouts: raw.checkouts.unwrap_or_default(),
        webhooks: raw.webhooks.unwrap_or_default(),
        migration_states: raw.migration_states.unwrap_or_default(),
    }
}

pub fn compute_stats(signals: &SignalBuckets) -> SignalStats {
    let mut stats = SignalStats {
        ticket_count: signals.tickets.len(),
        error_count: signals.errors.len(),
        failed_checkouts: signals
            .checkouts
            .iter()
            .filter(|c| string_field(c, "status") == Some("failed"))
            .count(),
        ..SignalStats::default()
    };

    for error in &signals.errors {
        let error_type = string_field(error, "type").unwrap_or(UNKNOWN_LABEL);
        *stats.error_types.entry(error_type.to_string()).or_insert(0) += 1;
    }

    for state in &signals.migration_states {
        let stage = string_field(state, "stage").unwrap_or(UNKNOWN_LABEL);
        *stats
            .migration_stage_distribution
            .entry(stage.to_string())
            .or_insert(0) += 1;
    }

    stats
}

pub fn detect_anomalies(stats: &SignalStats) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    if stats.failed_checkouts > 0 {
        anomalies.push(Anomaly::CheckoutFailures {
            count: stats.failed_checkouts,
            severity: Severity::High,
        });
    }

    for (error_type, &count) in &stats.error_types {
        if count >= REPEATED_ERROR_THRESHOLD {
            anomalies.push(Anomaly::RepeatedError {
                error_type: error_type.clone(),
                count,
                severity: Severity::Medium,
            });
        }
    }

    anomalies
}

pub fn estimate_confidence(signals: &SignalBuckets) -> f64 {
    // Tenths as integers keep 0.6 exactly representable for the safety gate.
    let covered = 10usize.saturating_sub(signals.empty_count());
    (covered as f64 / 10.0).max(CONFIDENCE_FLOOR)
}

fn string_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}
