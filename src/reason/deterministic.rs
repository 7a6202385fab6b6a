use super::types::{Cause, Hypothesis, Reasoning, ReasoningMode};
use crate::observe::SignalStats;

struct Rule {
    cause: Cause,
    explanation: &'static str,
    confidence: f64,
    threshold: usize,
    measure: fn(&SignalStats) -> usize,
}

/// Evaluated in order; each rule contributes at most one hypothesis.
fn rules() -> [Rule; 4] {
    [
        Rule {
            cause: Cause::MigrationMisconfiguration,
            explanation: "High number of checkout failures detected after migration",
            confidence: 0.8,
            threshold: 5,
            measure: |s| s.failed_checkouts,
        },
        Rule {
            cause: Cause::WebhookAuthFailure,
            explanation: "Repeated webhook authentication failures detected",
            confidence: 0.7,
            threshold: 3,
            measure: |s| s.error_type_count("webhook_401"),
        },
        Rule {
            cause: Cause::FrontendBackendMismatch,
            explanation: "Frontend and backend states are inconsistent",
            confidence: 0.65,
            threshold: 3,
            measure: |s| s.error_type_count("frontend_state_mismatch"),
        },
        Rule {
            cause: Cause::PlatformRegression,
            explanation: "High volume of unknown errors suggests a platform regression",
            confidence: 0.6,
            threshold: 10,
            measure: |s| s.error_type_count("unknown"),
        },
    ]
}

/// Threshold reasoning over derived stats. Always available, never fails.
pub fn reason(stats: &SignalStats) -> Reasoning {
    let mut hypotheses: Vec<Hypothesis> = rules()
        .into_iter()
        .filter(|rule| (rule.measure)(stats) >= rule.threshold)
        .map(|rule| Hypothesis::new(rule.cause, rule.explanation, rule.confidence))
        .collect();

    if hypotheses.is_empty() {
        hypotheses.push(Hypothesis::new(
            Cause::NormalOperation,
            "System signals are within expected parameters",
            0.9,
        ));
    }

    let confidence = hypotheses
        .iter()
        .map(|h| h.confidence)
        .fold(0.0, f64::max);

    Reasoning {
        mode: ReasoningMode::Deterministic,
        hypotheses,
        assumptions: vec!["Observed signals accurately reflect system behavior".to_string()],
        unknowns: vec!["Merchant-specific configurations not visible".to_string()],
        confidence,
        error: None,
    }
}
