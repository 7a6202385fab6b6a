use chrono::Utc;
use triage::decide::{assess_risk, Decider, Decision, DecisionKind, RiskLevel};
use triage::observe::{Observation, Severity, SignalBuckets, SignalStats};
use triage::reason::{Cause, Hypothesis, Reasoning, ReasoningMode};

fn observation(confidence: f64) -> Observation {
    Observation {
        observation_id: 42,
        timestamp: Utc::now(),
        signals: SignalBuckets::default(),
        stats: SignalStats::default(),
        anomalies: vec![],
        confidence,
    }
}

fn reasoning(hypotheses: Vec<Hypothesis>) -> Reasoning {
    let confidence = hypotheses.iter().map(|h| h.confidence).fold(0.0, f64::max);
    Reasoning {
        mode: ReasoningMode::Deterministic,
        hypotheses,
        assumptions: vec![],
        unknowns: vec![],
        confidence,
        error: None,
    }
}

fn single(cause: Cause, confidence: f64) -> Reasoning {
    reasoning(vec![Hypothesis::new(cause, "", confidence)])
}

#[test]
fn test_safety_gate_ignores_hypotheses() {
    let decider = Decider::new();

    for cause in [Cause::PlatformRegression, Cause::NormalOperation, Cause::WebhookAuthFailure] {
        let set = decider.decide(&observation(0.5), &single(cause, 0.99));

        assert_eq!(set.decisions.len(), 1);
        assert_eq!(set.decisions[0].kind, DecisionKind::BlockAutoActions);
        assert!(set.decisions[0].requires_human_approval);
        assert_eq!(set.risk_level, RiskLevel::High);
    }
}

#[test]
fn test_gate_boundary_is_exclusive() {
    let set = Decider::new().decide(&observation(0.6), &single(Cause::NormalOperation, 0.9));
    assert_eq!(set.decisions, vec![Decision::monitor_only("System operating normally")]);
    assert_eq!(set.risk_level, RiskLevel::Low);
}

#[test]
fn test_policy_table() {
    let decider = Decider::new();
    let obs = observation(0.9);

    let set = decider.decide(&obs, &single(Cause::PlatformRegression, 0.6));
    assert_eq!(
        set.decisions[0].kind,
        DecisionKind::EscalateEngineering { severity: Severity::High }
    );
    assert!(!set.decisions[0].requires_human_approval);
    assert_eq!(set.risk_level, RiskLevel::High);

    for cause in [Cause::WebhookAuthFailure, Cause::MigrationMisconfiguration] {
        let set = decider.decide(&obs, &single(cause, 0.7));
        assert_eq!(set.decisions.len(), 1);
        assert_eq!(set.decisions[0].kind, DecisionKind::SupportGuidance);
        assert!(!set.decisions[0].requires_human_approval);
        assert_eq!(set.risk_level, RiskLevel::Low);
    }

    let set = decider.decide(&obs, &single(Cause::FrontendBackendMismatch, 0.65));
    let kinds: Vec<_> = set.decisions.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![DecisionKind::DocumentationUpdateSuggestion, DecisionKind::MonitorOnly]
    );
    assert!(set.decisions[0].requires_human_approval);
    assert_eq!(set.risk_level, RiskLevel::Medium);

    for cause in [Cause::NormalOperation, Cause::Unknown, Cause::Other("dns_outage".into())] {
        let set = decider.decide(&obs, &single(cause, 0.4));
        assert_eq!(set.decisions.len(), 1);
        assert_eq!(set.decisions[0].kind, DecisionKind::MonitorOnly);
        assert_eq!(set.risk_level, RiskLevel::Low);
    }
}

#[test]
fn test_top_hypothesis_selection() {
    let decider = Decider::new();

    // Highest confidence wins regardless of position
    let mixed = reasoning(vec![
        Hypothesis::new(Cause::WebhookAuthFailure, "", 0.7),
        Hypothesis::new(Cause::PlatformRegression, "", 0.9),
    ]);
    let set = decider.decide(&observation(0.9), &mixed);
    assert!(matches!(set.decisions[0].kind, DecisionKind::EscalateEngineering { .. }));

    // First seen wins a tie
    let tied = reasoning(vec![
        Hypothesis::new(Cause::NormalOperation, "", 0.7),
        Hypothesis::new(Cause::PlatformRegression, "", 0.7),
    ]);
    let set = decider.decide(&observation(0.9), &tied);
    assert_eq!(set.decisions[0].kind, DecisionKind::MonitorOnly);
}

#[test]
fn test_trace_records_confidences_verbatim() {
    let set = Decider::new().decide(&observation(0.8), &single(Cause::WebhookAuthFailure, 0.7));
    assert_eq!(set.observation_id, 42);
    assert_eq!(set.trace.observation_confidence, 0.8);
    assert_eq!(set.trace.reasoning_confidence, 0.7);

    let blocked = Decider::new().decide(&observation(0.5), &single(Cause::WebhookAuthFailure, 0.7));
    assert_eq!(blocked.trace.observation_confidence, 0.5);
    assert_eq!(blocked.trace.reasoning_confidence, 0.7);
}

#[test]
fn test_escalation_always_high_risk() {
    let decisions = vec![
        Decision::monitor_only("watch"),
        Decision::documentation_update("docs"),
        Decision::escalate_engineering(Severity::Medium, "page", true),
    ];
    assert_eq!(assess_risk(&decisions), RiskLevel::High);
    assert_eq!(assess_risk(&decisions[..2]), RiskLevel::Medium);
    assert_eq!(assess_risk(&decisions[..1]), RiskLevel::Low);
}

#[test]
fn test_decision_wire_shape() {
    let decision = Decision::escalate_engineering(Severity::High, "regression", false);
    assert_eq!(
        serde_json::to_value(&decision).unwrap(),
        serde_json::json!({
            "type": "escalate_engineering",
            "severity": "high",
            "reason": "regression",
            "requires_human_approval": false
        })
    );

    let parsed: Decision = serde_json::from_value(serde_json::json!({
        "type": "documentation_update_suggestion",
        "reason": "docs",
        "requires_human_approval": true
    }))
    .unwrap();
    assert_eq!(parsed, Decision::documentation_update("docs"));
}
