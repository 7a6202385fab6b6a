use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::thread;
use triage::act::ActionReport;
use triage::decide::{DecisionSet, DecisionTrace, RiskLevel};
use triage::memory::{Incident, Memory, OutcomeUpdate};
use triage::observe::{Observation, SignalBuckets, SignalStats};
use triage::reason::{Cause, Hypothesis, Reasoning, ReasoningMode};
use uuid::Uuid;

fn observation() -> Observation {
    Observation {
        observation_id: 1,
        timestamp: Utc::now(),
        signals: SignalBuckets::default(),
        stats: SignalStats::default(),
        anomalies: vec![],
        confidence: 0.9,
    }
}

fn reasoning(hypotheses: Vec<(Cause, f64)>) -> Reasoning {
    Reasoning {
        mode: ReasoningMode::Deterministic,
        hypotheses: hypotheses
            .into_iter()
            .map(|(cause, confidence)| Hypothesis::new(cause, "", confidence))
            .collect(),
        assumptions: vec![],
        unknowns: vec![],
        confidence: 0.0,
        error: None,
    }
}

fn decision() -> DecisionSet {
    DecisionSet {
        observation_id: 1,
        decisions: vec![],
        risk_level: RiskLevel::Low,
        trace: DecisionTrace {
            observation_confidence: 0.9,
            reasoning_confidence: 0.8,
        },
    }
}

fn action() -> ActionReport {
    ActionReport {
        timestamp: Utc::now(),
        observation_id: 1,
        actions_taken: vec![],
        pending_approvals: vec![],
        risk_level: RiskLevel::Low,
    }
}

fn record(memory: &Memory, hypotheses: Vec<(Cause, f64)>) -> Uuid {
    memory
        .record_incident(observation(), reasoning(hypotheses), decision(), action())
        .unwrap()
}

fn outcome(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn test_record_then_lookup_has_no_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));

    let id = record(&memory, vec![(Cause::NormalOperation, 0.9)]);
    let incident = memory.get(id).unwrap().expect("incident should be stored");

    assert_eq!(incident.incident_id, id);
    assert!(incident.outcome.is_none());
}

#[test]
fn test_ids_are_unique_and_order_is_append_only() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));

    let ids: Vec<Uuid> = (0..5)
        .map(|_| record(&memory, vec![(Cause::NormalOperation, 0.9)]))
        .collect();

    let stored: Vec<Uuid> = memory.incidents().unwrap().iter().map(|i| i.incident_id).collect();
    assert_eq!(stored, ids);
}

#[test]
fn test_outcome_attaches_once() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));
    let id = record(&memory, vec![(Cause::WebhookAuthFailure, 0.7)]);

    let first = memory
        .update_outcome(id, outcome(json!({"resolved": true, "note": "secret rotated"})))
        .unwrap();
    assert_eq!(first, OutcomeUpdate::Attached);
    let attached = memory.get(id).unwrap().unwrap().outcome.expect("outcome set");
    assert_eq!(attached.details.get("resolved"), Some(&json!(true)));

    let second = memory
        .update_outcome(id, outcome(json!({"resolved": false})))
        .unwrap();
    assert_eq!(second, OutcomeUpdate::AlreadyAttached);

    let kept = memory.get(id).unwrap().unwrap().outcome.unwrap();
    assert_eq!(kept, attached, "First outcome and its timestamp must be kept");
}

#[test]
fn test_outcome_for_unknown_incident_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));
    let id = record(&memory, vec![(Cause::NormalOperation, 0.9)]);

    let update = memory
        .update_outcome(Uuid::new_v4(), outcome(json!({"resolved": true})))
        .unwrap();

    assert_eq!(update, OutcomeUpdate::NotFound);
    assert!(memory.get(id).unwrap().unwrap().outcome.is_none());
}

#[test]
fn test_outcome_details_are_nested_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_memory.json");
    let memory = Memory::new(&path);
    let id = record(&memory, vec![(Cause::NormalOperation, 0.9)]);
    memory.update_outcome(id, outcome(json!({"resolved": true}))).unwrap();

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let stored = &raw[0]["outcome"];
    assert_eq!(stored["details"]["resolved"], json!(true));
    assert!(stored["timestamp"].is_string());
}

#[test]
fn test_outcome_with_own_timestamp_keeps_log_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_memory.json");
    let memory = Memory::new(&path);
    let id = record(&memory, vec![(Cause::WebhookAuthFailure, 0.7)]);

    let update = memory
        .update_outcome(id, outcome(json!({"timestamp": 1700000000.0, "resolved": true})))
        .unwrap();
    assert_eq!(update, OutcomeUpdate::Attached);

    let reopened = Memory::new(&path);
    let stored = reopened.get(id).unwrap().unwrap().outcome.expect("outcome set");
    assert_eq!(stored.details.get("timestamp"), Some(&json!(1700000000.0)));
    assert_eq!(stored.details.get("resolved"), Some(&json!(true)));

    // Later cycles still append to the same log
    record(&reopened, vec![(Cause::NormalOperation, 0.9)]);
    assert_eq!(reopened.incidents().unwrap().len(), 2);
}

#[test]
fn test_query_similar_filters_by_cause_and_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));

    let webhook = record(&memory, vec![(Cause::WebhookAuthFailure, 0.7)]);
    let mixed = record(
        &memory,
        vec![(Cause::MigrationMisconfiguration, 0.8), (Cause::WebhookAuthFailure, 0.3)],
    );
    let normal = record(&memory, vec![(Cause::NormalOperation, 0.9)]);

    let ids = |found: Vec<triage::memory::Incident>| -> Vec<Uuid> {
        found.into_iter().map(|i| i.incident_id).collect()
    };

    assert_eq!(
        ids(memory.query_similar(Some(&Cause::WebhookAuthFailure), 0.0).unwrap()),
        vec![webhook, mixed]
    );
    assert_eq!(
        ids(memory.query_similar(Some(&Cause::WebhookAuthFailure), 0.5).unwrap()),
        vec![webhook]
    );
    assert_eq!(
        ids(memory.query_similar(None, 0.85).unwrap()),
        vec![normal]
    );
    assert!(memory
        .query_similar(Some(&Cause::PlatformRegression), 0.0)
        .unwrap()
        .is_empty());
}

#[test]
fn test_record_leaves_incident_with_caller() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Memory::new(dir.path().join("agent_memory.json"));

    let incident = Incident::new(
        observation(),
        reasoning(vec![(Cause::PlatformRegression, 0.6)]),
        decision(),
        action(),
    );
    memory.record(&incident).unwrap();

    assert_eq!(memory.get(incident.incident_id).unwrap(), Some(incident));
}

#[test]
fn test_memory_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_memory.json");

    let id = record(&Memory::new(&path), vec![(Cause::NormalOperation, 0.9)]);

    let reopened = Memory::new(&path);
    assert!(reopened.get(id).unwrap().is_some());
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Arc::new(Memory::new(dir.path().join("agent_memory.json")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let memory = Arc::clone(&memory);
            thread::spawn(move || {
                for _ in 0..5 {
                    record(&memory, vec![(Cause::NormalOperation, 0.9)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(memory.incidents().unwrap().len(), 40);
}
