//! Common test utilities for building strategy payloads and histories.
use croupier::prelude::*;
use serde_json::{Value as Json, json};

/// A condition node.
#[allow(dead_code)]
pub fn condition(id: &str, subtype: &str, config: Json) -> Json {
    json!({ "id": id, "type": "condition", "subtype": subtype, "config": config })
}

/// A condition node whose inputs are combined with OR.
#[allow(dead_code)]
pub fn or_condition(id: &str, subtype: &str, config: Json) -> Json {
    json!({ "id": id, "type": "condition", "subtype": subtype, "orGroup": true, "config": config })
}

#[allow(dead_code)]
pub fn action(id: &str) -> Json {
    json!({ "id": id, "type": "action" })
}

/// An action node that fires when any input holds.
#[allow(dead_code)]
pub fn or_action(id: &str) -> Json {
    json!({ "id": id, "type": "action", "orGroup": true })
}

#[allow(dead_code)]
pub fn link(from: &str, to: &str) -> Json {
    json!({ "from": from, "to": to })
}

/// A version 1.0 payload in automatic mode with default gating.
#[allow(dead_code)]
pub fn payload(nodes: Vec<Json>, connections: Vec<Json>) -> Json {
    json!({ "schemaVersion": "1.0", "nodes": nodes, "connections": connections })
}

/// Same as [`payload`] with explicit selection mode and gating.
#[allow(dead_code)]
pub fn gated_payload(nodes: Vec<Json>, connections: Vec<Json>, mode: &str, gating: Json) -> Json {
    json!({
        "schemaVersion": "1.0",
        "nodes": nodes,
        "connections": connections,
        "selectionMode": mode,
        "gating": gating,
    })
}

/// `absence` of a number over the last `rounds` outcomes.
#[allow(dead_code)]
pub fn absence(id: &str, target: u8, rounds: usize) -> Json {
    condition(
        id,
        "absence",
        json!({ "evento": "numero", "numeroAlvo": target, "rodadasSemOcorrer": rounds }),
    )
}

#[allow(dead_code)]
pub fn mirror(id: &str) -> Json {
    condition(id, "mirror", json!({}))
}

#[allow(dead_code)]
pub fn history(entries: Json) -> History {
    History::from_json(&entries).expect("test history must be valid")
}

#[allow(dead_code)]
pub fn rounds(entries: Json) -> Vec<Outcome> {
    history(entries).rounds().to_vec()
}

#[allow(dead_code)]
pub fn plan_of(payload: &Json) -> StrategyPlan {
    StrategyEngine::default()
        .plan(payload)
        .expect("test payload must be valid")
}

#[allow(dead_code)]
pub fn evaluate(payload: &Json, entries: Json) -> StrategyEvaluation {
    StrategyEngine::default()
        .evaluate(payload, &history(entries))
        .expect("test payload must be valid")
}

/// The history from the absence scenario: 7 is absent, 12 is present.
#[allow(dead_code)]
pub fn sample_history() -> Json {
    json!([3, 12, 0, 18, 22, 33])
}
