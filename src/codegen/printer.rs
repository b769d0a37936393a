//! One printer per IR kind. Every printer returns script source; none of
//! them evaluates anything.

use crate::graph::{AbsenceTarget, Condition, Half, Parity, SequenceMode, SpecificMode};
use crate::outcome::Outcome;
use crate::plan::{ActionPlan, ConditionStep, GatingPlan, Wiring};
use serde_json::{Value as Json, json};

/// A JavaScript string literal. JSON string syntax is a subset of it.
pub(super) fn js_string(s: &str) -> String {
    Json::String(s.to_string()).to_string()
}

/// Text safe to place after `//`: line terminators would end the comment.
pub(super) fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_control() || c == '\u{2028}' || c == '\u{2029}' {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn js_strings(items: &[String]) -> String {
    format!(
        "[{}]",
        items.iter().map(|s| js_string(s)).collect::<Vec<_>>().join(", ")
    )
}

/// The typed configuration of a condition as an object literal.
pub(super) fn print_params(condition: &Condition) -> String {
    let params = match condition {
        Condition::Absence(cfg) => {
            let (event, target) = match &cfg.target {
                AbsenceTarget::Number(n) => (json!("numero"), json!(n)),
                AbsenceTarget::Color(c) => (json!("cor"), json!(c.map(|c| c.name()))),
                AbsenceTarget::Unsupported(_) => (Json::Null, Json::Null),
            };
            json!({ "event": event, "target": target, "span": cfg.rounds })
        }
        Condition::SpecificNumber(cfg) => json!({
            "number": cfg.number,
            "mode": cfg.mode.map(|m| match m {
                SpecificMode::Occurred => "ocorreu",
                SpecificMode::Absent => "ausente",
            }),
            "span": cfg.rounds,
        }),
        Condition::DozenHot(cfg) | Condition::ColumnHot(cfg) => json!({
            "window": cfg.window,
            "minFrequency": cfg.min_frequency,
        }),
        Condition::Mirror | Condition::Unrecognized { .. } => json!({}),
        Condition::SequenceCustom(cfg) => json!({
            "sequence": cfg
                .sequence
                .as_ref()
                .map(|seq| seq.iter().map(outcome_literal).collect::<Vec<_>>()),
            "mode": cfg.mode.map(|m| match m {
                SequenceMode::Exact => "exato",
                SequenceMode::Partial => "parcial",
            }),
        }),
        Condition::ColorStreak(cfg) => json!({
            "color": cfg.color.map(|c| c.name()),
            "length": cfg.length,
        }),
        Condition::ParityStreak(cfg) => json!({
            "parity": cfg.parity.map(|p| match p {
                Parity::Even => "par",
                Parity::Odd => "impar",
            }),
            "length": cfg.length,
        }),
        Condition::RangeStreak(cfg) => json!({
            "half": cfg.half.map(|h| match h {
                Half::Low => "baixo",
                Half::High => "alto",
            }),
            "length": cfg.length,
        }),
    };
    params.to_string()
}

fn outcome_literal(outcome: &Outcome) -> Json {
    match outcome {
        Outcome::Number(n) => json!(n),
        Outcome::Token(t) => json!(t),
    }
}

pub(super) fn print_wiring(wiring: &Wiring) -> String {
    match wiring {
        Wiring::Node(id) => format!("{{ op: \"node\", id: {} }}", js_string(id)),
        Wiring::All(items) => format!("{{ op: \"all\", items: [{}] }}", print_items(items)),
        Wiring::Any(items) => format!("{{ op: \"any\", items: [{}] }}", print_items(items)),
        Wiring::Constant(b) => format!("{{ op: \"const\", value: {} }}", b),
    }
}

fn print_items(items: &[Wiring]) -> String {
    items.iter().map(print_wiring).collect::<Vec<_>>().join(", ")
}

pub(super) fn print_step(step: &ConditionStep, function: &str) -> String {
    format!(
        "  {{ id: {}, subtype: {}, gate: {}, run: (rounds) => {}(rounds, {}) }},\n",
        js_string(&step.node_id),
        js_string(step.condition.subtype()),
        step.gate
            .as_ref()
            .map_or_else(|| "null".to_string(), print_wiring),
        function,
        print_params(&step.condition),
    )
}

pub(super) fn print_action(action: &ActionPlan) -> String {
    format!(
        "  {{ id: {}, combinator: {}, inputs: {}, contributors: {}, wiring: {} }},\n",
        js_string(&action.action_id),
        js_string(action.combinator.as_str()),
        js_strings(&action.inputs),
        js_strings(&action.contributors),
        print_wiring(&action.wiring),
    )
}

pub(super) fn print_gating(gating: &GatingPlan) -> String {
    let config = &gating.config;
    let literal = json!({
        "mode": gating.mode.as_str(),
        "limit": gating.limit(),
        "excludeZero": config.exclude_zero,
        "manualNumbers": config.manual_numbers,
        "truncation": gating.truncation.as_str(),
    });
    format!("const GATING = Object.freeze({});\n", literal)
}

/// The exported wrapper around `runStrategy`, and its CommonJS export.
pub(super) fn print_entry_point(name: &str) -> String {
    format!(
        "function {name}(history) {{\n  return runStrategy(history);\n}}\n\n\
         if (typeof module !== \"undefined\" && module.exports) {{\n  module.exports = {{ {name} }};\n}}\n"
    )
}
