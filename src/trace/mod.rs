//! The observability surface returned by every evaluation.
//!
//! Field names and shapes are a stable contract: the generated script returns
//! exactly these structures, serialized with the same camelCase keys.

mod formatter;

pub use formatter::{SUPPRESSED_LINE, TraceFormatter};

use crate::graph::{Combinator, SelectionMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyEvaluation {
    /// `true` only when an action fired and gating left at least one number.
    pub trigger: bool,
    pub numbers: Vec<u8>,
    pub logic_trace: Vec<String>,
    pub graph_wiring: GraphWiring,
    pub gating_applied: GatingApplied,
    pub decision_trace: Vec<DecisionTraceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphWiring {
    pub evaluation_order: Vec<String>,
    pub actions: Vec<ActionWiring>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionWiring {
    pub action_id: String,
    pub combinator: Combinator,
    pub inputs: Vec<String>,
    pub triggered: bool,
    /// The action's pool before gating.
    pub candidate_numbers: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatingApplied {
    pub mode: SelectionMode,
    pub limit: u8,
    pub exclude_zero: bool,
    /// Manual picks actually used; always empty in automatic mode.
    pub manual_numbers: Vec<u8>,
    /// Distinct numbers offered to gating.
    pub candidate_count: usize,
    pub zero_removed: bool,
    pub truncated: bool,
    /// Set when no action fired and gating never ran.
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTraceEntry {
    pub node_id: String,
    pub subtype: String,
    /// The node's own predicate, independent of upstream wiring.
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributed_numbers: Option<Vec<u8>>,
}

impl StrategyEvaluation {
    /// Numbers contributed by any traced node, in trace order, without duplicates.
    pub fn contributed_numbers(&self) -> Vec<u8> {
        let mut seen = Vec::new();
        for n in self
            .decision_trace
            .iter()
            .filter_map(|e| e.contributed_numbers.as_ref())
            .flatten()
        {
            if !seen.contains(n) {
                seen.push(*n);
            }
        }
        seen
    }

    pub fn fired_actions(&self) -> impl Iterator<Item = &ActionWiring> {
        self.graph_wiring.actions.iter().filter(|a| a.triggered)
    }
}
