//! The intermediate representation shared by the interpreter and the code
//! generator.
//!
//! Both backends consume a [`StrategyPlan`] and nothing else, so a decision
//! made by one is reproducible by the other: condition steps are already in
//! evaluation order, wiring is an explicit boolean tree, and gating carries
//! every policy it needs.

mod builder;
pub mod display;

pub use builder::PlanBuilder;
pub use display::DisplayPlan;

use crate::gating::TruncationPolicy;
use crate::graph::{Combinator, Condition, GatingConfig, SelectionMode};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Policy points the payload does not decide on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Combinator for nodes with several inputs and no `orGroup` marker.
    pub default_combinator: Combinator,
    pub truncation: TruncationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPlan {
    pub name: Option<String>,
    /// Condition nodes in topological order.
    pub steps: Vec<ConditionStep>,
    /// Action nodes in declaration order.
    pub actions: Vec<ActionPlan>,
    pub gating: GatingPlan,
    pub policy: EnginePolicy,
}

/// One condition node, evaluated exactly once per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionStep {
    pub node_id: String,
    pub condition: Condition,
    /// Upstream wiring that must also hold for the node to pass its value on.
    /// `None` when the node has no incoming connections.
    pub gate: Option<Wiring>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub action_id: String,
    pub combinator: Combinator,
    /// Direct inputs in connection order.
    pub inputs: Vec<String>,
    pub wiring: Wiring,
    /// Every upstream condition node, in step order. Those whose own
    /// predicate holds contribute candidate numbers.
    pub contributors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatingPlan {
    pub mode: SelectionMode,
    pub config: GatingConfig,
    pub truncation: TruncationPolicy,
}

/// Boolean combination of condition nodes' effective values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wiring {
    Node(String),
    All(Vec<Wiring>),
    Any(Vec<Wiring>),
    Constant(bool),
}

impl Wiring {
    /// Folds a node's inputs with its combinator. Returns `None` for no inputs.
    pub fn from_inputs(inputs: &[String], combinator: Combinator) -> Option<Self> {
        match inputs {
            [] => None,
            [single] => Some(Wiring::Node(single.clone())),
            many => {
                let leaves = many.iter().cloned().map(Wiring::Node).collect();
                Some(match combinator {
                    Combinator::And => Wiring::All(leaves),
                    Combinator::Or => Wiring::Any(leaves),
                })
            }
        }
    }

    /// Evaluates against the effective values of already-evaluated nodes.
    /// Unknown ids read as `false`.
    pub fn evaluate(&self, values: &AHashMap<&str, bool>) -> bool {
        match self {
            Wiring::Node(id) => values.get(id.as_str()).copied().unwrap_or(false),
            Wiring::All(items) => items.iter().all(|w| w.evaluate(values)),
            Wiring::Any(items) => items.iter().any(|w| w.evaluate(values)),
            Wiring::Constant(b) => *b,
        }
    }

    /// Node ids referenced by this tree, in first-appearance order.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Wiring::Node(id) => {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
            Wiring::All(items) | Wiring::Any(items) => {
                for item in items {
                    item.collect_ids(ids);
                }
            }
            Wiring::Constant(_) => {}
        }
    }
}

impl GatingPlan {
    /// The cap for the configured selection mode.
    pub fn limit(&self) -> u8 {
        match self.mode {
            SelectionMode::Automatic => self.config.max_numbers_auto,
            SelectionMode::Hybrid => self.config.max_numbers_hybrid,
        }
    }
}

impl StrategyPlan {
    pub fn step(&self, node_id: &str) -> Option<&ConditionStep> {
        self.steps.iter().find(|s| s.node_id == node_id)
    }
}
