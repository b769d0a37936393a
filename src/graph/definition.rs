use super::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The only payload version this engine accepts.
pub const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

/// A validated strategy graph, ready to be planned.
///
/// Produced exclusively by the schema guard; its node ids are unique and its
/// connections are known to reference existing nodes without forming a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyGraph {
    pub schema_version: String,
    pub name: Option<String>,
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
    pub selection_mode: SelectionMode,
    pub gating: GatingConfig,
}

impl StrategyGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn condition_nodes(&self) -> impl Iterator<Item = (&GraphNode, &Condition)> {
        self.nodes
            .iter()
            .filter_map(|n| n.condition().map(|c| (n, c)))
    }

    pub fn action_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.is_action())
    }
}

/// A single node of the authored graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: Option<String>,
    /// Relaxes the default combinator to "at least one input true".
    pub or_group: bool,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Condition(Condition),
    /// Terminal "emit a signal" node. Carries no evaluation logic.
    Action,
}

impl GraphNode {
    pub fn condition(&self) -> Option<&Condition> {
        match &self.kind {
            NodeKind::Condition(c) => Some(c),
            NodeKind::Action => None,
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, NodeKind::Action)
    }
}

/// Directed edge: `from`'s output feeds `to`'s aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Automatic,
    Hybrid,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Automatic => "automatic",
            SelectionMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric constraints applied to the candidate set after a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatingConfig {
    pub max_numbers_auto: u8,
    pub max_numbers_hybrid: u8,
    pub min_manual_hybrid: u8,
    pub exclude_zero: bool,
    /// User-chosen numbers, only consulted in hybrid mode.
    pub manual_numbers: Vec<u8>,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            max_numbers_auto: 6,
            max_numbers_hybrid: 10,
            min_manual_hybrid: 1,
            exclude_zero: false,
            manual_numbers: Vec::new(),
        }
    }
}

/// How a node folds multiple incoming edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
