//! Structural validation of strategy payloads.
//!
//! The guard is the only way to obtain a [`StrategyGraph`]. Checks run in a
//! fixed order and the first failure rejects the whole payload:
//!
//! 1. `schemaVersion` equals [`SUPPORTED_SCHEMA_VERSION`]
//! 2. `nodes` and `connections` are present and are arrays
//! 3. every node and connection is well-formed and every connection references existing nodes
//! 4. the connections are acyclic and the graph has at least one action node
//! 5. node/connection counts and name lengths are within [`GuardLimits`]
//! 6. `selectionMode` and `gating` are within range

mod cycle;

use crate::error::ValidationError;
use crate::graph::{
    Condition, Connection, GatingConfig, GraphNode, NodeKind, SUPPORTED_SCHEMA_VERSION,
    SelectionMode, StrategyGraph,
};
use crate::outcome::MAX_SLOT;
use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value as Json};

/// Upper bounds on payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardLimits {
    pub max_nodes: usize,
    pub max_connections: usize,
    pub max_name_len: usize,
    pub max_sequence_len: usize,
}

impl Default for GuardLimits {
    fn default() -> Self {
        Self {
            max_nodes: 256,
            max_connections: 1024,
            max_name_len: 128,
            max_sequence_len: 64,
        }
    }
}

pub struct SchemaGuard {
    limits: GuardLimits,
    aliases: AHashMap<String, String>,
}

pub struct SchemaGuardBuilder {
    limits: GuardLimits,
    aliases: AHashMap<String, String>,
}

impl SchemaGuardBuilder {
    pub fn new() -> Self {
        Self {
            limits: GuardLimits::default(),
            aliases: AHashMap::new(),
        }
    }

    pub fn with_limits(mut self, limits: GuardLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Maps an editor-specific subtype name onto a canonical one.
    pub fn with_subtype_alias(mut self, user_subtype: &str, canonical_subtype: &str) -> Self {
        self.aliases
            .insert(user_subtype.to_string(), canonical_subtype.to_string());
        self
    }

    pub fn build(self) -> SchemaGuard {
        SchemaGuard {
            limits: self.limits,
            aliases: self.aliases,
        }
    }
}

impl Default for SchemaGuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SchemaGuard {
    fn default() -> Self {
        SchemaGuardBuilder::new().build()
    }
}

/// Validates a payload with the default limits and no aliases.
pub fn validate(payload: &Json) -> Result<StrategyGraph, ValidationError> {
    SchemaGuard::default().validate(payload)
}

impl SchemaGuard {
    pub fn builder() -> SchemaGuardBuilder {
        SchemaGuardBuilder::new()
    }

    pub fn limits(&self) -> &GuardLimits {
        &self.limits
    }

    pub fn validate_str(&self, json: &str) -> Result<StrategyGraph, ValidationError> {
        let payload: Json =
            serde_json::from_str(json).map_err(|e| ValidationError::JsonParseError(e.to_string()))?;
        self.validate(&payload)
    }

    pub fn validate(&self, payload: &Json) -> Result<StrategyGraph, ValidationError> {
        match self.check(payload) {
            Ok(graph) => {
                tracing::debug!(
                    nodes = graph.nodes.len(),
                    connections = graph.connections.len(),
                    mode = %graph.selection_mode,
                    "strategy graph accepted"
                );
                Ok(graph)
            }
            Err(e) => {
                tracing::debug!(error = %e, "strategy graph rejected");
                Err(e)
            }
        }
    }

    fn check(&self, payload: &Json) -> Result<StrategyGraph, ValidationError> {
        let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let schema_version = match obj.get("schemaVersion") {
            Some(Json::String(v)) if v == SUPPORTED_SCHEMA_VERSION => v.clone(),
            Some(Json::String(v)) => return Err(version_mismatch(v.clone())),
            Some(other) => return Err(version_mismatch(other.to_string())),
            None => return Err(version_mismatch("<missing>".to_string())),
        };

        let raw_nodes = required_array(obj, "nodes")?;
        let raw_connections = required_array(obj, "connections")?;

        let nodes = raw_nodes
            .iter()
            .enumerate()
            .map(|(index, raw)| self.parse_node(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut kinds: AHashMap<&str, bool> = AHashMap::with_capacity(nodes.len());
        for node in &nodes {
            if kinds.insert(node.id.as_str(), node.is_action()).is_some() {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
        }

        let connections = raw_connections
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_connection(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        for c in &connections {
            for endpoint in [&c.from, &c.to] {
                if !kinds.contains_key(endpoint.as_str()) {
                    return Err(ValidationError::DanglingConnection {
                        from: c.from.clone(),
                        to: c.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if kinds.get(c.from.as_str()) == Some(&true) {
                return Err(ValidationError::ActionAsSource(c.from.clone()));
            }
        }

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges: Vec<(&str, &str)> = connections
            .iter()
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect();
        if let Some(cycle) = cycle::find_cycle(&ids, &edges) {
            return Err(ValidationError::CycleDetected { cycle });
        }
        if !nodes.iter().any(GraphNode::is_action) {
            return Err(ValidationError::NoActionNode);
        }

        let name = match obj.get("name") {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    field: "name",
                    message: "must be a string".to_string(),
                });
            }
        };
        self.check_bounds(name.as_deref(), &nodes, raw_nodes, connections.len())?;

        let selection_mode = match obj.get("selectionMode") {
            None | Some(Json::Null) => SelectionMode::default(),
            Some(Json::String(s)) if s == "automatic" => SelectionMode::Automatic,
            Some(Json::String(s)) if s == "hybrid" => SelectionMode::Hybrid,
            Some(other) => {
                return Err(ValidationError::InvalidSelectionMode(
                    other.as_str().map_or_else(|| other.to_string(), str::to_string),
                ));
            }
        };
        let gating = parse_gating(obj.get("gating"))?;

        Ok(StrategyGraph {
            schema_version,
            name,
            nodes,
            connections,
            selection_mode,
            gating,
        })
    }

    fn parse_node(&self, index: usize, raw: &Json) -> Result<GraphNode, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidNode {
            index,
            message: message.to_string(),
        };
        let obj = raw.as_object().ok_or_else(|| invalid("node must be an object"))?;

        let id = match obj.get("id") {
            Some(Json::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(invalid("'id' must be a non-empty string")),
        };
        let label = match obj.get("label") {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("'label' must be a string")),
        };
        let or_group = match obj.get("orGroup") {
            None | Some(Json::Null) => false,
            Some(Json::Bool(b)) => *b,
            Some(_) => return Err(invalid("'orGroup' must be a boolean")),
        };

        let node_type = match obj.get("type") {
            Some(Json::String(t)) => t.as_str(),
            None if obj.contains_key("subtype") => "condition",
            _ => return Err(invalid("'type' must be 'condition' or 'action'")),
        };
        let kind = match node_type {
            "action" => NodeKind::Action,
            "condition" => {
                let subtype = obj
                    .get("subtype")
                    .and_then(Json::as_str)
                    .ok_or_else(|| invalid("condition node requires a string 'subtype'"))?;
                let subtype = self
                    .aliases
                    .get(subtype)
                    .map(String::as_str)
                    .unwrap_or(subtype);
                let config = match obj.get("config") {
                    None | Some(Json::Null) => Json::Object(Map::new()),
                    Some(cfg @ Json::Object(_)) => cfg.clone(),
                    Some(_) => return Err(invalid("'config' must be an object")),
                };
                NodeKind::Condition(Condition::parse(subtype, &config))
            }
            other => {
                return Err(invalid(&format!(
                    "unknown node type '{}', expected 'condition' or 'action'",
                    other
                )));
            }
        };

        Ok(GraphNode {
            id,
            label,
            or_group,
            kind,
        })
    }

    fn check_bounds(
        &self,
        name: Option<&str>,
        nodes: &[GraphNode],
        raw_nodes: &[Json],
        connection_count: usize,
    ) -> Result<(), ValidationError> {
        let limits = &self.limits;
        if nodes.len() > limits.max_nodes {
            return Err(ValidationError::TooMany {
                kind: "nodes",
                count: nodes.len(),
                max: limits.max_nodes,
            });
        }
        if connection_count > limits.max_connections {
            return Err(ValidationError::TooMany {
                kind: "connections",
                count: connection_count,
                max: limits.max_connections,
            });
        }

        let check_len = |field: String, value: &str| {
            let len = value.chars().count();
            if len > limits.max_name_len {
                Err(ValidationError::NameTooLong {
                    field,
                    len,
                    max: limits.max_name_len,
                })
            } else {
                Ok(())
            }
        };
        if let Some(name) = name {
            check_len("name".to_string(), name)?;
        }
        for node in nodes {
            check_len(format!("nodes[{}].id", node.id), &node.id)?;
            if let Some(label) = &node.label {
                check_len(format!("nodes[{}].label", node.id), label)?;
            }
        }

        for raw in raw_nodes {
            let len = raw
                .pointer("/config/sequencia")
                .and_then(Json::as_array)
                .map_or(0, Vec::len);
            if len > limits.max_sequence_len {
                return Err(ValidationError::TooMany {
                    kind: "sequence tokens",
                    count: len,
                    max: limits.max_sequence_len,
                });
            }
        }
        Ok(())
    }
}

fn version_mismatch(found: String) -> ValidationError {
    ValidationError::UnsupportedSchemaVersion {
        expected: SUPPORTED_SCHEMA_VERSION.to_string(),
        found,
    }
}

fn required_array<'a>(
    obj: &'a Map<String, Json>,
    field: &'static str,
) -> Result<&'a [Json], ValidationError> {
    match obj.get(field) {
        None | Some(Json::Null) => Err(ValidationError::MissingField(field)),
        Some(Json::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ValidationError::NotAnArray(field)),
    }
}

fn parse_connection(index: usize, raw: &Json) -> Result<Connection, ValidationError> {
    let endpoint = |key: &str| match raw.get(key) {
        Some(Json::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::InvalidConnection {
            index,
            message: format!("'{}' must be a non-empty node id", key),
        }),
    };
    Ok(Connection {
        from: endpoint("from")?,
        to: endpoint("to")?,
    })
}

fn parse_gating(raw: Option<&Json>) -> Result<GatingConfig, ValidationError> {
    let defaults = GatingConfig::default();
    let obj = match raw {
        None | Some(Json::Null) => return Ok(defaults),
        Some(Json::Object(obj)) => obj,
        Some(_) => {
            return Err(ValidationError::InvalidGating {
                field: "gating",
                message: "must be an object".to_string(),
            });
        }
    };

    let bound = |field: &'static str, default: u8| -> Result<u8, ValidationError> {
        match obj.get(field) {
            None | Some(Json::Null) => Ok(default),
            Some(value) => value
                .as_u64()
                .filter(|v| (1..=MAX_SLOT as u64).contains(v))
                .map(|v| v as u8)
                .ok_or_else(|| ValidationError::InvalidGating {
                    field,
                    message: format!("expected an integer in [1, {}], found {}", MAX_SLOT, value),
                }),
        }
    };
    let max_numbers_auto = bound("maxNumbersAuto", defaults.max_numbers_auto)?;
    let max_numbers_hybrid = bound("maxNumbersHybrid", defaults.max_numbers_hybrid)?;
    let min_manual_hybrid = bound("minManualHybrid", defaults.min_manual_hybrid)?;
    if min_manual_hybrid > max_numbers_hybrid {
        return Err(ValidationError::InvalidGating {
            field: "minManualHybrid",
            message: format!(
                "{} exceeds maxNumbersHybrid ({})",
                min_manual_hybrid, max_numbers_hybrid
            ),
        });
    }

    let exclude_zero = match obj.get("excludeZero") {
        None | Some(Json::Null) => defaults.exclude_zero,
        Some(Json::Bool(b)) => *b,
        Some(other) => {
            return Err(ValidationError::InvalidGating {
                field: "excludeZero",
                message: format!("expected a boolean, found {}", other),
            });
        }
    };

    let manual_numbers = match obj.get("manualNumbers") {
        None | Some(Json::Null) => Vec::new(),
        Some(Json::Array(items)) => {
            let mut seen = AHashSet::new();
            let mut numbers = Vec::with_capacity(items.len());
            for item in items {
                let n = item
                    .as_u64()
                    .filter(|v| *v <= MAX_SLOT as u64)
                    .ok_or_else(|| ValidationError::InvalidGating {
                        field: "manualNumbers",
                        message: format!("{} is not a slot in [0, {}]", item, MAX_SLOT),
                    })? as u8;
                if seen.insert(n) {
                    numbers.push(n);
                }
            }
            numbers
        }
        Some(_) => {
            return Err(ValidationError::NotAnArray("gating.manualNumbers"));
        }
    };

    Ok(GatingConfig {
        max_numbers_auto,
        max_numbers_hybrid,
        min_manual_hybrid,
        exclude_zero,
        manual_numbers,
    })
}
