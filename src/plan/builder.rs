use super::{ActionPlan, ConditionStep, EnginePolicy, GatingPlan, StrategyPlan, Wiring};
use crate::error::ValidationError;
use crate::graph::{Combinator, NodeKind, StrategyGraph};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::collections::BTreeSet;

/// Lowers a validated [`StrategyGraph`] into a [`StrategyPlan`].
pub struct PlanBuilder<'a> {
    graph: &'a StrategyGraph,
    policy: EnginePolicy,
    /// `target -> sources`, in connection order with duplicates dropped.
    incoming: AHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(graph: &'a StrategyGraph, policy: EnginePolicy) -> Self {
        let mut incoming: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
        for conn in graph.connections.iter().unique() {
            incoming
                .entry(conn.to.as_str())
                .or_default()
                .push(conn.from.as_str());
        }
        Self {
            graph,
            policy,
            incoming,
        }
    }

    pub fn build(&self) -> Result<StrategyPlan, ValidationError> {
        let order = self.topological_order()?;
        let position: AHashMap<&str, usize> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let steps: Vec<ConditionStep> = order
            .iter()
            .filter_map(|id| {
                let node = self.graph.node(id)?;
                let NodeKind::Condition(condition) = &node.kind else {
                    return None;
                };
                if !condition.is_recognized() {
                    tracing::warn!(
                        node = %node.id,
                        subtype = condition.subtype(),
                        "unrecognized subtype always evaluates to false"
                    );
                }
                let inputs = self.inputs_of(id);
                Some(ConditionStep {
                    node_id: node.id.clone(),
                    condition: condition.clone(),
                    gate: Wiring::from_inputs(&inputs, self.combinator_for(node.or_group)),
                })
            })
            .collect();

        let actions = self
            .graph
            .action_nodes()
            .map(|node| {
                let inputs = self.inputs_of(&node.id);
                let combinator = self.combinator_for(node.or_group);
                let wiring =
                    Wiring::from_inputs(&inputs, combinator).unwrap_or(Wiring::Constant(false));
                let contributors = self
                    .ancestors(&node.id)
                    .into_iter()
                    .sorted_by_key(|id| position.get(id).copied().unwrap_or(usize::MAX))
                    .map(str::to_string)
                    .collect();
                ActionPlan {
                    action_id: node.id.clone(),
                    combinator,
                    inputs,
                    wiring,
                    contributors,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            steps = steps.len(),
            actions = actions.len(),
            "strategy plan built"
        );

        Ok(StrategyPlan {
            name: self.graph.name.clone(),
            steps,
            actions,
            gating: GatingPlan {
                mode: self.graph.selection_mode,
                config: self.graph.gating.clone(),
                truncation: self.policy.truncation,
            },
            policy: self.policy,
        })
    }

    fn combinator_for(&self, or_group: bool) -> Combinator {
        if or_group {
            Combinator::Or
        } else {
            self.policy.default_combinator
        }
    }

    fn inputs_of(&self, id: &str) -> Vec<String> {
        self.incoming
            .get(id)
            .map(|sources| sources.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }

    /// Kahn's algorithm; among ready nodes the earliest declared goes first.
    fn topological_order(&self) -> Result<Vec<&'a str>, ValidationError> {
        let nodes = &self.graph.nodes;
        let index: AHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; nodes.len()];
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (target, sources) in &self.incoming {
            let Some(&t) = index.get(target) else { continue };
            for source in sources {
                if let Some(&s) = index.get(source) {
                    outgoing[s].push(t);
                    in_degree[t] += 1;
                }
            }
        }

        let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(current) = ready.pop_first() {
            order.push(nodes[current].id.as_str());
            for &next in &outgoing[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < nodes.len() {
            let cycle = nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, n)| n.id.clone())
                .collect();
            return Err(ValidationError::CycleDetected { cycle });
        }
        Ok(order)
    }

    /// Every node reachable backwards from `id`, excluding `id` itself.
    fn ancestors(&self, id: &str) -> Vec<&'a str> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut stack: Vec<&'a str> = self.incoming.get(id).cloned().unwrap_or_default();
        let mut found = Vec::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            found.push(current);
            if let Some(sources) = self.incoming.get(current) {
                stack.extend(sources.iter().copied());
            }
        }
        found
    }
}
