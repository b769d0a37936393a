//! Evaluation phase of the wiring resolver.
//!
//! Walks a plan's condition steps once each, in order, against a history,
//! then folds every action's wiring over the results. All intermediate state
//! lives in a [`Memo`] created for the call and dropped when it returns.

use crate::conditions::{self, Assessment, Candidate};
use crate::gating;
use crate::graph::Combinator;
use crate::outcome::Outcome;
use crate::plan::StrategyPlan;
use crate::trace::{DecisionTraceEntry, TraceFormatter};
use ahash::AHashMap;

/// Per-call evaluation state, keyed by node id.
#[derive(Debug, Default)]
struct Memo<'p> {
    assessments: AHashMap<&'p str, Assessment>,
    /// Own predicate AND upstream wiring.
    effective: AHashMap<&'p str, bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResolution {
    pub action_id: String,
    pub combinator: Combinator,
    pub inputs: Vec<String>,
    pub triggered: bool,
    /// Merged pool of every upstream condition whose own predicate held.
    pub candidates: Vec<Candidate>,
    /// The action's `logicTrace` line.
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub evaluation_order: Vec<String>,
    pub actions: Vec<ActionResolution>,
    pub decision_trace: Vec<DecisionTraceEntry>,
}

impl Resolution {
    pub fn any_triggered(&self) -> bool {
        self.actions.iter().any(|a| a.triggered)
    }

    /// Pools of the fired actions, merged in action order.
    pub fn fired_pool(&self) -> Vec<Candidate> {
        gating::merge(
            self.actions
                .iter()
                .filter(|a| a.triggered)
                .flat_map(|a| a.candidates.iter().copied()),
        )
    }
}

/// Evaluates `plan` against `rounds` (chronological, most recent last).
pub fn resolve(plan: &StrategyPlan, rounds: &[Outcome]) -> Resolution {
    let mut memo = Memo::default();
    let mut decision_trace = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        let id = step.node_id.as_str();
        if memo.assessments.contains_key(id) {
            continue;
        }
        let assessment = conditions::assess(&step.condition, rounds);
        let upstream = step
            .gate
            .as_ref()
            .is_none_or(|gate| gate.evaluate(&memo.effective));

        let contributed_numbers = (assessment.result && !assessment.candidates.is_empty())
            .then(|| assessment.candidates.iter().map(|c| c.number).collect());
        decision_trace.push(DecisionTraceEntry {
            node_id: step.node_id.clone(),
            subtype: step.condition.subtype().to_string(),
            result: assessment.result,
            contributed_numbers,
        });

        memo.effective.insert(id, assessment.result && upstream);
        memo.assessments.insert(id, assessment);
    }

    let actions = plan
        .actions
        .iter()
        .map(|action| {
            let triggered = action.wiring.evaluate(&memo.effective);
            let candidates = gating::merge(
                action
                    .contributors
                    .iter()
                    .filter_map(|id| memo.assessments.get(id.as_str()))
                    .filter(|a| a.result)
                    .flat_map(|a| a.candidates.iter().copied()),
            );
            if triggered {
                tracing::debug!(
                    action = %action.action_id,
                    candidates = candidates.len(),
                    "action fired"
                );
            }
            ActionResolution {
                action_id: action.action_id.clone(),
                combinator: action.combinator,
                inputs: action.inputs.clone(),
                triggered,
                candidates,
                explanation: TraceFormatter::format_action(
                    &action.action_id,
                    &action.wiring,
                    &memo.effective,
                    triggered,
                ),
            }
        })
        .collect();

    Resolution {
        evaluation_order: plan.steps.iter().map(|s| s.node_id.clone()).collect(),
        actions,
        decision_trace,
    }
}
