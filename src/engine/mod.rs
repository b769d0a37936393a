//! The façade tying guard, planner and both backends together.

mod backtest;

pub use backtest::{BacktestReport, BacktestRound, BacktestSummary, run as backtest_plan};

use crate::artifact::CompiledStrategy;
use crate::codegen::ScriptGenerator;
use crate::error::{EngineError, ValidationError};
use crate::gating::{self, TruncationPolicy};
use crate::graph::{Combinator, StrategyGraph};
use crate::guard::{GuardLimits, SchemaGuard, SchemaGuardBuilder};
use crate::outcome::{History, Outcome};
use crate::plan::{EnginePolicy, PlanBuilder, StrategyPlan};
use crate::resolver;
use crate::trace::{ActionWiring, GraphWiring, SUPPRESSED_LINE, StrategyEvaluation, TraceFormatter};
use serde_json::Value as Json;

/// Validates, plans, evaluates and compiles strategy graphs.
///
/// An engine holds only configuration. Every call builds its own graph, plan
/// and memo table, so one engine can serve any number of threads.
pub struct StrategyEngine {
    guard: SchemaGuard,
    policy: EnginePolicy,
    generator: ScriptGenerator,
}

pub struct StrategyEngineBuilder {
    guard: SchemaGuardBuilder,
    policy: EnginePolicy,
}

impl StrategyEngineBuilder {
    pub fn new() -> Self {
        Self {
            guard: SchemaGuard::builder(),
            policy: EnginePolicy::default(),
        }
    }

    pub fn with_limits(mut self, limits: GuardLimits) -> Self {
        self.guard = self.guard.with_limits(limits);
        self
    }

    /// Lets payloads use `user_subtype` wherever `canonical_subtype` is meant.
    pub fn with_subtype_alias(mut self, user_subtype: &str, canonical_subtype: &str) -> Self {
        self.guard = self.guard.with_subtype_alias(user_subtype, canonical_subtype);
        self
    }

    pub fn with_policy(mut self, policy: EnginePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_combinator(mut self, combinator: Combinator) -> Self {
        self.policy.default_combinator = combinator;
        self
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.policy.truncation = truncation;
        self
    }

    pub fn build(self) -> StrategyEngine {
        StrategyEngine {
            guard: self.guard.build(),
            policy: self.policy,
            generator: ScriptGenerator::new(),
        }
    }
}

impl Default for StrategyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for StrategyEngine {
    fn default() -> Self {
        StrategyEngineBuilder::new().build()
    }
}

impl StrategyEngine {
    pub fn builder() -> StrategyEngineBuilder {
        StrategyEngineBuilder::new()
    }

    pub fn policy(&self) -> EnginePolicy {
        self.policy
    }

    pub fn guard(&self) -> &SchemaGuard {
        &self.guard
    }

    pub fn validate(&self, payload: &Json) -> Result<StrategyGraph, ValidationError> {
        self.guard.validate(payload)
    }

    pub fn validate_str(&self, json: &str) -> Result<StrategyGraph, ValidationError> {
        self.guard.validate_str(json)
    }

    /// Validates a payload and lowers it into the shared plan.
    pub fn plan(&self, payload: &Json) -> Result<StrategyPlan, ValidationError> {
        let graph = self.guard.validate(payload)?;
        PlanBuilder::new(&graph, self.policy).build()
    }

    pub fn plan_str(&self, json: &str) -> Result<StrategyPlan, ValidationError> {
        let graph = self.guard.validate_str(json)?;
        PlanBuilder::new(&graph, self.policy).build()
    }

    /// Evaluates a strategy payload against a round history.
    ///
    /// # Arguments
    ///
    /// * `payload`: The strategy graph as authored in the editor.
    /// * `history`: Round outcomes in chronological order, most recent last.
    ///
    /// # Returns
    ///
    /// * `Ok(StrategyEvaluation)`: The decision, gated numbers and every trace field.
    ///   A misconfigured node never produces an error; it evaluates to `false`.
    /// * `Err(EngineError::Validation)`: The payload was rejected before any node ran.
    pub fn evaluate(
        &self,
        payload: &Json,
        history: &History,
    ) -> Result<StrategyEvaluation, EngineError> {
        let plan = self.plan(payload)?;
        Ok(interpret(&plan, history))
    }

    /// Validates, plans and prints a payload into a deployable artifact.
    ///
    /// Fails with `EngineError::Compile` when a node's subtype has no script
    /// template, even though the interpreter would treat it as `false`.
    pub fn compile(&self, payload: &Json) -> Result<CompiledStrategy, EngineError> {
        let plan = self.plan(payload)?;
        self.compile_plan(plan)
    }

    pub fn compile_plan(&self, plan: StrategyPlan) -> Result<CompiledStrategy, EngineError> {
        let script = self.generator.compile(&plan)?;
        Ok(CompiledStrategy::new(plan, script))
    }

    /// Replays a history round by round; see [`backtest_plan`].
    pub fn backtest(
        &self,
        payload: &Json,
        history: &History,
        warmup: usize,
    ) -> Result<BacktestReport, EngineError> {
        let plan = self.plan(payload)?;
        Ok(backtest::run(&plan, history, warmup))
    }
}

/// Runs a plan in-process against a history.
pub fn interpret(plan: &StrategyPlan, history: &History) -> StrategyEvaluation {
    interpret_rounds(plan, history.rounds())
}

pub(crate) fn interpret_rounds(plan: &StrategyPlan, rounds: &[Outcome]) -> StrategyEvaluation {
    let resolution = resolver::resolve(plan, rounds);
    let fired = resolution.any_triggered();
    let gated = if fired {
        gating::apply(&resolution.fired_pool(), &plan.gating)
    } else {
        gating::skipped(&plan.gating)
    };

    let mut logic_trace: Vec<String> = resolution
        .actions
        .iter()
        .map(|a| a.explanation.clone())
        .collect();
    logic_trace.push(TraceFormatter::format_gating(&gated.applied, gated.numbers.len()));
    if fired && gated.numbers.is_empty() {
        tracing::debug!("signal suppressed: gating left no numbers");
        logic_trace.push(SUPPRESSED_LINE.to_string());
    }

    let actions = resolution
        .actions
        .into_iter()
        .map(|a| ActionWiring {
            action_id: a.action_id,
            combinator: a.combinator,
            inputs: a.inputs,
            triggered: a.triggered,
            candidate_numbers: a.candidates.iter().map(|c| c.number).collect(),
        })
        .collect();

    StrategyEvaluation {
        trigger: fired && !gated.numbers.is_empty(),
        numbers: gated.numbers,
        logic_trace,
        graph_wiring: GraphWiring {
            evaluation_order: resolution.evaluation_order,
            actions,
        },
        gating_applied: gated.applied,
        decision_trace: resolution.decision_trace,
    }
}
