//! Prints a [`StrategyPlan`] as a self-contained JavaScript program.
//!
//! The script exports `evaluate(history)`, which returns the same structure
//! as [`crate::trace::StrategyEvaluation`]. Condition logic comes from one
//! template per subtype, emitted only when the plan uses it; wiring and
//! gating are printed as literals from the plan.

mod printer;
mod templates;

use crate::error::CompileError;
use crate::plan::StrategyPlan;
use std::collections::BTreeSet;

/// Name of the function every script exports.
pub const ENTRY_POINT: &str = "evaluate";

#[derive(Debug, Clone, Default)]
pub struct ScriptGenerator;

impl ScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, plan: &StrategyPlan) -> Result<String, CompileError> {
        if !plan.actions.iter().any(|a| !a.wiring.node_ids().is_empty()) {
            return Err(CompileError::EmptyProgram {
                steps: plan.steps.len(),
                actions: plan.actions.len(),
            });
        }

        let step_lines = plan
            .steps
            .iter()
            .map(|step| {
                let subtype = step.condition.subtype();
                templates::template_for(subtype)
                    .map(|(function, _)| printer::print_step(step, function))
                    .ok_or_else(|| CompileError::UnsupportedSubtype {
                        node_id: step.node_id.clone(),
                        subtype: subtype.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let used: BTreeSet<&str> = plan.steps.iter().map(|s| s.condition.subtype()).collect();

        let mut script = String::new();
        script.push_str("\"use strict\";\n");
        match &plan.name {
            Some(name) => {
                script.push_str(&format!("// Strategy: {}\n", printer::comment_text(name)))
            }
            None => script.push_str("// Strategy: (unnamed)\n"),
        }
        script.push_str("// Generated by croupier. Edits are overwritten on recompile.\n\n");
        script.push_str(templates::PRELUDE);
        script.push('\n');

        if used.iter().any(|s| templates::needs_hot_groups(s)) {
            script.push_str(templates::HOT_GROUPS);
            script.push('\n');
        }

        for (_, template) in used.iter().filter_map(|s| templates::template_for(s)) {
            script.push_str(template);
            script.push('\n');
        }

        script.push_str("const STEPS = [\n");
        for line in &step_lines {
            script.push_str(line);
        }
        script.push_str("];\n\n");

        script.push_str("const ACTIONS = [\n");
        for action in &plan.actions {
            script.push_str(&printer::print_action(action));
        }
        script.push_str("];\n\n");

        script.push_str(&printer::print_gating(&plan.gating));
        script.push('\n');
        script.push_str(templates::RUNTIME);
        script.push('\n');
        script.push_str(&printer::print_entry_point(ENTRY_POINT));

        tracing::info!(
            bytes = script.len(),
            templates = used.len(),
            "strategy script generated"
        );
        Ok(script)
    }
}

/// Compiles with the default generator.
pub fn compile(plan: &StrategyPlan) -> Result<String, CompileError> {
    ScriptGenerator::new().compile(plan)
}
