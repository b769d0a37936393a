use super::{ActionPlan, StrategyPlan, Wiring};
use std::fmt;

/// Renders a plan as one tree per action, expanding each condition's own
/// upstream gate underneath it.
pub struct DisplayPlan<'a> {
    pub plan: &'a StrategyPlan,
}

impl<'a> fmt::Display for DisplayPlan<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.plan.name {
            writeln!(f, "Strategy: {}", name)?;
        }
        writeln!(
            f,
            "Gating: {} ({} truncation)",
            self.plan.gating.mode,
            self.plan.gating.truncation.as_str()
        )?;
        if self.plan.actions.is_empty() {
            writeln!(f, "<no actions>")?;
        }
        for action in &self.plan.actions {
            self.fmt_action(action, f)?;
        }
        Ok(())
    }
}

impl<'a> DisplayPlan<'a> {
    fn fmt_action(&self, action: &ActionPlan, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Action: {} [{}]", action.action_id, action.combinator)?;
        self.fmt_as_tree(&action.wiring, f, "", true)
    }

    fn fmt_as_tree(
        &self,
        wiring: &Wiring,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match wiring {
            Wiring::Constant(b) => writeln!(f, "Constant: {}", b)?,
            Wiring::Node(id) => match self.plan.step(id) {
                Some(step) => {
                    writeln!(f, "{} ({})", id, step.condition.subtype())?;
                    if let Some(gate) = &step.gate {
                        self.fmt_as_tree(gate, f, &child_prefix, true)?;
                    }
                }
                None => writeln!(f, "{} <unknown>", id)?,
            },
            Wiring::All(items) => self.fmt_group(f, "AND", items, &child_prefix)?,
            Wiring::Any(items) => self.fmt_group(f, "OR", items, &child_prefix)?,
        }
        Ok(())
    }

    fn fmt_group(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        items: &[Wiring],
        child_prefix: &str,
    ) -> fmt::Result {
        writeln!(f, "{}", label)?;
        for (i, item) in items.iter().enumerate() {
            self.fmt_as_tree(item, f, child_prefix, i + 1 == items.len())?;
        }
        Ok(())
    }
}
