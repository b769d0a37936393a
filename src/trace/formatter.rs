use super::GatingApplied;
use crate::plan::Wiring;
use ahash::AHashMap;

pub const SUPPRESSED_LINE: &str = "signal suppressed: no numbers after gating";

/// Formats the human-readable `logicTrace` lines.
pub struct TraceFormatter;

impl TraceFormatter {
    /// `"<actionId> <= <wiring> => <bool>"`
    pub fn format_action(
        action_id: &str,
        wiring: &Wiring,
        values: &AHashMap<&str, bool>,
        triggered: bool,
    ) -> String {
        format!(
            "{} <= {} => {}",
            action_id,
            Self::format_wiring(wiring, values),
            triggered
        )
    }

    /// Renders leaves as `id=<bool>`; compound children are parenthesized.
    pub fn format_wiring(wiring: &Wiring, values: &AHashMap<&str, bool>) -> String {
        match wiring {
            Wiring::Node(id) => {
                format!("{}={}", id, values.get(id.as_str()).copied().unwrap_or(false))
            }
            Wiring::Constant(b) => b.to_string(),
            Wiring::All(items) => Self::format_group(items, " AND ", values),
            Wiring::Any(items) => Self::format_group(items, " OR ", values),
        }
    }

    fn format_group(items: &[Wiring], separator: &str, values: &AHashMap<&str, bool>) -> String {
        items
            .iter()
            .map(|item| match item {
                Wiring::All(_) | Wiring::Any(_) => {
                    format!("({})", Self::format_wiring(item, values))
                }
                _ => Self::format_wiring(item, values),
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `"gating <mode>: <k> candidate(s) -> <m> number(s)"`
    pub fn format_gating(applied: &GatingApplied, kept: usize) -> String {
        format!(
            "gating {}: {} candidate(s) -> {} number(s)",
            applied.mode, applied.candidate_count, kept
        )
    }
}
