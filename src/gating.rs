//! Post-decision constraints on the candidate number set.

use crate::conditions::Candidate;
use crate::graph::SelectionMode;
use crate::plan::GatingPlan;
use crate::trace::GatingApplied;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order in which a capped pool is cut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Highest confidence first; unscored numbers after scored ones; ties keep pool order.
    #[default]
    ConfidenceFirst,
    /// Pool order as contributed.
    InsertionOrder,
}

impl TruncationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncationPolicy::ConfidenceFirst => "confidence_first",
            TruncationPolicy::InsertionOrder => "insertion_order",
        }
    }
}

impl fmt::Display for TruncationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatingOutcome {
    pub numbers: Vec<u8>,
    pub applied: GatingApplied,
}

/// Merges candidates by number. A number keeps its first position and the
/// highest confidence seen for it.
pub fn merge(candidates: impl IntoIterator<Item = Candidate>) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        match merged.iter_mut().find(|c| c.number == candidate.number) {
            Some(existing) => existing.confidence = existing.confidence.max(candidate.confidence),
            None => merged.push(candidate),
        }
    }
    merged
}

/// The record for a call where no action fired.
pub fn skipped(plan: &GatingPlan) -> GatingOutcome {
    GatingOutcome {
        numbers: Vec::new(),
        applied: GatingApplied {
            mode: plan.mode,
            limit: plan.limit(),
            exclude_zero: plan.config.exclude_zero,
            manual_numbers: Vec::new(),
            candidate_count: 0,
            zero_removed: false,
            truncated: false,
            skipped: true,
        },
    }
}

/// Applies zero exclusion, ordering, manual blending and the cap.
///
/// Applying this again to its own output, as unscored candidates, yields the
/// same numbers.
pub fn apply(pool: &[Candidate], plan: &GatingPlan) -> GatingOutcome {
    let config = &plan.config;
    let mut pool = merge(pool.iter().copied());
    let candidate_count = pool.len();
    let mut zero_removed = false;

    if config.exclude_zero {
        let before = pool.len();
        pool.retain(|c| c.number != 0);
        zero_removed = pool.len() != before;
    }

    if plan.truncation == TruncationPolicy::ConfidenceFirst {
        // `None < Some(_)`, so a descending stable sort puts unscored numbers last.
        pool.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    }

    let limit = usize::from(plan.limit());
    let (numbers, manual_numbers, truncated) = match plan.mode {
        SelectionMode::Automatic => {
            let truncated = pool.len() > limit;
            let numbers = pool.iter().take(limit).map(|c| c.number).collect();
            (numbers, Vec::new(), truncated)
        }
        SelectionMode::Hybrid => {
            let mut manual: Vec<u8> = Vec::new();
            for &n in &config.manual_numbers {
                if config.exclude_zero && n == 0 {
                    zero_removed = true;
                    continue;
                }
                if !manual.contains(&n) {
                    manual.push(n);
                }
            }
            if manual.len() < usize::from(config.min_manual_hybrid) {
                tracing::warn!(
                    manual = manual.len(),
                    required = config.min_manual_hybrid,
                    "hybrid gating has fewer manual picks than required"
                );
            }
            let fill: Vec<u8> = pool
                .iter()
                .map(|c| c.number)
                .filter(|n| !manual.contains(n))
                .collect();
            let truncated = manual.len() + fill.len() > limit;
            let numbers = manual.iter().chain(fill.iter()).copied().take(limit).collect();
            (numbers, manual, truncated)
        }
    };

    if truncated {
        tracing::debug!(mode = %plan.mode, limit, candidate_count, "gating truncated the pool");
    }

    GatingOutcome {
        numbers,
        applied: GatingApplied {
            mode: plan.mode,
            limit: plan.limit(),
            exclude_zero: config.exclude_zero,
            manual_numbers,
            candidate_count,
            zero_removed,
            truncated,
            skipped: false,
        },
    }
}
