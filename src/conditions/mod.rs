//! Pure predicates for every condition subtype.
//!
//! Each subtype declares its required parameters, a scope (a clamped window
//! or the entire history) and a boolean predicate over counts or occurrence.
//! A missing parameter makes the predicate `false`; nothing here can fail.

mod groups;
mod occurrence;
mod pattern;

pub use groups::{column_of, dozen_of};

use crate::graph::Condition;
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// A number proposed for betting by a triggered condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub number: u8,
    /// Windowed frequency of the originating group, when the subtype has one.
    pub confidence: Option<u32>,
}

impl Candidate {
    pub fn unscored(number: u8) -> Self {
        Self {
            number,
            confidence: None,
        }
    }

    pub fn scored(number: u8, confidence: u32) -> Self {
        Self {
            number,
            confidence: Some(confidence),
        }
    }
}

/// Result of evaluating one condition against one history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assessment {
    pub result: bool,
    /// Empty unless `result` is `true`.
    pub candidates: Vec<Candidate>,
}

/// Evaluates a condition's boolean predicate.
pub fn evaluate(condition: &Condition, rounds: &[Outcome]) -> bool {
    match condition {
        Condition::Absence(cfg) => occurrence::absence(cfg, rounds),
        Condition::SpecificNumber(cfg) => occurrence::specific_number(cfg, rounds),
        Condition::DozenHot(cfg) => !groups::hot_dozens(cfg, rounds).is_empty(),
        Condition::ColumnHot(cfg) => !groups::hot_columns(cfg, rounds).is_empty(),
        Condition::Mirror => pattern::mirror(rounds),
        Condition::SequenceCustom(cfg) => pattern::sequence(cfg, rounds),
        Condition::ColorStreak(cfg) => pattern::color_streak(cfg, rounds),
        Condition::ParityStreak(cfg) => pattern::parity_streak(cfg, rounds),
        Condition::RangeStreak(cfg) => pattern::range_streak(cfg, rounds),
        Condition::Unrecognized { .. } => false,
    }
}

/// Numbers a condition proposes. Subtypes that do not produce numbers return
/// an empty list, as does any condition whose predicate is `false`.
pub fn candidate_numbers(condition: &Condition, rounds: &[Outcome]) -> Vec<Candidate> {
    assess(condition, rounds).candidates
}

/// Evaluates the predicate and, when it holds, the proposed numbers.
pub fn assess(condition: &Condition, rounds: &[Outcome]) -> Assessment {
    let result = evaluate(condition, rounds);
    if !result {
        return Assessment::default();
    }
    let candidates = match condition {
        Condition::Absence(cfg) => occurrence::absence_candidates(cfg),
        Condition::SpecificNumber(cfg) => cfg.number.map(Candidate::unscored).into_iter().collect(),
        Condition::DozenHot(cfg) => {
            groups::candidates(&groups::hot_dozens(cfg, rounds), groups::dozen_of)
        }
        Condition::ColumnHot(cfg) => {
            groups::candidates(&groups::hot_columns(cfg, rounds), groups::column_of)
        }
        _ => Vec::new(),
    };
    Assessment { result, candidates }
}
