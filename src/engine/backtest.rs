use super::interpret_rounds;
use crate::outcome::History;
use crate::plan::StrategyPlan;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// The decision taken after seeing the history up to `round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRound {
    /// Index of the last outcome the strategy saw.
    pub round: usize,
    pub trigger: bool,
    pub numbers: Vec<u8>,
    /// The outcome that followed, if any.
    pub next_outcome: Option<String>,
    /// `None` when no signal fired, or when there is no numeric next outcome to settle against.
    pub hit: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestSummary {
    pub evaluated: usize,
    pub signals: usize,
    pub settled: usize,
    pub hits: usize,
    /// `hits / settled`, absent when nothing settled.
    pub hit_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub rounds: Vec<BacktestRound>,
    pub summary: BacktestSummary,
}

/// Evaluates `plan` on every prefix of `history` holding at least `warmup`
/// outcomes and checks each signal against the outcome that came next.
///
/// Prefixes are independent, so they are evaluated in parallel.
pub fn run(plan: &StrategyPlan, history: &History, warmup: usize) -> BacktestReport {
    let all = history.rounds();
    let first = warmup.max(1);

    let rounds: Vec<BacktestRound> = (first..=all.len())
        .into_par_iter()
        .map(|end| {
            let evaluation = interpret_rounds(plan, &all[..end]);
            let next = all.get(end);
            let hit = match next.and_then(|o| o.number()) {
                Some(n) if evaluation.trigger => Some(evaluation.numbers.contains(&n)),
                _ => None,
            };
            BacktestRound {
                round: end - 1,
                trigger: evaluation.trigger,
                numbers: evaluation.numbers,
                next_outcome: next.map(|o| o.to_string()),
                hit,
            }
        })
        .collect();

    let signals = rounds.iter().filter(|r| r.trigger).count();
    let settled = rounds.iter().filter(|r| r.hit.is_some()).count();
    let hits = rounds.iter().filter(|r| r.hit == Some(true)).count();
    let summary = BacktestSummary {
        evaluated: rounds.len(),
        signals,
        settled,
        hits,
        hit_rate: (settled > 0).then(|| hits as f64 / settled as f64),
    };

    tracing::info!(
        evaluated = summary.evaluated,
        signals,
        hits,
        "backtest finished"
    );

    BacktestReport { rounds, summary }
}
