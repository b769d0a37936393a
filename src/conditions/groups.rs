use super::Candidate;
use crate::graph::HotGroupConfig;
use crate::outcome::{MAX_SLOT, Outcome, window};

/// Dozen index (0: 1-12, 1: 13-24, 2: 25-36). Zero belongs to no dozen.
pub fn dozen_of(n: u8) -> Option<usize> {
    match n {
        1..=36 => Some(((n - 1) / 12) as usize),
        _ => None,
    }
}

/// Column index by residue mod 3 (0: residue 1, 1: residue 2, 2: residue 0).
/// Zero belongs to no column.
pub fn column_of(n: u8) -> Option<usize> {
    match n {
        1..=36 => Some(match n % 3 {
            1 => 0,
            2 => 1,
            _ => 2,
        }),
        _ => None,
    }
}

/// Groups whose windowed count reaches the threshold, as `(group, count)`.
fn hot_groups(
    cfg: &HotGroupConfig,
    rounds: &[Outcome],
    group_of: fn(u8) -> Option<usize>,
) -> Vec<(usize, u32)> {
    let (Some(span), Some(min)) = (cfg.window, cfg.min_frequency) else {
        return Vec::new();
    };
    let mut counts = [0u32; 3];
    for group in window(rounds, span)
        .iter()
        .filter_map(Outcome::number)
        .filter_map(group_of)
    {
        counts[group] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count as usize >= min)
        .map(|(group, count)| (group, *count))
        .collect()
}

pub(super) fn hot_dozens(cfg: &HotGroupConfig, rounds: &[Outcome]) -> Vec<(usize, u32)> {
    hot_groups(cfg, rounds, dozen_of)
}

pub(super) fn hot_columns(cfg: &HotGroupConfig, rounds: &[Outcome]) -> Vec<(usize, u32)> {
    hot_groups(cfg, rounds, column_of)
}

/// Every number of the hot groups, scored by its group's count.
pub(super) fn candidates(
    hot: &[(usize, u32)],
    group_of: fn(u8) -> Option<usize>,
) -> Vec<Candidate> {
    hot.iter()
        .flat_map(|(group, count)| {
            (1..=MAX_SLOT)
                .filter(move |n| group_of(*n) == Some(*group))
                .map(move |n| Candidate::scored(n, *count))
        })
        .collect()
}
