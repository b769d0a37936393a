use crate::graph::{
    ColorStreakConfig, Half, Parity, ParityStreakConfig, RangeStreakConfig, SequenceConfig,
    SequenceMode,
};
use crate::outcome::{Outcome, window};

/// At least one genuine numeric reading anywhere in the history.
pub(super) fn mirror(rounds: &[Outcome]) -> bool {
    rounds.iter().any(Outcome::is_number)
}

pub(super) fn sequence(cfg: &SequenceConfig, rounds: &[Outcome]) -> bool {
    let (Some(seq), Some(mode)) = (&cfg.sequence, cfg.mode) else {
        return false;
    };
    if seq.is_empty() || seq.len() > rounds.len() {
        return false;
    }
    match mode {
        SequenceMode::Exact => rounds[rounds.len() - seq.len()..] == seq[..],
        SequenceMode::Partial => rounds.windows(seq.len()).any(|w| w == &seq[..]),
    }
}

/// The last `length` outcomes all satisfy `pred`. Unlike windows, a streak is
/// never clamped: a history shorter than the streak cannot contain it.
fn streak(rounds: &[Outcome], length: Option<usize>, pred: impl Fn(&Outcome) -> bool) -> bool {
    match length {
        Some(len) if len > 0 && len <= rounds.len() => window(rounds, len).iter().all(pred),
        _ => false,
    }
}

pub(super) fn color_streak(cfg: &ColorStreakConfig, rounds: &[Outcome]) -> bool {
    let Some(color) = cfg.color else {
        return false;
    };
    streak(rounds, cfg.length, |o| o.color() == Some(color))
}

pub(super) fn parity_streak(cfg: &ParityStreakConfig, rounds: &[Outcome]) -> bool {
    let Some(parity) = cfg.parity else {
        return false;
    };
    streak(rounds, cfg.length, |o| match o.number() {
        Some(n) if n > 0 => (n % 2 == 0) == (parity == Parity::Even),
        _ => false,
    })
}

pub(super) fn range_streak(cfg: &RangeStreakConfig, rounds: &[Outcome]) -> bool {
    let Some(half) = cfg.half else {
        return false;
    };
    streak(rounds, cfg.length, |o| match (o.number(), half) {
        (Some(n), Half::Low) => (1..=18).contains(&n),
        (Some(n), Half::High) => (19..=36).contains(&n),
        (None, _) => false,
    })
}
