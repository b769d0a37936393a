use super::Candidate;
use crate::graph::{AbsenceConfig, AbsenceTarget, SpecificMode, SpecificNumberConfig};
use crate::outcome::{Color, Outcome, window};

/// `numero` absent from the last `rounds` outcomes.
fn number_absent(rounds: &[Outcome], number: u8, span: usize) -> bool {
    window(rounds, span).iter().all(|o| o.number() != Some(number))
}

fn color_absent(rounds: &[Outcome], color: Color, span: usize) -> bool {
    window(rounds, span).iter().all(|o| o.color() != Some(color))
}

pub(super) fn absence(cfg: &AbsenceConfig, rounds: &[Outcome]) -> bool {
    let Some(span) = cfg.rounds else {
        return false;
    };
    match &cfg.target {
        AbsenceTarget::Number(Some(n)) => number_absent(rounds, *n, span),
        AbsenceTarget::Color(Some(c)) => color_absent(rounds, *c, span),
        _ => false,
    }
}

pub(super) fn absence_candidates(cfg: &AbsenceConfig) -> Vec<Candidate> {
    match &cfg.target {
        AbsenceTarget::Number(Some(n)) => vec![Candidate::unscored(*n)],
        AbsenceTarget::Color(Some(c)) => c.numbers().into_iter().map(Candidate::unscored).collect(),
        _ => Vec::new(),
    }
}

pub(super) fn specific_number(cfg: &SpecificNumberConfig, rounds: &[Outcome]) -> bool {
    let Some(number) = cfg.number else {
        return false;
    };
    match cfg.mode {
        Some(SpecificMode::Occurred) => rounds.iter().any(|o| o.number() == Some(number)),
        Some(SpecificMode::Absent) => cfg
            .rounds
            .is_some_and(|span| number_absent(rounds, number, span)),
        None => false,
    }
}
