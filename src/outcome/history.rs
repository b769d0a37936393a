use super::Outcome;
use crate::error::HistoryError;

/// A non-empty, chronologically ordered run of outcomes, most recent last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    outcomes: Vec<Outcome>,
}

impl History {
    pub fn new(outcomes: Vec<Outcome>) -> Result<Self, HistoryError> {
        if outcomes.is_empty() {
            return Err(HistoryError::Empty);
        }
        Ok(Self { outcomes })
    }

    /// Reads a history from a JSON array of numbers and tokens.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, HistoryError> {
        let entries = value.as_array().ok_or(HistoryError::NotAnArray)?;
        let outcomes = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Outcome::from_json(entry).ok_or_else(|| HistoryError::InvalidEntry {
                    index,
                    found: entry.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(outcomes)
    }

    pub fn from_json_str(json: &str) -> Result<Self, HistoryError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| HistoryError::JsonParseError(e.to_string()))?;
        Self::from_json(&value)
    }

    pub fn rounds(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The most recent outcome.
    pub fn latest(&self) -> &Outcome {
        &self.outcomes[self.outcomes.len() - 1]
    }

    /// The last `n` outcomes, clamped to the full history.
    pub fn window(&self, n: usize) -> &[Outcome] {
        window(&self.outcomes, n)
    }
}

/// The last `n` outcomes of `rounds`. A request longer than `rounds` yields all of it.
pub fn window(rounds: &[Outcome], n: usize) -> &[Outcome] {
    &rounds[rounds.len() - n.min(rounds.len())..]
}
