//! Typed round results and the bounded history they are evaluated against.

pub mod color;
pub mod history;

pub use color::*;
pub use history::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest slot on a single-zero wheel.
pub const MAX_SLOT: u8 = 36;

/// Separators stripped from both ends of a textual reading. Only ASCII, so
/// the generated script strips exactly the same set.
pub const TOKEN_SEPARATORS: [char; 5] = [' ', '\t', '\n', '\r', '\x0c'];

/// Trims [`TOKEN_SEPARATORS`] and lowercases ASCII letters. Every other
/// character is kept as is.
pub fn normalize_token(text: &str) -> String {
    text.trim_matches(&TOKEN_SEPARATORS[..]).to_ascii_lowercase()
}

/// A single round result as reported by the outcome feed.
///
/// Feeds report either the slot number or, for color-only readings, a
/// categorical token such as `"vermelho"`. Tokens are stored through
/// [`normalize_token`] so equality is a plain string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Number(u8),
    Token(String),
}

impl Outcome {
    /// Parses one history entry.
    ///
    /// Accepts integral JSON numbers in `[0, 36]`, strings made only of ASCII
    /// digits that denote such a slot, and any other non-empty string as a
    /// token. Everything else is rejected with `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().and_then(slot_from_f64).map(Outcome::Number),
            serde_json::Value::String(s) => Self::from_text(s),
            _ => None,
        }
    }

    /// Parses a textual reading using the same rules as [`Outcome::from_json`].
    pub fn from_text(text: &str) -> Option<Self> {
        let token = normalize_token(text);
        if token.is_empty() {
            return None;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return token
                .parse::<u32>()
                .ok()
                .filter(|n| *n <= MAX_SLOT as u32)
                .map(|n| Outcome::Number(n as u8));
        }
        Some(Outcome::Token(token))
    }

    pub fn number(&self) -> Option<u8> {
        match self {
            Outcome::Number(n) => Some(*n),
            Outcome::Token(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Outcome::Number(_))
    }

    /// The wheel color of this outcome, if it has one.
    pub fn color(&self) -> Option<Color> {
        match self {
            Outcome::Number(n) => Some(Color::of_number(*n)),
            Outcome::Token(token) => Color::from_name(token),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Number(n) => write!(f, "{}", n),
            Outcome::Token(t) => write!(f, "{}", t),
        }
    }
}

/// Converts a float into a wheel slot when it is a finite integer in range.
pub(crate) fn slot_from_f64(value: f64) -> Option<u8> {
    if value.is_finite() && value.fract() == 0.0 && (0.0..=MAX_SLOT as f64).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}
