use serde::{Deserialize, Serialize};
use std::fmt;

/// Red slots of a European wheel. Every other non-zero slot is black.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    Green,
}

impl Color {
    pub fn of_number(n: u8) -> Self {
        if n == 0 {
            Color::Green
        } else if RED_NUMBERS.contains(&n) {
            Color::Red
        } else {
            Color::Black
        }
    }

    /// Recognizes the color names used by the feed and the editor.
    pub fn from_name(name: &str) -> Option<Self> {
        match super::normalize_token(name).as_str() {
            "vermelho" | "red" => Some(Color::Red),
            "preto" | "black" => Some(Color::Black),
            "verde" | "green" | "zero" => Some(Color::Green),
            _ => None,
        }
    }

    /// Canonical token, as the feed reports it.
    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "vermelho",
            Color::Black => "preto",
            Color::Green => "verde",
        }
    }

    /// All slots of this color in ascending order.
    pub fn numbers(&self) -> Vec<u8> {
        (0..=super::MAX_SLOT)
            .filter(|n| Color::of_number(*n) == *self)
            .collect()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
