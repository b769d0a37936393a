use crate::outcome::{Color, Outcome, normalize_token, slot_from_f64};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

pub const ABSENCE: &str = "absence";
pub const SPECIFIC_NUMBER: &str = "specific-number";
pub const DOZEN_HOT: &str = "dozen_hot";
pub const COLUMN_HOT: &str = "column_hot";
pub const MIRROR: &str = "mirror";
pub const SEQUENCE_CUSTOM: &str = "sequence_custom";
pub const COLOR_STREAK: &str = "color_streak";
pub const PARITY_STREAK: &str = "parity_streak";
pub const RANGE_STREAK: &str = "range_streak";

/// Every subtype with evaluation semantics.
pub const KNOWN_SUBTYPES: [&str; 9] = [
    ABSENCE,
    SPECIFIC_NUMBER,
    DOZEN_HOT,
    COLUMN_HOT,
    MIRROR,
    SEQUENCE_CUSTOM,
    COLOR_STREAK,
    PARITY_STREAK,
    RANGE_STREAK,
];

/// A condition node's subtype together with its typed parameters.
///
/// Parameters are parsed leniently: a missing or malformed value becomes
/// `None` and the predicate resolves to `false` instead of failing the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Absence(AbsenceConfig),
    SpecificNumber(SpecificNumberConfig),
    DozenHot(HotGroupConfig),
    ColumnHot(HotGroupConfig),
    Mirror,
    SequenceCustom(SequenceConfig),
    ColorStreak(ColorStreakConfig),
    ParityStreak(ParityStreakConfig),
    RangeStreak(RangeStreakConfig),
    /// A subtype this engine has no semantics for. Always `false`; rejected by codegen.
    Unrecognized { subtype: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceTarget {
    Number(Option<u8>),
    Color(Option<Color>),
    /// An `evento` value other than `numero` or `cor`.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceConfig {
    pub target: AbsenceTarget,
    pub rounds: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecificMode {
    /// `ocorreu`: seen anywhere in the history.
    Occurred,
    /// `ausente`: not seen in the last `rounds` outcomes.
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificNumberConfig {
    pub number: Option<u8>,
    pub mode: Option<SpecificMode>,
    pub rounds: Option<usize>,
}

/// Shared by `dozen_hot` and `column_hot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotGroupConfig {
    pub window: Option<usize>,
    pub min_frequency: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceMode {
    /// `exato`: the history ends with the sequence.
    Exact,
    /// `parcial`: the sequence appears contiguously anywhere.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub sequence: Option<Vec<Outcome>>,
    pub mode: Option<SequenceMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStreakConfig {
    pub color: Option<Color>,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityStreakConfig {
    pub parity: Option<Parity>,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    /// 1-18
    Low,
    /// 19-36
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStreakConfig {
    pub half: Option<Half>,
    pub length: Option<usize>,
}

impl Condition {
    /// Builds the typed condition for `subtype` out of a raw `config` object.
    pub fn parse(subtype: &str, config: &Json) -> Self {
        match subtype {
            ABSENCE => Condition::Absence(AbsenceConfig {
                target: match text_param(config, "evento").as_deref() {
                    None | Some("numero") => {
                        AbsenceTarget::Number(slot_param(config, "numeroAlvo"))
                    }
                    Some("cor") => AbsenceTarget::Color(
                        text_param(config, "corAlvo").and_then(|c| Color::from_name(&c)),
                    ),
                    Some(other) => AbsenceTarget::Unsupported(other.to_string()),
                },
                rounds: count_param(config, "rodadasSemOcorrer"),
            }),
            SPECIFIC_NUMBER => Condition::SpecificNumber(SpecificNumberConfig {
                number: slot_param(config, "numero"),
                mode: match text_param(config, "modo").as_deref() {
                    Some("ocorreu") => Some(SpecificMode::Occurred),
                    Some("ausente") => Some(SpecificMode::Absent),
                    _ => None,
                },
                rounds: count_param(config, "rodadasSemOcorrer"),
            }),
            DOZEN_HOT => Condition::DozenHot(hot_group(config)),
            COLUMN_HOT => Condition::ColumnHot(hot_group(config)),
            MIRROR => Condition::Mirror,
            SEQUENCE_CUSTOM => Condition::SequenceCustom(SequenceConfig {
                sequence: sequence_param(config, "sequencia"),
                mode: match text_param(config, "modo").as_deref() {
                    Some("exato") => Some(SequenceMode::Exact),
                    Some("parcial") => Some(SequenceMode::Partial),
                    _ => None,
                },
            }),
            COLOR_STREAK => Condition::ColorStreak(ColorStreakConfig {
                color: text_param(config, "cor").and_then(|c| Color::from_name(&c)),
                length: count_param(config, "minimo"),
            }),
            PARITY_STREAK => Condition::ParityStreak(ParityStreakConfig {
                parity: match text_param(config, "paridade").as_deref() {
                    Some("par") => Some(Parity::Even),
                    Some("impar") => Some(Parity::Odd),
                    _ => None,
                },
                length: count_param(config, "minimo"),
            }),
            RANGE_STREAK => Condition::RangeStreak(RangeStreakConfig {
                half: match text_param(config, "faixa").as_deref() {
                    Some("baixo") => Some(Half::Low),
                    Some("alto") => Some(Half::High),
                    _ => None,
                },
                length: count_param(config, "minimo"),
            }),
            other => Condition::Unrecognized {
                subtype: other.to_string(),
            },
        }
    }

    /// The canonical subtype name.
    pub fn subtype(&self) -> &str {
        match self {
            Condition::Absence(_) => ABSENCE,
            Condition::SpecificNumber(_) => SPECIFIC_NUMBER,
            Condition::DozenHot(_) => DOZEN_HOT,
            Condition::ColumnHot(_) => COLUMN_HOT,
            Condition::Mirror => MIRROR,
            Condition::SequenceCustom(_) => SEQUENCE_CUSTOM,
            Condition::ColorStreak(_) => COLOR_STREAK,
            Condition::ParityStreak(_) => PARITY_STREAK,
            Condition::RangeStreak(_) => RANGE_STREAK,
            Condition::Unrecognized { subtype } => subtype,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Condition::Unrecognized { .. })
    }
}

fn hot_group(config: &Json) -> HotGroupConfig {
    HotGroupConfig {
        window: count_param(config, "janela"),
        min_frequency: count_param(config, "frequenciaMinima"),
    }
}

/// Reads a numeric parameter given either as a JSON number or a digit string.
fn numeric_param(config: &Json, key: &str) -> Option<f64> {
    match config.get(key)? {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => {
            let s = normalize_token(s);
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<f64>().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn slot_param(config: &Json, key: &str) -> Option<u8> {
    numeric_param(config, key).and_then(slot_from_f64)
}

fn count_param(config: &Json, key: &str) -> Option<usize> {
    numeric_param(config, key)
        .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as usize)
}

fn text_param(config: &Json, key: &str) -> Option<String> {
    config.get(key).and_then(Json::as_str).map(normalize_token)
}

/// A sequence is usable only when every element is a valid outcome.
fn sequence_param(config: &Json, key: &str) -> Option<Vec<Outcome>> {
    let items = config.get(key)?.as_array()?;
    if items.is_empty() {
        return None;
    }
    items.iter().map(Outcome::from_json).collect()
}
