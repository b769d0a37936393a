//! Unit tests for the outcome model and trace formatting.
use ahash::AHashMap;
use croupier::conditions::{column_of, dozen_of};
use croupier::outcome::{MAX_SLOT, normalize_token, window};
use croupier::plan::Wiring;
use croupier::prelude::*;
use rstest::rstest;
use serde_json::{Value as Json, json};

#[rstest]
#[case::number(json!(17), Some(Outcome::Number(17)))]
#[case::zero(json!(0), Some(Outcome::Number(0)))]
#[case::integral_float(json!(7.0), Some(Outcome::Number(7)))]
#[case::digit_string(json!(" 23 "), Some(Outcome::Number(23)))]
#[case::token(json!(" Vermelho "), Some(Outcome::Token("vermelho".to_string())))]
#[case::control_whitespace(json!("\t Vermelho\r\n"), Some(Outcome::Token("vermelho".to_string())))]
#[case::byte_order_mark(json!("\u{feff}vermelho"), Some(Outcome::Token("\u{feff}vermelho".to_string())))]
#[case::next_line(json!("vermelho\u{85}"), Some(Outcome::Token("vermelho\u{85}".to_string())))]
#[case::out_of_range(json!(37), None)]
#[case::digit_string_out_of_range(json!("99"), None)]
#[case::negative(json!(-1), None)]
#[case::fraction(json!(1.5), None)]
#[case::empty_string(json!("  "), None)]
#[case::null(Json::Null, None)]
#[case::boolean(json!(true), None)]
fn test_outcome_parsing(#[case] raw: Json, #[case] expected: Option<Outcome>) {
    assert_eq!(Outcome::from_json(&raw), expected);
}

#[rstest]
#[case::ascii_separators("\x0c PRETO\t\n", "preto")]
#[case::inner_space_kept("Preto  Escuro", "preto  escuro")]
#[case::non_ascii_untouched("\u{a0}VERDE\u{a0}", "\u{a0}verde\u{a0}")]
#[case::non_ascii_letters_keep_case("ÉCARLATE", "Écarlate")]
fn test_token_normalization(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(normalize_token(raw), expected);
}

#[test]
fn test_tokens_outside_separator_set_have_no_color() {
    let marked = Outcome::from_json(&json!("\u{feff}vermelho")).unwrap();
    assert_eq!(marked.color(), None);
    assert_eq!(Color::from_name("\u{85}preto"), None);
    assert_eq!(Color::from_name(" PRETO\r"), Some(Color::Black));
}

#[test]
fn test_wheel_colors() {
    assert_eq!(Color::of_number(0), Color::Green);
    assert_eq!(Color::of_number(1), Color::Red);
    assert_eq!(Color::of_number(2), Color::Black);
    assert_eq!(Color::of_number(36), Color::Red);
    assert_eq!(Color::Red.numbers().len(), 18);
    assert_eq!(Color::Black.numbers().len(), 18);
    assert_eq!(Color::Green.numbers(), vec![0]);
    assert_eq!(Color::from_name(" PRETO"), Some(Color::Black));
    assert_eq!(Color::from_name("zero"), Some(Color::Green));
    assert_eq!(Color::from_name("azul"), None);
    assert_eq!(Outcome::Token("red".to_string()).color(), Some(Color::Red));
    assert_eq!(Outcome::Token("par".to_string()).color(), None);
}

#[test]
fn test_groups_partition_the_wheel() {
    assert_eq!(dozen_of(0), None);
    assert_eq!(column_of(0), None);
    for n in 1..=MAX_SLOT {
        assert!(dozen_of(n).is_some_and(|d| d < 3));
        assert!(column_of(n).is_some_and(|c| c < 3));
    }
    assert_eq!((dozen_of(12), dozen_of(13), dozen_of(36)), (Some(0), Some(1), Some(2)));
    assert_eq!((column_of(1), column_of(2), column_of(3)), (Some(0), Some(1), Some(2)));
}

#[rstest]
#[case::shorter(2, vec![3, 4])]
#[case::exact(4, vec![1, 2, 3, 4])]
#[case::clamped(10, vec![1, 2, 3, 4])]
#[case::empty(0, vec![])]
fn test_window_clamps(#[case] n: usize, #[case] expected: Vec<u8>) {
    let rounds: Vec<Outcome> = (1..=4).map(Outcome::Number).collect();
    let numbers: Vec<u8> = window(&rounds, n).iter().filter_map(Outcome::number).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_history_accessors() {
    let history = History::from_json(&json!([1, "preto", 3])).unwrap();
    assert_eq!(history.len(), 3);
    assert!(!history.is_empty());
    assert_eq!(history.latest(), &Outcome::Number(3));
    assert_eq!(history.window(2)[0], Outcome::Token("preto".to_string()));
    assert_eq!(History::new(vec![]), Err(HistoryError::Empty));
}

#[test]
fn test_wiring_formatting() {
    let mut values: AHashMap<&str, bool> = AHashMap::new();
    values.insert("n1", true);
    values.insert("n2", false);

    let nested = Wiring::All(vec![
        Wiring::Node("n1".to_string()),
        Wiring::Any(vec![Wiring::Node("n2".to_string()), Wiring::Node("n3".to_string())]),
    ]);
    assert_eq!(
        TraceFormatter::format_wiring(&nested, &values),
        "n1=true AND (n2=false OR n3=false)"
    );
    assert!(!nested.evaluate(&values));
    assert_eq!(nested.node_ids(), vec!["n1", "n2", "n3"]);

    assert_eq!(
        TraceFormatter::format_action("a1", &Wiring::Constant(false), &values, false),
        "a1 <= false => false"
    );
}

#[test]
fn test_wiring_from_inputs() {
    let inputs = vec!["a".to_string(), "b".to_string()];
    assert_eq!(Wiring::from_inputs(&[], Combinator::And), None);
    assert_eq!(
        Wiring::from_inputs(&inputs[..1], Combinator::Or),
        Some(Wiring::Node("a".to_string()))
    );
    assert!(matches!(
        Wiring::from_inputs(&inputs, Combinator::Or),
        Some(Wiring::Any(items)) if items.len() == 2
    ));
}

#[test]
fn test_policy_names() {
    assert_eq!(TruncationPolicy::default().as_str(), "confidence_first");
    assert_eq!(Combinator::default(), Combinator::And);
    assert_eq!(SelectionMode::Hybrid.to_string(), "hybrid");
    let policy = EnginePolicy::default();
    assert_eq!(policy.truncation, TruncationPolicy::ConfidenceFirst);
}
