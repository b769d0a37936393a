//! Script generation and compiled artifacts.
mod common;
use common::*;
use croupier::codegen::{self, ENTRY_POINT};
use croupier::prelude::*;
use rstest::rstest;
use serde_json::{Value as Json, json};
use std::process::Command;

fn script_for(payload: &Json) -> String {
    codegen::compile(&plan_of(payload)).expect("payload should compile")
}

fn absence_payload() -> Json {
    payload(vec![absence("n1", 7, 6), action("a1")], vec![link("n1", "a1")])
}

#[test]
fn test_script_is_self_contained() {
    let script = script_for(&absence_payload());

    assert!(script.starts_with("\"use strict\";"));
    assert!(script.contains(&format!("function {}(history)", ENTRY_POINT)));
    assert!(script.contains("module.exports = { evaluate };"));
    assert!(script.contains("return runStrategy(history);"));
    assert!(script.contains("function normalizeToken(text)"));
    assert!(!script.contains("require("));
    assert!(!script.contains("import "));
}

#[test]
fn test_only_used_templates_are_emitted() {
    let script = script_for(&absence_payload());
    assert!(script.contains("function absence(rounds, p)"));
    assert!(!script.contains("function dozenHot("));
    assert!(!script.contains("function hotGroups("));
    assert!(!script.contains("function sequenceCustom("));

    let hot = payload(
        vec![
            condition("n1", "column_hot", json!({ "janela": 10, "frequenciaMinima": 4 })),
            action("a1"),
        ],
        vec![link("n1", "a1")],
    );
    let script = script_for(&hot);
    assert!(script.contains("function columnHot(rounds, p)"));
    assert!(script.contains("function hotGroups("));
    assert!(!script.contains("function dozenHot("));
}

#[test]
fn test_each_subtype_template_is_emitted_once() {
    let payload = payload(
        vec![absence("n1", 7, 6), absence("n2", 8, 6), action("a1")],
        vec![link("n1", "a1"), link("n2", "a1")],
    );
    let script = script_for(&payload);
    assert_eq!(script.matches("function absence(").count(), 1);
    assert_eq!(script.matches("run: (rounds) => absence(rounds,").count(), 2);
}

#[test]
fn test_steps_carry_typed_parameters() {
    let script = script_for(&absence_payload());
    assert!(script.contains(r#"{"event":"numero","span":6,"target":7}"#));

    // Malformed parameters print as null and the template returns a miss.
    let broken = payload(
        vec![
            condition("n1", "absence", json!({ "numeroAlvo": "seven", "rodadasSemOcorrer": 6 })),
            action("a1"),
        ],
        vec![link("n1", "a1")],
    );
    assert!(script_for(&broken).contains(r#"{"event":"numero","span":6,"target":null}"#));
}

#[test]
fn test_wiring_and_gating_are_literals() {
    let payload = gated_payload(
        vec![absence("n1", 7, 6), mirror("n2"), or_action("a1")],
        vec![link("n1", "a1"), link("n2", "a1")],
        "hybrid",
        json!({ "maxNumbersHybrid": 5, "manualNumbers": [4] }),
    );
    let script = script_for(&payload);

    assert!(script.contains(
        r#"wiring: { op: "any", items: [{ op: "node", id: "n1" }, { op: "node", id: "n2" }] }"#
    ));
    assert!(script.contains(r#"contributors: ["n1", "n2"]"#));
    assert!(script.contains(r#""mode":"hybrid""#));
    assert!(script.contains(r#""limit":5"#));
    assert!(script.contains(r#""manualNumbers":[4]"#));
    assert!(script.contains(r#""truncation":"confidence_first""#));
}

#[test]
fn test_truncation_policy_is_embedded() {
    let engine = StrategyEngine::builder()
        .with_truncation(TruncationPolicy::InsertionOrder)
        .build();
    let compiled = engine.compile(&absence_payload()).unwrap();
    assert!(compiled.script.contains(r#""truncation":"insertion_order""#));
    assert_eq!(compiled.plan.policy.truncation, TruncationPolicy::InsertionOrder);
}

#[test]
fn test_identifiers_are_escaped() {
    let payload = payload(
        vec![mirror("n\"1"), action("a</script>")],
        vec![link("n\"1", "a</script>")],
    );
    let script = script_for(&payload);
    assert!(script.contains(r#"id: "n\"1""#));
}

#[test]
fn test_name_cannot_break_out_of_comment() {
    let mut payload = absence_payload();
    payload["name"] = json!("evil\nprocess.exit(1)");
    let script = script_for(&payload);
    assert!(script.contains("// Strategy: evil process.exit(1)"));
    assert!(!script.lines().any(|line| line.trim() == "process.exit(1)"));
}

#[test]
fn test_unknown_subtype_fails_compilation_and_degrades_in_interpreter() {
    let payload = payload(
        vec![condition("n1", "lucky_guess", json!({})), action("a1")],
        vec![link("n1", "a1")],
    );
    let engine = StrategyEngine::default();

    let err = engine.compile(&payload).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Compile(CompileError::UnsupportedSubtype { ref node_id, ref subtype })
            if node_id == "n1" && subtype == "lucky_guess"
    ));

    let result = engine.evaluate(&payload, &history(sample_history())).unwrap();
    assert!(!result.trigger);
    assert!(!result.decision_trace[0].result);
}

#[rstest]
#[case::lone_action(payload(vec![action("a1")], vec![]), 0, 1)]
#[case::unwired_action(payload(vec![mirror("n1"), action("a1")], vec![]), 1, 1)]
#[case::wired_elsewhere(
    payload(vec![mirror("n1"), mirror("n2"), action("a1")], vec![link("n1", "n2")]),
    2,
    1
)]
fn test_strategy_without_wired_action_does_not_compile(
    #[case] payload: Json,
    #[case] steps: usize,
    #[case] actions: usize,
) {
    let err = StrategyEngine::default().compile(&payload).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Compile(CompileError::EmptyProgram { steps: s, actions: a })
            if s == steps && a == actions
    ));

    // The interpreter still answers with a silent evaluation.
    let result = StrategyEngine::default()
        .evaluate(&payload, &history(sample_history()))
        .unwrap();
    assert!(!result.trigger);
}

#[test]
fn test_compiled_strategy_round_trips_through_bincode() {
    let compiled = StrategyEngine::default().compile(&absence_payload()).unwrap();
    let bytes = compiled.to_bytes().unwrap();
    let restored = CompiledStrategy::from_bytes(&bytes).unwrap();
    assert_eq!(restored, compiled);
    assert_eq!(restored.schema_version, "1.0");

    // The restored plan still evaluates.
    let result = interpret(&restored.plan, &history(sample_history()));
    assert_eq!(result.numbers, vec![7]);
}

#[test]
fn test_compiled_strategy_files() {
    let dir = std::env::temp_dir().join(format!("croupier-artifact-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let compiled = StrategyEngine::default().compile(&absence_payload()).unwrap();

    let artifact = dir.join("strategy.bin");
    compiled.save(&artifact).unwrap();
    assert_eq!(CompiledStrategy::from_file(&artifact).unwrap(), compiled);

    let script = dir.join("strategy.js");
    compiled.write_script(&script).unwrap();
    assert_eq!(std::fs::read_to_string(&script).unwrap(), compiled.script);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_corrupt_artifact_is_rejected() {
    assert!(matches!(
        CompiledStrategy::from_bytes(&[0xff, 0x00, 0x13]),
        Err(ArtifactError::Decode(_))
    ));
    assert!(matches!(
        CompiledStrategy::from_file("/nonexistent/croupier/strategy.bin"),
        Err(ArtifactError::Io { .. })
    ));
}

fn node_available() -> bool {
    Command::new("node")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Runs the generated script under Node and returns what it printed.
fn run_with_node(script: &str, entries: &Json, tag: &str) -> Json {
    let dir = std::env::temp_dir().join(format!("croupier-node-{}-{}", std::process::id(), tag));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("strategy.js");
    std::fs::write(&path, script).unwrap();

    let program = format!(
        "const s = require({}); process.stdout.write(JSON.stringify(s.{}({})));",
        json!(path.display().to_string()),
        ENTRY_POINT,
        entries
    );
    let output = Command::new("node").arg("-e").arg(program).output().unwrap();
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    std::fs::remove_dir_all(&dir).ok();
    serde_json::from_slice(&output.stdout).unwrap()
}

fn color_streak(id: &str, color: &str) -> Json {
    condition(id, "color_streak", json!({ "cor": color, "minimo": 1 }))
}

fn hot_dozen(id: &str, window: usize, min_frequency: usize) -> Json {
    condition(
        id,
        "dozen_hot",
        json!({ "janela": window, "frequenciaMinima": min_frequency }),
    )
}

#[test]
fn test_script_matches_interpreter() {
    if !node_available() {
        eprintln!("skipping: no node binary on PATH");
        return;
    }

    let confidence = StrategyEngine::default();
    let insertion = StrategyEngine::builder()
        .with_truncation(TruncationPolicy::InsertionOrder)
        .build();
    let or_default = StrategyEngine::builder()
        .with_default_combinator(Combinator::Or)
        .build();

    let cases: Vec<(&StrategyEngine, Json, Json)> = vec![
        (&confidence, absence_payload(), sample_history()),
        (
            &confidence,
            payload(
                vec![absence("n1", 7, 6), absence("n2", 12, 6), or_action("a1")],
                vec![link("n1", "a1"), link("n2", "a1")],
            ),
            sample_history(),
        ),
        (
            &confidence,
            gated_payload(
                vec![
                    condition("d", "dozen_hot", json!({ "janela": 8, "frequenciaMinima": 3 })),
                    condition("c", "column_hot", json!({ "janela": 8, "frequenciaMinima": 3 })),
                    absence("z", 0, 4),
                    action("a1"),
                    or_action("a2"),
                ],
                vec![link("d", "a1"), link("c", "a1"), link("z", "a2"), link("c", "a2")],
                "automatic",
                json!({ "maxNumbersAuto": 5, "excludeZero": true }),
            ),
            json!([1, 4, 7, 10, 2, 5, "vermelho", 13]),
        ),
        (
            &confidence,
            gated_payload(
                vec![
                    mirror("m"),
                    condition("s", "sequence_custom", json!({ "sequencia": ["vermelho", "preto"], "modo": "parcial" })),
                    condition("k", "color_streak", json!({ "cor": "preto", "minimo": 1 })),
                    condition("p", "parity_streak", json!({ "paridade": "par", "minimo": 2 })),
                    condition("r", "range_streak", json!({ "faixa": "alto", "minimo": 1 })),
                    condition("q", "specific-number", json!({ "numero": 15, "modo": "ocorreu" })),
                    condition("x", "absence", json!({ "evento": "cor", "corAlvo": "verde", "rodadasSemOcorrer": 3 })),
                    action("a1"),
                ],
                vec![
                    link("m", "s"),
                    link("s", "a1"),
                    link("k", "a1"),
                    link("q", "a1"),
                    link("x", "a1"),
                    link("p", "a1"),
                    link("r", "a1"),
                ],
                "hybrid",
                json!({ "maxNumbersHybrid": 2, "manualNumbers": [0, 32] }),
            ),
            json!(["Zero", 15, "vermelho", "preto", "22", 26]),
        ),
        // Tokens carrying characters outside the ASCII separator set stay unknown.
        (
            &confidence,
            payload(vec![color_streak("k", "vermelho"), action("a1")], vec![link("k", "a1")]),
            json!([1, "\u{feff}vermelho"]),
        ),
        (
            &confidence,
            payload(vec![color_streak("k", "vermelho"), action("a1")], vec![link("k", "a1")]),
            json!([1, "vermelho\u{85}"]),
        ),
        (
            &confidence,
            payload(
                vec![
                    color_streak("k", " PRETO\t"),
                    condition("s", "sequence_custom", json!({ "sequencia": ["Vermelho", "preto\n"] })),
                    action("a1"),
                ],
                vec![link("k", "a1"), link("s", "a1")],
            ),
            json!([3, "\r\nVERMELHO ", " Preto\t"]),
        ),
        (
            &confidence,
            payload(vec![hot_dozen("d", 6, 0), action("a1")], vec![link("d", "a1")]),
            json!([1, 2, 3, 14, 25]),
        ),
        (
            &confidence,
            payload(vec![hot_dozen("d", 0, 2), action("a1")], vec![link("d", "a1")]),
            json!([1, 2, 3, 14, 25]),
        ),
        (
            &insertion,
            gated_payload(
                vec![
                    absence("z", 9, 4),
                    hot_dozen("d", 6, 2),
                    condition("c", "column_hot", json!({ "janela": 6, "frequenciaMinima": 2 })),
                    or_action("a1"),
                ],
                vec![link("z", "a1"), link("d", "a1"), link("c", "a1")],
                "automatic",
                json!({ "maxNumbersAuto": 4 }),
            ),
            json!([1, 4, 7, 10, 2, 5]),
        ),
        (
            &or_default,
            payload(
                vec![absence("n1", 7, 6), absence("n2", 36, 6), mirror("m"), action("a1")],
                vec![link("n1", "a1"), link("n2", "a1"), link("m", "a1")],
            ),
            json!([1, 2, 3, 36, 5, 6]),
        ),
    ];

    for (i, (engine, payload, entries)) in cases.iter().enumerate() {
        let plan = engine.plan(payload).expect("test payload must be valid");
        let script = codegen::compile(&plan).unwrap();
        let expected = serde_json::to_value(interpret(&plan, &history(entries.clone()))).unwrap();
        let actual = run_with_node(&script, entries, &i.to_string());
        assert_eq!(actual, expected, "case {} diverged", i);
    }
}
