//! Integration tests for croupier
//!
//! End-to-end tests that drive the engine from JSON payloads to the
//! serialized evaluation surface.
//!
mod common;
use common::*;
use croupier::prelude::*;
use serde_json::json;

const STRATEGY_JSON: &str = r#"{
    "schemaVersion": "1.0",
    "name": "Dozen pressure",
    "nodes": [
        { "id": "hot", "type": "condition", "subtype": "dozen_hot", "label": "Hot dozen",
          "config": { "janela": "8", "frequenciaMinima": 4 } },
        { "id": "seen", "type": "condition", "subtype": "mirror", "config": {} },
        { "id": "cold17", "type": "condition", "subtype": "absence",
          "config": { "evento": "numero", "numeroAlvo": 17, "rodadasSemOcorrer": 8 } },
        { "id": "bet", "type": "action", "label": "Place bet" }
    ],
    "connections": [
        { "from": "seen", "to": "hot" },
        { "from": "hot", "to": "bet" },
        { "from": "cold17", "to": "bet" }
    ],
    "selectionMode": "automatic",
    "gating": { "maxNumbersAuto": 4, "excludeZero": true }
}"#;

const HISTORY_JSON: &str = r#"[30, 2, 5, 11, "vermelho", 9, 0, 26]"#;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_end_to_end_evaluation() {
        let engine = StrategyEngine::default();
        let plan = engine.plan_str(STRATEGY_JSON).expect("Failed to plan strategy");
        let history = History::from_json_str(HISTORY_JSON).expect("Failed to read history");

        let result = interpret(&plan, &history);

        // Window of 8: 2, 5, 11 and 9 fall in the first dozen.
        assert!(result.trigger);
        assert_eq!(result.numbers, vec![1, 2, 3, 4]);
        assert!(result.gating_applied.truncated);
        assert_eq!(result.gating_applied.candidate_count, 13);
        assert_eq!(
            result.logic_trace,
            vec![
                "bet <= hot=true AND cold17=true => true".to_string(),
                "gating automatic: 13 candidate(s) -> 4 number(s)".to_string(),
            ]
        );
        assert_eq!(result.graph_wiring.evaluation_order, vec!["seen", "hot", "cold17"]);
    }

    #[test]
    fn test_output_surface_uses_contract_keys() {
        let engine = StrategyEngine::default();
        let payload: serde_json::Value = serde_json::from_str(STRATEGY_JSON).unwrap();
        let history = History::from_json_str(HISTORY_JSON).unwrap();
        let value = serde_json::to_value(engine.evaluate(&payload, &history).unwrap()).unwrap();

        for key in ["trigger", "numbers", "logicTrace", "graphWiring", "gatingApplied", "decisionTrace"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        let action = &value["graphWiring"]["actions"][0];
        assert_eq!(action["actionId"], "bet");
        assert_eq!(action["combinator"], "and");
        assert_eq!(action["inputs"], json!(["hot", "cold17"]));
        assert_eq!(value["gatingApplied"]["mode"], "automatic");
        assert_eq!(value["gatingApplied"]["excludeZero"], true);
        assert_eq!(value["gatingApplied"]["limit"], 4);

        let trace = value["decisionTrace"].as_array().unwrap();
        let seen = trace.iter().find(|e| e["nodeId"] == "seen").unwrap();
        assert!(seen.get("contributedNumbers").is_none());
        let cold = trace.iter().find(|e| e["nodeId"] == "cold17").unwrap();
        assert_eq!(cold["contributedNumbers"], json!([17]));
    }

    #[test]
    fn test_evaluation_deserializes_from_contract_json() {
        let payload = payload(vec![absence("n1", 7, 3), action("a1")], vec![link("n1", "a1")]);
        let result = evaluate(&payload, json!([1]));
        let text = serde_json::to_string(&result).unwrap();
        let parsed: StrategyEvaluation = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_engine_rejects_before_evaluating() {
        let engine = StrategyEngine::default();
        let bad = json!({ "schemaVersion": "0.9", "nodes": [], "connections": [] });
        let err = engine.evaluate(&bad, &history(json!([1]))).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::UnsupportedSchemaVersion { .. })
        ));
        assert!(err.to_string().contains("'0.9'"));
    }

    #[test]
    fn test_history_errors() {
        assert_eq!(History::from_json(&json!([])), Err(HistoryError::Empty));
        assert_eq!(History::from_json(&json!({})), Err(HistoryError::NotAnArray));
        assert!(matches!(
            History::from_json(&json!([1, 37])),
            Err(HistoryError::InvalidEntry { index: 1, .. })
        ));
        assert!(matches!(
            History::from_json_str("[1,"),
            Err(HistoryError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_concurrent_evaluations_are_independent() {
        let engine = StrategyEngine::default();
        let plan = engine.plan_str(STRATEGY_JSON).unwrap();
        let quiet = history(json!([36, 35, 34]));
        let busy = History::from_json_str(HISTORY_JSON).unwrap();

        std::thread::scope(|scope| {
            let a = scope.spawn(|| interpret(&plan, &busy));
            let b = scope.spawn(|| interpret(&plan, &quiet));
            assert!(a.join().unwrap().trigger);
            assert!(!b.join().unwrap().trigger);
        });
    }

    #[test]
    fn test_backtest_replays_prefixes() {
        // Fires whenever 7 was absent from the last two rounds; bets on 7.
        let payload = payload(vec![absence("n1", 7, 2), action("a1")], vec![link("n1", "a1")]);
        let entries = json!([1, 2, 7, 3, 4, 7, "preto"]);
        let report = StrategyEngine::default()
            .backtest(&payload, &history(entries), 2)
            .unwrap();

        // Prefixes end at rounds 1 through 6.
        let signals: Vec<(usize, bool, Option<bool>)> = report
            .rounds
            .iter()
            .map(|r| (r.round, r.trigger, r.hit))
            .collect();
        assert_eq!(
            signals,
            vec![
                (1, true, Some(true)),
                (2, false, None),
                (3, false, None),
                (4, true, Some(true)),
                (5, false, None),
                (6, false, None),
            ]
        );
        assert_eq!(report.summary.evaluated, 6);
        assert_eq!(report.summary.signals, 2);
        assert_eq!(report.summary.settled, 2);
        assert_eq!(report.summary.hits, 2);
        assert_eq!(report.summary.hit_rate, Some(1.0));
        assert_eq!(report.rounds[5].next_outcome, None);
    }
}
