//! # Croupier - Strategy Graph Compiler and Condition Evaluation Engine
//!
//! **Croupier** turns a roulette betting strategy, authored as a graph of
//! condition and action nodes in a visual editor, into two things:
//!
//! - an in-process evaluator that decides, for a given round history, whether
//!   the strategy fires and which numbers it bets on, and
//! - a self-contained JavaScript program that an execution backend runs against
//!   a live outcome feed.
//!
//! Both are driven by the same [`plan::StrategyPlan`], so for any history they
//! reach the same decision and the same numbers.
//!
//! ## Core Workflow
//!
//! 1.  **Validate**: The schema guard checks the payload's version, shape and
//!     topology and produces a typed [`graph::StrategyGraph`].
//! 2.  **Plan**: The graph is lowered into a plan: condition steps in
//!     topological order, one boolean wiring tree per action, and the gating
//!     rules with every policy resolved.
//! 3.  **Evaluate or Compile**: Interpret the plan against a [`outcome::History`],
//!     or print it as a script with the code generator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use croupier::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let payload = json!({
//!         "schemaVersion": "1.0",
//!         "nodes": [
//!             { "id": "n1", "type": "condition", "subtype": "absence",
//!               "config": { "evento": "numero", "numeroAlvo": 7, "rodadasSemOcorrer": 6 } },
//!             { "id": "a1", "type": "action" }
//!         ],
//!         "connections": [{ "from": "n1", "to": "a1" }]
//!     });
//!
//!     let engine = StrategyEngine::builder().build();
//!     let history = History::from_json(&json!([3, 12, 0, 18, 22, 33]))?;
//!
//!     let evaluation = engine.evaluate(&payload, &history)?;
//!     println!("trigger: {}, numbers: {:?}", evaluation.trigger, evaluation.numbers);
//!     for line in &evaluation.logic_trace {
//!         println!("  {}", line);
//!     }
//!
//!     let compiled = engine.compile(&payload)?;
//!     compiled.write_script("strategy.js")?;
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod codegen;
pub mod conditions;
pub mod engine;
pub mod error;
pub mod gating;
pub mod graph;
pub mod guard;
pub mod outcome;
pub mod plan;
pub mod prelude;
pub mod resolver;
pub mod trace;
