//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the croupier crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use croupier::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let payload = std::fs::read_to_string("path/to/strategy.json")?;
//! let history = History::from_json_str(&std::fs::read_to_string("path/to/history.json")?)?;
//!
//! let engine = StrategyEngine::default();
//! let plan = engine.plan_str(&payload)?;
//! let evaluation = interpret(&plan, &history);
//!
//! println!("Evaluation Result: {:?}", evaluation);
//! # Ok(())
//! # }
//! ```

// Engine and backends
pub use crate::artifact::CompiledStrategy;
pub use crate::codegen::ScriptGenerator;
pub use crate::engine::{BacktestReport, StrategyEngine, interpret};

// Model
pub use crate::graph::{Combinator, Condition, GatingConfig, SelectionMode, StrategyGraph};
pub use crate::outcome::{Color, History, Outcome};
pub use crate::plan::{DisplayPlan, EnginePolicy, StrategyPlan};

// Configuration
pub use crate::gating::TruncationPolicy;
pub use crate::guard::GuardLimits;

// Trace surface
pub use crate::trace::{DecisionTraceEntry, StrategyEvaluation, TraceFormatter};

// Error types
pub use crate::error::{
    ArtifactError, CompileError, EngineError, HistoryError, ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
