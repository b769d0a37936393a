use clap::{Parser, Subcommand, ValueEnum};
use croupier::prelude::*;
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validates, evaluates, compiles and backtests roulette strategy graphs
#[derive(Parser, Debug)]
#[command(name = "croupier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Combinator used by action nodes that do not declare one
    #[arg(long, global = true, value_enum, default_value_t = CombinatorCli::And)]
    combinator: CombinatorCli,

    /// How the candidate pool is ordered before the gating limit cuts it
    #[arg(long, global = true, value_enum, default_value_t = TruncationCli::ConfidenceFirst)]
    truncation: TruncationCli,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the schema guard over a strategy file
    Validate {
        /// Path to the strategy graph JSON file
        strategy: PathBuf,
    },
    /// Evaluate a strategy against a round history
    Evaluate {
        strategy: PathBuf,
        /// Path to a JSON array of outcomes, oldest first
        history: PathBuf,
        /// Print the evaluation as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Compile a strategy into a standalone JavaScript evaluator
    Compile {
        strategy: PathBuf,
        /// Where to write the generated script
        #[arg(short, long, default_value = "strategy.js")]
        output: PathBuf,
        /// Also save the plan and script as a binary artifact
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Replay a history and score every signal against the next outcome
    Backtest {
        strategy: PathBuf,
        history: PathBuf,
        /// Minimum number of outcomes seen before the first evaluation
        #[arg(long, default_value_t = 1)]
        warmup: usize,
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved wiring of every action as a tree
    Explain { strategy: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CombinatorCli {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TruncationCli {
    ConfidenceFirst,
    InsertionOrder,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let engine = StrategyEngine::builder()
        .with_default_combinator(match cli.combinator {
            CombinatorCli::And => Combinator::And,
            CombinatorCli::Or => Combinator::Or,
        })
        .with_truncation(match cli.truncation {
            TruncationCli::ConfidenceFirst => TruncationPolicy::ConfidenceFirst,
            TruncationCli::InsertionOrder => TruncationPolicy::InsertionOrder,
        })
        .build();

    match cli.command {
        Command::Validate { strategy } => run_validate(&engine, &strategy),
        Command::Evaluate {
            strategy,
            history,
            json,
        } => run_evaluate(&engine, &strategy, &history, json),
        Command::Compile {
            strategy,
            output,
            artifact,
        } => run_compile(&engine, &strategy, &output, artifact.as_deref()),
        Command::Backtest {
            strategy,
            history,
            warmup,
            json,
        } => run_backtest(&engine, &strategy, &history, warmup, json),
        Command::Explain { strategy } => run_explain(&engine, &strategy),
    }
}

fn run_validate(engine: &StrategyEngine, strategy_path: &Path) {
    let payload = load_json(strategy_path, "strategy");
    let start = Instant::now();
    let graph = engine
        .validate(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));

    println!("Strategy is valid ({:?})", start.elapsed());
    if let Some(name) = &graph.name {
        println!("  -> Name: {}", name);
    }
    println!("  -> Condition nodes: {}", graph.condition_nodes().count());
    println!("  -> Action nodes:    {}", graph.action_nodes().count());
    println!("  -> Connections:     {}", graph.connections.len());
}

fn run_evaluate(engine: &StrategyEngine, strategy_path: &Path, history_path: &Path, json: bool) {
    let total_start = Instant::now();

    let load_start = Instant::now();
    let payload = load_json(strategy_path, "strategy");
    let history = load_history(history_path);
    let load_duration = load_start.elapsed();

    let plan_start = Instant::now();
    let plan = engine
        .plan(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    let plan_duration = plan_start.elapsed();

    let eval_start = Instant::now();
    let evaluation = interpret(&plan, &history);
    let eval_duration = eval_start.elapsed();

    if json {
        print_json(&evaluation);
        return;
    }

    println!("\nEvaluation Finished!");
    if evaluation.trigger {
        println!("  -> Signal: {:?}", evaluation.numbers);
    } else {
        println!("  -> No signal");
    }
    println!("\n--- Logic Trace ---");
    for line in &evaluation.logic_trace {
        println!("{}", line);
    }

    println!("\n--- Performance Summary ---");
    println!("File Loading:     {:?}", load_duration);
    println!("Planning:         {:?}", plan_duration);
    println!("Evaluation:       {:?}", eval_duration);
    println!("-------------------------");
    println!("Total Execution:  {:?}", total_start.elapsed());
    println!("History Length:   {}", history.len());
    println!("Latest Outcome:   {}", history.latest());
}

fn run_compile(
    engine: &StrategyEngine,
    strategy_path: &Path,
    output: &Path,
    artifact_path: Option<&Path>,
) {
    let payload = load_json(strategy_path, "strategy");

    let start = Instant::now();
    let compiled = engine
        .compile(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    let duration = start.elapsed();

    compiled
        .write_script(output)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!(
        "Compiled {} condition(s) into '{}' ({} bytes) in {:?}",
        compiled.plan.steps.len(),
        output.display(),
        compiled.script.len(),
        duration
    );

    if let Some(path) = artifact_path {
        compiled
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        println!("Saved artifact to '{}'", path.display());
    }
}

fn run_backtest(
    engine: &StrategyEngine,
    strategy_path: &Path,
    history_path: &Path,
    warmup: usize,
    json: bool,
) {
    let payload = load_json(strategy_path, "strategy");
    let history = load_history(history_path);

    let start = Instant::now();
    let report = engine
        .backtest(&payload, &history, warmup)
        .unwrap_or_else(|e| exit_with_error(&format!("Backtest failed: {}", e)));
    let duration = start.elapsed();

    if json {
        print_json(&report);
        return;
    }

    let summary = &report.summary;
    println!("\n--- Backtest Summary ---");
    println!("Rounds Evaluated: {}", summary.evaluated);
    println!("Signals:          {}", summary.signals);
    println!("Settled:          {}", summary.settled);
    println!("Hits:             {}", summary.hits);
    match summary.hit_rate {
        Some(rate) => println!("Hit Rate:         {:.2}%", rate * 100.0),
        None => println!("Hit Rate:         n/a"),
    }
    println!("Duration:         {:?}", duration);
}

fn run_explain(engine: &StrategyEngine, strategy_path: &Path) {
    let payload = load_json(strategy_path, "strategy");
    let plan = engine
        .plan(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    print!("{}", DisplayPlan { plan: &plan });
}

fn load_json(path: &Path, what: &str) -> Json {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to parse {} JSON: {}", what, e))
    })
}

fn load_history(path: &Path) -> History {
    let value = load_json(path, "history");
    History::from_json(&value)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid history: {}", e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    let text = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    println!("{}", text);
}

/// A helper function to print an error message and exit the process.
fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
