use clap::Parser;
use croupier::outcome::{Color, MAX_SLOT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value as Json;
use std::fs;

/// A CLI tool to generate round histories for the croupier engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_history.json")]
    output: String,

    /// The number of rounds to generate
    #[arg(short, long, default_value_t = 200)]
    rounds: usize,

    /// Fraction of rounds reported as a color token instead of a number
    #[arg(long, default_value_t = 0.0)]
    color_only: f64,

    /// Fraction of numeric rounds written as digit strings
    #[arg(long, default_value_t = 0.0)]
    as_text: f64,

    /// Seed for a reproducible history
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    for (flag, value) in [("--color-only", cli.color_only), ("--as-text", cli.as_text)] {
        if !(0.0..=1.0).contains(&value) {
            eprintln!("Error: {} ({}) must be between 0 and 1", flag, value);
            std::process::exit(1);
        }
    }
    if cli.rounds == 0 {
        eprintln!("Error: --rounds must be at least 1");
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    println!("Generating {} round(s)...", cli.rounds);

    let history: Vec<Json> = (0..cli.rounds)
        .map(|_| generate_round(&mut rng, cli.color_only, cli.as_text))
        .collect();

    let tokens = history.iter().filter(|v| is_color_token(v)).count();
    if tokens > 0 {
        println!("-> {} round(s) reported as color tokens.", tokens);
    }

    let json_output = serde_json::to_string_pretty(&history)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved history to '{}'",
        cli.output
    );

    Ok(())
}

/// Spins the wheel once and reports the result the way a feed might.
fn generate_round(rng: &mut impl Rng, color_only: f64, as_text: f64) -> Json {
    let slot = rng.random_range(0..=MAX_SLOT);
    if rng.random_bool(color_only) {
        return Json::from(Color::of_number(slot).name());
    }
    if rng.random_bool(as_text) {
        Json::from(slot.to_string())
    } else {
        Json::from(slot)
    }
}

fn is_color_token(value: &Json) -> bool {
    value.as_str().and_then(Color::from_name).is_some()
}
