use anyhow::Context;
use clap::{Parser, Subcommand};
use permafrost_core::bench::{self, BenchConfig};
use permafrost_core::lake::Lake;
use permafrost_core::qlearn::{TrainParams, Trainer};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "permafrost", about = "Dense forward-pass benchmark and frozen-lake Q-learning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time one pass of the 3-layer forward computation over 100 random samples.
    Bench {
        /// RNG seed; taken from the wall clock when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Also print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Train the tabular agent for 2000 episodes and print the greedy policy.
    Train {
        /// RNG seed; taken from the wall clock when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Also print the training summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn run_bench(seed: u64, json: bool) -> anyhow::Result<()> {
    let config = BenchConfig {
        seed,
        ..BenchConfig::default()
    };
    let report = bench::run(&config).context("forward-pass benchmark failed")?;
    println!("permafrost forward time: {:.4} ms", report.elapsed_ms);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_train(seed: u64, json: bool) -> anyhow::Result<()> {
    let params = TrainParams {
        seed,
        ..TrainParams::default()
    };
    let mut trainer =
        Trainer::new(Lake::four_by_four(), params).context("trainer construction failed")?;
    let summary = trainer.train();

    println!("Training completed in {:.4} seconds", summary.elapsed_secs);
    println!();
    print!("{}", trainer.greedy_policy().render());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Bench { seed, json } => run_bench(seed.unwrap_or_else(wall_clock_seed), json),
        Command::Train { seed, json } => run_train(seed.unwrap_or_else(wall_clock_seed), json),
    }
}
