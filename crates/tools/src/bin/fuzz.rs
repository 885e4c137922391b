use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delver_tools::{Outcome, load_policy, simulate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to run
    #[arg(short, long, default_value_t = 200)]
    runs: u64,
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,
    #[arg(short, long)]
    policy: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let policy = load_policy(args.policy.as_deref())?;

    println!(
        "Starting Fuzz harness on seeds {}..{} for max {} ticks each...",
        args.seed,
        args.seed + args.runs,
        args.ticks
    );
    let (mut escaped, mut died, mut stalled) = (0u64, 0u64, 0u64);
    for seed in args.seed..args.seed + args.runs {
        let report = simulate(seed, args.ticks, policy.clone())
            .with_context(|| format!("Invariant failed on seed {seed}"))?;
        match report.outcome {
            Outcome::Escaped => escaped += 1,
            Outcome::Died => died += 1,
            Outcome::OutOfTicks => stalled += 1,
        }
    }

    println!("Escaped: {escaped}, Died: {died}, Out of ticks: {stalled}");
    println!("Fuzzing completed successfully.");
    Ok(())
}
