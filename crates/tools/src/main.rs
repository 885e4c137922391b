use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use delver_core::Agent;
use delver_tools::{load_policy, load_snapshot, simulate, write_trace};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decide a single tick for a snapshot JSON file
    Decide {
        #[arg(short, long)]
        snapshot: PathBuf,
        /// TOML file overriding planner policy defaults
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },
    /// Run the agent through a seeded sandbox level
    Simulate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 500)]
        ticks: u64,
        #[arg(short, long)]
        policy: Option<PathBuf>,
        /// Where to write the decision trace as JSON
        #[arg(long)]
        trace_out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Decide { snapshot, policy } => {
            let policy = load_policy(policy.as_deref())?;
            let snapshot = load_snapshot(&snapshot)?;
            let mut agent = Agent::new(policy);
            let action = agent.decide(&snapshot);

            for event in agent.log() {
                println!("{event}");
            }
            println!("Action: {action:?}");
            if let Some(goal) = agent.active_goal() {
                println!("Active Goal: {goal}");
            }
        }
        Command::Simulate { seed, ticks, policy, trace_out } => {
            let policy = load_policy(policy.as_deref())?;
            let report = simulate(seed, ticks, policy)?;

            println!("Simulation complete.");
            println!("Seed: {}", report.seed);
            println!("Outcome: {:?}", report.outcome);
            println!("Ticks: {}", report.ticks);
            println!("Final Health: {}", report.final_health);
            println!("Trace Hash: {:#018x}", report.trace_hash());
            if let Some(path) = trace_out {
                write_trace(&report.trace, &path)?;
                println!("Trace written to {}", path.display());
            }
        }
    }

    Ok(())
}
