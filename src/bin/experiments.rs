//! Experiment Runner Binary
//!
//! Lists the registered experiments and runs one (or all) of them as seeded
//! Monte Carlo sweeps.
//!
//! ## Usage
//! ```bash
//! cargo run --bin experiments --release -- list
//! cargo run --bin experiments --release -- run market-cycles --seed 42
//! cargo run --bin experiments --release -- run all --trials 10 --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crowdfund_simulation::catalog::{self, ExperimentReport, ExperimentSpec, EXPERIMENTS};
use crowdfund_simulation::{BaseParameters, Result, SimError};

#[derive(Parser, Debug)]
#[command(name = "experiments", about = "Run crowdfunding Monte Carlo experiments")]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered experiment ids.
    List,
    /// Run an experiment by id, or `all`.
    Run {
        id: String,
        /// JSON file with base parameters.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the experiment's trial count.
        #[arg(long)]
        trials: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Run trials on one thread.
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        json: bool,
    },
}

fn list() {
    println!("| {:<24} | {:<34} | {:<16} | {:>6} |", "Id", "Name", "Category", "Trials");
    println!("|{}|{}|{}|{}|", "-".repeat(26), "-".repeat(36), "-".repeat(18), "-".repeat(8));
    for spec in EXPERIMENTS.iter() {
        println!(
            "| {:<24} | {:<34} | {:<16} | {:>6} |",
            spec.id, spec.name, spec.category, spec.trials
        );
    }
}

fn run_one(
    spec: &ExperimentSpec,
    base: &BaseParameters,
    trials: Option<usize>,
    seed: Option<u64>,
    sequential: bool,
) -> Result<ExperimentReport> {
    let mut runner = spec.runner();
    if let Some(n) = trials {
        runner.trials = n;
    }
    if let Some(s) = seed {
        runner = runner.with_seed(s);
    }
    if sequential {
        runner = runner.sequential();
    }
    spec.run(base, &runner)
}

fn run(args: Args) -> Result<()> {
    let Command::Run {
        id,
        config,
        trials,
        seed,
        sequential,
        json,
    } = args.command
    else {
        list();
        return Ok(());
    };

    let base = match config {
        Some(path) => BaseParameters::from_json_file(path)?,
        None => BaseParameters::default(),
    };
    let specs: Vec<&ExperimentSpec> = if id == "all" {
        EXPERIMENTS.iter().collect()
    } else {
        vec![catalog::lookup(&id)?]
    };

    let mut reports = Vec::with_capacity(specs.len());
    for spec in specs {
        let report = run_one(spec, &base, trials, seed, sequential)?;
        if !json {
            println!("=======================================================");
            report.print();
            println!();
        }
        reports.push(report);
    }

    if json {
        let out = serde_json::to_string_pretty(&reports)
            .map_err(|e| SimError::Config(e.to_string()))?;
        println!("{out}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
