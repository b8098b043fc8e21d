//! Single Campaign Simulation Binary
//!
//! Runs one campaign from a JSON parameter file and/or flag overrides, then
//! checks the funding pattern for plausibility.
//!
//! ## Usage
//! ```bash
//! cargo run --bin simulate --release -- --strategy dynamic --seed 7
//! cargo run --bin simulate --release -- --config params.json --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crowdfund_simulation::estimator::{estimate_from_history, Estimate};
use crowdfund_simulation::validator::ValidationReport;
use crowdfund_simulation::{
    simulate_campaign, BaseParameters, CampaignOutcome, CampaignValidator, Result, SimError,
    StrategyKind,
};

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Simulate a single crowdfunding campaign")]
struct Args {
    /// JSON file with base parameters; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    alpha: Option<f64>,
    #[arg(long)]
    beta: Option<f64>,
    #[arg(long)]
    gamma: Option<f64>,
    #[arg(long)]
    sigma: Option<f64>,
    #[arg(long)]
    duration: Option<u32>,
    #[arg(long)]
    target: Option<f64>,
    #[arg(long)]
    price: Option<f64>,
    /// fixed, dynamic or bonding
    #[arg(long)]
    strategy: Option<StrategyKind>,
    /// Disable multiplicative demand noise.
    #[arg(long)]
    no_noise: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Fit α, β, γ back from the simulated history.
    #[arg(long)]
    estimate: bool,
    /// Print the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log: String,
}

#[derive(Serialize)]
struct Output<'a> {
    parameters: &'a BaseParameters,
    seed: u64,
    outcome: &'a CampaignOutcome,
    validation: Option<&'a ValidationReport>,
    estimate: Option<&'a Estimate>,
}

fn parameters(args: &Args) -> Result<BaseParameters> {
    let mut base = match &args.config {
        Some(path) => BaseParameters::from_json_file(path)?,
        None => BaseParameters::default(),
    };
    if let Some(v) = args.alpha {
        base.alpha = v;
    }
    if let Some(v) = args.beta {
        base.beta = v;
    }
    if let Some(v) = args.gamma {
        base.gamma = v;
    }
    if let Some(v) = args.sigma {
        base.sigma = v;
    }
    if let Some(v) = args.duration {
        base.duration = v;
    }
    if let Some(v) = args.target {
        base.target = v;
    }
    if let Some(v) = args.price {
        base.initial_price = v;
    }
    if let Some(v) = args.strategy {
        base.strategy = v;
    }
    base.validate()?;
    Ok(base)
}

fn run(args: &Args) -> Result<()> {
    let base = parameters(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(seed, strategy = %base.strategy, "simulating campaign");

    let outcome = simulate_campaign(&base, !args.no_noise, &mut rng)?;

    let validation = match CampaignValidator::new().generate_report(
        &outcome,
        &base.model()?,
        &base.campaign()?,
    ) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(error = %e, "skipping pattern validation");
            None
        }
    };

    let estimate = if args.estimate {
        match estimate_from_history(&outcome.history) {
            Ok(est) => Some(est),
            Err(e) => {
                warn!(error = %e, "skipping parameter estimation");
                None
            }
        }
    } else {
        None
    };

    if args.json {
        let output = Output {
            parameters: &base,
            seed,
            outcome: &outcome,
            validation: validation.as_ref(),
            estimate: estimate.as_ref(),
        };
        let json =
            serde_json::to_string_pretty(&output).map_err(|e| SimError::Config(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    println!("=======================================================");
    println!("  Crowdfunding Campaign Simulation");
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!(
        "  α = {}, β = {}, γ = {}, σ = {}",
        base.alpha, base.beta, base.gamma, base.sigma
    );
    println!(
        "  Duration: {} days, Target: {:.0}, Initial price: {}, Strategy: {}",
        base.duration, base.target, base.initial_price, base.strategy
    );
    println!("  Seed: {seed}");
    println!();

    println!("Outcome:");
    println!("{}", "-".repeat(50));
    outcome.print();
    println!();

    if let Some(report) = &validation {
        println!("Validation:");
        println!("{}", "-".repeat(50));
        report.print();
        println!();
    }

    if let Some(est) = &estimate {
        println!("Estimated parameters:");
        println!("{}", "-".repeat(50));
        println!(
            "  α = {:.2}, β = {:.3}, γ = {:.3}, R² = {:.3}, corr(ln E, ln P) = {:.2}",
            est.alpha, est.beta, est.gamma, est.r_squared, est.regressor_correlation
        );
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

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
