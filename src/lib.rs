//! Crowdfunding Campaign Simulation Library
//!
//! Simulates token-sale style crowdfunding campaigns under the demand law
//! `D = α · E^β · P^(−γ) · ε` and runs Monte Carlo experiments over
//! pricing, effort, fee, market and governance choices.
//!
//! ## Modules
//!
//! - `demand`: demand law, market regimes, shocks and multipliers
//! - `strategy`: pricing/effort strategies and the `PricingStrategy` trait
//! - `simulator`: day-by-day campaign loop with pluggable augmentations
//! - `extensions`: fees, market, network, platform offers, principal-agent,
//!   costs, thresholds and success metrics
//! - `multi_round`: sequential funding rounds with brand momentum
//! - `estimator`: log-log least-squares fit of α, β, γ
//! - `experiment`: seeded, parallel Monte Carlo parameter sweeps
//! - `catalog`: the registered experiments
//! - `validator`: funding-pattern and parameter plausibility checks
//!
//! ## Usage
//!
//! ```bash
//! # Run one campaign
//! cargo run --bin simulate --release -- --duration 30 --strategy dynamic
//!
//! # Run a registered experiment
//! cargo run --bin experiments --release -- run fixed-fees --seed 42
//! ```

pub mod catalog;
pub mod config;
pub mod demand;
pub mod error;
pub mod estimator;
pub mod experiment;
pub mod extensions;
pub mod multi_round;
pub mod random;
pub mod simulator;
pub mod strategy;
pub mod validator;

pub use config::{BaseParameters, CampaignConfig, ModelParameters, StrategyKind};
pub use demand::{DemandFactors, DemandModel};
pub use error::{Result, SimError};
pub use experiment::{ExperimentRunner, Objective, Scenario, SweepReport};
pub use simulator::{simulate_campaign, CampaignOutcome, CampaignSimulator, DayRecord};
pub use strategy::{PricingStrategy, Strategy, StrategyContext};
pub use validator::CampaignValidator;
