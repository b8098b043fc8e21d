//! Monte Carlo parameter sweeps.
//!
//! A sweep runs `trials` independent campaigns for every scenario of a grid,
//! aggregates them, and picks the best scenario under an [`Objective`].
//!
//! Every trial gets its own `ChaCha8Rng` derived from the sweep seed, the
//! scenario index and the trial index, so sweeps are reproducible and trials
//! can run on rayon workers without sharing RNG state. A failed trial is
//! recorded and the sweep carries on.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::simulator::{CampaignOutcome, Metrics};

/// One named point of a parameter grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scenario<C> {
    pub name: String,
    pub config: C,
}

impl<C> Scenario<C> {
    pub fn new(name: impl Into<String>, config: C) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialFailure {
    pub trial: usize,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateResult<C> {
    pub name: String,
    pub config: C,
    pub trials: usize,
    pub completed: usize,
    /// Percentage of completed trials that reached their target.
    ///
    /// Trials that errored are left out of the denominator and listed in
    /// `failures`; see [`AggregateResult::coverage`] for completed/trials.
    pub success_rate: f64,
    /// Mean of each metric over the trials that reported it.
    pub means: BTreeMap<&'static str, f64>,
    pub raised_p05: f64,
    pub raised_p95: f64,
    pub failures: Vec<TrialFailure>,
}

impl<C> AggregateResult<C> {
    pub fn mean(&self, metric: &str) -> Option<f64> {
        self.means.get(metric).copied()
    }

    pub fn coverage(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.completed as f64 / self.trials as f64
    }
}

/// How the best scenario of a sweep is chosen.
#[derive(Clone, Copy)]
pub enum Objective {
    SuccessRate,
    /// Mean raised × success rate.
    RevenueTimesSuccess,
    /// Mean of a metric × success rate.
    MetricTimesSuccess(&'static str),
    Maximize(&'static str),
    Minimize(&'static str),
    Custom(fn(&BTreeMap<&'static str, f64>, f64) -> Option<f64>),
}

impl Objective {
    /// Score of an aggregate; `None` when the metric it needs is absent.
    pub fn score<C>(&self, result: &AggregateResult<C>) -> Option<f64> {
        if result.completed == 0 {
            return None;
        }
        let rate = result.success_rate / 100.0;
        match self {
            Self::SuccessRate => Some(result.success_rate),
            Self::RevenueTimesSuccess => result.mean("total_raised").map(|m| m * rate),
            Self::MetricTimesSuccess(metric) => result.mean(metric).map(|m| m * rate),
            Self::Maximize(metric) => result.mean(metric),
            Self::Minimize(metric) => result.mean(metric).map(|m| -m),
            Self::Custom(f) => f(&result.means, result.success_rate),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::SuccessRate => "max success rate".to_string(),
            Self::RevenueTimesSuccess => "max raised × success rate".to_string(),
            Self::MetricTimesSuccess(m) => format!("max {m} × success rate"),
            Self::Maximize(m) => format!("max {m}"),
            Self::Minimize(m) => format!("min {m}"),
            Self::Custom(_) => "custom score".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport<C> {
    pub results: Vec<AggregateResult<C>>,
    /// Index into `results` of the best scenario.
    pub optimal: Option<usize>,
    pub seed: u64,
}

impl<C> SweepReport<C> {
    pub fn optimal(&self) -> Option<&AggregateResult<C>> {
        self.optimal.and_then(|i| self.results.get(i))
    }

    pub fn print(&self) {
        println!(
            "  {:<32} {:>8} {:>14} {:>14} {:>7}",
            "Scenario", "Success", "Mean raised", "P05-P95 width", "Trials"
        );
        println!("  {}", "-".repeat(79));
        for (i, r) in self.results.iter().enumerate() {
            let marker = if Some(i) == self.optimal { "*" } else { " " };
            println!(
                "{} {:<32} {:>7.1}% {:>14.0} {:>14.0} {:>3}/{:<3}",
                marker,
                r.name,
                r.success_rate,
                r.mean("total_raised").unwrap_or(0.0),
                r.raised_p95 - r.raised_p05,
                r.completed,
                r.trials
            );
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Reduces completed trials into per-scenario statistics.
pub fn aggregate<C>(
    scenario: Scenario<C>,
    trials: usize,
    outcomes: &[Metrics],
    successes: usize,
    failures: Vec<TrialFailure>,
) -> AggregateResult<C> {
    let completed = outcomes.len();
    let mut sums: BTreeMap<&'static str, (f64, usize)> = BTreeMap::new();
    for metrics in outcomes {
        for (&name, &value) in metrics {
            let entry = sums.entry(name).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    let means = sums
        .into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect();

    let mut raised: Vec<f64> = outcomes
        .iter()
        .filter_map(|m| m.get("total_raised").copied())
        .collect();
    raised.sort_by(|a, b| a.total_cmp(b));

    let success_rate = if completed == 0 {
        0.0
    } else {
        successes as f64 / completed as f64 * 100.0
    };

    AggregateResult {
        name: scenario.name,
        config: scenario.config,
        trials,
        completed,
        success_rate,
        means,
        raised_p05: percentile(&raised, 0.05),
        raised_p95: percentile(&raised, 0.95),
        failures,
    }
}

/// Picks the highest-scoring result. Ties keep the earlier scenario.
pub fn select_optimal<C>(results: &[AggregateResult<C>], objective: &Objective) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, r) in results.iter().enumerate() {
        let Some(score) = objective.score(r) else {
            continue;
        };
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Clone, Debug)]
pub struct ExperimentRunner {
    pub trials: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for ExperimentRunner {
    fn default() -> Self {
        Self {
            trials: 50,
            seed: None,
            parallel: true,
        }
    }
}

impl ExperimentRunner {
    pub fn new(trials: usize) -> Self {
        Self {
            trials,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Seed of one trial's private stream.
    pub fn trial_seed(base: u64, scenario: usize, trial: usize) -> u64 {
        base.wrapping_add((scenario as u64) << 32)
            .wrapping_add(trial as u64)
    }

    pub fn run<C, F>(
        &self,
        grid: Vec<Scenario<C>>,
        simulate: F,
        objective: Objective,
    ) -> SweepReport<C>
    where
        C: Sync,
        F: Fn(&C, &mut ChaCha8Rng) -> Result<CampaignOutcome> + Sync,
    {
        self.run_with(grid, simulate, CampaignOutcome::numeric_metrics, objective)
    }

    /// Like [`run`](Self::run) with a custom metric extractor.
    pub fn run_with<C, F, X>(
        &self,
        grid: Vec<Scenario<C>>,
        simulate: F,
        extract: X,
        objective: Objective,
    ) -> SweepReport<C>
    where
        C: Sync,
        F: Fn(&C, &mut ChaCha8Rng) -> Result<CampaignOutcome> + Sync,
        X: Fn(&CampaignOutcome) -> Metrics + Sync,
    {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut results = Vec::with_capacity(grid.len());

        for (index, scenario) in grid.into_iter().enumerate() {
            let run_trial = |trial: usize| {
                let mut rng = ChaCha8Rng::seed_from_u64(Self::trial_seed(seed, index, trial));
                simulate(&scenario.config, &mut rng).map(|o| (o.success, extract(&o)))
            };
            let trials: Vec<Result<(bool, Metrics)>> = if self.parallel {
                (0..self.trials).into_par_iter().map(run_trial).collect()
            } else {
                (0..self.trials).map(run_trial).collect()
            };

            let mut outcomes = Vec::with_capacity(trials.len());
            let mut successes = 0;
            let mut failures = Vec::new();
            for (trial, result) in trials.into_iter().enumerate() {
                match result {
                    Ok((success, metrics)) => {
                        if success {
                            successes += 1;
                        }
                        outcomes.push(metrics);
                    }
                    Err(e) => {
                        warn!(scenario = %scenario.name, trial, error = %e, "trial failed");
                        failures.push(TrialFailure {
                            trial,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let result = aggregate(scenario, self.trials, &outcomes, successes, failures);
            info!(
                scenario = %result.name,
                success_rate = result.success_rate,
                completed = result.completed,
                "scenario aggregated"
            );
            results.push(result);
        }

        let optimal = select_optimal(&results, &objective);
        SweepReport {
            results,
            optimal,
            seed,
        }
    }
}
