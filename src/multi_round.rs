//! Sequential funding rounds.
//!
//! Each round is an independent campaign with its own target, duration and
//! strategy. Brand value accumulated in earlier rounds scales α for later
//! ones. A round configured to stop on failure ends the sequence early.

use rand::RngCore;
use serde::Serialize;
use tracing::debug;

use crate::config::{CampaignConfig, ModelParameters};
use crate::error::{Result, SimError};
use crate::simulator::{CampaignOutcome, CampaignSimulator, DayRecord, Metrics};
use crate::strategy::Strategy;

pub const DEFAULT_MOMENTUM_CARRYOVER: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct RoundPlan {
    pub target: f64,
    pub duration: u32,
    pub initial_price: f64,
    pub strategy: Strategy,
    pub stop_on_failure: bool,
}

impl RoundPlan {
    pub fn new(target: f64, duration: u32, initial_price: f64, strategy: Strategy) -> Self {
        Self {
            target,
            duration,
            initial_price,
            strategy,
            stop_on_failure: false,
        }
    }

    pub fn stop_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub target: f64,
    pub duration: u32,
    pub raised: f64,
    pub demand: f64,
    pub success: bool,
    pub momentum: f64,
    pub brand_value: f64,
    pub user_loyalty: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MultiRoundOutcome {
    pub success: bool,
    pub total_raised: f64,
    pub total_demand: f64,
    pub rounds: Vec<RoundResult>,
    pub final_brand_value: f64,
    pub final_user_loyalty: f64,
    /// Days of every completed round, tagged with `round` and `absolute_day`.
    pub history: Vec<DayRecord>,
}

impl MultiRoundOutcome {
    pub fn rounds_completed(&self) -> usize {
        self.rounds.len()
    }

    pub fn average_round_success(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }
        self.rounds.iter().filter(|r| r.success).count() as f64 / self.rounds.len() as f64
    }

    /// Flattens into a single campaign outcome so sweeps can aggregate it.
    pub fn into_outcome(self) -> CampaignOutcome {
        let mut metrics = Metrics::new();
        metrics.insert("rounds_completed", self.rounds_completed() as f64);
        metrics.insert("final_brand_value", self.final_brand_value);
        metrics.insert("final_user_loyalty", self.final_user_loyalty);
        metrics.insert("average_round_success", self.average_round_success());
        CampaignOutcome {
            success: self.success,
            total_raised: self.total_raised,
            total_demand: self.total_demand,
            history: self.history,
            metrics,
        }
    }
}

pub struct MultiRoundCampaign {
    params: ModelParameters,
    rounds: Vec<RoundPlan>,
    momentum_carryover: f64,
    include_noise: bool,
}

impl MultiRoundCampaign {
    pub fn new(params: ModelParameters, rounds: Vec<RoundPlan>) -> Result<Self> {
        if rounds.is_empty() {
            return Err(SimError::InvalidParameter {
                name: "rounds",
                value: 0.0,
                reason: "at least one round is required",
            });
        }
        for plan in &rounds {
            CampaignConfig::new(plan.duration, plan.target, plan.initial_price)?;
        }
        Ok(Self {
            params,
            rounds,
            momentum_carryover: DEFAULT_MOMENTUM_CARRYOVER,
            include_noise: true,
        })
    }

    /// Every round runs the same strategy; any failed round ends the sequence.
    pub fn all_or_nothing(
        params: ModelParameters,
        targets: &[f64],
        duration: u32,
        initial_price: f64,
        strategy: Strategy,
    ) -> Result<Self> {
        let rounds = targets
            .iter()
            .map(|&target| {
                RoundPlan::new(target, duration, initial_price, strategy.clone()).stop_on_failure()
            })
            .collect();
        Self::new(params, rounds)
    }

    pub fn with_momentum_carryover(mut self, carryover: f64) -> Self {
        self.momentum_carryover = carryover;
        self
    }

    pub fn with_noise(mut self, include_noise: bool) -> Self {
        self.include_noise = include_noise;
        self
    }

    pub fn total_target(&self) -> f64 {
        self.rounds.iter().map(|r| r.target).sum()
    }

    pub fn simulate<R: RngCore>(&self, rng: &mut R) -> Result<MultiRoundOutcome> {
        let mut results = Vec::with_capacity(self.rounds.len());
        let mut history = Vec::new();
        let mut total_raised = 0.0;
        let mut total_demand = 0.0;
        let mut brand_value = 0.0;
        let mut user_loyalty: f64 = 0.0;
        let mut day_offset = 0;

        for (index, plan) in self.rounds.iter().enumerate() {
            let momentum = if index > 0 {
                self.momentum_carryover * brand_value / 100.0
            } else {
                0.0
            };
            let params = self.params.with_alpha(self.params.alpha * (1.0 + momentum))?;
            let campaign = CampaignConfig::new(plan.duration, plan.target, plan.initial_price)?;

            let outcome = CampaignSimulator::new(params, campaign)?
                .with_noise(self.include_noise)
                .simulate(&plan.strategy, rng)?;

            total_raised += outcome.total_raised;
            total_demand += outcome.total_demand;

            let base_increase = if outcome.success { 20.0 } else { 5.0 };
            brand_value +=
                base_increase + outcome.total_raised / plan.target * 10.0 + index as f64 * 5.0;
            user_loyalty = if index == 0 {
                if outcome.success {
                    0.7
                } else {
                    0.3
                }
            } else {
                let delta = if outcome.success { 0.1 } else { -0.2 };
                (user_loyalty + delta).clamp(0.0, 1.0)
            };

            let round = index as u32 + 1;
            debug!(
                round,
                success = outcome.success,
                raised = outcome.total_raised,
                momentum,
                brand_value,
                "round finished"
            );

            for mut record in outcome.history {
                record.extras.insert("round", round as f64);
                record
                    .extras
                    .insert("absolute_day", (record.day + day_offset) as f64);
                history.push(record);
            }
            day_offset += plan.duration;

            results.push(RoundResult {
                round,
                target: plan.target,
                duration: plan.duration,
                raised: outcome.total_raised,
                demand: outcome.total_demand,
                success: outcome.success,
                momentum,
                brand_value,
                user_loyalty,
            });

            if !outcome.success && plan.stop_on_failure {
                break;
            }
        }

        // Either every completed round met its target, or the grand total
        // covers every planned target (including rounds never run).
        let all_succeeded = results.iter().all(|r| r.success);
        let success = all_succeeded || total_raised >= self.total_target();

        Ok(MultiRoundOutcome {
            success,
            total_raised,
            total_demand,
            rounds: results,
            final_brand_value: brand_value,
            final_user_loyalty: user_loyalty,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> ModelParameters {
        ModelParameters::new(1000.0, 0.5, 1.2, 0.0).unwrap()
    }

    #[test]
    fn test_single_round_matches_plain_campaign() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let campaign = MultiRoundCampaign::new(
            params(),
            vec![RoundPlan::new(100_000.0, 30, 1.0, Strategy::fixed(1.0, 5.0))],
        )
        .unwrap()
        .with_noise(false);
        let outcome = campaign.simulate(&mut rng).unwrap();
        assert!((outcome.total_raised - 30.0 * 1000.0 * 5f64.sqrt()).abs() < 1e-6);
        assert!(!outcome.success);
        assert_eq!(outcome.final_user_loyalty, 0.3);
    }

    #[test]
    fn test_momentum_raises_later_rounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let campaign = MultiRoundCampaign::new(
            params(),
            vec![
                RoundPlan::new(20_000.0, 10, 1.0, Strategy::fixed(1.0, 5.0)),
                RoundPlan::new(20_000.0, 10, 1.0, Strategy::fixed(1.0, 5.0)),
            ],
        )
        .unwrap()
        .with_noise(false);
        let outcome = campaign.simulate(&mut rng).unwrap();

        let first = &outcome.rounds[0];
        let second = &outcome.rounds[1];
        assert!(first.success);
        assert_eq!(first.momentum, 0.0);
        // Brand after round 1: 20 + 10·raised/target.
        let brand = 20.0 + first.raised / 20_000.0 * 10.0;
        assert!((first.brand_value - brand).abs() < 1e-9);
        assert!((second.momentum - 0.3 * brand / 100.0).abs() < 1e-12);
        assert!((second.raised / first.raised - (1.0 + second.momentum)).abs() < 1e-9);
        assert!((outcome.final_user_loyalty - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_stop_on_failure_and_combined_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let campaign = MultiRoundCampaign::all_or_nothing(
            params(),
            &[500_000.0, 10_000.0, 10_000.0],
            10,
            1.0,
            Strategy::fixed(1.0, 5.0),
        )
        .unwrap()
        .with_noise(false);
        let outcome = campaign.simulate(&mut rng).unwrap();
        assert_eq!(outcome.rounds_completed(), 1);
        assert!(!outcome.success);
        assert_eq!(outcome.history.len(), 10);
        assert_eq!(outcome.history[9].extra("absolute_day"), Some(10.0));
    }

    #[test]
    fn test_overall_success_by_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // Round 1 overfunds, round 2 misses: the grand total still covers both.
        let campaign = MultiRoundCampaign::new(
            params(),
            vec![
                RoundPlan::new(10_000.0, 20, 1.0, Strategy::fixed(1.0, 5.0)),
                RoundPlan::new(30_000.0, 10, 1.0, Strategy::fixed(1.0, 5.0)),
            ],
        )
        .unwrap()
        .with_noise(false);
        let outcome = campaign.simulate(&mut rng).unwrap();
        assert!(outcome.rounds[0].success);
        assert!(!outcome.rounds[1].success);
        assert!(outcome.success);

        let days: Vec<f64> = outcome
            .history
            .iter()
            .filter_map(|d| d.extra("absolute_day"))
            .collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days[20], 21.0);
        assert_eq!(outcome.history[20].extra("round"), Some(2.0));

        let flat = outcome.into_outcome();
        assert_eq!(flat.metric("rounds_completed"), Some(2.0));
        assert_eq!(flat.metric("average_round_success"), Some(0.5));
    }

    #[test]
    fn test_loyalty_never_drops_below_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let rounds = (0..4)
            .map(|_| RoundPlan::new(1e9, 5, 1.0, Strategy::fixed(1.0, 5.0)))
            .collect();
        let outcome = MultiRoundCampaign::new(params(), rounds)
            .unwrap()
            .with_noise(false)
            .simulate(&mut rng)
            .unwrap();
        // 0.3 after the first miss, then -0.2 per miss, floored at zero.
        let loyalty: Vec<f64> = outcome.rounds.iter().map(|r| r.user_loyalty).collect();
        assert!((loyalty[1] - 0.1).abs() < 1e-12);
        assert_eq!(loyalty[2], 0.0);
        assert_eq!(loyalty[3], 0.0);
        assert_eq!(outcome.final_user_loyalty, 0.0);
    }

    #[test]
    fn test_rejects_empty_plan() {
        assert!(MultiRoundCampaign::new(params(), Vec::new()).is_err());
    }
}
