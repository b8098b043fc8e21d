use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::simulator::{Augmentation, DayRecord, Metrics};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FundingLevel {
    Failed,
    PartialSuccess,
    FullSuccess,
    Exceptional,
}

impl FundingLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Failed => "Failed",
            Self::PartialSuccess => "Partial Success",
            Self::FullSuccess => "Full Success",
            Self::Exceptional => "Exceptional",
        }
    }

    pub fn ordinal(&self) -> f64 {
        *self as u8 as f64
    }
}

/// Soft cap (minimum viable funding) and hard cap, as fractions of target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundingThresholds {
    pub soft_cap_ratio: f64,
    pub hard_cap_ratio: f64,
}

impl FundingThresholds {
    pub fn new(soft_cap_ratio: f64, hard_cap_ratio: f64) -> Self {
        Self {
            soft_cap_ratio,
            hard_cap_ratio,
        }
    }

    pub fn classify(&self, raised: f64, target: f64) -> FundingLevel {
        if raised >= target * self.hard_cap_ratio {
            FundingLevel::Exceptional
        } else if raised >= target {
            FundingLevel::FullSuccess
        } else if raised >= target * self.soft_cap_ratio {
            FundingLevel::PartialSuccess
        } else {
            FundingLevel::Failed
        }
    }
}

impl Default for FundingThresholds {
    fn default() -> Self {
        Self::new(0.6, 1.5)
    }
}

impl Augmentation for FundingThresholds {
    fn name(&self) -> &'static str {
        "thresholds"
    }

    fn settle(&mut self, campaign: &CampaignConfig, record: &mut DayRecord) {
        let level = self.classify(record.cumulative_raised, campaign.target);
        record.extras.insert("funding_level", level.ordinal());
    }

    fn finish(&self, campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        let raised = history.last().map_or(0.0, |d| d.cumulative_raised);
        let flag = |reached: bool| if reached { 1.0 } else { 0.0 };
        metrics.insert(
            "soft_cap_reached",
            flag(raised >= campaign.target * self.soft_cap_ratio),
        );
        metrics.insert(
            "hard_cap_reached",
            flag(raised >= campaign.target * self.hard_cap_ratio),
        );
        metrics.insert(
            "funding_level",
            self.classify(raised, campaign.target).ordinal(),
        );
    }
}

/// Weighted overall success on a 0-100 scale.
///
/// Funding progress counts 40%, community 25%, brand 20% and network 15%.
/// Each component is capped at 100 after scaling.
pub fn overall_success_score(
    raised: f64,
    target: f64,
    community_growth: f64,
    brand_awareness: f64,
    network_effects: f64,
) -> f64 {
    let funding = (raised / target * 100.0).min(100.0);
    0.4 * funding
        + 0.25 * (community_growth / 5.0).min(100.0)
        + 0.2 * (brand_awareness / 1000.0).min(100.0)
        + 0.15 * (network_effects / 50.0).min(100.0)
}

/// Funding thresholds plus the non-financial success signals a campaign
/// builds along the way: community growth, brand awareness and network
/// effects.
#[derive(Clone, Debug, PartialEq)]
pub struct SuccessMetrics {
    thresholds: FundingThresholds,
    community_growth: f64,
    brand_awareness: f64,
    network_effects: f64,
}

impl SuccessMetrics {
    pub fn new(thresholds: FundingThresholds) -> Self {
        Self {
            thresholds,
            community_growth: 0.0,
            brand_awareness: 0.0,
            network_effects: 0.0,
        }
    }

    pub fn thresholds(&self) -> FundingThresholds {
        self.thresholds
    }

    /// Communities form fastest in the opening ten days and cool off from
    /// day 25.
    pub fn community_momentum(day: u32) -> f64 {
        if day <= 10 {
            1.2
        } else if day >= 25 {
            0.8
        } else {
            1.0
        }
    }
}

impl Default for SuccessMetrics {
    fn default() -> Self {
        Self::new(FundingThresholds::default())
    }
}

impl Augmentation for SuccessMetrics {
    fn name(&self) -> &'static str {
        "success_metrics"
    }

    fn reset(&mut self) {
        self.community_growth = 0.0;
        self.brand_awareness = 0.0;
        self.network_effects = 0.0;
    }

    fn settle(&mut self, campaign: &CampaignConfig, record: &mut DayRecord) {
        self.thresholds.settle(campaign, record);

        self.community_growth += (record.demand / 100.0).min(1.0)
            * (record.effort / 10.0).min(1.0)
            * Self::community_momentum(record.day)
            * 10.0;
        let halfway = if record.cumulative_raised > campaign.target * 0.5 {
            20.0
        } else {
            0.0
        };
        self.brand_awareness += record.effort * 2.0 + halfway;
        self.network_effects += record.cumulative_demand / 100.0 * (record.day as f64).sqrt();

        record.extras.insert("community_growth", self.community_growth);
        record.extras.insert("brand_awareness", self.brand_awareness);
        record.extras.insert("network_effects", self.network_effects);
        record.extras.insert(
            "overall_success",
            overall_success_score(
                record.cumulative_raised,
                campaign.target,
                self.community_growth,
                self.brand_awareness,
                self.network_effects,
            ),
        );
    }

    fn finish(&self, campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        self.thresholds.finish(campaign, history, metrics);

        let raised = history.last().map_or(0.0, |d| d.cumulative_raised);
        metrics.insert("community_growth", self.community_growth);
        metrics.insert("brand_awareness", self.brand_awareness);
        metrics.insert("network_effects", self.network_effects);
        metrics.insert(
            "overall_success_score",
            overall_success_score(
                raised,
                campaign.target,
                self.community_growth,
                self.brand_awareness,
                self.network_effects,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParameters;
    use crate::simulator::CampaignSimulator;
    use crate::strategy::Strategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_classify() {
        let t = FundingThresholds::default();
        assert_eq!(t.classify(50.0, 100.0), FundingLevel::Failed);
        assert_eq!(t.classify(60.0, 100.0), FundingLevel::PartialSuccess);
        assert_eq!(t.classify(100.0, 100.0), FundingLevel::FullSuccess);
        assert_eq!(t.classify(150.0, 100.0), FundingLevel::Exceptional);
        assert!(FundingLevel::Exceptional > FundingLevel::Failed);
    }

    #[test]
    fn test_partial_success_campaign() {
        // 30 days at ~2236/day raises ~67% of target: past the soft cap.
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(FundingThresholds::default());
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.metric("soft_cap_reached"), Some(1.0));
        assert_eq!(outcome.metric("hard_cap_reached"), Some(0.0));
        assert_eq!(
            outcome.metric("funding_level"),
            Some(FundingLevel::PartialSuccess.ordinal())
        );
        assert_eq!(outcome.history[0].extra("funding_level"), Some(0.0));
    }

    #[test]
    fn test_overall_score_weights_and_caps() {
        assert_eq!(overall_success_score(0.0, 100.0, 0.0, 0.0, 0.0), 0.0);
        // Funding caps at 100% of target; the rest cap after scaling.
        let full = overall_success_score(300.0, 100.0, 500.0, 100_000.0, 5000.0);
        assert!((full - 100.0).abs() < 1e-9);
        let funding_only = overall_success_score(50.0, 100.0, 0.0, 0.0, 0.0);
        assert!((funding_only - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_community_momentum() {
        assert_eq!(SuccessMetrics::community_momentum(1), 1.2);
        assert_eq!(SuccessMetrics::community_momentum(10), 1.2);
        assert_eq!(SuccessMetrics::community_momentum(11), 1.0);
        assert_eq!(SuccessMetrics::community_momentum(25), 0.8);
    }

    #[test]
    fn test_success_metrics_accumulate() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(SuccessMetrics::default());
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();

        // Demand saturates the community term, effort 5 halves it.
        let day1 = &outcome.history[0];
        assert!((day1.extra("community_growth").unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(day1.extra("brand_awareness"), Some(10.0));
        let community = outcome.metric("community_growth").unwrap();
        assert!((community - (10.0 * 6.0 + 14.0 * 5.0 + 6.0 * 4.0)).abs() < 1e-9);
        // Brand gets the halfway bonus once raised passes 50% of target.
        let bonus_days = outcome
            .history
            .iter()
            .filter(|d| d.cumulative_raised > 50_000.0)
            .count() as f64;
        assert_eq!(
            outcome.metric("brand_awareness"),
            Some(30.0 * 10.0 + 20.0 * bonus_days)
        );
        assert_eq!(
            outcome.metric("funding_level"),
            Some(FundingLevel::PartialSuccess.ordinal())
        );
        let score = outcome.metric("overall_success_score").unwrap();
        assert!(score > 0.4 * 67.0 && score <= 100.0);
        assert_eq!(
            outcome.history.last().unwrap().extra("overall_success"),
            Some(score)
        );
    }
}
