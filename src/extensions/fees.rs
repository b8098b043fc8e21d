//! Platform fee schemes.

use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::simulator::{Augmentation, DayRecord, Metrics};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FeeScheme {
    Fixed { rate: f64 },
    /// Charged only on the final day, and only if the target was met.
    SuccessOnly { rate: f64 },
    /// `min(rate·(1 + progress), 2·rate)`.
    Progressive { rate: f64 },
    /// `rate·(0.5 + 0.5·min(progress, 1))`.
    PerformanceBased { rate: f64 },
    /// Base rate every day plus a bonus rate on a successful final day.
    Hybrid { base: f64, bonus: f64 },
}

impl FeeScheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "Fixed",
            Self::SuccessOnly { .. } => "Success-based",
            Self::Progressive { .. } => "Progressive",
            Self::PerformanceBased { .. } => "Performance-based",
            Self::Hybrid { .. } => "Hybrid",
        }
    }

    pub fn nominal_rate(&self) -> f64 {
        match self {
            Self::Fixed { rate }
            | Self::SuccessOnly { rate }
            | Self::Progressive { rate }
            | Self::PerformanceBased { rate } => *rate,
            Self::Hybrid { base, bonus } => base + bonus,
        }
    }

    /// Fee on one day's revenue. `settled_success` is true only on the
    /// final day of a campaign that reached its target.
    pub fn fee(&self, revenue: f64, progress: f64, settled_success: bool) -> f64 {
        match self {
            Self::Fixed { rate } => revenue * rate,
            Self::SuccessOnly { rate } => {
                if settled_success {
                    revenue * rate
                } else {
                    0.0
                }
            }
            Self::Progressive { rate } => revenue * (rate * (1.0 + progress)).min(rate * 2.0),
            Self::PerformanceBased { rate } => revenue * rate * (0.5 + 0.5 * progress.min(1.0)),
            Self::Hybrid { base, bonus } => {
                let bonus = if settled_success { revenue * bonus } else { 0.0 };
                revenue * base + bonus
            }
        }
    }
}

impl Default for FeeScheme {
    fn default() -> Self {
        Self::Fixed { rate: 0.05 }
    }
}

/// Splits each day's revenue between platform and entrepreneur.
#[derive(Clone, Debug, Default)]
pub struct PlatformFees {
    scheme: FeeScheme,
    platform_revenue: f64,
    entrepreneur_revenue: f64,
}

impl PlatformFees {
    pub fn new(scheme: FeeScheme) -> Self {
        Self {
            scheme,
            platform_revenue: 0.0,
            entrepreneur_revenue: 0.0,
        }
    }

    pub fn scheme(&self) -> FeeScheme {
        self.scheme
    }
}

impl Augmentation for PlatformFees {
    fn name(&self) -> &'static str {
        "fees"
    }

    fn reset(&mut self) {
        self.platform_revenue = 0.0;
        self.entrepreneur_revenue = 0.0;
    }

    fn settle(&mut self, campaign: &CampaignConfig, record: &mut DayRecord) {
        let progress = record.cumulative_raised / campaign.target;
        let settled_success = record.day == campaign.duration && progress >= 1.0;
        let fee = self.scheme.fee(record.revenue, progress, settled_success);

        self.platform_revenue += fee;
        self.entrepreneur_revenue += record.revenue - fee;

        record.extras.insert("fee", fee);
        record.extras.insert("platform_revenue", self.platform_revenue);
        record.extras.insert("entrepreneur_revenue", self.entrepreneur_revenue);
    }

    fn finish(&self, _campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        let raised = history.last().map_or(0.0, |d| d.cumulative_raised);
        metrics.insert("platform_revenue", self.platform_revenue);
        metrics.insert("entrepreneur_revenue", self.entrepreneur_revenue);
        if raised > 0.0 {
            metrics.insert("effective_fee_rate", self.platform_revenue / raised);
        }
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
    fn test_scheme_rates() {
        assert_eq!(FeeScheme::Fixed { rate: 0.05 }.fee(100.0, 0.3, false), 5.0);
        assert_eq!(FeeScheme::SuccessOnly { rate: 0.08 }.fee(100.0, 1.2, false), 0.0);
        assert!((FeeScheme::SuccessOnly { rate: 0.08 }.fee(100.0, 1.2, true) - 8.0).abs() < 1e-12);
        assert!((FeeScheme::Progressive { rate: 0.04 }.fee(100.0, 0.5, false) - 6.0).abs() < 1e-12);
        assert!((FeeScheme::Progressive { rate: 0.04 }.fee(100.0, 3.0, false) - 8.0).abs() < 1e-12);
        assert!((FeeScheme::PerformanceBased { rate: 0.06 }.fee(100.0, 0.0, false) - 3.0).abs() < 1e-12);
        assert!((FeeScheme::PerformanceBased { rate: 0.06 }.fee(100.0, 2.0, false) - 6.0).abs() < 1e-12);

        let hybrid = FeeScheme::Hybrid { base: 0.02, bonus: 0.04 };
        assert!((hybrid.fee(100.0, 1.0, false) - 2.0).abs() < 1e-12);
        assert!((hybrid.fee(100.0, 1.0, true) - 6.0).abs() < 1e-12);
        assert!((hybrid.nominal_rate() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_fee_split_sums_to_raised() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with(PlatformFees::new(FeeScheme::Progressive { rate: 0.04 }));
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();

        let platform = outcome.metric("platform_revenue").unwrap();
        let entrepreneur = outcome.metric("entrepreneur_revenue").unwrap();
        assert!((platform + entrepreneur - outcome.total_raised).abs() < 1e-6);
        let rate = outcome.metric("effective_fee_rate").unwrap();
        assert!(rate >= 0.04 && rate <= 0.08);
        assert!(outcome.history[0].extra("fee").is_some());
    }

    #[test]
    fn test_success_only_fee_on_failed_campaign() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(PlatformFees::new(FeeScheme::SuccessOnly { rate: 0.08 }));
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.metric("platform_revenue"), Some(0.0));
    }
}
