//! What a platform offers the entrepreneur: a fee, a feature set and a
//! network. Scores the offer after the campaign from both sides.

use serde::{Deserialize, Serialize};

use crate::config::{CampaignConfig, StrategyKind};
use crate::simulator::{Augmentation, DayRecord, Metrics};
use crate::strategy::Strategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFeature {
    DynamicPricing,
    BondingCurves,
    Governance,
    Dao,
    AdvancedAnalytics,
    BasicAnalytics,
    Marketing,
    FixedPricing,
}

impl PlatformFeature {
    pub fn value(&self) -> f64 {
        match self {
            Self::DynamicPricing => 15.0,
            Self::BondingCurves => 20.0,
            Self::Governance => 10.0,
            Self::Dao => 12.0,
            Self::AdvancedAnalytics => 8.0,
            Self::Marketing => 10.0,
            Self::BasicAnalytics => 5.0,
            Self::FixedPricing => 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformOffer {
    pub fee_rate: f64,
    pub features: Vec<PlatformFeature>,
    /// Multiplier the platform's audience applies to base demand.
    pub network_strength: f64,
}

impl PlatformOffer {
    pub fn new(fee_rate: f64, features: Vec<PlatformFeature>, network_strength: f64) -> Self {
        Self {
            fee_rate,
            features,
            network_strength,
        }
    }

    pub fn has(&self, feature: PlatformFeature) -> bool {
        self.features.contains(&feature)
    }

    /// The best pricing tool the platform supports.
    pub fn pricing(&self) -> StrategyKind {
        if self.has(PlatformFeature::BondingCurves) {
            StrategyKind::Bonding
        } else if self.has(PlatformFeature::DynamicPricing) {
            StrategyKind::Dynamic
        } else {
            StrategyKind::Fixed
        }
    }

    pub fn strategy(&self, initial_price: f64, duration: u32) -> Strategy {
        Strategy::from_kind(self.pricing(), initial_price, duration)
    }

    pub fn feature_value(&self) -> f64 {
        self.features.iter().map(PlatformFeature::value).sum()
    }

    /// Entrepreneur satisfaction on a 0-100 scale.
    pub fn satisfaction(&self, success: bool) -> f64 {
        let base = if success { 70.0 } else { 40.0 };
        let score = base
            + (0.1 - self.fee_rate) * 500.0
            + self.features.len() as f64 * 5.0
            + self.network_strength * 10.0;
        score.clamp(0.0, 100.0)
    }
}

impl Augmentation for PlatformOffer {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn finish(&self, campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        let raised = history.last().map_or(0.0, |d| d.cumulative_raised);
        let satisfaction = self.satisfaction(raised >= campaign.target);
        let net = raised * (1.0 - self.fee_rate);
        metrics.insert("entrepreneur_net", net);
        metrics.insert("user_satisfaction", satisfaction);
        metrics.insert("feature_value", self.feature_value());
        metrics.insert("value_proposition", net + satisfaction * 100.0);
    }
}
