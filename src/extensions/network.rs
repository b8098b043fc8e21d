//! Network effects: backers recruit backers.
//!
//! A growing user base and community engagement amplify demand through a
//! Metcalfe-style multiplier. Web3 platforms start weaker and overtake once
//! the user base passes a critical mass.

use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::demand::{network_multiplier, DemandFactors};
use crate::simulator::{Augmentation, DayRecord, Metrics};

const WEB3_CRITICAL_MASS: f64 = 50.0;
const ENGAGEMENT_CAP: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    #[default]
    Web3,
    Traditional,
    Hybrid,
}

impl PlatformKind {
    pub fn all() -> Vec<Self> {
        vec![Self::Traditional, Self::Web3, Self::Hybrid]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Web3 => "Web3 Token Platform",
            Self::Traditional => "Traditional Crowdfunding",
            Self::Hybrid => "Hybrid Web2/Web3",
        }
    }

    pub fn multiplier(&self, user_base: f64) -> f64 {
        match self {
            Self::Web3 if user_base > WEB3_CRITICAL_MASS => 1.5,
            Self::Web3 => 0.8,
            Self::Traditional => 1.0,
            Self::Hybrid => 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEffects {
    viral_coefficient: f64,
    platform: PlatformKind,
    initial_engagement: f64,
    user_base: f64,
    engagement: f64,
    network_value: f64,
}

impl NetworkEffects {
    pub fn new(viral_coefficient: f64, platform: PlatformKind) -> Self {
        Self {
            viral_coefficient,
            platform,
            initial_engagement: 0.0,
            user_base: 0.0,
            engagement: 0.0,
            network_value: 0.0,
        }
    }

    /// Community engagement already in place on day 1.
    pub fn with_initial_engagement(mut self, engagement: f64) -> Self {
        self.initial_engagement = engagement.clamp(0.0, ENGAGEMENT_CAP);
        self.engagement = self.initial_engagement;
        self
    }

    pub fn multiplier(&self) -> f64 {
        network_multiplier(
            self.user_base,
            self.viral_coefficient,
            self.engagement,
            self.platform.multiplier(self.user_base),
        )
    }

    pub fn virality_score(&self, duration: u32) -> f64 {
        let growth_rate = self.user_base / duration.max(1) as f64;
        growth_rate * 2.0 + self.engagement * 0.5 + self.network_value.min(100.0) * 0.3
    }
}

impl Default for NetworkEffects {
    fn default() -> Self {
        Self::new(0.1, PlatformKind::Web3)
    }
}

impl Augmentation for NetworkEffects {
    fn name(&self) -> &'static str {
        "network"
    }

    fn reset(&mut self) {
        self.user_base = 0.0;
        self.engagement = self.initial_engagement;
        self.network_value = 0.0;
    }

    fn demand_factors(&self, _campaign: &CampaignConfig, _day: u32, factors: &mut DemandFactors) {
        factors.push("network", self.multiplier());
    }

    fn settle(&mut self, _campaign: &CampaignConfig, record: &mut DayRecord) {
        // Multiplier that applied to today, before today's backers join.
        let applied = self.multiplier();

        self.user_base += record.demand * 0.1;
        self.engagement = (self.engagement + record.effort * 2.0 + self.user_base * 0.05)
            .min(ENGAGEMENT_CAP);
        self.network_value += self.user_base * self.engagement / 1000.0;

        record.extras.insert("network_multiplier", applied);
        record.extras.insert("user_base", self.user_base);
        record.extras.insert("community_engagement", self.engagement);
        record.extras.insert("network_value", self.network_value);
    }

    fn finish(&self, campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        metrics.insert("final_user_base", self.user_base);
        metrics.insert("final_engagement", self.engagement);
        metrics.insert("final_network_value", self.network_value);
        metrics.insert("virality_score", self.virality_score(campaign.duration));
        metrics.insert("user_retention", user_retention(history, self.user_base));
        metrics.insert(
            "long_term_value",
            self.network_value + self.engagement * 10.0,
        );
    }
}

/// Final user base relative to the user base 30% of the way in.
fn user_retention(history: &[DayRecord], final_users: f64) -> f64 {
    let early = history
        .get(history.len() * 3 / 10)
        .and_then(|d| d.extra("user_base"))
        .unwrap_or(0.0);
    if early > 0.0 {
        final_users / early
    } else {
        1.0
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
    fn test_platform_multipliers() {
        assert_eq!(PlatformKind::Web3.multiplier(10.0), 0.8);
        assert_eq!(PlatformKind::Web3.multiplier(51.0), 1.5);
        assert_eq!(PlatformKind::Traditional.multiplier(1e6), 1.0);
        assert_eq!(PlatformKind::Hybrid.multiplier(0.0), 1.2);
    }

    #[test]
    fn test_network_grows_and_amplifies() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(NetworkEffects::new(0.15, PlatformKind::Web3));
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();

        // Empty network on day 1 leaves demand untouched.
        assert_eq!(outcome.history[0].extra("network_multiplier"), Some(1.0));
        let last = outcome.history.last().unwrap();
        assert!(last.extra("network_multiplier").unwrap() > 1.0);
        assert_eq!(last.extra("community_engagement"), Some(100.0));
        assert!(outcome.history[29].demand > outcome.history[0].demand);
        assert!(outcome.metric("virality_score").unwrap() > 0.0);
    }

    #[test]
    fn test_reset_between_runs() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(NetworkEffects::default().with_initial_engagement(40.0));
        let first = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();
        let second = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();
        assert_eq!(first.total_raised, second.total_raised);
    }

    #[test]
    fn test_retention_and_long_term_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(NetworkEffects::new(0.1, PlatformKind::Traditional));
        let outcome = sim.simulate(&Strategy::fixed(1.0, 5.0), &mut rng).unwrap();

        // Day 10 of 30 is the reference point.
        let early = outcome.history[9].extra("user_base").unwrap();
        let last = outcome.metric("final_user_base").unwrap();
        assert!((outcome.metric("user_retention").unwrap() - last / early).abs() < 1e-12);
        assert!(outcome.metric("user_retention").unwrap() > 1.0);

        let value = outcome.metric("final_network_value").unwrap()
            + 10.0 * outcome.metric("final_engagement").unwrap();
        assert_eq!(outcome.metric("long_term_value"), Some(value));
    }

    #[test]
    fn test_retention_of_empty_history() {
        assert_eq!(user_retention(&[], 0.0), 1.0);
    }
}
