use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::demand::{competition_multiplier, shock_multiplier, DemandFactors, MarketRegime, Shock};
use crate::error::Result;
use crate::simulator::{Augmentation, DayRecord};

/// Market cycle, competitor pressure and scheduled shocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConditions {
    pub regime: MarketRegime,
    pub competitors: u32,
    pub shocks: Vec<Shock>,
}

impl MarketConditions {
    pub fn new(regime: MarketRegime) -> Self {
        Self {
            regime,
            ..Self::default()
        }
    }

    pub fn with_competitors(mut self, competitors: u32) -> Self {
        self.competitors = competitors;
        self
    }

    pub fn with_shock(mut self, shock: Shock) -> Self {
        self.shocks.push(shock);
        self
    }

    /// Checks shocks that were deserialized or built field by field.
    pub fn validate(&self) -> Result<()> {
        self.shocks.iter().try_for_each(Shock::validate)
    }
}

impl Augmentation for MarketConditions {
    fn name(&self) -> &'static str {
        "market"
    }

    fn demand_factors(&self, campaign: &CampaignConfig, day: u32, factors: &mut DemandFactors) {
        factors.push("market", self.regime.multiplier(day, campaign.duration));
        factors.push("competition", competition_multiplier(self.competitors));
        factors.push("shock", shock_multiplier(&self.shocks, day));
    }

    fn settle(&mut self, campaign: &CampaignConfig, record: &mut DayRecord) {
        record.extras.insert(
            "market_multiplier",
            self.regime.multiplier(record.day, campaign.duration),
        );
        record
            .extras
            .insert("competition_multiplier", competition_multiplier(self.competitors));
        record
            .extras
            .insert("shock_multiplier", shock_multiplier(&self.shocks, record.day));
    }
}
