//! Principal-agent dynamics between platform and entrepreneur.
//!
//! The entrepreneur reports progress (possibly distorted), the platform's
//! trust reacts to the reporting gap and to visible effort, and sustained low
//! effort accumulates moral hazard. Trust and hazard feed back into demand.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::demand::{trust_multiplier, DemandFactors};
use crate::simulator::{Augmentation, DayRecord, Metrics};
use crate::strategy::StrategyContext;

const INITIAL_TRUST: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrepreneurType {
    #[default]
    Honest,
    Optimistic,
    Deceptive,
}

impl EntrepreneurType {
    pub fn all() -> Vec<Self> {
        vec![Self::Honest, Self::Optimistic, Self::Deceptive]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Honest => "Honest",
            Self::Optimistic => "Optimistic",
            Self::Deceptive => "Deceptive",
        }
    }

    /// Progress as reported under information asymmetry `asymmetry ∈ [0, 1]`.
    pub fn perceived_progress<R: Rng + ?Sized>(
        &self,
        actual: f64,
        asymmetry: f64,
        day: u32,
        rng: &mut R,
    ) -> f64 {
        match self {
            Self::Honest => actual + (rng.gen::<f64>() - 0.5) * asymmetry * 0.1,
            Self::Optimistic => (actual * (1.0 + asymmetry * 0.5)).min(1.0),
            Self::Deceptive => actual + asymmetry * 0.3 * (day as f64 / 5.0).sin(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncentiveMechanism {
    #[default]
    FixedFee,
    SuccessSharing,
    EffortBased,
    TrustBased,
}

impl IncentiveMechanism {
    pub fn all() -> Vec<Self> {
        vec![
            Self::FixedFee,
            Self::SuccessSharing,
            Self::EffortBased,
            Self::TrustBased,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FixedFee => "Fixed Fee (5%)",
            Self::SuccessSharing => "Success Sharing",
            Self::EffortBased => "Effort-based",
            Self::TrustBased => "Trust-based",
        }
    }

    /// Platform share of the day's revenue.
    pub fn platform_rate(&self, target_reached: bool, trust: f64, moral_hazard: f64) -> f64 {
        match self {
            Self::FixedFee => 0.05,
            Self::SuccessSharing => 0.03 + if target_reached { 0.02 } else { 0.0 },
            Self::EffortBased => 0.05 + if moral_hazard > 0.5 { 0.02 } else { 0.0 },
            Self::TrustBased => (0.05 - (trust - 0.5) * 0.02).clamp(0.02, 0.08),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Governance {
    #[default]
    Centralized,
    Hybrid,
    Decentralized,
}

impl Governance {
    pub fn all() -> Vec<Self> {
        vec![Self::Centralized, Self::Hybrid, Self::Decentralized]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Centralized => "Centralized",
            Self::Hybrid => "Hybrid",
            Self::Decentralized => "Decentralized",
        }
    }

    pub fn alignment_bonus(&self) -> f64 {
        match self {
            Self::Centralized => 10.0,
            Self::Hybrid => 20.0,
            Self::Decentralized => 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrincipalAgent {
    entrepreneur: EntrepreneurType,
    mechanism: IncentiveMechanism,
    governance: Governance,
    information_asymmetry: f64,
    trust: f64,
    moral_hazard: f64,
    platform_payoff: f64,
    entrepreneur_payoff: f64,
    actual_progress: f64,
    perceived_progress: f64,
}

impl PrincipalAgent {
    pub fn new(entrepreneur: EntrepreneurType, information_asymmetry: f64) -> Self {
        Self {
            entrepreneur,
            mechanism: IncentiveMechanism::default(),
            governance: Governance::default(),
            information_asymmetry: information_asymmetry.clamp(0.0, 1.0),
            trust: INITIAL_TRUST,
            moral_hazard: 0.0,
            platform_payoff: 0.0,
            entrepreneur_payoff: 0.0,
            actual_progress: 0.0,
            perceived_progress: 0.0,
        }
    }

    pub fn with_mechanism(mut self, mechanism: IncentiveMechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    pub fn with_governance(mut self, governance: Governance) -> Self {
        self.governance = governance;
        self
    }

    pub fn trust(&self) -> f64 {
        self.trust
    }

    pub fn moral_hazard(&self) -> f64 {
        self.moral_hazard
    }

    fn update_trust(&mut self, effort: f64) {
        let gap = (self.actual_progress - self.perceived_progress).abs();
        let effort_signal = if effort > 5.0 { 0.02 } else { -0.01 };
        self.trust = (self.trust - gap * 0.5 + effort_signal).clamp(0.0, 1.0);
    }

    fn update_moral_hazard(&mut self, effort: f64) {
        if effort < 3.0 {
            self.moral_hazard += 0.1;
        } else if effort > 7.0 {
            self.moral_hazard = (self.moral_hazard - 0.05).max(0.0);
        }
    }

    pub fn alignment_score(&self) -> f64 {
        let score = self.trust * 25.0 - self.moral_hazard * 20.0
            + (1.0 - self.information_asymmetry) * 25.0
            + self.governance.alignment_bonus();
        score.max(0.0)
    }
}

impl Default for PrincipalAgent {
    fn default() -> Self {
        Self::new(EntrepreneurType::Honest, 0.0)
    }
}

impl Augmentation for PrincipalAgent {
    fn name(&self) -> &'static str {
        "principal-agent"
    }

    fn reset(&mut self) {
        self.trust = INITIAL_TRUST;
        self.moral_hazard = 0.0;
        self.platform_payoff = 0.0;
        self.entrepreneur_payoff = 0.0;
        self.actual_progress = 0.0;
        self.perceived_progress = 0.0;
    }

    fn prepare(&mut self, _campaign: &CampaignConfig, ctx: &mut StrategyContext, rng: &mut dyn RngCore) {
        self.actual_progress = ctx.progress();
        self.perceived_progress = self.entrepreneur.perceived_progress(
            self.actual_progress,
            self.information_asymmetry,
            ctx.day,
            rng,
        );
        ctx.perceived_progress = Some(self.perceived_progress);
        ctx.trust = Some(self.trust);
    }

    fn demand_factors(&self, _campaign: &CampaignConfig, _day: u32, factors: &mut DemandFactors) {
        factors.push("trust", trust_multiplier(self.trust, self.moral_hazard));
    }

    fn settle(&mut self, campaign: &CampaignConfig, record: &mut DayRecord) {
        self.update_trust(record.effort);
        self.update_moral_hazard(record.effort);

        let rate = self.mechanism.platform_rate(
            record.cumulative_raised >= campaign.target,
            self.trust,
            self.moral_hazard,
        );
        self.platform_payoff += record.revenue * rate;
        self.entrepreneur_payoff += record.revenue * (1.0 - rate);

        record.extras.insert("trust", self.trust);
        record.extras.insert("moral_hazard", self.moral_hazard);
        record.extras.insert(
            "information_gap",
            (self.actual_progress - self.perceived_progress).abs(),
        );
        record.extras.insert("platform_payoff", self.platform_payoff);
        record.extras.insert("entrepreneur_payoff", self.entrepreneur_payoff);
    }

    fn finish(&self, _campaign: &CampaignConfig, _history: &[DayRecord], metrics: &mut Metrics) {
        metrics.insert("platform_payoff", self.platform_payoff);
        metrics.insert("entrepreneur_payoff", self.entrepreneur_payoff);
        metrics.insert("final_trust", self.trust);
        metrics.insert("total_moral_hazard", self.moral_hazard);
        metrics.insert("alignment_score", self.alignment_score());
    }
}
