//! Multiplicative demand law.
//!
//! `D = α · E^β · P^(−γ) · Π(conditioning factors) · ε`, where ε is
//! log-normal noise with standard deviation σ in log space.
//!
//! ## Conditioning factors
//! - Market cycle (bull, bear, volatile, recession, neutral)
//! - Competition (`0.85^competitors`)
//! - External shocks over day intervals
//! - Trust and moral hazard (principal-agent)
//! - Metcalfe-style network amplification

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::config::ModelParameters;
use crate::error::{require_non_negative, Result, SimError};
use crate::random::LogNormalNoise;

const COMPETITOR_RETENTION: f64 = 0.85;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Bull,
    Bear,
    Volatile,
    Recession,
    #[default]
    Neutral,
}

impl MarketRegime {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Bull,
            Self::Neutral,
            Self::Bear,
            Self::Volatile,
            Self::Recession,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bull => "Bull Market",
            Self::Bear => "Bear Market",
            Self::Volatile => "Volatile Market",
            Self::Recession => "Recession",
            Self::Neutral => "Neutral Market",
        }
    }

    pub fn multiplier(&self, day: u32, duration: u32) -> f64 {
        let t = day as f64 / duration.max(1) as f64;
        match self {
            Self::Bull => 1.2 + 0.3 * t,
            Self::Bear => 0.8 - 0.2 * t,
            Self::Volatile => 1.0 + 0.3 * (2.0 * PI * 3.0 * t).sin(),
            Self::Recession => 0.6 - 0.1 * t,
            Self::Neutral => 1.0,
        }
    }
}

/// Demand shock active on the inclusive day interval `[start_day, end_day]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shock {
    pub start_day: u32,
    pub end_day: u32,
    pub impact: f64,
}

impl Shock {
    pub fn new(start_day: u32, end_day: u32, impact: f64) -> Result<Self> {
        let shock = Self {
            start_day,
            end_day,
            impact,
        };
        shock.validate()?;
        Ok(shock)
    }

    /// Impact is a demand multiplier: finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        require_non_negative("shock impact", self.impact)?;
        Ok(())
    }

    pub fn is_active(&self, day: u32) -> bool {
        day >= self.start_day && day <= self.end_day
    }

    pub fn is_negative(&self) -> bool {
        self.impact < 1.0
    }
}

pub fn competition_multiplier(competitors: u32) -> f64 {
    COMPETITOR_RETENTION.powi(competitors as i32)
}

pub fn shock_multiplier(shocks: &[Shock], day: u32) -> f64 {
    shocks
        .iter()
        .filter(|s| s.is_active(day))
        .map(|s| s.impact)
        .product()
}

/// Market confidence from trust in `[0, 1]`, damped by accumulated moral hazard.
pub fn trust_multiplier(trust: f64, moral_hazard: f64) -> f64 {
    (0.7 + 0.6 * trust) * (1.0 - 0.1 * moral_hazard).max(0.0)
}

/// Metcalfe-style amplification, never below 0.5.
pub fn network_multiplier(
    user_base: f64,
    viral_coefficient: f64,
    engagement: f64,
    platform_multiplier: f64,
) -> f64 {
    let metcalfe = (user_base / 100.0).sqrt();
    let viral = 1.0 + viral_coefficient * engagement / 100.0;
    (1.0 + metcalfe * viral * platform_multiplier * 0.1).max(0.5)
}

/// Named multipliers applied on top of the base law for one day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemandFactors {
    multipliers: Vec<(&'static str, f64)>,
}

impl DemandFactors {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, multiplier: f64) -> Self {
        self.push(name, multiplier);
        self
    }

    pub fn push(&mut self, name: &'static str, multiplier: f64) {
        self.multipliers.push((name, multiplier));
    }

    pub fn product(&self) -> f64 {
        self.multipliers.iter().map(|(_, m)| m).product()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, f64)> {
        self.multipliers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DemandModel {
    params: ModelParameters,
    noise: LogNormalNoise,
}

impl DemandModel {
    pub fn new(params: ModelParameters) -> Result<Self> {
        Ok(Self {
            params,
            noise: LogNormalNoise::new(params.sigma)?,
        })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Deterministic part of the law, `α·E^β·P^(−γ)`.
    pub fn base_demand(&self, price: f64, effort: f64) -> Result<f64> {
        if !price.is_finite() || price <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: "price",
                value: price,
                reason: "must be finite and positive",
            });
        }
        if !effort.is_finite() || effort < 0.0 {
            return Err(SimError::InvalidParameter {
                name: "effort",
                value: effort,
                reason: "must be finite and non-negative",
            });
        }
        let p = &self.params;
        Ok(p.alpha * effort.powf(p.beta) * price.powf(-p.gamma))
    }

    pub fn demand<R: Rng + ?Sized>(
        &self,
        price: f64,
        effort: f64,
        factors: &DemandFactors,
        include_noise: bool,
        rng: &mut R,
    ) -> Result<f64> {
        let base = self.base_demand(price, effort)? * factors.product();
        let demand = if include_noise {
            base * self.noise.sample(rng)
        } else {
            base
        };
        // Zero effort with β < 0 or a corrupt factor would book inf/NaN revenue.
        if !demand.is_finite() || demand < 0.0 {
            return Err(SimError::NonFiniteDemand {
                price,
                effort,
                value: demand,
            });
        }
        Ok(demand)
    }

    /// Revenue-maximising price hint. With γ ≤ 1 revenue keeps rising with
    /// price, so the hint is a 10× markup; otherwise the initial price.
    pub fn optimal_price_hint(&self, initial_price: f64) -> f64 {
        if self.params.gamma <= 1.0 {
            initial_price * 10.0
        } else {
            initial_price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model(sigma: f64) -> DemandModel {
        DemandModel::new(ModelParameters::new(1000.0, 0.5, 1.2, sigma).unwrap()).unwrap()
    }

    #[test]
    fn test_base_law() {
        let m = model(0.0);
        let d = m.base_demand(1.0, 5.0).unwrap();
        assert!((d - 1000.0 * 5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_in_price() {
        let m = model(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let f = DemandFactors::none();
        let cheap = m.demand(0.8, 5.0, &f, false, &mut rng).unwrap();
        let dear = m.demand(1.6, 5.0, &f, false, &mut rng).unwrap();
        assert!(cheap > dear);
    }

    #[test]
    fn test_effort_elasticity_scaling() {
        let m = model(0.0);
        let ratio = m.base_demand(1.3, 8.0).unwrap() / m.base_demand(1.3, 4.0).unwrap();
        assert!((ratio - 2f64.powf(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_effort_zero_demand() {
        assert_eq!(model(0.0).base_demand(1.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_demand_is_rejected() {
        let m = DemandModel::new(ModelParameters::new(1000.0, -0.5, 1.2, 0.0).unwrap()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let f = DemandFactors::none();
        assert!(matches!(
            m.demand(1.0, 0.0, &f, false, &mut rng),
            Err(SimError::NonFiniteDemand { effort, .. }) if effort == 0.0
        ));
        assert!(m.demand(1.0, 4.0, &f, false, &mut rng).is_ok());

        let poisoned = DemandFactors::none().with("shock", f64::NAN);
        assert!(model(0.0).demand(1.0, 5.0, &poisoned, false, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let m = model(0.0);
        assert!(m.base_demand(0.0, 5.0).is_err());
        assert!(m.base_demand(-1.0, 5.0).is_err());
        assert!(m.base_demand(1.0, -1.0).is_err());
        assert!(m.base_demand(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_market_regimes() {
        assert!((MarketRegime::Bull.multiplier(30, 30) - 1.5).abs() < 1e-12);
        assert!((MarketRegime::Bear.multiplier(15, 30) - 0.7).abs() < 1e-12);
        assert!((MarketRegime::Recession.multiplier(30, 30) - 0.5).abs() < 1e-12);
        assert_eq!(MarketRegime::Neutral.multiplier(7, 30), 1.0);
        // Three full cycles over the horizon: back to 1.0 at t = T/3.
        assert!((MarketRegime::Volatile.multiplier(10, 30) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_competition_and_shocks() {
        assert_eq!(competition_multiplier(0), 1.0);
        assert!((competition_multiplier(2) - 0.7225).abs() < 1e-12);

        let shocks = [
            Shock::new(5, 10, 0.6).unwrap(),
            Shock::new(8, 12, 1.5).unwrap(),
        ];
        assert_eq!(shock_multiplier(&shocks, 4), 1.0);
        assert!((shock_multiplier(&shocks, 9) - 0.9).abs() < 1e-12);
        assert!((shock_multiplier(&shocks, 12) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_shock_impact_must_be_a_multiplier() {
        assert!(Shock::new(1, 3, 0.0).is_ok());
        assert!(matches!(
            Shock::new(1, 3, -0.4),
            Err(SimError::InvalidParameter { name: "shock impact", .. })
        ));
        assert!(Shock::new(1, 3, f64::NAN).is_err());
        assert!(Shock::new(1, 3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_trust_and_network_multipliers() {
        assert!((trust_multiplier(0.5, 0.0) - 1.0).abs() < 1e-12);
        assert_eq!(trust_multiplier(1.0, 20.0), 0.0);
        assert_eq!(network_multiplier(0.0, 0.3, 50.0, 1.5), 1.0);
        let m = network_multiplier(400.0, 0.1, 100.0, 1.0);
        assert!((m - (1.0 + 2.0 * 1.1 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_factors_compose() {
        let m = model(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let factors = DemandFactors::none()
            .with("market", 1.2)
            .with("competition", 0.85);
        let base = m.base_demand(1.0, 4.0).unwrap();
        let d = m.demand(1.0, 4.0, &factors, false, &mut rng).unwrap();
        assert!((d - base * 1.2 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_price_hint() {
        let inelastic =
            DemandModel::new(ModelParameters::new(1000.0, 0.5, 0.9, 0.0).unwrap()).unwrap();
        assert_eq!(inelastic.optimal_price_hint(2.0), 20.0);
        assert_eq!(model(0.0).optimal_price_hint(2.0), 2.0);
    }
}
