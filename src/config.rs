//! Model and campaign configuration.
//!
//! `BaseParameters` is the flat set of numeric inputs a caller (a UI panel,
//! a JSON file, the CLI) supplies. It is validated into the immutable
//! [`ModelParameters`] and [`CampaignConfig`] before any simulation starts.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, require_positive, Result, SimError};

/// Demand law coefficients for `D = α·E^β·P^(−γ)·ε`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub sigma: f64,
}

impl ModelParameters {
    pub fn new(alpha: f64, beta: f64, gamma: f64, sigma: f64) -> Result<Self> {
        Ok(Self {
            alpha: require_positive("alpha", alpha)?,
            beta: require_finite("beta", beta)?,
            gamma: require_finite("gamma", gamma)?,
            sigma: require_non_negative("sigma", sigma)?,
        })
    }

    /// Same coefficients with α scaled, used for momentum between rounds.
    pub fn with_alpha(&self, alpha: f64) -> Result<Self> {
        Self::new(alpha, self.beta, self.gamma, self.sigma)
    }

    pub fn is_elastic(&self) -> bool {
        self.gamma > 1.0
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            alpha: 1000.0,
            beta: 0.5,
            gamma: 1.2,
            sigma: 0.2,
        }
    }
}

/// Horizon and goal of one campaign.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub duration: u32,
    pub target: f64,
    pub initial_price: f64,
}

impl CampaignConfig {
    pub fn new(duration: u32, target: f64, initial_price: f64) -> Result<Self> {
        if duration == 0 {
            return Err(SimError::InvalidParameter {
                name: "duration",
                value: 0.0,
                reason: "must be at least one day",
            });
        }
        Ok(Self {
            duration,
            target: require_positive("target", target)?,
            initial_price: require_positive("initial_price", initial_price)?,
        })
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            duration: 30,
            target: 100_000.0,
            initial_price: 1.0,
        }
    }
}

/// Strategy selector exposed to callers: `fixed`, `dynamic` or `bonding`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Fixed,
    Dynamic,
    Bonding,
}

impl StrategyKind {
    pub fn all() -> Vec<Self> {
        vec![Self::Fixed, Self::Dynamic, Self::Bonding]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
            Self::Bonding => "bonding",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            "bonding" => Ok(Self::Bonding),
            other => Err(SimError::Config(format!(
                "unknown strategy '{other}' (expected fixed, dynamic or bonding)"
            ))),
        }
    }
}

/// Flat numeric inputs for a simulation or an experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseParameters {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub sigma: f64,
    pub duration: u32,
    pub target: f64,
    pub initial_price: f64,
    pub strategy: StrategyKind,
}

impl Default for BaseParameters {
    fn default() -> Self {
        let model = ModelParameters::default();
        let campaign = CampaignConfig::default();
        Self {
            alpha: model.alpha,
            beta: model.beta,
            gamma: model.gamma,
            sigma: model.sigma,
            duration: campaign.duration,
            target: campaign.target,
            initial_price: campaign.initial_price,
            strategy: StrategyKind::Fixed,
        }
    }
}

impl BaseParameters {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.model()?;
        self.campaign()?;
        Ok(())
    }

    pub fn model(&self) -> Result<ModelParameters> {
        ModelParameters::new(self.alpha, self.beta, self.gamma, self.sigma)
    }

    pub fn campaign(&self) -> Result<CampaignConfig> {
        CampaignConfig::new(self.duration, self.target, self.initial_price)
    }
}
