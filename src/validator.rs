//! Plausibility checks against empirical crowdfunding patterns.
//!
//! Two independent checks:
//! - Funding shape: share of the total raised in the first ~23% of days,
//!   the middle, and the last ~23%, compared with the reference split
//!   42% / 28% / 30%. Total absolute deviation under 0.30 is realistic.
//! - Parameter ranges: α, β, γ against reference bands. Out-of-band values
//!   are reported as issues, never rejected.

use std::fmt;

use serde::Serialize;

use crate::config::{CampaignConfig, ModelParameters};
use crate::error::{Result, SimError};
use crate::simulator::{CampaignOutcome, DayRecord};

pub const REFERENCE_SHARES: FundingShares = FundingShares {
    first: 0.42,
    middle: 0.28,
    last: 0.30,
};
pub const REALISTIC_DEVIATION: f64 = 0.30;

const FIRST_SEGMENT: f64 = 0.23;
const LAST_SEGMENT_START: f64 = 0.77;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub typical: f64,
}

pub const ALPHA_RANGE: ParameterRange = ParameterRange {
    min: 100.0,
    max: 10_000.0,
    typical: 1000.0,
};
pub const BETA_RANGE: ParameterRange = ParameterRange {
    min: 0.3,
    max: 0.7,
    typical: 0.5,
};
pub const GAMMA_RANGE: ParameterRange = ParameterRange {
    min: 0.8,
    max: 1.5,
    typical: 1.2,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FundingShares {
    pub first: f64,
    pub middle: f64,
    pub last: f64,
}

impl FundingShares {
    pub fn deviation_from(&self, reference: &FundingShares) -> f64 {
        (self.first - reference.first).abs()
            + (self.middle - reference.middle).abs()
            + (self.last - reference.last).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PatternKind {
    FrontLoaded,
    HockeyStick,
    SlowStart,
    Realistic,
}

impl PatternKind {
    /// Checked in order: front-loaded, hockey stick, slow start.
    pub fn classify(shares: &FundingShares) -> Self {
        if shares.first > 0.6 {
            Self::FrontLoaded
        } else if shares.last > 0.5 {
            Self::HockeyStick
        } else if shares.first < 0.2 {
            Self::SlowStart
        } else {
            Self::Realistic
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FrontLoaded => "Front-loaded: Unusually high early momentum",
            Self::HockeyStick => "Hockey stick: Unrealistic final surge",
            Self::SlowStart => "Slow start: Low initial traction",
            Self::Realistic => "Realistic funding curve",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatternValidation {
    pub shares: FundingShares,
    pub expected: FundingShares,
    pub deviation: f64,
    pub is_realistic: bool,
    pub analysis: PatternKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterValidation {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportMetrics {
    /// Fraction of target raised per day on average.
    pub daily_avg_progress: f64,
    /// 100 on success, otherwise percent of target raised.
    pub final_success_rate: f64,
    pub roi: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationReport {
    pub overall: bool,
    pub funding_pattern: PatternValidation,
    pub parameters: ParameterValidation,
    pub metrics: ReportMetrics,
    pub recommendation: String,
}

impl ValidationReport {
    pub fn print(&self) {
        let p = &self.funding_pattern;
        println!("  Overall realistic:       {}", self.overall);
        println!(
            "  Funding split:           {:.1}% / {:.1}% / {:.1}% (expected 42/28/30)",
            p.shares.first * 100.0,
            p.shares.middle * 100.0,
            p.shares.last * 100.0
        );
        println!("  Pattern deviation:       {:.3}", p.deviation);
        println!("  Pattern:                 {}", p.analysis);
        for issue in &self.parameters.issues {
            println!("  Issue:                   {}", issue);
        }
        println!("  Recommendation:          {}", self.recommendation);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CampaignValidator;

impl CampaignValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_pattern(&self, history: &[DayRecord], duration: u32) -> Result<PatternValidation> {
        let Some(last) = history.last() else {
            return Err(SimError::DegenerateHistory {
                reason: "empty history".into(),
            });
        };
        let total = last.cumulative_raised;
        if !(total > 0.0) || !total.is_finite() {
            return Err(SimError::DegenerateHistory {
                reason: format!("total raised is {total}"),
            });
        }

        let max_index = history.len() - 1;
        let first_end = ((duration as f64 * FIRST_SEGMENT).floor() as usize).min(max_index);
        let last_start = ((duration as f64 * LAST_SEGMENT_START).floor() as usize).min(max_index);

        let first_raised = history[first_end].cumulative_raised;
        let before_last = history[last_start].cumulative_raised;
        let shares = FundingShares {
            first: first_raised / total,
            middle: (before_last - first_raised) / total,
            last: (total - before_last) / total,
        };
        let deviation = shares.deviation_from(&REFERENCE_SHARES);

        Ok(PatternValidation {
            shares,
            expected: REFERENCE_SHARES,
            deviation,
            is_realistic: deviation < REALISTIC_DEVIATION,
            analysis: PatternKind::classify(&shares),
        })
    }

    pub fn validate_parameters(&self, alpha: f64, beta: f64, gamma: f64) -> ParameterValidation {
        let mut issues = Vec::new();

        if gamma < GAMMA_RANGE.min {
            issues.push(format!(
                "Price elasticity (γ={gamma}) below typical range - demand too inelastic"
            ));
        } else if gamma > GAMMA_RANGE.max {
            issues.push(format!(
                "Price elasticity (γ={gamma}) above typical range - demand too elastic"
            ));
        }

        if beta < BETA_RANGE.min {
            issues.push(format!(
                "Effort elasticity (β={beta}) too low - marketing ineffective"
            ));
        } else if beta > BETA_RANGE.max {
            issues.push(format!(
                "Effort elasticity (β={beta}) too high - unrealistic marketing impact"
            ));
        }

        if alpha < ALPHA_RANGE.min {
            issues.push(format!(
                "Base demand (α={alpha}) too low for viable campaign"
            ));
        } else if alpha > ALPHA_RANGE.max {
            issues.push(format!("Base demand (α={alpha}) unrealistically high"));
        }

        ParameterValidation {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    pub fn generate_report(
        &self,
        outcome: &CampaignOutcome,
        params: &ModelParameters,
        campaign: &CampaignConfig,
    ) -> Result<ValidationReport> {
        let funding_pattern = self.validate_pattern(&outcome.history, campaign.duration)?;
        let parameters = self.validate_parameters(params.alpha, params.beta, params.gamma);

        let progress = outcome.total_raised / campaign.target;
        let metrics = ReportMetrics {
            daily_avg_progress: progress / campaign.duration as f64,
            final_success_rate: if outcome.success {
                100.0
            } else {
                progress * 100.0
            },
            roi: outcome.metric("roi"),
        };
        let recommendation = recommendation(&funding_pattern, &parameters);

        Ok(ValidationReport {
            overall: funding_pattern.is_realistic && parameters.is_valid,
            funding_pattern,
            parameters,
            metrics,
            recommendation,
        })
    }
}

fn recommendation(pattern: &PatternValidation, params: &ParameterValidation) -> String {
    match (pattern.is_realistic, params.is_valid) {
        (false, false) => "Results unrealistic - adjust both parameters and strategy".to_string(),
        (false, true) => "Funding pattern atypical - consider adjusting pricing strategy".to_string(),
        (true, false) => format!("Parameter issues: {}", params.issues.join("; ")),
        (true, true) => "Results within realistic bounds".to_string(),
    }
}
