//! Error types for the campaign simulator.
//!
//! Every failure the library can report is a variant of [`SimError`].
//! Out-of-range economic parameters (β, γ outside the empirical bands) are
//! not errors; the validator reports those as informational issues.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Degenerate estimation: {reason}")]
    DegenerateEstimation { reason: String },

    #[error("Strategy '{strategy}' produced invalid {quantity} {value} on day {day}")]
    StrategyContractViolation {
        strategy: String,
        day: u32,
        quantity: &'static str,
        value: f64,
    },

    #[error("Demand law produced {value} at price {price}, effort {effort}")]
    NonFiniteDemand { price: f64, effort: f64, value: f64 },

    #[error("Experiment '{id}' not found")]
    UnknownExperiment { id: String },

    #[error("Degenerate campaign history: {reason}")]
    DegenerateHistory { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Rejects non-finite or non-positive values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// Rejects non-finite or negative values.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(value)
}

/// Rejects non-finite values only. Used for exponents, which may
/// legitimately be zero or negative in exploratory sweeps.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    Ok(value)
}
