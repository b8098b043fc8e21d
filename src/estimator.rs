//! Demand-law parameter estimation.
//!
//! Fits `ln D = ln α + β·ln E − γ·ln P` by least squares in log space.
//!
//! β and γ are each estimated from a separate single-regressor slope
//! (`cov(ln E, ln D)/var(ln E)` and `−cov(ln P, ln D)/var(ln P)`); the
//! cross-covariance between `ln E` and `ln P` is ignored. The fit is exact
//! when effort and price vary independently and biased otherwise. The
//! correlation between the two regressors is reported so callers can judge.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SimError};
use crate::simulator::DayRecord;

const COLLINEARITY_WARNING: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub demand: f64,
    pub effort: f64,
    pub price: f64,
}

impl Observation {
    pub fn new(demand: f64, effort: f64, price: f64) -> Self {
        Self {
            demand,
            effort,
            price,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Estimate {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub r_squared: f64,
    /// Pearson correlation of `ln E` and `ln P`.
    pub regressor_correlation: f64,
}

fn degenerate(reason: impl Into<String>) -> SimError {
    SimError::DegenerateEstimation {
        reason: reason.into(),
    }
}

pub fn estimate(observations: &[Observation]) -> Result<Estimate> {
    if observations.len() < 2 {
        return Err(degenerate(format!(
            "need at least 2 observations, got {}",
            observations.len()
        )));
    }

    let mut logs = Vec::with_capacity(observations.len());
    for (i, o) in observations.iter().enumerate() {
        if !(o.demand > 0.0 && o.effort > 0.0 && o.price > 0.0)
            || !(o.demand.is_finite() && o.effort.is_finite() && o.price.is_finite())
        {
            return Err(degenerate(format!(
                "observation {i} has a non-positive or non-finite value"
            )));
        }
        logs.push((o.demand.ln(), o.effort.ln(), o.price.ln()));
    }

    let n = logs.len() as f64;
    let mean_d = logs.iter().map(|l| l.0).sum::<f64>() / n;
    let mean_e = logs.iter().map(|l| l.1).sum::<f64>() / n;
    let mean_p = logs.iter().map(|l| l.2).sum::<f64>() / n;

    let mut var_e = 0.0;
    let mut var_p = 0.0;
    let mut var_d = 0.0;
    let mut cov_ed = 0.0;
    let mut cov_pd = 0.0;
    let mut cov_ep = 0.0;
    for &(d, e, p) in &logs {
        let (dd, de, dp) = (d - mean_d, e - mean_e, p - mean_p);
        var_e += de * de;
        var_p += dp * dp;
        var_d += dd * dd;
        cov_ed += de * dd;
        cov_pd += dp * dd;
        cov_ep += de * dp;
    }

    if var_e <= f64::EPSILON * n {
        return Err(degenerate("insufficient variation in effort"));
    }
    if var_p <= f64::EPSILON * n {
        return Err(degenerate("insufficient variation in price"));
    }
    if var_d <= f64::EPSILON * n {
        return Err(degenerate("insufficient variation in demand"));
    }

    let beta = cov_ed / var_e;
    let gamma = -cov_pd / var_p;
    let ln_alpha = mean_d - beta * mean_e + gamma * mean_p;

    let ss_residual: f64 = logs
        .iter()
        .map(|&(d, e, p)| {
            let fitted = ln_alpha + beta * e - gamma * p;
            (d - fitted).powi(2)
        })
        .sum();
    let r_squared = 1.0 - ss_residual / var_d;

    let regressor_correlation = cov_ep / (var_e * var_p).sqrt();
    if regressor_correlation.abs() > COLLINEARITY_WARNING {
        warn!(
            correlation = regressor_correlation,
            "effort and price are correlated; beta/gamma estimates are biased"
        );
    }

    Ok(Estimate {
        alpha: ln_alpha.exp(),
        beta,
        gamma,
        r_squared,
        regressor_correlation,
    })
}

/// Fits the law to a simulated history; days with zero demand are skipped.
pub fn estimate_from_history(history: &[DayRecord]) -> Result<Estimate> {
    let observations: Vec<Observation> = history
        .iter()
        .filter(|d| d.demand > 0.0)
        .map(|d| Observation::new(d.demand, d.effort, d.price))
        .collect();
    estimate(&observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn law(alpha: f64, beta: f64, gamma: f64, effort: f64, price: f64) -> Observation {
        Observation::new(alpha * effort.powf(beta) * price.powf(-gamma), effort, price)
    }

    /// Full factorial over effort × price: the regressors are uncorrelated.
    fn factorial(alpha: f64, beta: f64, gamma: f64) -> Vec<Observation> {
        let mut obs = Vec::new();
        for effort in [1.0, 2.0, 4.0, 8.0] {
            for price in [0.5, 1.0, 2.0] {
                obs.push(law(alpha, beta, gamma, effort, price));
            }
        }
        obs
    }

    #[test]
    fn test_recovers_parameters_from_noiseless_data() {
        let est = estimate(&factorial(1000.0, 0.5, 1.2)).unwrap();
        assert!((est.alpha - 1000.0).abs() < 1e-6, "alpha {}", est.alpha);
        assert!((est.beta - 0.5).abs() < 1e-9);
        assert!((est.gamma - 1.2).abs() < 1e-9);
        assert!((est.r_squared - 1.0).abs() < 1e-9);
        assert!(est.regressor_correlation.abs() < 1e-9);
    }

    #[test]
    fn test_correlated_regressors_bias_the_fit() {
        // Effort and price rise together; the slopes absorb each other.
        let obs: Vec<Observation> = [(1.0, 0.5), (2.0, 1.0), (4.0, 1.5), (8.0, 3.0)]
            .iter()
            .map(|&(e, p)| law(1000.0, 0.5, 1.2, e, p))
            .collect();
        let est = estimate(&obs).unwrap();
        assert!(est.regressor_correlation > 0.9);
        assert!((est.beta - 0.5).abs() > 0.1);
    }

    #[test]
    fn test_constant_price_is_degenerate() {
        let obs: Vec<Observation> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&e| law(1000.0, 0.5, 1.2, e, 1.0))
            .collect();
        assert_eq!(
            estimate(&obs),
            Err(SimError::DegenerateEstimation {
                reason: "insufficient variation in price".into()
            })
        );
    }

    #[test]
    fn test_rejects_too_few_or_invalid_points() {
        assert!(matches!(
            estimate(&[law(1000.0, 0.5, 1.2, 1.0, 1.0)]),
            Err(SimError::DegenerateEstimation { .. })
        ));
        let mut obs = factorial(1000.0, 0.5, 1.2);
        obs[3].demand = 0.0;
        assert!(estimate(&obs).is_err());
    }
}
