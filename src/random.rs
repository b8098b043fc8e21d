//! Gaussian and log-normal noise.
//!
//! Both generators use the Box-Muller transform over two uniform draws from
//! whatever stream the caller passes in, so a seeded `ChaCha8Rng` per trial
//! gives fully reproducible campaigns.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::Distribution;

use crate::error::{require_finite, require_non_negative, Result};

/// Normal distribution sampled with the Box-Muller transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMuller {
    mean: f64,
    std_dev: f64,
}

impl BoxMuller {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        Ok(Self {
            mean: require_finite("mean", mean)?,
            std_dev: require_non_negative("std_dev", std_dev)?,
        })
    }

    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl Distribution<f64> for BoxMuller {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = open_unit(rng);
        let v = open_unit(rng);
        let z = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();
        z * self.std_dev + self.mean
    }
}

/// Multiplicative noise `ε = exp(N(0, σ))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogNormalNoise {
    normal: BoxMuller,
}

impl LogNormalNoise {
    pub fn new(sigma: f64) -> Result<Self> {
        Ok(Self {
            normal: BoxMuller::new(0.0, sigma)?,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.normal.std_dev()
    }

    /// Theoretical mean `exp(σ²/2)`.
    pub fn expected_mean(&self) -> f64 {
        (self.sigma().powi(2) / 2.0).exp()
    }
}

impl Distribution<f64> for LogNormalNoise {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng).exp()
    }
}

/// Uniform draw on (0, 1); exact zeros are redrawn so `ln(u)` stays finite.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u != 0.0 {
            return u;
        }
    }
}

pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> Result<f64> {
    Ok(BoxMuller::new(mean, std_dev)?.sample(rng))
}

pub fn log_normal<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> Result<f64> {
    Ok(LogNormalNoise::new(sigma)?.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let dist = BoxMuller::standard();
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_log_normal_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let noise = LogNormalNoise::new(0.2).unwrap();
        let n = 10_000;
        let mean = (0..n).map(|_| noise.sample(&mut rng)).sum::<f64>() / n as f64;
        let expected = (0.2f64.powi(2) / 2.0).exp();

        assert!((mean / expected - 1.0).abs() < 0.05, "mean {mean} vs {expected}");
        assert!((noise.expected_mean() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(log_normal(&mut rng, 0.0).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_rejects_negative_std_dev() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            normal(&mut rng, 0.0, -1.0),
            Err(SimError::InvalidParameter { name: "std_dev", .. })
        ));
    }

    #[test]
    fn test_seeded_streams_repeat() {
        let dist = BoxMuller::new(5.0, 2.0).unwrap();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(dist.sample(&mut a), dist.sample(&mut b));
        }
    }
}
