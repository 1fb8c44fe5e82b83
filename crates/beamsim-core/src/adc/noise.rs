// crates/beamsim-core/src/adc/noise.rs

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Box-Muller transform of two uniform draws.
///
/// `u1` must lie in (0, 1]; `u2` in [0, 1).
#[inline]
pub fn box_muller(u1: f64, u2: f64, sigma: f64) -> f64 {
    sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Zero-mean gaussian measurement noise.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: ChaCha8Rng,
    sigma: f64,
}

impl GaussianNoise {
    pub fn seeded(seed: u64, sigma: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            sigma,
        }
    }

    pub fn from_entropy(sigma: f64) -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            sigma,
        }
    }

    pub fn new(seed: Option<u64>, sigma: f64) -> Self {
        match seed {
            Some(s) => Self::seeded(s, sigma),
            None => Self::from_entropy(sigma),
        }
    }

    /// One noise sample (mm).
    pub fn sample(&mut self) -> f64 {
        // gen() is [0, 1); flip it so ln never sees 0.
        let u1 = 1.0 - self.rng.gen::<f64>();
        let u2 = self.rng.gen::<f64>();
        box_muller(u1, u2, self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_muller_known_points() {
        assert_eq!(box_muller(1.0, 0.3, 4.0), 0.0);
        let v = box_muller((-0.5f64).exp(), 0.0, 4.0);
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = GaussianNoise::seeded(7, 4.0);
        let mut b = GaussianNoise::seeded(7, 4.0);
        for _ in 0..64 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn zero_sigma_is_silent() {
        let mut n = GaussianNoise::seeded(1, 0.0);
        assert!((0..100).all(|_| n.sample() == 0.0));
    }

    #[test]
    fn sample_moments() {
        let mut n = GaussianNoise::seeded(0xBEA5, 4.0);
        let xs: Vec<f64> = (0..20_000).map(|_| n.sample()).collect();
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
        assert!(mean.abs() < 0.15, "mean={mean}");
        assert!((var.sqrt() - 4.0).abs() < 0.15, "sd={}", var.sqrt());
    }
}
