//! Additive Gaussian sensor noise.
//!
//! The random source is always passed in, so a seeded generator reproduces
//! the same grain.
//!
//! ```rust
//! use crt_core::PixelBuffer;
//! use crt_ops::noise::add_gaussian_noise;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut buf = PixelBuffer::filled(16, 16, 4, 128.0);
//! add_gaussian_noise(&mut buf, 10.0, &mut StdRng::seed_from_u64(7));
//! assert!(buf.as_slice().iter().all(|v| (0.0..=255.0).contains(v)));
//! ```

use std::f64::consts::PI;

use crt_core::{PixelBuffer, SAMPLE_MAX};
use rand::Rng;
use tracing::debug;

/// Default noise standard deviation, in 8-bit sample units.
pub const DEFAULT_SIGMA: f32 = 10.0;

/// Draws one sample from N(0, 1) using the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // (0, 1] so ln() stays finite
    let u1: f64 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Adds independent N(0, sigma^2) noise to every sample, then clamps to `[0, 255]`.
///
/// Alpha receives noise like any other channel.
pub fn add_gaussian_noise<R: Rng + ?Sized>(buf: &mut PixelBuffer, sigma: f32, rng: &mut R) {
    debug!(sigma, samples = buf.as_slice().len(), "gaussian noise");
    let sigma = sigma as f64;
    for v in buf.as_mut_slice() {
        *v = (*v as f64 + sigma * standard_normal(rng)) as f32;
    }
    buf.clamp(0.0, SAMPLE_MAX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.02, "mean {mean}");
        assert!((var - 1.0).abs() < 0.02, "variance {var}");
    }

    #[test]
    fn test_noise_distribution_mid_gray() {
        let mut buf = PixelBuffer::filled(256, 256, 4, 128.0);
        add_gaussian_noise(&mut buf, DEFAULT_SIGMA, &mut StdRng::seed_from_u64(1));

        let n = buf.as_slice().len() as f64;
        let mean = buf.as_slice().iter().map(|&v| v as f64).sum::<f64>() / n;
        let std = (buf
            .as_slice()
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n)
            .sqrt();
        assert!((mean - 128.0).abs() < 0.2, "mean {mean}");
        assert!((std - 10.0).abs() < 0.2, "std {std}");
    }

    #[test]
    fn test_noise_clamps() {
        let mut black = PixelBuffer::filled(64, 64, 3, 0.0);
        add_gaussian_noise(&mut black, DEFAULT_SIGMA, &mut StdRng::seed_from_u64(2));
        assert!(black.as_slice().iter().all(|&v| v >= 0.0));
        assert!(black.as_slice().iter().any(|&v| v > 0.0));

        let mut white = PixelBuffer::filled(64, 64, 3, 255.0);
        add_gaussian_noise(&mut white, DEFAULT_SIGMA, &mut StdRng::seed_from_u64(3));
        assert!(white.as_slice().iter().all(|&v| v <= 255.0));
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = PixelBuffer::filled(8, 8, 4, 100.0);
        let mut b = a.clone();
        add_gaussian_noise(&mut a, DEFAULT_SIGMA, &mut StdRng::seed_from_u64(99));
        add_gaussian_noise(&mut b, DEFAULT_SIGMA, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_sigma_only_clamps() {
        let mut buf = PixelBuffer::from_vec(3, 1, 1, vec![-5.0, 42.0, 400.0]).unwrap();
        add_gaussian_noise(&mut buf, 0.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(buf.as_slice(), &[0.0, 42.0, 255.0]);
    }
}
