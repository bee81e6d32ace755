//! The full CRT pass: shade, noise, warp, tone.
//!
//! Stages run strictly in order and each one finishes before the next
//! starts. The shader, noise and tone stages work in place; the warp
//! allocates a fresh output buffer.
//!
//! ```rust
//! use crt_core::PixelBuffer;
//! use crt_ops::{apply_crt, CrtParams};
//!
//! let params = CrtParams { seed: Some(1), ..CrtParams::default() };
//! let out = apply_crt(PixelBuffer::filled(32, 24, 4, 180.0), &params).unwrap();
//! assert_eq!((out.width(), out.height(), out.channels()), (32, 24, 4));
//! ```

use std::time::Instant;

use crt_core::PixelBuffer;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::aberration::{spherical_aberration, DEFAULT_STRENGTH};
use crate::noise::{add_gaussian_noise, DEFAULT_SIGMA};
use crate::phosphor::{phosphor_mask, scanlines, PHOSPHOR_ATTENUATION, SCANLINE_ATTENUATION};
use crate::tone::{adjust_brightness, DEFAULT_BRIGHTNESS};
use crate::{OpsError, OpsResult};

/// Every tunable of the CRT pass.
///
/// Missing fields deserialize to their defaults, so a preset only needs to
/// name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrtParams {
    /// Attenuation of unlit primaries per phosphor row.
    pub phosphor_attenuation: f64,
    /// Attenuation of even columns.
    pub scanline_attenuation: f64,
    /// Standard deviation of the additive noise.
    pub noise_sigma: f32,
    /// Spherical aberration strength.
    pub strength: f32,
    /// Final brightness multiplier.
    pub brightness: f64,
    /// Noise seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for CrtParams {
    fn default() -> Self {
        Self {
            phosphor_attenuation: PHOSPHOR_ATTENUATION,
            scanline_attenuation: SCANLINE_ATTENUATION,
            noise_sigma: DEFAULT_SIGMA,
            strength: DEFAULT_STRENGTH,
            brightness: DEFAULT_BRIGHTNESS,
            seed: None,
        }
    }
}

fn check(name: &str, value: f64) -> OpsResult<()> {
    if !value.is_finite() {
        return Err(OpsError::InvalidParameter(format!("{name} must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(OpsError::InvalidParameter(format!("{name} must be >= 0, got {value}")));
    }
    Ok(())
}

impl CrtParams {
    /// Rejects non-finite or negative values.
    pub fn validate(&self) -> OpsResult<()> {
        check("phosphor_attenuation", self.phosphor_attenuation)?;
        check("scanline_attenuation", self.scanline_attenuation)?;
        check("noise_sigma", self.noise_sigma as f64)?;
        check("strength", self.strength as f64)?;
        check("brightness", self.brightness)?;
        Ok(())
    }

    /// Generator for the noise stage: seeded if a seed is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Runs the CRT pass with the generator described by `params.seed`.
pub fn apply_crt(src: PixelBuffer, params: &CrtParams) -> OpsResult<PixelBuffer> {
    let mut rng = params.rng();
    apply_crt_with_rng(src, params, &mut rng)
}

/// Runs the CRT pass drawing noise from `rng`.
///
/// Output has the shape of `src`, samples clamped to `[0, 255]`.
pub fn apply_crt_with_rng<R: Rng + ?Sized>(
    mut buf: PixelBuffer,
    params: &CrtParams,
    rng: &mut R,
) -> OpsResult<PixelBuffer> {
    params.validate()?;

    let _span = info_span!(
        "crt",
        width = buf.width(),
        height = buf.height(),
        channels = buf.channels()
    )
    .entered();
    let start = Instant::now();

    phosphor_mask(&mut buf, params.phosphor_attenuation);
    scanlines(&mut buf, params.scanline_attenuation);
    add_gaussian_noise(&mut buf, params.noise_sigma, rng);

    let mut out = spherical_aberration(&buf, params.strength);
    drop(buf);

    adjust_brightness(&mut out, params.brightness);

    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "crt pass done");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = CrtParams::default();
        assert_eq!(p.phosphor_attenuation, 0.7);
        assert_eq!(p.scanline_attenuation, 0.85);
        assert_eq!(p.noise_sigma, 10.0);
        assert_eq!(p.strength, 0.1);
        assert_eq!(p.brightness, 1.05);
        assert_eq!(p.seed, None);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let p = CrtParams { strength: f32::NAN, ..CrtParams::default() };
        assert!(matches!(p.validate(), Err(OpsError::InvalidParameter(_))));

        let p = CrtParams { noise_sigma: -1.0, ..CrtParams::default() };
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("noise_sigma"));

        let p = CrtParams { brightness: f64::INFINITY, ..CrtParams::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let p: CrtParams = serde_yaml::from_str("strength: 0.25\nseed: 12\n").unwrap();
        assert_eq!(p.strength, 0.25);
        assert_eq!(p.seed, Some(12));
        assert_eq!(p.noise_sigma, DEFAULT_SIGMA);
        assert_eq!(p.brightness, DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_shape_preserved_and_clamped() {
        let params = CrtParams { seed: Some(5), ..CrtParams::default() };
        let src = PixelBuffer::filled(13, 9, 4, 250.0);
        let out = apply_crt(src.clone(), &params).unwrap();
        assert_eq!(out.shape(), src.shape());
        assert!(out.as_slice().iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_seed_reproducible() {
        let params = CrtParams { seed: Some(77), ..CrtParams::default() };
        let src = PixelBuffer::filled(10, 10, 4, 90.0);
        let a = apply_crt(src.clone(), &params).unwrap();
        let b = apply_crt(src, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noiseless_identity_warp_is_deterministic_shading() {
        let params = CrtParams {
            noise_sigma: 0.0,
            strength: 0.0,
            brightness: 1.0,
            ..CrtParams::default()
        };
        let src = PixelBuffer::filled(2, 3, 4, 200.0);
        let out = apply_crt(src, &params).unwrap();

        // row 0 col 0: G,B masked (140) then even column (x0.85) -> 170, 119, 119, alpha 170
        assert_eq!(out.pixel(0, 0), &[170.0, 119.0, 119.0, 170.0]);
        // row 0 col 1: odd column, mask only
        assert_eq!(out.pixel(0, 1), &[200.0, 140.0, 140.0, 200.0]);
        // row 2 col 1: blue stripe
        assert_eq!(out.pixel(2, 1), &[140.0, 140.0, 200.0, 200.0]);
    }

    #[test]
    fn test_invalid_params_fail_before_processing() {
        let params = CrtParams { strength: f32::NAN, ..CrtParams::default() };
        let err = apply_crt(PixelBuffer::new(4, 4, 4), &params).unwrap_err();
        assert!(err.to_string().contains("strength"));
    }
}
