//! Spherical aberration warp.
//!
//! ST map approach: every destination pixel computes the source coordinate it
//! should sample, then the source is resampled bilinearly. The radial model
//! displaces pixels by `(r / r_max)^2 * strength` times their offset from the
//! image center, so the center stays put and the corners move the most.
//!
//! The displacement is evaluated at the *output* position and used directly
//! as a source index. That is a forward model applied as if it were inverse,
//! not an exact lens inversion; results must match that definition.
//!
//! Coordinates are clamped to the image before sampling, so borders repeat
//! edge pixels (clamp-to-edge) rather than going black or wrapping.
//!
//! When the `parallel` feature is enabled, rows are processed with rayon.

use crt_core::{CoordinateField, Error, PixelBuffer};
use tracing::{debug, trace};

use crate::OpsResult;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default warp strength.
pub const DEFAULT_STRENGTH: f32 = 0.1;

/// Radial distortion model for one image size.
///
/// Derived once per image; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionParams {
    /// Horizontal center, `width / 2`.
    pub center_x: f32,
    /// Vertical center, `height / 2`.
    pub center_y: f32,
    /// Distance from the center to a corner.
    pub max_radius: f32,
    /// Warp magnitude. Positive values sample further out (barrel).
    pub strength: f32,
    width: usize,
    height: usize,
}

impl DistortionParams {
    /// Derives the model for a `width x height` image.
    pub fn new(width: usize, height: usize, strength: f32) -> Self {
        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;
        Self {
            center_x,
            center_y,
            max_radius: center_x.hypot(center_y),
            strength,
            width,
            height,
        }
    }

    /// Displacement factor at output `(row, col)`: `normDist^2 * strength`.
    #[inline]
    pub fn displacement(&self, row: usize, col: usize) -> f32 {
        if self.max_radius <= 0.0 {
            return 0.0;
        }
        let dx = col as f32 - self.center_x;
        let dy = row as f32 - self.center_y;
        let norm_dist = dx.hypot(dy) / self.max_radius;
        norm_dist * norm_dist * self.strength
    }

    /// Source coordinate `(x, y)` for output `(row, col)` before clamping.
    #[inline]
    pub fn unclamped_source_coord(&self, row: usize, col: usize) -> (f32, f32) {
        let d = self.displacement(row, col);
        let x = col as f32 + (col as f32 - self.center_x) * d;
        let y = row as f32 + (row as f32 - self.center_y) * d;
        (x, y)
    }

    /// Source coordinate `(x, y)` for output `(row, col)`, clamped to
    /// `[0, width - 1] x [0, height - 1]`.
    #[inline]
    pub fn source_coord(&self, row: usize, col: usize) -> (f32, f32) {
        let (x, y) = self.unclamped_source_coord(row, col);
        (
            x.clamp(0.0, self.width.saturating_sub(1) as f32),
            y.clamp(0.0, self.height.saturating_sub(1) as f32),
        )
    }
}

/// Materializes the clamped coordinate field for a `width x height` image.
pub fn coordinate_field(width: usize, height: usize, strength: f32) -> CoordinateField {
    let params = DistortionParams::new(width, height, strength);
    CoordinateField::from_fn(width, height, |row, col| params.source_coord(row, col))
}

/// Bilinear clamp-to-edge sample of every channel at `(x, y)` into `out`.
///
/// `out.len()` must equal `src.channels()`. The four taps are
/// `x0 = floor(x)`, `x1 = min(x0 + 1, w - 1)` (same for y), so reads never
/// leave the image. Weights and the blend are evaluated in f64 so a
/// uniform neighbourhood reproduces its value exactly. An empty source
/// yields zeros.
#[inline]
pub fn sample_bilinear(src: &PixelBuffer, x: f32, y: f32, out: &mut [f32]) {
    let w = src.width();
    let h = src.height();
    if w == 0 || h == 0 {
        out.fill(0.0);
        return;
    }
    let x = (x as f64).clamp(0.0, (w - 1) as f64);
    let y = (y as f64).clamp(0.0, (h - 1) as f64);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let wx = x - x0 as f64;
    let wy = y - y0 as f64;

    let p00 = src.pixel(y0, x0);
    let p01 = src.pixel(y1, x0);
    let p10 = src.pixel(y0, x1);
    let p11 = src.pixel(y1, x1);

    for (c, o) in out.iter_mut().enumerate() {
        let v = p00[c] as f64 * (1.0 - wx) * (1.0 - wy)
            + p10[c] as f64 * wx * (1.0 - wy)
            + p01[c] as f64 * (1.0 - wx) * wy
            + p11[c] as f64 * wx * wy;
        *o = v as f32;
    }
}

/// Resamples `src` through a generic coordinate function.
///
/// Rows are written as disjoint slices, so the parallel path needs no locking.
#[cfg(feature = "parallel")]
fn apply_warp<F>(src: &PixelBuffer, coord_fn: F) -> PixelBuffer
where
    F: Fn(usize, usize) -> (f32, f32) + Sync, // (row, col) -> (src_x, src_y)
{
    let mut dst = PixelBuffer::new(src.width(), src.height(), src.channels());
    if dst.is_empty() {
        return dst;
    }
    let ch = src.channels();
    let stride = dst.row_stride();

    dst.as_mut_slice()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, px) in out.chunks_mut(ch).enumerate() {
                let (sx, sy) = coord_fn(row, col);
                sample_bilinear(src, sx, sy, px);
            }
        });

    dst
}

/// Resamples `src` through a generic coordinate function (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
fn apply_warp<F>(src: &PixelBuffer, coord_fn: F) -> PixelBuffer
where
    F: Fn(usize, usize) -> (f32, f32), // (row, col) -> (src_x, src_y)
{
    let mut dst = PixelBuffer::new(src.width(), src.height(), src.channels());
    if dst.is_empty() {
        return dst;
    }
    let ch = src.channels();
    let stride = dst.row_stride();

    for (row, out) in dst.as_mut_slice().chunks_mut(stride).enumerate() {
        for (col, px) in out.chunks_mut(ch).enumerate() {
            let (sx, sy) = coord_fn(row, col);
            sample_bilinear(src, sx, sy, px);
        }
    }

    dst
}

/// Applies the spherical aberration warp.
///
/// Returns a freshly allocated buffer of the same shape. Output samples are
/// not clamped; the tone stage does that. Empty buffers come back empty.
///
/// # Example
///
/// ```rust
/// use crt_core::PixelBuffer;
/// use crt_ops::aberration::spherical_aberration;
///
/// let src = PixelBuffer::filled(4, 4, 1, 100.0);
/// let dst = spherical_aberration(&src, 0.1);
/// assert_eq!(dst.shape(), src.shape());
/// ```
pub fn spherical_aberration(src: &PixelBuffer, strength: f32) -> PixelBuffer {
    let params = DistortionParams::new(src.width(), src.height(), strength);
    debug!(
        width = src.width(),
        height = src.height(),
        channels = src.channels(),
        strength,
        max_radius = params.max_radius,
        "spherical aberration"
    );
    apply_warp(src, |row, col| params.source_coord(row, col))
}

/// Resamples `src` through a precomputed field.
///
/// Fails with a dimension mismatch if the field grid differs from the image.
pub fn remap(src: &PixelBuffer, field: &CoordinateField) -> OpsResult<PixelBuffer> {
    if field.width() != src.width() || field.height() != src.height() {
        return Err(Error::dimension_mismatch(
            format!("{}x{} field", src.width(), src.height()),
            format!("{}x{} field", field.width(), field.height()),
        )
        .into());
    }
    trace!(width = field.width(), height = field.height(), "remap");
    Ok(apply_warp(src, |row, col| field.get(row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient(w: usize, h: usize, ch: usize) -> PixelBuffer {
        let data = (0..w * h * ch).map(|i| (i % 251) as f32).collect();
        PixelBuffer::from_vec(w, h, ch, data).unwrap()
    }

    #[test]
    fn test_params_center_and_radius() {
        let p = DistortionParams::new(8, 6, 0.1);
        assert_relative_eq!(p.center_x, 4.0);
        assert_relative_eq!(p.center_y, 3.0);
        assert_relative_eq!(p.max_radius, 5.0);
    }

    #[test]
    fn test_center_is_undisplaced() {
        let p = DistortionParams::new(8, 8, 0.75);
        assert_eq!(p.displacement(4, 4), 0.0);
        assert_eq!(p.source_coord(4, 4), (4.0, 4.0));
    }

    #[test]
    fn test_corner_displacement_is_maximal() {
        let p = DistortionParams::new(8, 8, 0.5);
        assert_relative_eq!(p.displacement(0, 0), 0.5, epsilon = 1e-6);

        // -4 * 0.5 = -2 before clamping
        let (ux, uy) = p.unclamped_source_coord(0, 0);
        assert_relative_eq!(ux, -2.0, epsilon = 1e-5);
        assert_relative_eq!(uy, -2.0, epsilon = 1e-5);
        assert_eq!(p.source_coord(0, 0), (0.0, 0.0));
    }

    #[test]
    fn test_source_coord_upper_clamp() {
        let p = DistortionParams::new(8, 8, 2.0);
        let (x, y) = p.source_coord(7, 7);
        assert_eq!((x, y), (7.0, 7.0));
    }

    #[test]
    fn test_empty_image_has_no_displacement() {
        let p = DistortionParams::new(0, 0, 1.0);
        assert_eq!(p.max_radius, 0.0);
        assert_eq!(p.displacement(0, 0), 0.0);
    }

    #[test]
    fn test_sample_bilinear_midpoint() {
        let src = PixelBuffer::from_vec(2, 2, 1, vec![0.0, 100.0, 200.0, 40.0]).unwrap();
        let mut out = [0.0];
        sample_bilinear(&src, 0.5, 0.5, &mut out);
        assert_relative_eq!(out[0], 85.0, epsilon = 1e-4);

        sample_bilinear(&src, 1.0, 0.0, &mut out);
        assert_relative_eq!(out[0], 100.0);
    }

    #[test]
    fn test_sample_bilinear_clamps_outside() {
        let src = PixelBuffer::from_vec(2, 1, 2, vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let mut out = [0.0; 2];
        sample_bilinear(&src, -3.0, 5.0, &mut out);
        assert_eq!(out, [10.0, 20.0]);
        sample_bilinear(&src, 9.0, -1.0, &mut out);
        assert_eq!(out, [30.0, 40.0]);
    }

    #[test]
    fn test_zero_strength_is_identity() {
        let src = gradient(7, 5, 4);
        let dst = spherical_aberration(&src, 0.0);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_checkerboard_zero_strength() {
        let src = PixelBuffer::from_vec(2, 2, 1, vec![0.0, 255.0, 255.0, 0.0]).unwrap();
        assert_eq!(spherical_aberration(&src, 0.0), src);
    }

    #[test]
    fn test_uniform_input_is_invariant() {
        let src = PixelBuffer::filled(4, 4, 1, 100.0);
        let dst = spherical_aberration(&src, 0.1);
        for &v in dst.as_slice() {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn test_uniform_neighbourhood_is_exact_at_fractional_taps() {
        let src = PixelBuffer::filled(3, 3, 4, 100.0);
        let mut out = [0.0; 4];
        for (x, y) in [(0.3, 0.7), (1.25, 0.5), (0.999, 1.001), (1.9, 1.1)] {
            sample_bilinear(&src, x, y, &mut out);
            assert_eq!(out, [100.0; 4], "({x}, {y})");
        }
    }

    #[test]
    fn test_sample_bilinear_empty_source_writes_zeros() {
        let mut out = [7.0; 3];
        sample_bilinear(&PixelBuffer::new(0, 0, 3), 0.5, 0.5, &mut out);
        assert_eq!(out, [0.0; 3]);

        let mut out = [7.0; 2];
        sample_bilinear(&PixelBuffer::new(4, 0, 2), 1.0, 0.0, &mut out);
        assert_eq!(out, [0.0; 2]);
    }

    #[test]
    fn test_empty_input() {
        let src = PixelBuffer::new(0, 3, 4);
        let dst = spherical_aberration(&src, 0.1);
        assert!(dst.is_empty());
        assert_eq!(dst.shape(), src.shape());
    }

    #[test]
    fn test_single_pixel() {
        let src = PixelBuffer::from_vec(1, 1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(spherical_aberration(&src, 5.0), src);
    }

    #[test]
    fn test_remap_matches_direct_warp() {
        let src = gradient(9, 6, 3);
        let field = coordinate_field(9, 6, 0.3);
        let via_field = remap(&src, &field).unwrap();
        let direct = spherical_aberration(&src, 0.3);
        assert_eq!(via_field, direct);
    }

    #[test]
    fn test_remap_rejects_wrong_field() {
        let src = gradient(4, 4, 1);
        let field = CoordinateField::identity(4, 3);
        assert!(remap(&src, &field).unwrap_err().is_dimension_mismatch());
    }

    #[test]
    fn test_remap_identity_field() {
        let src = gradient(5, 3, 2);
        let dst = remap(&src, &CoordinateField::identity(5, 3)).unwrap();
        assert_eq!(dst, src);
    }
}
