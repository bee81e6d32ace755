//! Final brightness trim.

use crt_core::{PixelBuffer, SAMPLE_MAX};
use tracing::debug;

/// Default brightness multiplier.
pub const DEFAULT_BRIGHTNESS: f64 = 1.05;

/// Scales every sample by `factor` and clamps to `[0, 255]`.
///
/// The product is formed in f64, so integer samples land on the same side
/// of an integer boundary as an 8-bit pipeline would put them
/// (`100 * 1.05` is `105`, not `104.99999`).
pub fn adjust_brightness(buf: &mut PixelBuffer, factor: f64) {
    debug!(factor, "brightness");
    for v in buf.as_mut_slice() {
        *v = (*v as f64 * factor).clamp(0.0, SAMPLE_MAX as f64) as f32;
    }
}
