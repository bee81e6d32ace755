//! Trinitron phosphor mask and vertical scanlines.
//!
//! Rows cycle through red, green and blue phosphor stripes: on each row the
//! two primaries that are not lit are attenuated. Even columns are darkened
//! on every channel to mimic the aperture grille gaps.
//!
//! Both effects run while samples still sit in 8-bit storage, so every
//! attenuated sample is truncated back to an integer value.

use crt_core::PixelBuffer;
use tracing::debug;

/// Attenuation of the unlit primaries on each row.
pub const PHOSPHOR_ATTENUATION: f64 = 0.7;

/// Attenuation applied to even columns.
pub const SCANLINE_ATTENUATION: f64 = 0.85;

/// Phosphor stripe lit on a given row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phosphor {
    /// Rows with `row % 3 == 0`.
    Red,
    /// Rows with `row % 3 == 1`.
    Green,
    /// Rows with `row % 3 == 2`.
    Blue,
}

impl Phosphor {
    /// Stripe for `row`.
    #[inline]
    pub fn for_row(row: usize) -> Self {
        match row % 3 {
            0 => Phosphor::Red,
            1 => Phosphor::Green,
            _ => Phosphor::Blue,
        }
    }

    /// Channel index of the lit primary.
    #[inline]
    pub fn channel(self) -> usize {
        match self {
            Phosphor::Red => 0,
            Phosphor::Green => 1,
            Phosphor::Blue => 2,
        }
    }
}

/// Scales an 8-bit sample and truncates toward zero.
#[inline]
fn attenuate(v: f32, factor: f64) -> f32 {
    (v as f64 * factor).trunc() as f32
}

/// Attenuates the unlit primaries of every row in place.
///
/// Only color channels (the first three) are touched; alpha is left alone.
pub fn phosphor_mask(buf: &mut PixelBuffer, attenuation: f64) {
    let ch = buf.channels();
    if buf.is_empty() {
        return;
    }
    let color_channels = ch.min(3);
    debug!(attenuation, "phosphor mask");

    for row in 0..buf.height() {
        let lit = Phosphor::for_row(row).channel();
        for px in buf.row_mut(row).chunks_mut(ch) {
            for (c, v) in px.iter_mut().enumerate().take(color_channels) {
                if c != lit {
                    *v = attenuate(*v, attenuation);
                }
            }
        }
    }
}

/// Darkens every even column, all channels included, in place.
pub fn scanlines(buf: &mut PixelBuffer, attenuation: f64) {
    let ch = buf.channels();
    if buf.is_empty() {
        return;
    }
    debug!(attenuation, "scanlines");

    for row in 0..buf.height() {
        for px in buf.row_mut(row).chunks_mut(ch).step_by(2) {
            for v in px.iter_mut() {
                *v = attenuate(*v, attenuation);
            }
        }
    }
}
