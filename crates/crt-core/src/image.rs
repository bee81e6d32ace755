//! Pixel buffer used by every pipeline stage.
//!
//! # Memory Layout
//!
//! Samples are stored **row-major**, top-to-bottom, channels interleaved:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! The sample for `[row, col, channel]` lives at
//! `(row * width + col) * channels + channel`.
//!
//! # Usage
//!
//! ```rust
//! use crt_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(8, 4, 4);
//! buf.set(1, 2, 0, 200.0);
//! assert_eq!(buf.get(1, 2, 0), 200.0);
//! assert_eq!(buf.pixel(1, 2), &[200.0, 0.0, 0.0, 0.0]);
//! ```

use std::fmt;

use crate::{Error, Result};

/// Owned `[row, col, channel]` buffer of `f32` samples.
///
/// The shape is fixed at construction. Stages that change the contents
/// either mutate in place or allocate a fresh buffer of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

/// Buffer shape, displayed as `WxHxC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Samples per pixel
    pub channels: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

fn checked_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| Error::invalid_dimensions(width, height, channels, "size overflow"))
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * channels` overflows `usize`.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self::filled(width, height, channels, 0.0)
    }

    /// Creates a buffer with every sample set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * channels` overflows `usize`.
    pub fn filled(width: usize, height: usize, channels: usize, value: f32) -> Self {
        let len = width * height * channels;
        Self {
            width,
            height,
            channels,
            data: vec![value; len],
        }
    }

    /// Wraps existing interleaved samples.
    ///
    /// Fails with [`Error::DimensionMismatch`] if `data.len()` is not
    /// `width * height * channels`.
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        let expected = checked_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::dimension_mismatch(
                format!("{expected} samples ({width}x{height}x{channels})"),
                format!("{} samples", data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Builds a buffer from 8-bit samples.
    pub fn from_u8(width: usize, height: usize, channels: usize, data: &[u8]) -> Result<Self> {
        Self::from_vec(width, height, channels, data.iter().map(|&v| v as f32).collect())
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The `(width, height, channels)` triple.
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// True when the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        debug_assert!(row < self.height && col < self.width && channel < self.channels);
        (row * self.width + col) * self.channels + channel
    }

    /// Sample at `[row, col, channel]`.
    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[self.index(row, col, channel)]
    }

    /// Overwrites the sample at `[row, col, channel]`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: f32) {
        let idx = self.index(row, col, channel);
        self.data[idx] = value;
    }

    /// All channels of one pixel.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[f32] {
        let start = self.index(row, col, 0);
        &self.data[start..start + self.channels]
    }

    /// One row of interleaved samples.
    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        let stride = self.row_stride();
        &self.data[row * stride..(row + 1) * stride]
    }

    /// Mutable row of interleaved samples.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let stride = self.row_stride();
        &mut self.data[row * stride..(row + 1) * stride]
    }

    /// Samples per row (`width * channels`).
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width * self.channels
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the buffer, returning its samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// True when both buffers have the same width, height and channel count.
    #[inline]
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.shape() == other.shape()
    }

    /// Fails with [`Error::DimensionMismatch`] unless shapes match.
    pub fn ensure_same_shape(&self, other: &PixelBuffer) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.shape(), other.shape()))
        }
    }

    /// Clamps every sample to `[lo, hi]`.
    pub fn clamp(&mut self, lo: f32, hi: f32) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }
}
