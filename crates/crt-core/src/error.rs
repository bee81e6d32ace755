//! Error types for crt-core.
//!
//! Buffers are fixed-shape, so nearly every failure is a shape disagreement.
//!
//! ```rust
//! use crt_core::{Error, PixelBuffer};
//!
//! let a = PixelBuffer::new(4, 4, 3);
//! let b = PixelBuffer::new(4, 2, 3);
//! assert!(matches!(a.ensure_same_shape(&b), Err(Error::DimensionMismatch { .. })));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by buffer construction and shape checks.
#[derive(Debug, Error)]
pub enum Error {
    /// Two shapes that must agree do not.
    ///
    /// Shapes are reported as `width x height x channels`.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape or length.
        expected: String,
        /// Actual shape or length.
        actual: String,
    },

    /// Dimensions that cannot describe a buffer (e.g. size overflow).
    #[error("invalid dimensions: {width}x{height}x{channels} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Requested channel count
        channels: usize,
        /// Why the dimensions were rejected
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::DimensionMismatch`] from two displayable shapes.
    #[inline]
    pub fn dimension_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(
        width: usize,
        height: usize,
        channels: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            channels,
            reason: reason.into(),
        }
    }

    /// Returns `true` for shape disagreements.
    #[inline]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}
