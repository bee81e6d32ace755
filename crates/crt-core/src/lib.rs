//! # crt-core
//!
//! Core types shared by the CRT simulation crates.
//!
//! - [`PixelBuffer`] - Interleaved `f32` sample buffer indexed `[row, col, channel]`
//! - [`CoordinateField`] - Per-pixel source coordinates for resampling
//! - [`Error`] - Shape and dimension errors
//!
//! ## Crate Structure
//!
//! ```text
//! crt-core (this crate)
//!    ^
//!    |
//!    +-- crt-io  (decode / encode)
//!    +-- crt-ops (shader, noise, warp, tone)
//!    +-- crt-cli
//! ```
//!
//! Samples use the 8-bit scale `[0, 255]`. Stages may leave values outside
//! that range; the stages that clamp say so.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod field;
pub mod image;

pub use error::{Error, Result};
pub use field::CoordinateField;
pub use image::{PixelBuffer, Shape};

/// Largest value an 8-bit sample can hold.
pub const SAMPLE_MAX: f32 = 255.0;
