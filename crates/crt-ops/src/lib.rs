//! # crt-ops
//!
//! Effects that turn a clean image into a Trinitron-style CRT capture.
//!
//! # Modules
//!
//! - [`phosphor`] - Phosphor stripe mask and vertical scanlines
//! - [`noise`] - Additive Gaussian noise with an injected random source
//! - [`aberration`] - Spherical aberration warp with bilinear resampling
//! - [`tone`] - Brightness trim
//! - [`pipeline`] - All of the above in order, driven by [`CrtParams`]
//!
//! # Example
//!
//! ```rust
//! use crt_core::PixelBuffer;
//! use crt_ops::aberration::spherical_aberration;
//!
//! let src = PixelBuffer::filled(64, 48, 4, 128.0);
//! let warped = spherical_aberration(&src, 0.1);
//! assert_eq!(warped.shape(), src.shape());
//! ```
//!
//! When the `parallel` feature is enabled (default), the warp processes rows
//! with rayon. Output is identical either way.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod aberration;
pub mod noise;
pub mod phosphor;
pub mod pipeline;
pub mod tone;

pub use error::{OpsError, OpsResult};
pub use pipeline::{apply_crt, apply_crt_with_rng, CrtParams};
