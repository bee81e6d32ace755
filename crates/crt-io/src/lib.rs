//! # crt-io
//!
//! Image decode and encode for the CRT simulator.
//!
//! - [`read`] loads a file and normalizes it to an RGBA [`PixelBuffer`]
//!   with samples in `[0, 255]`, whatever the source layout.
//! - [`write`] converts a buffer to 8-bit RGB (alpha dropped, samples
//!   truncated) and writes it in the format implied by the extension.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crt_io::{read, write};
//!
//! let image = read("input.jpg")?;
//! write("output.png", &image)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | PNG    | Yes  | Yes   | 1-16 bit, palette, gray, alpha; written as 8-bit RGB |
//! | JPEG   | Yes  | Yes   | gray, RGB, CMYK; quality via [`WriteOptions`] |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod detect;
pub mod convert;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;

use crt_core::PixelBuffer;
use tracing::debug;

use crate::convert::{to_rgb8, to_rgba, Raster};
use crate::detect::extension_label;

/// Default JPEG quality, matching the common default of most encoders.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality, 1-100. Ignored for PNG.
    pub jpeg_quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Reads an image, auto-detecting the format, as an RGBA buffer.
///
/// The format is taken from magic bytes, falling back to the extension.
///
/// # Errors
///
/// Returns [`IoError::DecodeError`] if the file cannot be read, the format
/// is not supported, or the data is corrupt.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| IoError::DecodeError(format!("{}: {}", path.display(), e)))?;

    let format = Format::detect(path, &bytes);
    if format == Format::Unknown {
        return Err(IoError::DecodeError(format!(
            "unsupported format: {}",
            extension_label(path)
        )));
    }
    debug!(path = %path.display(), format = format.name(), bytes = bytes.len(), "read");

    decode_as(format, &bytes)
}

/// Decodes an in-memory image, detected by magic bytes, as an RGBA buffer.
pub fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
    decode_as(Format::from_bytes(bytes), bytes)
}

fn decode_as(format: Format, bytes: &[u8]) -> IoResult<PixelBuffer> {
    let raster: Raster = match format {
        #[cfg(feature = "png")]
        Format::Png => png::decode(bytes)?,

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::decode(bytes)?,

        other => {
            return Err(IoError::DecodeError(format!(
                "no decoder for {} data",
                other.name()
            )))
        }
    };
    to_rgba(&raster)
}

/// Writes an image with default [`WriteOptions`], format from the extension.
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] if the extension is not a supported
/// format, the data cannot be encoded, or the file cannot be written.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    write_with_options(path, image, &WriteOptions::default())
}

/// Writes an image, format from the extension.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    image: &PixelBuffer,
    options: &WriteOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    if format == Format::Unknown {
        return Err(IoError::EncodeError(format!(
            "unsupported format: {}",
            extension_label(path)
        )));
    }

    let bytes = encode(image, format, options)?;
    debug!(path = %path.display(), format = format.name(), bytes = bytes.len(), "write");

    std::fs::write(path, bytes)
        .map_err(|e| IoError::EncodeError(format!("{}: {}", path.display(), e)))
}

/// Encodes an image in memory as 8-bit RGB.
pub fn encode(image: &PixelBuffer, format: Format, options: &WriteOptions) -> IoResult<Vec<u8>> {
    let width = u32::try_from(image.width())
        .map_err(|_| IoError::EncodeError(format!("width {} too large", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| IoError::EncodeError(format!("height {} too large", image.height())))?;
    if width == 0 || height == 0 {
        return Err(IoError::EncodeError(format!("cannot encode empty image {}x{}", width, height)));
    }
    let rgb = to_rgb8(image)?;

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::encode(&rgb, width, height),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => {
            if !(1..=100).contains(&options.jpeg_quality) {
                return Err(IoError::EncodeError(format!(
                    "JPEG quality must be 1-100, got {}",
                    options.jpeg_quality
                )));
            }
            jpeg::encode(&rgb, width, height, options.jpeg_quality)
        }

        other => Err(IoError::EncodeError(format!("no encoder for {}", other.name()))),
    }
}
