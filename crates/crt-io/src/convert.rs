//! Channel layout normalization.
//!
//! Decoders hand back 8-bit interleaved rasters in whatever layout the file
//! used. Processing always sees RGBA; encoders always receive RGB.

use crt_core::{PixelBuffer, SAMPLE_MAX};

use crate::{IoError, IoResult};

/// 8-bit interleaved pixels straight out of a decoder.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    /// Interleaved samples.
    pub data: Vec<u8>,
}

/// Expands a raster to four RGBA channels. Missing alpha becomes 255.
pub fn to_rgba(raster: &Raster) -> IoResult<PixelBuffer> {
    let ch = raster.channels as usize;
    let rgba: Vec<u8> = match ch {
        1 => raster.data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        2 => raster
            .data
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        3 => raster
            .data
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        4 => raster.data.clone(),
        n => {
            return Err(IoError::DecodeError(format!("unsupported channel count: {}", n)));
        }
    };
    Ok(PixelBuffer::from_u8(
        raster.width as usize,
        raster.height as usize,
        4,
        &rgba,
    )?)
}

/// Quantizes one sample: clamp to `[0, 255]`, then truncate.
#[inline]
fn to_u8(v: f32) -> u8 {
    v.clamp(0.0, SAMPLE_MAX) as u8
}

/// Flattens a buffer to 8-bit RGB, dropping alpha.
///
/// Gray buffers (1 or 2 channels) are replicated across R, G and B.
pub fn to_rgb8(buf: &PixelBuffer) -> IoResult<Vec<u8>> {
    let ch = buf.channels();
    let src = buf.as_slice();
    let rgb = match ch {
        1 => src.iter().flat_map(|&g| [to_u8(g); 3]).collect(),
        2 => src.chunks_exact(2).flat_map(|ga| [to_u8(ga[0]); 3]).collect(),
        3 | 4 => src
            .chunks_exact(ch)
            .flat_map(|px| [to_u8(px[0]), to_u8(px[1]), to_u8(px[2])])
            .collect(),
        n => {
            return Err(IoError::EncodeError(format!("unsupported channel count: {}", n)));
        }
    };
    Ok(rgb)
}
