//! PNG format support.
//!
//! Decoding expands palettes and low bit depths and strips 16-bit samples to
//! 8 bits, so every PNG comes out as an 8-bit gray, gray+alpha, RGB or RGBA
//! raster. Encoding always writes 8-bit RGB.

use std::io::Cursor;

use crate::convert::Raster;
use crate::{IoError, IoResult};

/// Decodes a PNG from memory.
pub fn decode(bytes: &[u8]) -> IoResult<Raster> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::DecodeError(format!(
            "unexpected bit depth after expansion: {:?}",
            info.bit_depth
        )));
    }

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::DecodeError(format!("unsupported color type: {:?}", other)));
        }
    };

    buf.truncate(info.buffer_size());
    Ok(Raster {
        width: info.width,
        height: info.height,
        channels,
        data: buf,
    })
}

/// Encodes 8-bit RGB samples as PNG.
pub fn encode(rgb: &[u8], width: u32, height: u32) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }
    Ok(out)
}
