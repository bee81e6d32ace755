//! JPEG format support.
//!
//! Decoding normalizes grayscale, 16-bit grayscale and CMYK to RGB.
//! Encoding writes baseline RGB at a configurable quality.

use std::io::{BufReader, Cursor};

use crate::convert::Raster;
use crate::{IoError, IoResult};

/// Decodes a JPEG from memory.
pub fn decode(bytes: &[u8]) -> IoResult<Raster> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(Cursor::new(bytes)));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let data: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => {
            // high byte only
            pixels.chunks_exact(2).flat_map(|l16| [l16[0]; 3]).collect()
        }
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let c = cmyk[0] as f32 / 255.0;
                let m = cmyk[1] as f32 / 255.0;
                let y = cmyk[2] as f32 / 255.0;
                let k = cmyk[3] as f32 / 255.0;

                let r = ((1.0 - c) * (1.0 - k) * 255.0) as u8;
                let g = ((1.0 - m) * (1.0 - k) * 255.0) as u8;
                let b = ((1.0 - y) * (1.0 - k) * 255.0) as u8;

                [r, g, b]
            })
            .collect(),
    };

    Ok(Raster {
        width: info.width as u32,
        height: info.height as u32,
        channels: 3,
        data,
    })
}

/// Encodes 8-bit RGB samples as JPEG.
///
/// Fails if either dimension exceeds 65535, the format's limit.
pub fn encode(rgb: &[u8], width: u32, height: u32, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let w = u16::try_from(width)
        .map_err(|_| IoError::EncodeError(format!("width {} exceeds JPEG limit", width)))?;
    let h = u16::try_from(height)
        .map_err(|_| IoError::EncodeError(format!("height {} exceeds JPEG limit", height)))?;

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality);
    encoder
        .encode(rgb, w, h, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_dimensions() {
        let (w, h) = (24u32, 16u32);
        let rgb = vec![128u8; (w * h * 3) as usize];

        let bytes = encode(&rgb, w, h, 90).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);

        let raster = decode(&bytes).unwrap();
        assert_eq!((raster.width, raster.height, raster.channels), (w, h, 3));
        // flat gray survives lossy coding almost exactly
        assert!(raster.data.iter().all(|&v| (v as i32 - 128).abs() <= 2));
    }

    #[test]
    fn test_encode_rejects_huge_width() {
        let err = encode(&[], 70_000, 1, crate::DEFAULT_JPEG_QUALITY).unwrap_err();
        assert!(err.is_encode());
        assert!(err.to_string().contains("70000"));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(&[0xFF, 0xD8, 0xFF, 0x00, 0x01]).unwrap_err().is_decode());
    }
}
