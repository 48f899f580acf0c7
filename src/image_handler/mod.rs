// SPDX-License-Identifier: MPL-2.0
//! Decoding and pixel-format plumbing for toast images.
//!
//! Incoming image bytes (PNG, JPEG, ...) are decoded once at the ingestion
//! boundary into an owned RGBA8 [`RasterImage`]; the rendering side only
//! ever sees decoded pixels.

pub mod transform;

use crate::error::{Error, Result};
use image_rs::GenericImageView;

/// A decoded image: tightly packed RGBA8 rows, straight (non-premultiplied)
/// alpha.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Wraps an RGBA8 buffer. Returns `None` if the buffer does not match
    /// the dimensions.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Converts to a premultiplied `tiny_skia` pixmap for compositing.
    /// Returns `None` if the surface cannot be allocated.
    #[must_use]
    pub fn to_pixmap(&self) -> Option<tiny_skia::Pixmap> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height)?;
        let mut data = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            let a = px[3] as u16;
            data.push((px[0] as u16 * a / 255) as u8);
            data.push((px[1] as u16 * a / 255) as u8);
            data.push((px[2] as u16 * a / 255) as u8);
            data.push(px[3]);
        }
        tiny_skia::Pixmap::from_vec(data, size)
    }
}

/// Decodes encoded image bytes into RGBA8.
///
/// Undecodable bytes are an [`Error::InvalidInput`]: the toast request is
/// declined, nothing else in the system is affected.
pub fn decode(bytes: &[u8]) -> Result<RasterImage> {
    let dynamic = image_rs::load_from_memory(bytes)
        .map_err(|e| Error::InvalidInput(format!("unable to decode image: {}", e)))?;
    let (width, height) = dynamic.dimensions();
    let pixels = dynamic.to_rgba8().into_raw();
    RasterImage::from_rgba(width, height, pixels)
        .ok_or_else(|| Error::InvalidInput("decoded image has inconsistent size".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let buffer = image_rs::ImageBuffer::from_pixel(width, height, image_rs::Rgba([10u8, 20, 30, 255]));
        let dynamic = image_rs::DynamicImage::ImageRgba8(buffer);
        let mut bytes = Vec::new();
        dynamic
            .write_to(&mut Cursor::new(&mut bytes), image_rs::ImageFormat::Png)
            .expect("failed to encode test png");
        bytes
    }

    #[test]
    fn decode_round_trips_dimensions() {
        let bytes = encode_png(6, 4);
        let image = decode(&bytes).expect("decode failed");
        assert_eq!(image.width, 6);
        assert_eq!(image.height, 4);
        assert_eq!(image.pixels.len(), 6 * 4 * 4);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn from_rgba_checks_buffer_size() {
        assert!(RasterImage::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(RasterImage::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn to_pixmap_premultiplies_alpha() {
        let image = RasterImage::from_rgba(1, 1, vec![200, 100, 50, 128]).unwrap();
        let pixmap = image.to_pixmap().expect("pixmap allocation failed");
        let px = pixmap.pixels()[0];
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), (200u16 * 128 / 255) as u8);
    }
}
