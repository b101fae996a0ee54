//! Rendering: layout, paint commands and the rasterizer.

pub mod glyphs;
pub mod layout;
pub mod paint;
pub mod raster;

use crate::error::{Error, Result};

/// A rasterized surface: an RGBA8 pixel grid plus the device-pixel scale it
/// was captured at. Ephemeral; lives only within one export operation.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn empty(width: u32, height: u32, scale: f32) -> Self {
        Self { width, height, scale, pixels: Vec::new() }
    }

    /// A zero-area bitmap is the primary failure signal of the pipeline.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Drop the alpha channel; the capture background is opaque, so alpha
    /// carries no information by the time a bitmap reaches pagination.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.pixels.chunks(4).flat_map(|p| [p[0], p[1], p[2]]).collect()
    }

    /// PNG-encode the bitmap, for the raw-raster output path and tests.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| Error::EncodeError("bitmap buffer does not match its dimensions".into()))?;
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| Error::EncodeError(format!("PNG encode failed: {}", e)))?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bitmap_is_empty() {
        assert!(Bitmap::empty(0, 128, 2.0).is_empty());
        assert!(Bitmap::empty(128, 0, 2.0).is_empty());
    }

    #[test]
    fn rgb_bytes_drops_alpha() {
        let bmp = Bitmap { width: 1, height: 1, scale: 1.0, pixels: vec![10, 20, 30, 255] };
        assert_eq!(bmp.rgb_bytes(), vec![10, 20, 30]);
    }
}
