//! Images registered with a style for icon rendering.
//!
//! Symbol layers reference images by id through `icon-image`. An image carries
//! RGBA pixels plus the metadata a renderer needs to place it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::style::StyleError;

/// A style image. Pixel data stays out of serialized style output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleImage {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "pixelRatio", default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
    #[serde(default)]
    pub sdf: bool,
    #[serde(skip)]
    pub rgba: Vec<u8>,
}

fn default_pixel_ratio() -> f32 {
    1.0
}

impl StyleImage {
    /// Build from raw RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, StyleError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(StyleError::InvalidImage(format!(
                "expected {}x{} RGBA ({} bytes), got {} bytes",
                width,
                height,
                expected,
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixel_ratio: 1.0,
            sdf: false,
            rgba,
        })
    }

    /// Single-colour square, used when no icon asset is bundled.
    pub fn solid(size: u32, color: [u8; 4]) -> Self {
        let size = size.max(1);
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(size as usize * size as usize * 4)
            .collect();
        Self {
            width: size,
            height: size,
            pixel_ratio: 1.0,
            sdf: false,
            rgba,
        }
    }

    /// Decode a PNG file.
    pub fn load_png(path: &Path) -> Result<Self, StyleError> {
        let img = image::open(path)
            .map_err(|e| StyleError::InvalidImage(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Size in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        (self.width as f32 / ratio, self.height as f32 / ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_length_is_checked() {
        assert!(StyleImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(StyleImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(StyleImage::from_rgba(0, 2, vec![]).is_err());
    }

    #[test]
    fn solid_fills_every_pixel() {
        let img = StyleImage::solid(3, [255, 0, 0, 255]);
        assert_eq!(img.rgba.len(), 36);
        assert!(img.rgba.chunks(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn logical_size_honours_pixel_ratio() {
        let img = StyleImage::solid(24, [0; 4]).with_pixel_ratio(2.0);
        assert_eq!(img.logical_size(), (12.0, 12.0));
    }

    #[test]
    fn missing_png_is_reported() {
        let err = StyleImage::load_png(Path::new("/nonexistent/pin.png")).unwrap_err();
        assert!(matches!(err, StyleError::InvalidImage(_)));
    }
}
