//! Shared test utilities: synthetic images and encoded fixtures.
//!
//! Every helper builds its pixels in memory so tests never depend on files
//! checked into the repository.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::imaging::{ImageFormat, Quality, RasterCodec, RustCodec};

// =========================================================================
// Pixel buffers
// =========================================================================

/// Opaque RGB gradient. Red follows x, green follows y.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// RGBA image whose left half is opaque red and right half fully transparent.
pub fn half_transparent_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

/// Fully transparent RGBA image.
pub fn transparent_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode with the production codec. Panics on failure.
pub fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    RustCodec::new()
        .encode(image, format, Quality::default())
        .unwrap_or_else(|e| panic!("fixture encode to {format} failed: {e}"))
}

/// Pixel at `(x, y)` as RGBA, whatever the buffer's color type.
pub fn pixel(image: &DynamicImage, x: u32, y: u32) -> [u8; 4] {
    image.to_rgba8().get_pixel(x, y).0
}
