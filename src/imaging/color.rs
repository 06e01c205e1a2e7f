//! Alpha-channel normalization.
//!
//! Encoders for JPEG and TIFF get opaque RGB input. These functions composite
//! a possibly transparent image onto a solid background and always return an
//! `Rgb8` buffer; the input image is never modified.

use super::params::Background;
use image::{DynamicImage, Rgb, RgbImage};
use std::borrow::Cow;

/// Composite `image` over an opaque `background` (source-over).
///
/// Produces a new `Rgb8` buffer regardless of whether the source has alpha.
pub fn flatten_onto(image: &DynamicImage, background: Background) -> DynamicImage {
    let rgba = image.to_rgba8();
    let Rgb([br, bg, bb]) = background.to_rgb();

    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([blend(r, br, a), blend(g, bg, a), blend(b, bb, a)])
    });
    DynamicImage::ImageRgb8(flat)
}

/// Drop the alpha channel by compositing onto black.
///
/// Fully transparent pixels come out black; partially transparent ones are
/// darkened in proportion to their transparency.
pub fn remove_alpha_channel(image: &DynamicImage) -> DynamicImage {
    flatten_onto(image, Background::BLACK)
}

/// Replace transparency with `color`.
///
/// Images without an alpha channel are returned borrowed, untouched.
pub fn normalize_image_transparency(
    image: &DynamicImage,
    color: Background,
) -> Cow<'_, DynamicImage> {
    if image.color().has_alpha() {
        Cow::Owned(flatten_onto(image, color))
    } else {
        Cow::Borrowed(image)
    }
}

#[inline]
fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    // Rounded integer form of src * a/255 + dst * (1 - a/255)
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}
