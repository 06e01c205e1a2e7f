//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::load_from_memory` |
//! | Format sniffing | `image::guess_format` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with [`Quality`] |
//! | Encode → GIF (8-bit RGB/RGBA only) | `DynamicImage::write_to` after conversion |
//! | Encode → PNG, TIFF, WebP (lossless) | `DynamicImage::write_to` |

use super::backend::{CodecError, RasterCodec};
use super::format::ImageFormat;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use std::borrow::Cow;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Codec backed by the `image` crate's pure Rust decoders and encoders.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn map_decode_error(err: ImageError) -> CodecError {
    match err {
        ImageError::IoError(e) => CodecError::Io(e),
        other => CodecError::Decode(other.to_string()),
    }
}

fn map_encode_error(format: ImageFormat, err: ImageError) -> CodecError {
    match err {
        ImageError::IoError(e) => CodecError::Io(e),
        ImageError::Unsupported(e) => CodecError::Unsupported {
            format,
            reason: e.to_string(),
        },
        other => CodecError::Encode(format!("{format}: {other}")),
    }
}

fn encode_into<W: Write + Seek>(
    image: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
    writer: &mut W,
) -> Result<(), CodecError> {
    let result = match format {
        ImageFormat::Jpeg => {
            // Quality is clamped to 1..=100 so it always fits
            let encoder = JpegEncoder::new_with_quality(&mut *writer, quality.value() as u8);
            image.write_with_encoder(encoder)
        }
        ImageFormat::Gif => gif_compatible(image).write_to(writer, image::ImageFormat::Gif),
        other => image.write_to(writer, other.to_image_format()),
    };
    result.map_err(|e| map_encode_error(format, e))
}

/// The GIF encoder only takes 8-bit RGB or RGBA; widen or narrow the rest.
fn gif_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        _ if image.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

impl RasterCodec for RustCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        image::load_from_memory(bytes).map_err(map_decode_error)
    }

    fn detect(&self, bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes)
            .ok()
            .and_then(ImageFormat::from_image_format)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        let mut cursor = Cursor::new(Vec::new());
        encode_into(image, format, quality, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn save(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Quality,
        path: &Path,
    ) -> Result<(), CodecError> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        encode_into(image, format, quality, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgb, half_transparent_rgba};

    #[test]
    fn every_format_roundtrips_opaque_rgb() {
        let codec = RustCodec::new();
        let img = gradient_rgb(24, 16);

        for format in ImageFormat::ALL {
            let bytes = codec
                .encode(&img, format, Quality::default())
                .unwrap_or_else(|e| panic!("{format} encode failed: {e}"));
            assert_eq!(codec.detect(&bytes), Some(format), "{format} not detected");

            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (24, 16), "{format}");
        }
    }

    #[test]
    fn gif_accepts_gray_and_sixteen_bit_buffers() {
        let codec = RustCodec::new();
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_fn(8, 8, |x, _| {
            image::Luma([(x * 30) as u8])
        }));
        let deep = DynamicImage::ImageRgb16(image::ImageBuffer::from_fn(8, 8, |x, y| {
            image::Rgb([(x * 8000) as u16, (y * 8000) as u16, 65535])
        }));
        let gray_alpha = DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_fn(8, 8, |x, _| {
            image::LumaA([128, if x < 4 { 255 } else { 0 }])
        }));

        for img in [gray, deep, gray_alpha] {
            let bytes = codec
                .encode(&img, ImageFormat::Gif, Quality::default())
                .unwrap_or_else(|e| panic!("{:?} to gif failed: {e}", img.color()));
            assert_eq!(codec.detect(&bytes), Some(ImageFormat::Gif));
            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (8, 8));
        }
    }

    #[test]
    fn png_keeps_alpha() {
        let codec = RustCodec::new();
        let bytes = codec
            .encode(&half_transparent_rgba(8, 8), ImageFormat::Png, Quality::default())
            .unwrap();
        assert!(codec.decode(&bytes).unwrap().color().has_alpha());
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let codec = RustCodec::new();
        let img = gradient_rgb(64, 64);
        let low = codec.encode(&img, ImageFormat::Jpeg, Quality::new(10)).unwrap();
        let high = codec.encode(&img, ImageFormat::Jpeg, Quality::new(100)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn decode_garbage_errors() {
        let codec = RustCodec::new();
        let result = codec.decode(b"definitely not an image");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn detect_unknown_is_none() {
        assert_eq!(RustCodec::new().detect(b"plain text"), None);
    }

    #[test]
    fn save_writes_decodable_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.tiff");

        let codec = RustCodec::new();
        codec
            .save(&gradient_rgb(10, 5), ImageFormat::Tiff, Quality::default(), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 5));
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let codec = RustCodec::new();
        let result = codec.save(
            &gradient_rgb(2, 2),
            ImageFormat::Png,
            Quality::default(),
            Path::new("/nonexistent/dir/out.png"),
        );
        assert!(matches!(result, Err(CodecError::Io(_))));
    }
}
