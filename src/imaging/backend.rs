//! Raster codec trait and shared error type.
//!
//! The [`RasterCodec`] trait is the seam between the pipeline and the pixel
//! encoders: decode bytes into a [`DynamicImage`], encode a [`DynamicImage`]
//! into bytes or a file for one of the supported [`ImageFormat`]s.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.
//! Tests use the recording `MockCodec` below.

use super::format::ImageFormat;
use super::params::Quality;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    /// The codec cannot produce this format for the given pixel layout.
    #[error("Cannot encode {format}: {reason}")]
    Unsupported {
        format: ImageFormat,
        reason: String,
    },
}

/// Decoder/encoder for raster bytes.
///
/// Implementations must not keep per-call state so a single codec can be
/// shared across threads.
pub trait RasterCodec: Sync {
    /// Decode an image, sniffing the format from its magic bytes.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Detect the format of encoded bytes without decoding pixels.
    fn detect(&self, bytes: &[u8]) -> Option<ImageFormat>;

    /// Encode to an in-memory byte vector.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError>;

    /// Encode straight to a file.
    fn save(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Quality,
        path: &Path,
    ) -> Result<(), CodecError>;
}
