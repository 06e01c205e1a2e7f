//! Format conversion across buffer, byte and base64-text representations.
//!
//! The two conversion paths flatten transparency differently:
//!
//! | Path | Flattening |
//! |---|---|
//! | [`FormatConverter::convert_image`] | only for formats that [require it](ImageFormat::requires_alpha_removal), onto black |
//! | [`FormatConverter::convert_bytes`] (and the file/base64 variants) | always, onto the caller's background |
//!
//! The byte path encodes through a temporary file that is removed when the
//! call returns, whether it succeeded or not.

use super::backend::{CodecError, RasterCodec};
use super::color::{flatten_onto, remove_alpha_channel};
use super::format::ImageFormat;
use super::params::{Background, Quality};
use super::rust_backend::RustCodec;
use crate::data_url::{self, DataUrlError};
use image::DynamicImage;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Missing or unrecognized MIME prefix on base64 input.
    #[error("Unable to manage this kind of image file: {0}")]
    BadImageFormat(String),
    /// The codec cannot produce the requested format for this image.
    #[error("Unable to change format to {0}")]
    UnsupportedFormat(ImageFormat),
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
    #[error(transparent)]
    Codec(CodecError),
    #[error("Temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for ConvertError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Unsupported { format, .. } => ConvertError::UnsupportedFormat(format),
            CodecError::Io(e) => ConvertError::Io(e),
            other => ConvertError::Codec(other),
        }
    }
}

/// Report whether base64 text declares an `image/*` MIME type.
///
/// # Errors
/// [`ConvertError::BadImageFormat`] when the text has no `data:` prefix.
pub fn is_image(text: &str) -> Result<bool, ConvertError> {
    Ok(declared_mime_type(text)?.starts_with("image/"))
}

fn declared_mime_type(text: &str) -> Result<&str, ConvertError> {
    data_url::mime_type_from_header(text).map_err(|e| ConvertError::BadImageFormat(e.to_string()))
}

/// Converts images between formats using a [`RasterCodec`].
///
/// Holds no mutable state; share it by reference.
pub struct FormatConverter<C: RasterCodec = RustCodec> {
    codec: C,
    quality: Quality,
    temp_dir: Option<PathBuf>,
}

impl FormatConverter<RustCodec> {
    pub fn new() -> Self {
        Self::with_codec(RustCodec::new())
    }
}

impl Default for FormatConverter<RustCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RasterCodec> FormatConverter<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            quality: Quality::default(),
            temp_dir: None,
        }
    }

    /// JPEG quality used for every encode.
    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Directory for the byte path's temporary files (default: system temp).
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decode with the configured codec.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ConvertError> {
        self.codec
            .decode(bytes)
            .inspect_err(|e| log::error!("Unable to decode image: {e}"))
            .map_err(ConvertError::from)
    }

    /// Encode a decoded image, removing alpha first for JPEG and TIFF.
    pub fn convert_image(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<Vec<u8>, ConvertError> {
        let image = if format.requires_alpha_removal() {
            Cow::Owned(remove_alpha_channel(image))
        } else {
            Cow::Borrowed(image)
        };

        self.codec
            .encode(&image, format, self.quality)
            .inspect_err(|e| log::error!("Unable to encode {format}: {e}"))
            .map_err(ConvertError::from)
    }

    /// Decode `bytes`, flatten onto `background`, and re-encode as `format`.
    ///
    /// The image is always flattened to opaque RGB, whatever the target
    /// format.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        background: Background,
        format: ImageFormat,
    ) -> Result<Vec<u8>, ConvertError> {
        let decoded = self.decode(bytes)?;
        let flat = flatten_onto(&decoded, background);
        log::info!(
            "Converting {}x{} image to {format} on {background}",
            flat.width(),
            flat.height()
        );

        let temp = self
            .create_temp_file(format)
            .inspect_err(|e| log::error!("Unable to read/write to temporary disk: {e}"))?;
        self.codec
            .save(&flat, format, self.quality, temp.path())
            .inspect_err(|e| log::error!("Unable to write {format} to {}: {e}", temp.path().display()))?;

        let output = std::fs::read(temp.path())
            .inspect_err(|e| log::error!("Unable to read/write to temporary disk: {e}"))?;
        Ok(output)
    }

    /// [`convert_bytes`](Self::convert_bytes) on the contents of a file.
    pub fn convert_file(
        &self,
        path: &Path,
        background: Background,
        format: ImageFormat,
    ) -> Result<Vec<u8>, ConvertError> {
        let bytes = std::fs::read(path)
            .inspect_err(|e| log::error!("Unable to read {}: {e}", path.display()))?;
        self.convert_bytes(&bytes, background, format)
    }

    /// Convert base64 text to base64 text in another format.
    ///
    /// With `has_url_prefix` the text must start with a
    /// `data:<mime>;base64,` prefix whose MIME type is one of the five
    /// supported image types; the prefix is stripped before decoding.
    /// Without it the whole text is decoded as base64. The result is plain
    /// base64 without a prefix.
    pub fn convert_base64(
        &self,
        text: &str,
        background: Background,
        format: ImageFormat,
        has_url_prefix: bool,
    ) -> Result<String, ConvertError> {
        let payload = if has_url_prefix {
            let mime = declared_mime_type(text)?;
            if ImageFormat::from_mime_type(mime).is_none() {
                return Err(ConvertError::BadImageFormat(format!(
                    "unsupported MIME type '{mime}'"
                )));
            }
            data_url::trim_base64_header(text)
        } else {
            text
        };
        let bytes = data_url::decode_base64(payload)?;
        let converted = self.convert_bytes(&bytes, background, format)?;
        Ok(data_url::encode_base64(&converted))
    }

    /// [`convert_base64`](Self::convert_base64) on a white background.
    pub fn convert_base64_on_white(
        &self,
        text: &str,
        format: ImageFormat,
        has_url_prefix: bool,
    ) -> Result<String, ConvertError> {
        self.convert_base64(text, Background::WHITE, format, has_url_prefix)
    }

    fn create_temp_file(&self, format: ImageFormat) -> std::io::Result<NamedTempFile> {
        let suffix = format!(".{}", format.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix("temp").suffix(&suffix);
        match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}
