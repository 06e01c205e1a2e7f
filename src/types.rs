//! Serializable summaries shared by the CLI output and `--json` mode.

use crate::imaging::{CodecError, Dimension, ImageFormat, RasterCodec};
use serde::{Deserialize, Serialize};

/// What a decoder sees in an encoded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Detected container format, `None` when sniffing fails.
    pub format: Option<ImageFormat>,
    pub size: Dimension,
    /// Decoded pixel layout, e.g. `Rgba8`.
    pub color: String,
    pub has_alpha: bool,
    /// Encoded size in bytes.
    pub bytes: usize,
}

impl ImageInfo {
    pub fn inspect(codec: &impl RasterCodec, bytes: &[u8]) -> Result<Self, CodecError> {
        let image = codec.decode(bytes)?;
        Ok(Self {
            format: codec.detect(bytes),
            size: Dimension::of(&image),
            color: format!("{:?}", image.color()),
            has_alpha: image.color().has_alpha(),
            bytes: bytes.len(),
        })
    }
}

/// Outcome of one CLI conversion or resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    pub format: ImageFormat,
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Final pixel size when the command resized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Dimension>,
}
