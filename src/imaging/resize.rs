//! Resizing with a bound on aspect-ratio deformation.
//!
//! Three entry points:
//!
//! - [`resize_with_tolerance`]: exact target size, rejected with
//!   [`ResizeError::BadDimension`] when it would squash the image more than
//!   the tolerance allows.
//! - [`resize_to_width`]: shrink to a maximum width, keeping the ratio.
//! - [`fit_within`]: shrink into a bounding box, keeping the ratio.
//!
//! Calls that find nothing to do hand back the source borrowed (no copy).

use super::backend::{CodecError, RasterCodec};
use super::dimension::Dimension;
use image::DynamicImage;
use image::imageops::FilterType;
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

/// Tolerance used by [`resize`]; large enough to accept any distortion.
pub const DEFAULT_DEFORMATION_TOLERANCE: f64 = 100.0;

/// Resampling filter for every resize. Not configurable.
const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Invalid size {size}: {reason}")]
    InvalidArgument {
        size: Dimension,
        reason: &'static str,
    },
    #[error(
        "Resizing {original} to {target} deforms the aspect ratio beyond tolerance {tolerance}"
    )]
    BadDimension {
        original: Dimension,
        target: Dimension,
        tolerance: f64,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Resize to `new_size` with the default (permissive) tolerance.
pub fn resize(image: &DynamicImage, new_size: Dimension) -> Result<Cow<'_, DynamicImage>, ResizeError> {
    resize_with_tolerance(image, new_size, DEFAULT_DEFORMATION_TOLERANCE)
}

/// Resize to exactly `new_size`.
///
/// Ratios are compared as truncated integers (`width / height`), and only a
/// target *narrower* than the source is penalized: the call fails when
/// `(ratio_original - ratio_target) / ratio_original > deformation_tolerance`.
///
/// # Errors
/// - [`ResizeError::InvalidArgument`] for a negative or zero target side, or
///   an empty source.
/// - [`ResizeError::BadDimension`] when the deformation exceeds the tolerance.
pub fn resize_with_tolerance(
    image: &DynamicImage,
    new_size: Dimension,
    deformation_tolerance: f64,
) -> Result<Cow<'_, DynamicImage>, ResizeError> {
    if new_size.is_negative() {
        return Err(ResizeError::InvalidArgument {
            size: new_size,
            reason: "width and height must not be negative",
        });
    }
    if new_size.matches(image) {
        log::debug!("Already in right size ({new_size})");
        return Ok(Cow::Borrowed(image));
    }
    if new_size.width == 0 || new_size.height == 0 {
        return Err(ResizeError::InvalidArgument {
            size: new_size,
            reason: "cannot resample to an empty image",
        });
    }

    let original = Dimension::of(image);
    if original.width == 0 || original.height == 0 {
        return Err(ResizeError::InvalidArgument {
            size: original,
            reason: "cannot resample an empty image",
        });
    }

    let ratio_original = f64::from(original.width / original.height);
    let ratio_target = f64::from(new_size.width / new_size.height);
    // 0/0 and x/0 compare false, so portrait sources (ratio 0) always pass
    if (ratio_original - ratio_target) / ratio_original > deformation_tolerance {
        return Err(ResizeError::BadDimension {
            original,
            target: new_size,
            tolerance: deformation_tolerance,
        });
    }

    log::debug!("Resampling {original} -> {new_size}");
    Ok(Cow::Owned(resample(image, new_size)))
}

/// Shrink to at most `max_width`, keeping the aspect ratio.
///
/// Images already narrow enough come back borrowed. The new height is
/// `round(height * max_width / width)`; the deformation check runs with
/// tolerance 1 and therefore never rejects.
pub fn resize_to_width(image: &DynamicImage, max_width: i32) -> Result<Cow<'_, DynamicImage>, ResizeError> {
    let original = Dimension::of(image);
    if original.width <= max_width {
        return Ok(Cow::Borrowed(image));
    }

    let new_height =
        (f64::from(original.height) * (f64::from(max_width) / f64::from(original.width))).round() as i32;
    resize_with_tolerance(image, Dimension::new(max_width, new_height), 1.0)
}

/// Scale into a `max_width` x `max_height` box (non-positive = unbounded),
/// keeping the source pixel type. No deformation check.
///
/// Always returns a fresh buffer, even when the size is unchanged.
///
/// # Errors
/// [`ResizeError::InvalidArgument`] when the box collapses a side to zero
/// pixels (e.g. a 1000x1 strip into a 10x10 box).
pub fn fit_within(image: &DynamicImage, max_width: i32, max_height: i32) -> Result<DynamicImage, ResizeError> {
    let mut size = Dimension::of(image);
    size.scale_within(max_width, max_height);

    if size.width <= 0 || size.height <= 0 {
        return Err(ResizeError::InvalidArgument {
            size,
            reason: "bounding box collapses the image",
        });
    }
    Ok(resample(image, size))
}

/// Decode `bytes` and [`fit_within`].
pub fn fit_bytes_within(
    codec: &impl RasterCodec,
    bytes: &[u8],
    max_width: i32,
    max_height: i32,
) -> Result<DynamicImage, ResizeError> {
    let image = codec
        .decode(bytes)
        .inspect_err(|e| log::error!("Unable to decode image: {e}"))?;
    fit_within(&image, max_width, max_height)
}

/// Read and decode a file, then [`fit_within`].
pub fn fit_file_within(
    codec: &impl RasterCodec,
    path: &Path,
    max_width: i32,
    max_height: i32,
) -> Result<DynamicImage, ResizeError> {
    let bytes = std::fs::read(path)
        .inspect_err(|e| log::error!("Unable to read {}: {e}", path.display()))
        .map_err(CodecError::Io)?;
    fit_bytes_within(codec, &bytes, max_width, max_height)
}

fn resample(image: &DynamicImage, size: Dimension) -> DynamicImage {
    // Callers guarantee both sides are positive
    image.resize_exact(size.width as u32, size.height as u32, RESAMPLE_FILTER)
}
