//! # imgnorm
//!
//! Image normalization: decode an image from bytes or base64 text, flatten
//! its transparency, resize it without distorting it more than allowed, and
//! re-encode it as JPEG, PNG, GIF, WebP or TIFF.
//!
//! # Pipeline
//!
//! ```text
//! bytes / base64 ─▶ decode ─▶ flatten alpha ─▶ resize (optional) ─▶ encode ─▶ bytes / base64
//! ```
//!
//! Every step is a synchronous function over one in-memory image. Inputs
//! are never mutated; steps that find nothing to do return the input
//! borrowed through a [`Cow`](std::borrow::Cow).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Dimension math, codec trait, alpha flattening, resize, format conversion |
//! | [`data_url`] | `data:<mime>;base64,` prefix parsing and base64 transport |
//! | [`config`] | `imgnorm.toml` loading, merging and validation |
//! | [`types`] | Serializable summaries (`ImageInfo`, `ConversionReport`) |
//! | [`output`] | CLI output formatting |
//!
//! # Example
//!
//! ```no_run
//! use imgnorm::imaging::{Background, FormatConverter, ImageFormat};
//!
//! let png = std::fs::read("logo.png")?;
//! let jpeg = FormatConverter::new().convert_bytes(&png, Background::WHITE, ImageFormat::Jpeg)?;
//! std::fs::write("logo.jpg", jpeg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design Decisions
//!
//! ## Aspect Ratios Are Compared As Integers
//!
//! [`imaging::resize_with_tolerance`] divides width by height with integer
//! division before measuring deformation, and only penalizes targets that
//! are narrower than the source. A 3:2 image squeezed to 1:1 therefore
//! passes a zero tolerance. Callers that need a strict check should compute
//! a ratio-preserving size with [`imaging::Dimension::scale_within`] instead.
//!
//! ## Two Flattening Policies
//!
//! Encoding a decoded buffer only removes alpha for JPEG and TIFF,
//! compositing onto black. Converting encoded bytes always
//! flattens onto the caller's background color. See [`imaging::convert`].

pub mod config;
pub mod data_url;
pub mod imaging;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
