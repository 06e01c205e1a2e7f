//! Image normalization: decode, flatten, resize, re-encode.
//!
//! | Operation | Module |
//! |---|---|
//! | **Size math** | [`Dimension`]: `scale`, `scale_with_limits`, `scale_within` |
//! | **Decode / encode** | [`backend`] trait, [`rust_backend`] on the `image` crate |
//! | **Alpha flattening** | [`color`] |
//! | **Resize with deformation bound** | [`resize`] |
//! | **Format conversion** | [`convert`] |
//!
//! The module is split into:
//! - **Dimension**: Pure size arithmetic (unit testable)
//! - **Parameters / Format**: Value types describing how to encode
//! - **Backend**: [`RasterCodec`] trait + [`RustCodec`]
//! - **Operations**: color, resize and convert, combining the above

pub mod backend;
pub mod color;
pub mod convert;
mod dimension;
mod format;
mod params;
pub mod resize;
pub mod rust_backend;

pub use backend::{CodecError, RasterCodec};
pub use color::{flatten_onto, normalize_image_transparency, remove_alpha_channel};
pub use convert::{ConvertError, FormatConverter, is_image};
pub use dimension::Dimension;
pub use format::ImageFormat;
pub use params::{Background, Quality};
pub use resize::{
    DEFAULT_DEFORMATION_TOLERANCE, ResizeError, fit_bytes_within, fit_file_within, fit_within,
    resize, resize_to_width, resize_with_tolerance,
};
pub use rust_backend::RustCodec;
