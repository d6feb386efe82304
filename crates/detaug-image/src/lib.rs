#![deny(missing_docs)]
//! Owned, interleaved image buffers shared by the detaug crates.

/// Error type of the image crates.
pub mod error;

/// The `Image` container and its size.
pub mod image;

/// Conversions between pixel types.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
