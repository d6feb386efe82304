#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Copying rectangular regions between images.
pub mod crop;

/// Weighted blending.
pub mod enhance;

/// Mirroring.
pub mod flip;

/// Sampling at fractional coordinates.
pub mod interpolation;

/// Row-parallel pixel loops.
pub mod parallel;

/// Resizing through `fast_image_resize`.
pub mod resize;

/// Affine and perspective warps.
pub mod warp;
