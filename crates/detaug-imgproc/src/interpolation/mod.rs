//! Sampling of pixel values at fractional coordinates, used by the warps.

pub(crate) mod bilinear;

/// Coordinate maps evaluated over a pixel grid.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
