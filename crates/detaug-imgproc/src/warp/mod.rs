//! Affine and perspective warps by inverse mapping.
//!
//! Every destination pixel is pulled from the source through the inverted
//! matrix. Destination pixels whose source position lands outside the input
//! keep their previous value, so filling the destination first (e.g. with a
//! constant gray) sets the border.
//!
//! ```
//! use detaug_imgproc::warp::{get_rotation_matrix2d, identity3x3, mul3x3};
//!
//! let rot = get_rotation_matrix2d((32.0, 32.0), 90.0, 1.0);
//! assert_eq!(rot.len(), 6);
//! assert_eq!(mul3x3(&identity3x3(), &identity3x3()), identity3x3());
//! ```

mod affine;
mod perspective;
mod sample;

pub use affine::{get_rotation_matrix2d, invert_affine_transform, warp_affine};
pub use perspective::{
    identity3x3, inverse_perspective_matrix, mul3x3, transform_point_perspective,
    warp_perspective,
};
