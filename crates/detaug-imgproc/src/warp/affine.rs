use detaug_image::{Image, ImageDtype, ImageError};

use super::sample::sample_inverse;
use crate::interpolation::InterpolationMode;

/// Inverts a 2x3 affine matrix `[a, b, tx, c, d, ty]`.
///
/// A singular matrix yields the zero matrix, as OpenCV's `invertAffineTransform` does.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let [a, b, tx, c, d, ty] = *m;
    let det = a * d - b * c;
    let k = if det != 0.0 { det.recip() } else { 0.0 };

    let (ia, ib, ic, id) = (d * k, -b * k, -c * k, a * k);
    [ia, ib, -(ia * tx + ib * ty), ic, id, -(ic * tx + id * ty)]
}

/// Rotation by `angle` degrees around `center` with an isotropic `scale`.
///
/// Returns the 2x3 matrix in OpenCV's `getRotationMatrix2D` layout:
///
/// ```text
/// |  s*cos  s*sin  (1 - s*cos)*cx - s*sin*cy |
/// | -s*sin  s*cos  s*sin*cx + (1 - s*cos)*cy |
/// ```
///
/// Positive angles turn counter-clockwise on screen, the y axis pointing down.
///
/// # Example
///
/// ```
/// use detaug_imgproc::warp::get_rotation_matrix2d;
///
/// let m = get_rotation_matrix2d((0.0, 0.0), 0.0, 2.0);
/// assert_eq!(m, [2.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let (sin, cos) = angle.to_radians().sin_cos();
    let (alpha, beta) = (scale * cos, scale * sin);
    let (cx, cy) = center;

    [
        alpha,
        beta,
        (1.0 - alpha) * cx - beta * cy,
        -beta,
        alpha,
        beta * cx + (1.0 - alpha) * cy,
    ]
}

/// Warps `src` into `dst` with the 2x3 matrix `m` mapping source to destination pixels.
///
/// Destination pixels mapped from outside the source are left as they are,
/// so filling `dst` beforehand sets a constant border.
///
/// # Example
///
/// ```
/// use detaug_image::Image;
/// use detaug_imgproc::interpolation::InterpolationMode;
/// use detaug_imgproc::warp::warp_affine;
///
/// let src = Image::<u8, 3>::from_size_val([2, 2].into(), 7).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val([3, 2].into(), 114).unwrap();
///
/// // one pixel to the right
/// warp_affine(&src, &mut dst, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0], InterpolationMode::Nearest)
///     .unwrap();
///
/// assert_eq!(dst.get_pixel(0, 0, 0).unwrap(), &114);
/// assert_eq!(dst.get_pixel(2, 1, 2).unwrap(), &7);
/// ```
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let [a, b, tx, c, d, ty] = invert_affine_transform(m);
    sample_inverse(src, dst, interpolation, |x, y| {
        (a * x + b * y + tx, c * x + d * y + ty)
    })
}
