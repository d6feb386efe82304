use detaug_image::{Image, ImageDtype, ImageError};

use super::sample::sample_inverse;
use crate::interpolation::InterpolationMode;

/// Row-major 3x3 identity.
pub fn identity3x3() -> [f32; 9] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
}

/// Row-major product `a * b`; applying the result means applying `b` first.
///
/// ```
/// use detaug_imgproc::warp::{identity3x3, mul3x3};
///
/// let shift = [1.0, 0.0, 3.0, 0.0, 1.0, -2.0, 0.0, 0.0, 1.0];
/// assert_eq!(mul3x3(&shift, &identity3x3()), shift);
/// ```
pub fn mul3x3(a: &[f32; 9], b: &[f32; 9]) -> [f32; 9] {
    std::array::from_fn(|i| {
        let (r, c) = (i / 3, i % 3);
        (0..3).map(|k| a[r * 3 + k] * b[k * 3 + c]).sum()
    })
}

/// Inverse of a homography.
///
/// # Errors
///
/// [`ImageError::CannotComputeDeterminant`] when the matrix is singular.
pub fn inverse_perspective_matrix(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let [a, b, c, d, e, f, g, h, i] = *m;

    // cofactors of the first row
    let (ca, cb, cc) = (e * i - f * h, f * g - d * i, d * h - e * g);
    let det = a * ca + b * cb + c * cc;
    if det == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let k = det.recip();
    #[rustfmt::skip]
    let inv = [
        ca * k, (c * h - b * i) * k, (b * f - c * e) * k,
        cb * k, (a * i - c * g) * k, (c * d - a * f) * k,
        cc * k, (b * g - a * h) * k, (a * e - b * d) * k,
    ];
    Ok(inv)
}

/// Map `(x, y)` through a homography, dividing by the projective coordinate.
pub fn transform_point_perspective(x: f32, y: f32, m: &[f32; 9]) -> (f32, f32) {
    let z = m[6] * x + m[7] * y + m[8];
    (
        (m[0] * x + m[1] * y + m[2]) / z,
        (m[3] * x + m[4] * y + m[5]) / z,
    )
}

/// Warp `src` into `dst` with the homography `m`, which maps source to destination.
///
/// The size of `dst` is the output size.
///
/// ```
/// use detaug_image::Image;
/// use detaug_imgproc::interpolation::InterpolationMode;
/// use detaug_imgproc::warp::warp_perspective;
///
/// let src = Image::<u8, 1>::new([3, 1].into(), vec![10, 20, 30]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val([3, 1].into(), 114).unwrap();
///
/// // move one pixel to the right
/// let m = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Nearest).unwrap();
/// assert_eq!(dst.as_slice(), &[114, 10, 20]);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 9],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let inv = inverse_perspective_matrix(m)?;
    sample_inverse(src, dst, interpolation, |x, y| {
        transform_point_perspective(x, y, &inv)
    })
}
