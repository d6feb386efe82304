use detaug_image::{Image, ImageError};

use crate::parallel;

/// Blend two images: `dst = src1 * alpha + src2 * beta + gamma`, per channel value.
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] when the three images do not share a size.
pub fn add_weighted<T, const C: usize>(
    src1: &Image<T, C>,
    alpha: T,
    src2: &Image<T, C>,
    beta: T,
    gamma: T,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: num_traits::Float + Send + Sync,
{
    for other in [src2.size(), dst.size()] {
        if other != src1.size() {
            return Err(ImageError::InvalidImageSize(
                src1.width(),
                src1.height(),
                other.width,
                other.height,
            ));
        }
    }

    parallel::par_iter_rows_val_two(src1, src2, dst, |&a, &b, out| {
        *out = a.mul_add(alpha, b * beta) + gamma;
    });

    Ok(())
}
