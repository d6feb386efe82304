use num_traits::NumCast;

use crate::{Image, ImageError};

/// Write `src` converted to `U` and multiplied by `scale` into `dst`.
///
/// Float to integer conversions truncate toward zero; values the target type
/// cannot hold are an error.
///
/// ```
/// use detaug_image::{ops::cast_and_scale, Image};
///
/// let pixels = Image::<u8, 1>::new([3, 1].into(), vec![0, 4, 255]).unwrap();
/// let mut half = Image::<f32, 1>::from_size_val(pixels.size(), 0.0).unwrap();
///
/// cast_and_scale(&pixels, &mut half, 0.5).unwrap();
/// assert_eq!(half.as_slice(), &[0.0, 2.0, 127.5]);
/// ```
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] on mismatched sizes, [`ImageError::CastError`]
/// when a value does not fit `U`.
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + NumCast,
    U: Copy + NumCast + std::ops::Mul<Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    for (out, &v) in dst.as_slice_mut().iter_mut().zip(src.as_slice()) {
        let v = U::from(v)
            .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
        *out = v * scale;
    }

    Ok(())
}
