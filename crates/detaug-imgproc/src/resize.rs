use detaug_image::{Image, ImageError};
use fast_image_resize as fr;

use crate::interpolation::InterpolationMode;

/// Resize an RGB `u8` image to the size of `dst` with [fast_image_resize].
///
/// An empty `dst` is left untouched.
///
/// ```
/// use detaug_image::Image;
/// use detaug_imgproc::interpolation::InterpolationMode;
/// use detaug_imgproc::resize::resize_fast;
///
/// let src = Image::<u8, 3>::from_size_val([40, 30].into(), 114).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val([20, 15].into(), 0).unwrap();
///
/// resize_fast(&src, &mut dst, InterpolationMode::Nearest).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 114));
/// ```
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] when resizing an empty source into a
/// non-empty destination, [`ImageError::ResizeError`] when the backend fails.
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let (dw, dh) = (dst.width(), dst.height());
    if dw == 0 || dh == 0 {
        return Ok(());
    }
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dw,
            dh,
        ));
    }

    let backend = |e: &dyn std::fmt::Display| ImageError::ResizeError(e.to_string());

    let src_view = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| backend(&e))?;
    let mut dst_view = fr::images::Image::from_slice_u8(
        dw as u32,
        dh as u32,
        dst.as_slice_mut(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| backend(&e))?;

    let alg = match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
    };
    let options = fr::ResizeOptions::new().resize_alg(alg);

    fr::Resizer::new()
        .resize(&src_view, &mut dst_view, &options)
        .map_err(|e| backend(&e))
}
