use detaug_image::{Image, ImageSize};
use detaug_imgproc::{interpolation::InterpolationMode, resize::resize_fast};

use crate::error::AugmentError;

/// Ratio fitting `size` inside `bounds` without changing the aspect ratio.
pub(crate) fn fit_ratio(size: ImageSize, bounds: ImageSize) -> Result<f64, AugmentError> {
    if size.width == 0 || size.height == 0 {
        return Err(AugmentError::EmptyImage);
    }
    Ok((bounds.height as f64 / size.height as f64).min(bounds.width as f64 / size.width as f64))
}

/// Size of `size` scaled by `ratio`, truncated to whole pixels.
pub(crate) fn scaled_size(size: ImageSize, ratio: f64) -> ImageSize {
    ImageSize {
        width: (size.width as f64 * ratio) as usize,
        height: (size.height as f64 * ratio) as usize,
    }
}

/// Bilinear resize of an RGB image to `size`.
pub(crate) fn resize_to(src: &Image<u8, 3>, size: ImageSize) -> Result<Image<u8, 3>, AugmentError> {
    if src.size() == size {
        return Ok(src.clone());
    }
    let mut dst = Image::from_size_val(size, 0)?;
    resize_fast(src, &mut dst, InterpolationMode::Bilinear)?;
    Ok(dst)
}
