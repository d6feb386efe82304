use detaug_image::{Image, ImageDtype, ImageError};

use crate::{
    interpolation::{
        bilinear::bilinear_constant_border, grid::meshgrid_from_fn, interpolate_pixel,
        InterpolationMode,
    },
    parallel,
};

/// Fill `dst` by sampling `src` at `inverse(x, y)` for every destination pixel.
///
/// The current content of `dst` acts as a constant border: destination pixels
/// whose source position is out of reach keep their value, and bilinear taps
/// that fall outside `src` read the destination value in their place.
pub(crate) fn sample_inverse<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
    inverse: impl Fn(f32, f32) -> (f32, f32),
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if src.width() == 0 || src.height() == 0 {
        return Ok(());
    }

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok(inverse(x as f32, y as f32))
    })?;

    let (w, h) = (src.width() as f32, src.height() as f32);
    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&u, &v, px| {
        // NaN from points at infinity fails the range checks
        match interpolation {
            InterpolationMode::Bilinear => {
                if u > -1.0 && u < w && v > -1.0 && v < h {
                    for (k, out) in px.iter_mut().enumerate() {
                        let border = (*out).into();
                        *out = T::from_f32(bilinear_constant_border(src, u, v, k, border));
                    }
                }
            }
            InterpolationMode::Nearest => {
                if (0.0..w).contains(&u.round()) && (0.0..h).contains(&v.round()) {
                    for (k, out) in px.iter_mut().enumerate() {
                        *out = T::from_f32(interpolate_pixel(src, u, v, k, interpolation));
                    }
                }
            }
        }
    });

    Ok(())
}
