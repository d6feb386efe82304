use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use detaug_image::{Image, ImageDtype};

/// How a pixel value is read at a fractional coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// weighted average of the four surrounding pixels
    #[default]
    Bilinear,
    /// value of the closest pixel
    Nearest,
}

/// Read channel `c` of `image` at the fractional position `(u, v)`.
///
/// Positions past the image edge are clamped to the border pixels.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
    interpolation: InterpolationMode,
) -> f32 {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v, c),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v, c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detaug_image::ImageError;

    #[test]
    fn bilinear_midpoint() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 100, 100, 200])?;
        let v = interpolate_pixel(&image, 0.5, 0.5, 0, InterpolationMode::Bilinear);
        approx::assert_relative_eq!(v, 100.0);
        Ok(())
    }

    #[test]
    fn nearest_rounds_and_clamps() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::new([2, 1].into(), vec![1.0, 2.0, 3.0, 4.0])?;
        assert_eq!(
            interpolate_pixel(&image, 0.6, 0.0, 1, InterpolationMode::Nearest),
            4.0
        );
        assert_eq!(
            interpolate_pixel(&image, -3.0, 5.0, 0, InterpolationMode::Nearest),
            1.0
        );
        Ok(())
    }
}
