use detaug_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
///
/// Coordinates past the last row or column reuse the border pixel.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());
    let data = image.as_slice();

    let u = u.max(0.0);
    let v = v.max(0.0);

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);
    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let px = |iv: usize, iu: usize| -> f32 { data[(iv * cols + iu) * C + c].into() };

    px(iv0, iu0) * (1.0 - frac_u) * (1.0 - frac_v)
        + px(iv0, iu1) * frac_u * (1.0 - frac_v)
        + px(iv1, iu0) * (1.0 - frac_u) * frac_v
        + px(iv1, iu1) * frac_u * frac_v
}

/// Bilinear kernel over a constant border.
///
/// Taps that fall outside the image read `border` instead of a pixel, so
/// positions within one pixel of the edge blend the edge with the border.
pub(crate) fn bilinear_constant_border<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
    border: f32,
) -> f32 {
    let (cols, rows) = (image.cols() as i64, image.rows() as i64);
    let data = image.as_slice();

    let (x0, y0) = (u.floor(), v.floor());
    let (fx, fy) = (u - x0, v - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let tap = |x: i64, y: i64| -> f32 {
        if (0..cols).contains(&x) && (0..rows).contains(&y) {
            data[((y * cols + x) as usize) * C + c].into()
        } else {
            border
        }
    };

    tap(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + tap(x0 + 1, y0) * fx * (1.0 - fy)
        + tap(x0, y0 + 1) * (1.0 - fx) * fy
        + tap(x0 + 1, y0 + 1) * fx * fy
}

#[cfg(test)]
mod tests {
    use super::*;
    use detaug_image::ImageError;

    #[test]
    fn constant_border_blends_both_edges() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![0, 100])?;

        // half a pixel left of the first column and right of the last one
        let left = bilinear_constant_border(&image, -0.5, 0.0, 0, 114.0);
        let right = bilinear_constant_border(&image, 1.5, 0.0, 0, 114.0);
        approx::assert_relative_eq!(left, 57.0);
        approx::assert_relative_eq!(right, 107.0);

        // interior positions never read the border
        let mid = bilinear_constant_border(&image, 0.25, 0.0, 0, 114.0);
        approx::assert_relative_eq!(mid, 25.0);
        Ok(())
    }
}
