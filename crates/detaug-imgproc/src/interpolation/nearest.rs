use detaug_image::{Image, ImageDtype};

/// Value of the closest pixel, clamped to the image.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let clamp = |p: f32, len: usize| (p.round().max(0.0) as usize).min(len - 1);
    let (x, y) = (clamp(u, image.cols()), clamp(v, image.rows()));

    image.as_slice()[(y * image.cols() + x) * C + c].into()
}
