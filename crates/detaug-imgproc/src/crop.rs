use detaug_image::{Image, ImageError, ImageSize};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Copy the `dst.size()` window of `src` whose top-left corner is `(x, y)` into `dst`.
///
/// ```
/// use detaug_image::Image;
/// use detaug_imgproc::crop::crop_image;
///
/// #[rustfmt::skip]
/// let image = Image::<u8, 1>::new([3, 3].into(), vec![
///     1, 2, 3,
///     4, 5, 6,
///     7, 8, 9,
/// ]).unwrap();
///
/// let mut window = Image::<u8, 1>::from_size_val([2, 1].into(), 0).unwrap();
/// crop_image(&image, &mut window, 1, 2).unwrap();
/// assert_eq!(window.as_slice(), &[8, 9]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let size = dst.size();
    copy_region(src, (x, y), dst, (0, 0), size)
}

fn fits<T, const C: usize>(
    image: &Image<T, C>,
    (x, y): (usize, usize),
    size: ImageSize,
) -> Result<(), ImageError> {
    let inside = x
        .checked_add(size.width)
        .zip(y.checked_add(size.height))
        .is_some_and(|(r, b)| r <= image.width() && b <= image.height());

    if inside {
        Ok(())
    } else {
        Err(ImageError::RegionOutOfBounds(
            x,
            y,
            size.width,
            size.height,
            image.width(),
            image.height(),
        ))
    }
}

/// Paste the `size` region of `src` at `src_origin` onto `dst` at `dst_origin`.
///
/// Pixels of `dst` outside the pasted region are left as they are.
///
/// # Errors
///
/// [`ImageError::RegionOutOfBounds`] when the region does not fit either image.
pub fn copy_region<T, const C: usize>(
    src: &Image<T, C>,
    src_origin: (usize, usize),
    dst: &mut Image<T, C>,
    dst_origin: (usize, usize),
    size: ImageSize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    fits(src, src_origin, size)?;
    fits(dst, dst_origin, size)?;

    let span = size.width * C;
    if span == 0 || size.height == 0 {
        return Ok(());
    }

    let src_stride = src.cols() * C;
    let dst_stride = dst.cols() * C;
    let src_start = src_origin.1 * src_stride + src_origin.0 * C;
    let dst_col = dst_origin.0 * C;

    let src_rows = src.as_slice()[src_start..].chunks(src_stride);
    let dst_rows = dst.as_slice_mut()[dst_origin.1 * dst_stride..]
        .par_chunks_mut(dst_stride)
        .take(size.height);

    // rows of the source window, collected so they can be zipped in parallel
    let src_rows: Vec<&[T]> = src_rows.take(size.height).collect();
    dst_rows.zip(src_rows).for_each(|(dst_row, src_row)| {
        dst_row[dst_col..dst_col + span].copy_from_slice(&src_row[..span]);
    });

    Ok(())
}
