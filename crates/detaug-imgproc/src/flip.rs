use detaug_image::{Image, ImageError};
use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};

/// Mirror an image left to right, returning a new image.
///
/// ```
/// use detaug_image::Image;
/// use detaug_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 2>::new([3, 1].into(), vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let flipped = horizontal_flip(&image).unwrap();
/// assert_eq!(flipped.as_slice(), &[5, 6, 3, 4, 1, 2]);
/// ```
pub fn horizontal_flip<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Clone + Send + Sync,
{
    let mut dst = src.clone();
    let row_len = src.cols() * C;
    if row_len == 0 {
        return Ok(dst);
    }

    // reversing the row also reverses the channels, so restore them per pixel
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .for_each(|row| {
            row.reverse();
            row.chunks_exact_mut(C).for_each(<[T]>::reverse);
        });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_gray_rows() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new([3, 2].into(), vec![
            1, 2, 3,
            4, 5, 6,
        ])?;
        let flipped = horizontal_flip(&image)?;
        assert_eq!(flipped.as_slice(), &[3, 2, 1, 6, 5, 4]);
        assert_eq!(horizontal_flip(&flipped)?.as_slice(), image.as_slice());
        Ok(())
    }

    #[test]
    fn rgb_pixels_stay_intact() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new([2, 1].into(), vec![0.1, 0.2, 0.3, 0.7, 0.8, 0.9])?;
        let flipped = horizontal_flip(&image)?;
        assert_eq!(flipped.as_slice(), &[0.7, 0.8, 0.9, 0.1, 0.2, 0.3]);
        Ok(())
    }

    #[test]
    fn empty_image() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        assert!(horizontal_flip(&image)?.as_slice().is_empty());
        Ok(())
    }
}
