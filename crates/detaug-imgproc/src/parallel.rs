//! Row-parallel pixel loops on top of rayon.

use rayon::prelude::*;

use detaug_image::Image;

/// Visit the channel values of `src1`, `src2` and `dst` in lockstep, one rayon task per row.
///
/// The three images are expected to share a size.
pub fn par_iter_rows_val_two<T1, const C1: usize, T2, const C2: usize, T3, const C3: usize>(
    src1: &Image<T1, C1>,
    src2: &Image<T2, C2>,
    dst: &mut Image<T3, C3>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Sync,
    T2: Sync,
    T3: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    let rows_a = src1.as_slice().par_chunks_exact(cols * C1);
    let rows_b = src2.as_slice().par_chunks_exact(cols * C2);
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C3)
        .zip(rows_a.zip(rows_b))
        .for_each(|(out, (a, b))| {
            for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
                f(x, y, o);
            }
        });
}

/// Call `f(u, v, pixel)` for every pixel of `dst`, where `(u, v)` is read from the
/// row-major coordinate maps `map_x` and `map_y`.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    map_x: &[f32],
    map_y: &[f32],
    f: impl Fn(&f32, &f32, &mut [T]) + Send + Sync,
) where
    T: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    let coords = map_x.par_chunks_exact(cols).zip(map_y.par_chunks_exact(cols));
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .zip(coords)
        .for_each(|(row, (xs, ys))| {
            for ((px, u), v) in row.chunks_exact_mut(C).zip(xs).zip(ys) {
                f(u, v, px);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use detaug_image::ImageError;

    #[test]
    fn lockstep_difference() -> Result<(), ImageError> {
        let a = Image::<u8, 2>::new([2, 2].into(), (10..18).collect())?;
        let b = Image::<u8, 2>::new([2, 2].into(), (0..8).collect())?;
        let mut out = Image::<i32, 2>::from_size_val([2, 2].into(), 0)?;

        par_iter_rows_val_two(&a, &b, &mut out, |x, y, o| *o = *x as i32 - *y as i32);
        assert!(out.as_slice().iter().all(|&d| d == 10));
        Ok(())
    }

    #[test]
    fn resample_reads_maps_row_major() -> Result<(), ImageError> {
        let mut dst = Image::<f32, 2>::from_size_val([2, 2].into(), 0.0)?;
        let map_x = [0.0, 1.0, 2.0, 3.0];
        let map_y = [4.0, 5.0, 6.0, 7.0];

        par_iter_rows_resample(&mut dst, &map_x, &map_y, |u, v, px| {
            px[0] = *u;
            px[1] = *v;
        });
        assert_eq!(
            dst.as_slice(),
            &[0.0, 4.0, 1.0, 5.0, 2.0, 6.0, 3.0, 7.0]
        );
        Ok(())
    }
}
