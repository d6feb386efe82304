//! Four-sample mosaic composition.
//!
//! Four images are letterbox-scaled to the input size and placed around a
//! random centre on a canvas twice the input size. Each image occupies one
//! quadrant and is cropped where it crosses the canvas edge.

use detaug_image::{Image, ImageSize};
use detaug_imgproc::crop::copy_region;
use rand::Rng;

use crate::{
    boxes::{AnnotatedImage, Annotation},
    error::AugmentError,
    perspective::BORDER_VALUE,
    random::uniform,
    resize::{fit_ratio, resize_to, scaled_size},
};

/// The quadrant of the mosaic canvas an image is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MosaicQuadrant {
    /// ends at the centre, extends up and left.
    TopLeft,
    /// starts at the centre column, extends up and right.
    TopRight,
    /// starts at the centre row, extends down and left.
    BottomLeft,
    /// starts at the centre, extends down and right.
    BottomRight,
}

impl MosaicQuadrant {
    /// All quadrants in placement order.
    pub const ALL: [MosaicQuadrant; 4] = [
        MosaicQuadrant::TopLeft,
        MosaicQuadrant::TopRight,
        MosaicQuadrant::BottomLeft,
        MosaicQuadrant::BottomRight,
    ];
}

/// Where a tile lands on the canvas and which part of it is copied.
///
/// Both rectangles are `[x1, y1, x2, y2]` and have the same size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicPlacement {
    /// the rectangle on the mosaic canvas.
    pub canvas: [usize; 4],
    /// the rectangle on the resized tile.
    pub source: [usize; 4],
}

impl MosaicPlacement {
    /// The size of the copied region.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.canvas[2] - self.canvas[0],
            height: self.canvas[3] - self.canvas[1],
        }
    }

    /// Offset from tile coordinates to canvas coordinates.
    pub fn pad(&self) -> (f32, f32) {
        (
            self.canvas[0] as f32 - self.source[0] as f32,
            self.canvas[1] as f32 - self.source[1] as f32,
        )
    }
}

/// Compute the canvas and tile rectangles of a quadrant.
///
/// # Arguments
///
/// * `quadrant` - The quadrant to place the tile in.
/// * `center` - The mosaic centre `(xc, yc)`. A centre past the canvas is
///   clamped to its edge, which leaves the outer quadrants empty.
/// * `tile` - The size of the resized tile.
/// * `input_dim` - The input size; the canvas is twice as large.
///
/// # Example
///
/// ```
/// use detaug_augment::mosaic::{get_mosaic_coordinate, MosaicQuadrant};
///
/// let p = get_mosaic_coordinate(
///     MosaicQuadrant::TopLeft,
///     (50, 40),
///     [80, 60].into(),
///     [100, 100].into(),
/// );
/// assert_eq!(p.canvas, [0, 0, 50, 40]);
/// assert_eq!(p.source, [30, 20, 80, 60]);
/// ```
pub fn get_mosaic_coordinate(
    quadrant: MosaicQuadrant,
    center: (usize, usize),
    tile: ImageSize,
    input_dim: ImageSize,
) -> MosaicPlacement {
    let (w, h) = (tile.width, tile.height);
    let (canvas_w, canvas_h) = (2 * input_dim.width, 2 * input_dim.height);
    let (xc, yc) = (center.0.min(canvas_w), center.1.min(canvas_h));

    match quadrant {
        MosaicQuadrant::TopLeft => {
            let (x1, y1, x2, y2) = (xc.saturating_sub(w), yc.saturating_sub(h), xc, yc);
            MosaicPlacement {
                canvas: [x1, y1, x2, y2],
                source: [w - (x2 - x1), h - (y2 - y1), w, h],
            }
        }
        MosaicQuadrant::TopRight => {
            let (x1, y1, x2, y2) = (xc, yc.saturating_sub(h), (xc + w).min(canvas_w), yc);
            MosaicPlacement {
                canvas: [x1, y1, x2, y2],
                source: [0, h - (y2 - y1), w.min(x2 - x1), h],
            }
        }
        MosaicQuadrant::BottomLeft => {
            let (x1, y1, x2, y2) = (xc.saturating_sub(w), yc, xc, (yc + h).min(canvas_h));
            MosaicPlacement {
                canvas: [x1, y1, x2, y2],
                source: [w - (x2 - x1), 0, w, (y2 - y1).min(h)],
            }
        }
        MosaicQuadrant::BottomRight => {
            let (x1, y1, x2, y2) = (xc, yc, (xc + w).min(canvas_w), (yc + h).min(canvas_h));
            MosaicPlacement {
                canvas: [x1, y1, x2, y2],
                source: [0, 0, w.min(x2 - x1), (y2 - y1).min(h)],
            }
        }
    }
}

/// Draw a mosaic centre in `[0.5, 1.5] x` the input size, `y` first.
///
/// Returns `(xc, yc)`.
pub fn mosaic_center<R: Rng>(input_dim: ImageSize, rng: &mut R) -> (usize, usize) {
    let (h, w) = (input_dim.height as f32, input_dim.width as f32);
    let yc = uniform(rng, 0.5 * h, 1.5 * h) as usize;
    let xc = uniform(rng, 0.5 * w, 1.5 * w) as usize;
    (xc, yc)
}

/// Border that shrinks the mosaic canvas back to the input size when warping.
///
/// Returns `(top/bottom, left/right)`, floored the same way for odd sizes.
pub fn mosaic_border(input_dim: ImageSize) -> (i64, i64) {
    (
        (-(input_dim.height as i64)).div_euclid(2),
        (-(input_dim.width as i64)).div_euclid(2),
    )
}

/// Compose four annotated images into a mosaic.
///
/// The canvas is `2 * input_dim` filled with the border value. Boxes are moved
/// to canvas coordinates and clipped to the canvas.
///
/// # Errors
///
/// Returns [`AugmentError::EmptyImage`] if any image has a zero size.
pub fn compose_mosaic(
    samples: [&AnnotatedImage; 4],
    input_dim: ImageSize,
    center: (usize, usize),
) -> Result<AnnotatedImage, AugmentError> {
    let canvas_size = ImageSize {
        width: 2 * input_dim.width,
        height: 2 * input_dim.height,
    };
    let mut canvas = Image::<u8, 3>::from_size_val(canvas_size, BORDER_VALUE)?;
    let mut labels = Vec::new();

    for (quadrant, sample) in MosaicQuadrant::ALL.into_iter().zip(samples) {
        let scale = fit_ratio(sample.image.size(), input_dim)?;
        let tile = resize_to(&sample.image, scaled_size(sample.image.size(), scale))?;

        let placement = get_mosaic_coordinate(quadrant, center, tile.size(), input_dim);
        copy_region(
            &tile,
            (placement.source[0], placement.source[1]),
            &mut canvas,
            (placement.canvas[0], placement.canvas[1]),
            placement.size(),
        )?;

        let (padw, padh) = placement.pad();
        labels.extend(
            sample
                .labels
                .iter()
                .map(|label| label.scaled(scale as f32, padw, padh)),
        );
    }

    let (canvas_w, canvas_h) = (canvas_size.width as f32, canvas_size.height as f32);
    let labels: Vec<Annotation> = labels
        .iter()
        .map(|label| label.clipped(canvas_w, canvas_h))
        .collect();

    Ok(AnnotatedImage::new(canvas, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn solid(width: usize, height: usize, val: u8, labels: Vec<Annotation>) -> AnnotatedImage {
        let image = Image::from_size_val([width, height].into(), val).unwrap();
        AnnotatedImage::new(image, labels)
    }

    #[test]
    fn placements_match_region_sizes() {
        let input_dim: ImageSize = [100, 80].into();
        let tile: ImageSize = [100, 60].into();
        for center in [(50, 40), (150, 120), (60, 110), (149, 41)] {
            for q in MosaicQuadrant::ALL {
                let p = get_mosaic_coordinate(q, center, tile, input_dim);
                assert_eq!(p.source[2] - p.source[0], p.canvas[2] - p.canvas[0]);
                assert_eq!(p.source[3] - p.source[1], p.canvas[3] - p.canvas[1]);
                assert!(p.canvas[2] <= 200 && p.canvas[3] <= 160);
                assert!(p.source[2] <= tile.width && p.source[3] <= tile.height);
            }
        }
    }

    #[test]
    fn placement_quadrants() {
        let input_dim: ImageSize = [100, 100].into();
        let tile: ImageSize = [80, 60].into();
        let c = (130, 90);

        let tr = get_mosaic_coordinate(MosaicQuadrant::TopRight, c, tile, input_dim);
        assert_eq!(tr.canvas, [130, 30, 200, 90]);
        assert_eq!(tr.source, [0, 0, 70, 60]);

        let bl = get_mosaic_coordinate(MosaicQuadrant::BottomLeft, c, tile, input_dim);
        assert_eq!(bl.canvas, [50, 90, 130, 150]);
        assert_eq!(bl.source, [0, 0, 80, 60]);

        let br = get_mosaic_coordinate(MosaicQuadrant::BottomRight, c, tile, input_dim);
        assert_eq!(br.canvas, [130, 90, 200, 150]);
        assert_eq!(br.source, [0, 0, 70, 60]);
        assert_eq!(br.pad(), (130.0, 90.0));
    }

    #[test]
    fn center_past_canvas_is_clamped() {
        let input_dim: ImageSize = [10, 10].into();
        let tile: ImageSize = [8, 8].into();

        let tl = get_mosaic_coordinate(MosaicQuadrant::TopLeft, (50, 50), tile, input_dim);
        assert_eq!(tl.canvas, [12, 12, 20, 20]);
        assert_eq!(tl.source, [0, 0, 8, 8]);

        for q in [
            MosaicQuadrant::TopRight,
            MosaicQuadrant::BottomLeft,
            MosaicQuadrant::BottomRight,
        ] {
            let p = get_mosaic_coordinate(q, (50, 50), tile, input_dim);
            assert!(p.canvas[2] == p.canvas[0] || p.canvas[3] == p.canvas[1]);
            assert!(p.source[2] == p.source[0] || p.source[3] == p.source[1]);
        }
    }

    #[test]
    fn border_floors_odd_sizes() {
        assert_eq!(mosaic_border([640, 480].into()), (-240, -320));
        assert_eq!(mosaic_border([5, 7].into()), (-4, -3));
    }

    #[test]
    fn center_in_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let input_dim: ImageSize = [64, 32].into();
        for _ in 0..100 {
            let (xc, yc) = mosaic_center(input_dim, &mut rng);
            assert!((32..=96).contains(&xc));
            assert!((16..=48).contains(&yc));
        }
    }

    #[test]
    fn compose_places_tiles_and_labels() -> Result<(), AugmentError> {
        let input_dim: ImageSize = [10, 10].into();
        let a = solid(10, 10, 1, vec![Annotation::new(0.0, 0.0, 10.0, 10.0, 0)]);
        let b = solid(10, 10, 2, vec![Annotation::new(2.0, 2.0, 4.0, 4.0, 1)]);
        let c = solid(10, 10, 3, vec![]);
        let d = solid(10, 10, 4, vec![Annotation::new(5.0, 5.0, 9.0, 9.0, 3)]);

        let out = compose_mosaic([&a, &b, &c, &d], input_dim, (10, 10))?;
        assert_eq!(out.image.size(), [20, 20].into());

        assert_eq!(out.image.get_pixel(0, 0, 0)?, &1);
        assert_eq!(out.image.get_pixel(19, 0, 1)?, &2);
        assert_eq!(out.image.get_pixel(0, 19, 2)?, &3);
        assert_eq!(out.image.get_pixel(19, 19, 0)?, &4);

        let boxes: Vec<_> = out.labels.iter().map(|l| (l.bbox, l.class_id)).collect();
        assert_eq!(
            boxes,
            vec![
                ([0.0, 0.0, 10.0, 10.0], 0),
                ([12.0, 2.0, 14.0, 4.0], 1),
                ([15.0, 15.0, 19.0, 19.0], 3),
            ]
        );
        Ok(())
    }

    #[test]
    fn compose_fills_uncovered_canvas() -> Result<(), AugmentError> {
        let input_dim: ImageSize = [10, 10].into();
        let s = solid(10, 10, 7, vec![]);

        // centre pushed to the bottom-right leaves the top-left margin empty
        let out = compose_mosaic([&s, &s, &s, &s], input_dim, (15, 15))?;
        assert_eq!(out.image.get_pixel(0, 0, 0)?, &BORDER_VALUE);
        assert_eq!(out.image.get_pixel(5, 5, 0)?, &7);
        Ok(())
    }

    #[test]
    fn compose_clips_labels_to_canvas() -> Result<(), AugmentError> {
        let input_dim: ImageSize = [10, 10].into();
        let s = solid(10, 10, 0, vec![Annotation::new(0.0, 0.0, 10.0, 10.0, 5)]);

        let out = compose_mosaic([&s, &s, &s, &s], input_dim, (5, 5))?;
        // top-left tile sits at (-5, -5)
        assert_eq!(out.labels[0].bbox, [0.0, 0.0, 5.0, 5.0]);
        assert!(out
            .labels
            .iter()
            .all(|l| l.bbox.iter().all(|&v| (0.0..=20.0).contains(&v))));
        Ok(())
    }

    #[test]
    fn compose_rescales_tiles() -> Result<(), AugmentError> {
        let input_dim: ImageSize = [10, 10].into();
        let big = solid(20, 10, 9, vec![Annotation::new(4.0, 2.0, 8.0, 6.0, 0)]);

        let out = compose_mosaic([&big, &big, &big, &big], input_dim, (10, 10))?;
        // 20x10 -> 10x5, bottom-right tile starts at the centre
        assert_eq!(out.labels[3].bbox, [12.0, 11.0, 14.0, 13.0]);
        Ok(())
    }

    #[test]
    fn compose_rejects_empty_image() -> Result<(), AugmentError> {
        let s = solid(4, 4, 0, vec![]);
        let empty = AnnotatedImage::new(Image::new([0, 0].into(), vec![])?, vec![]);
        let res = compose_mosaic([&s, &empty, &s, &s], [4, 4].into(), (4, 4));
        assert!(matches!(res, Err(AugmentError::EmptyImage)));
        Ok(())
    }
}
