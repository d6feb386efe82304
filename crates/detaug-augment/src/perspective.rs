use detaug_image::{Image, ImageSize};
use detaug_imgproc::{
    interpolation::InterpolationMode,
    warp::{
        get_rotation_matrix2d, identity3x3, mul3x3, transform_point_perspective, warp_affine,
        warp_perspective,
    },
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    boxes::Annotation,
    candidates::{box_candidates, CandidateThresholds},
    error::AugmentError,
    random::uniform,
};

/// Value of the pixels not covered by the warped image.
pub const BORDER_VALUE: u8 = 114;

/// Ranges of the random geometric transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveParams {
    /// rotation range in degrees, sampled in `[-degrees, degrees]`.
    pub degrees: f32,
    /// translation as a fraction of the output size, sampled in `[0.5 - t, 0.5 + t]`.
    pub translate: f32,
    /// isotropic scale range.
    pub scale: (f32, f32),
    /// shear range in degrees, sampled in `[-shear, shear]` per axis.
    pub shear: f32,
    /// perspective coefficient range, sampled in `[-p, p]` per axis.
    pub perspective: f32,
}

impl Default for PerspectiveParams {
    fn default() -> Self {
        Self {
            degrees: 10.0,
            translate: 0.1,
            scale: (0.1, 2.0),
            shear: 10.0,
            perspective: 0.0,
        }
    }
}

/// A sampled geometric transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomTransform {
    /// the composed row-major 3x3 matrix mapping source to output pixels.
    pub matrix: [f32; 9],
    /// the sampled isotropic scale.
    pub scale: f32,
    /// the output canvas size.
    pub output_size: ImageSize,
    /// whether the matrix carries a perspective row.
    pub perspective: bool,
}

impl RandomTransform {
    /// Sample a transform for an image of `input_size` warped with `border` pixels
    /// added on each side, `(top/bottom, left/right)`.
    ///
    /// Values are drawn in the order perspective (when enabled), angle, scale,
    /// shear x, shear y, translate x, translate y.
    pub fn sample<R: Rng>(
        params: &PerspectiveParams,
        input_size: ImageSize,
        border: (i64, i64),
        rng: &mut R,
    ) -> Result<Self, AugmentError> {
        let height = input_size.height as i64 + 2 * border.0;
        let width = input_size.width as i64 + 2 * border.1;
        if height <= 0 || width <= 0 {
            return Err(AugmentError::InvalidCanvas { width, height });
        }
        let output_size = ImageSize {
            width: width as usize,
            height: height as usize,
        };

        // centre
        let mut c = identity3x3();
        c[2] = -(input_size.width as f32) / 2.0;
        c[5] = -(input_size.height as f32) / 2.0;

        let mut p = identity3x3();
        if params.perspective != 0.0 {
            p[6] = uniform(rng, -params.perspective, params.perspective);
            p[7] = uniform(rng, -params.perspective, params.perspective);
        }

        // rotation and scale
        let a = uniform(rng, -params.degrees, params.degrees);
        let s = uniform(rng, params.scale.0, params.scale.1);
        let rot = get_rotation_matrix2d((0.0, 0.0), a, s);
        let mut r = identity3x3();
        r[..6].copy_from_slice(&rot);

        // shear
        let mut sh = identity3x3();
        sh[1] = uniform(rng, -params.shear, params.shear).to_radians().tan();
        sh[3] = uniform(rng, -params.shear, params.shear).to_radians().tan();

        // translation
        let mut t = identity3x3();
        t[2] = uniform(rng, 0.5 - params.translate, 0.5 + params.translate) * width as f32;
        t[5] = uniform(rng, 0.5 - params.translate, 0.5 + params.translate) * height as f32;

        let matrix = mul3x3(&t, &mul3x3(&sh, &mul3x3(&r, &mul3x3(&p, &c))));

        log::trace!("random transform angle={a} scale={s} matrix={matrix:?}");

        Ok(Self {
            matrix,
            scale: s,
            output_size,
            perspective: params.perspective != 0.0,
        })
    }

    /// Whether the transform leaves an image of `input_size` unchanged.
    pub fn is_identity(&self, input_size: ImageSize) -> bool {
        self.output_size == input_size && self.matrix == identity3x3()
    }

    /// Map a point through the transform.
    pub fn apply_point(&self, x: f32, y: f32) -> (f32, f32) {
        if self.perspective {
            transform_point_perspective(x, y, &self.matrix)
        } else {
            let m = &self.matrix;
            (m[0] * x + m[1] * y + m[2], m[3] * x + m[4] * y + m[5])
        }
    }

    /// Warp an image into a canvas of the output size filled with [`BORDER_VALUE`].
    pub fn warp_image(&self, src: &Image<u8, 3>) -> Result<Image<u8, 3>, AugmentError> {
        if self.is_identity(src.size()) {
            return Ok(src.clone());
        }

        let mut dst = Image::from_size_val(self.output_size, BORDER_VALUE)?;
        if self.perspective {
            warp_perspective(src, &mut dst, &self.matrix, InterpolationMode::Bilinear)?;
        } else {
            let mut affine = [0.0; 6];
            affine.copy_from_slice(&self.matrix[..6]);
            warp_affine(src, &mut dst, &affine, InterpolationMode::Bilinear)?;
        }
        Ok(dst)
    }

    /// Transform boxes, clip them to the output canvas and keep the candidates.
    pub fn warp_boxes(&self, targets: &[Annotation], thr: &CandidateThresholds) -> Vec<Annotation> {
        let (width, height) = (
            self.output_size.width as f32,
            self.output_size.height as f32,
        );

        targets
            .iter()
            .filter_map(|target| {
                let [x1, y1, x2, y2] = target.bbox;
                let corners = [(x1, y1), (x2, y2), (x1, y2), (x2, y1)]
                    .map(|(x, y)| self.apply_point(x, y));

                let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
                let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
                for (x, y) in corners {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }

                let warped = Annotation::new(min_x, min_y, max_x, max_y, target.class_id)
                    .clipped(width, height);
                let before = target.scaled(self.scale, 0.0, 0.0);

                box_candidates(&before.bbox, &warped.bbox, thr).then_some(warped)
            })
            .collect()
    }
}

/// Apply a random rotation, scale, shear, translation and perspective to an
/// image and its boxes.
///
/// # Arguments
///
/// * `img` - The input image.
/// * `targets` - The boxes of the input image.
/// * `params` - The ranges of the random transform.
/// * `border` - Pixels added on each side of the output, `(top/bottom, left/right)`.
///   Negative values shrink the output.
/// * `rng` - The random number generator.
///
/// # Returns
///
/// The warped image and the boxes that survive the transform.
///
/// # Example
///
/// ```
/// use detaug_augment::perspective::{random_perspective, PerspectiveParams};
/// use detaug_augment::Annotation;
/// use detaug_image::Image;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let img = Image::<u8, 3>::from_size_val([64, 64].into(), 0).unwrap();
/// let targets = vec![Annotation::new(8.0, 8.0, 40.0, 40.0, 0)];
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let (out, labels) =
///     random_perspective(&img, &targets, &PerspectiveParams::default(), (-16, -16), &mut rng)
///         .unwrap();
///
/// assert_eq!(out.width(), 32);
/// assert_eq!(out.height(), 32);
/// assert!(labels.len() <= 1);
/// ```
pub fn random_perspective<R: Rng>(
    img: &Image<u8, 3>,
    targets: &[Annotation],
    params: &PerspectiveParams,
    border: (i64, i64),
    rng: &mut R,
) -> Result<(Image<u8, 3>, Vec<Annotation>), AugmentError> {
    let transform = RandomTransform::sample(params, img.size(), border, rng)?;
    let warped = transform.warp_image(img)?;
    let labels = transform.warp_boxes(targets, &CandidateThresholds::default());
    log::debug!(
        "random perspective kept {}/{} boxes",
        labels.len(),
        targets.len()
    );
    Ok((warped, labels))
}
