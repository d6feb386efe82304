use detaug_image::{ops::cast_and_scale, Image, ImageSize};
use detaug_imgproc::{
    crop::{copy_region, crop_image},
    enhance::add_weighted,
    flip::horizontal_flip,
};
use rand::Rng;

use crate::{
    boxes::{AnnotatedImage, Annotation},
    candidates::{box_candidates, CandidateThresholds},
    error::AugmentError,
    perspective::BORDER_VALUE,
    random::{randint_below, uniform},
    resize::{fit_ratio, resize_to, scaled_size},
};

/// Minimum side length of a donor box after mixup.
pub const MIXUP_WH_THR: f32 = 5.0;

/// The random choices made before a donor sample is picked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixupDraw {
    /// the scale jitter applied to the donor canvas.
    pub jit_factor: f32,
    /// whether the donor is mirrored horizontally.
    pub flip: bool,
}

impl MixupDraw {
    /// Draw the jitter in `scale` and a fair coin for the flip.
    pub fn sample<R: Rng>(scale: (f32, f32), rng: &mut R) -> Self {
        let jit_factor = uniform(rng, scale.0, scale.1);
        let flip = rng.random::<f32>() > 0.5;
        Self { jit_factor, flip }
    }
}

/// Blend a donor sample into `origin`.
///
/// The donor is letterboxed into an `input_dim` canvas, jittered, optionally
/// flipped and randomly cropped to the size of `origin`. Donor boxes that
/// survive the crop are appended to the origin labels and the images are
/// averaged. When no donor box survives `origin` is returned unchanged.
///
/// # Arguments
///
/// * `origin` - The sample being augmented.
/// * `donor` - The sample blended in; it should carry at least one box.
/// * `input_dim` - The training input size.
/// * `draw` - The jitter and flip drawn before the donor was picked.
/// * `rng` - Draws the crop offsets, `y` then `x`.
pub fn mixup<R: Rng>(
    origin: AnnotatedImage,
    donor: &AnnotatedImage,
    input_dim: ImageSize,
    draw: MixupDraw,
    rng: &mut R,
) -> Result<AnnotatedImage, AugmentError> {
    // letterbox the donor
    let mut cp_img = Image::<u8, 3>::from_size_val(input_dim, BORDER_VALUE)?;
    let mut cp_scale_ratio = fit_ratio(donor.image.size(), input_dim)?;
    let resized = resize_to(
        &donor.image,
        scaled_size(donor.image.size(), cp_scale_ratio),
    )?;
    copy_region(&resized, (0, 0), &mut cp_img, (0, 0), resized.size())?;

    // jitter
    let jit = draw.jit_factor as f64;
    let jittered_size = ImageSize {
        width: ((input_dim.width as f64 * jit) as usize).max(1),
        height: ((input_dim.height as f64 * jit) as usize).max(1),
    };
    let mut cp_img = resize_to(&cp_img, jittered_size)?;
    cp_scale_ratio *= jit;

    if draw.flip {
        cp_img = horizontal_flip(&cp_img)?;
    }

    let (cp_w, cp_h) = (cp_img.width(), cp_img.height());
    let target_size = origin.image.size();
    let (target_w, target_h) = (target_size.width, target_size.height);

    // zero pad to cover the target and crop at a random offset
    let padded_size = ImageSize {
        width: cp_w.max(target_w),
        height: cp_h.max(target_h),
    };
    let mut padded = Image::<u8, 3>::from_size_val(padded_size, 0)?;
    copy_region(&cp_img, (0, 0), &mut padded, (0, 0), cp_img.size())?;

    let y_offset = if padded_size.height > target_h {
        randint_below(rng, padded_size.height - target_h)
    } else {
        0
    };
    let x_offset = if padded_size.width > target_w {
        randint_below(rng, padded_size.width - target_w)
    } else {
        0
    };

    let mut cropped = Image::<u8, 3>::from_size_val(target_size, 0)?;
    crop_image(&padded, &mut cropped, x_offset, y_offset)?;

    // move the donor boxes through the same steps
    let thr = CandidateThresholds::with_wh_thr(MIXUP_WH_THR);
    let (cw, ch) = (cp_w as f32, cp_h as f32);
    let survivors: Vec<Annotation> = donor
        .labels
        .iter()
        .filter_map(|label| {
            let mut adjusted = label.scaled(cp_scale_ratio as f32, 0.0, 0.0).clipped(cw, ch);
            if draw.flip {
                adjusted = adjusted.hflipped(cw);
            }
            let shifted = adjusted
                .scaled(1.0, -(x_offset as f32), -(y_offset as f32))
                .clipped(target_w as f32, target_h as f32);
            box_candidates(&adjusted.bbox, &shifted.bbox, &thr).then_some(shifted)
        })
        .collect();

    log::debug!(
        "mixup jit={:.3} flip={} offset=({x_offset}, {y_offset}) kept {}/{} donor boxes",
        draw.jit_factor,
        draw.flip,
        survivors.len(),
        donor.labels.len()
    );

    if survivors.is_empty() {
        return Ok(origin);
    }

    let image = blend_half(&origin.image, &cropped)?;
    let mut labels = origin.labels;
    labels.extend(survivors);

    Ok(AnnotatedImage::new(image, labels))
}

/// `0.5 * a + 0.5 * b`, truncated back to `u8`.
fn blend_half(a: &Image<u8, 3>, b: &Image<u8, 3>) -> Result<Image<u8, 3>, AugmentError> {
    let mut a_f32 = Image::<f32, 3>::from_size_val(a.size(), 0.0)?;
    let mut b_f32 = Image::<f32, 3>::from_size_val(b.size(), 0.0)?;
    cast_and_scale(a, &mut a_f32, 1.0)?;
    cast_and_scale(b, &mut b_f32, 1.0)?;

    let mut blended = Image::<f32, 3>::from_size_val(a.size(), 0.0)?;
    add_weighted(&a_f32, 0.5, &b_f32, 0.5, 0.0, &mut blended)?;

    let mut out = Image::<u8, 3>::from_size_val(a.size(), 0)?;
    cast_and_scale(&blended, &mut out, 1)?;
    Ok(out)
}
