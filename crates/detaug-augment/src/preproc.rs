use detaug_image::{ops::cast_and_scale, Image, ImageSize};
use detaug_imgproc::{crop::copy_region, flip::horizontal_flip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    boxes::AnnotatedImage,
    error::AugmentError,
    perspective::BORDER_VALUE,
    resize::{fit_ratio, resize_to, scaled_size},
};

/// The last step turning an augmented sample into a training input.
pub trait Preprocess {
    /// The prepared sample.
    type Output;

    /// Prepare `sample` for a network taking `input_dim` inputs.
    fn preprocess<R: Rng>(
        &self,
        sample: AnnotatedImage,
        input_dim: ImageSize,
        rng: &mut R,
    ) -> Result<Self::Output, AugmentError>;
}

/// Returns the sample unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Preprocess for Passthrough {
    type Output = AnnotatedImage;

    fn preprocess<R: Rng>(
        &self,
        sample: AnnotatedImage,
        _input_dim: ImageSize,
        _rng: &mut R,
    ) -> Result<Self::Output, AugmentError> {
        Ok(sample)
    }
}

/// A letterboxed `f32` image with fixed-size targets.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainTarget {
    /// the image, `input_dim` sized.
    pub image: Image<f32, 3>,
    /// `max_labels` rows of `[class, cx, cy, w, h]`, zero rows after the boxes.
    pub labels: Vec<[f32; 5]>,
}

/// Random flip, letterbox and target encoding for training.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainTransform {
    /// number of target rows produced.
    pub max_labels: usize,
    /// probability of a horizontal flip.
    pub flip_prob: f32,
}

impl Default for TrainTransform {
    fn default() -> Self {
        Self {
            max_labels: 50,
            flip_prob: 0.5,
        }
    }
}

impl Preprocess for TrainTransform {
    type Output = TrainTarget;

    fn preprocess<R: Rng>(
        &self,
        sample: AnnotatedImage,
        input_dim: ImageSize,
        rng: &mut R,
    ) -> Result<Self::Output, AugmentError> {
        let AnnotatedImage {
            mut image,
            mut labels,
        } = sample;

        if rng.random::<f32>() < self.flip_prob {
            image = horizontal_flip(&image)?;
            let width = image.width() as f32;
            labels.iter_mut().for_each(|l| *l = l.hflipped(width));
        }

        let r = fit_ratio(image.size(), input_dim)?;
        let resized = resize_to(&image, scaled_size(image.size(), r))?;
        let mut canvas = Image::<u8, 3>::from_size_val(input_dim, BORDER_VALUE)?;
        copy_region(&resized, (0, 0), &mut canvas, (0, 0), resized.size())?;

        let mut image = Image::<f32, 3>::from_size_val(input_dim, 0.0)?;
        cast_and_scale(&canvas, &mut image, 1.0)?;

        let mut targets: Vec<[f32; 5]> = labels
            .iter()
            .map(|l| l.scaled(r as f32, 0.0, 0.0))
            .filter(|l| l.width().min(l.height()) > 1.0)
            .take(self.max_labels)
            .map(|l| {
                let [x1, y1, x2, y2] = l.bbox;
                [
                    l.class_id as f32,
                    (x1 + x2) / 2.0,
                    (y1 + y2) / 2.0,
                    l.width(),
                    l.height(),
                ]
            })
            .collect();
        targets.resize(self.max_labels, [0.0; 5]);

        Ok(TrainTarget {
            image,
            labels: targets,
        })
    }
}
