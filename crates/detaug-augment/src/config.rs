use std::path::Path;

use detaug_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::{error::AugmentError, perspective::PerspectiveParams};

/// Configuration of the mosaic and mixup pipeline.
///
/// Missing fields take their default values when deserialized.
///
/// # Example
///
/// ```
/// use detaug_augment::MosaicConfig;
///
/// let config = MosaicConfig::from_json_str(r#"{ "mixup_prob": 0.5, "seed": 7 }"#).unwrap();
/// assert_eq!(config.mixup_prob, 0.5);
/// assert_eq!(config.degrees, 10.0);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// the training input size used by mixup and preprocessing.
    pub input_dim: ImageSize,
    /// whether the mosaic branch is taken at all.
    pub enable_mosaic: bool,
    /// probability of composing a mosaic.
    pub mosaic_prob: f32,
    /// whether mixup may be applied after the mosaic.
    pub enable_mixup: bool,
    /// probability of applying mixup.
    pub mixup_prob: f32,
    /// rotation range in degrees.
    pub degrees: f32,
    /// translation range as a fraction of the output size.
    pub translate: f32,
    /// scale range of the geometric transform.
    pub scale: (f32, f32),
    /// scale jitter range of the mixup donor.
    pub mixup_scale: (f32, f32),
    /// shear range in degrees.
    pub shear: f32,
    /// perspective coefficient range.
    pub perspective: f32,
    /// attempts at finding a mixup donor with boxes.
    pub mixup_max_attempts: usize,
    /// seed of the random generator; entropy from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            input_dim: ImageSize {
                width: 640,
                height: 640,
            },
            enable_mosaic: true,
            mosaic_prob: 1.0,
            enable_mixup: true,
            mixup_prob: 1.0,
            degrees: 10.0,
            translate: 0.1,
            scale: (0.5, 1.5),
            mixup_scale: (0.5, 1.5),
            shear: 2.0,
            perspective: 0.0,
            mixup_max_attempts: 100,
            seed: None,
        }
    }
}

impl MosaicConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, AugmentError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AugmentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The ranges of the geometric transform.
    pub fn perspective_params(&self) -> PerspectiveParams {
        PerspectiveParams {
            degrees: self.degrees,
            translate: self.translate,
            scale: self.scale,
            shear: self.shear,
            perspective: self.perspective,
        }
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), AugmentError> {
        fn invalid(msg: String) -> Result<(), AugmentError> {
            Err(AugmentError::InvalidConfig(msg))
        }

        if self.input_dim.width == 0 || self.input_dim.height == 0 {
            return invalid(format!("input_dim must be non-empty, got {}", self.input_dim));
        }

        for (name, p) in [("mosaic_prob", self.mosaic_prob), ("mixup_prob", self.mixup_prob)] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be in [0, 1], got {p}"));
            }
        }

        for (name, v) in [
            ("degrees", self.degrees),
            ("shear", self.shear),
            ("perspective", self.perspective),
        ] {
            if !v.is_finite() || v < 0.0 {
                return invalid(format!("{name} must be finite and non-negative, got {v}"));
            }
        }

        if !(0.0..=0.5).contains(&self.translate) {
            return invalid(format!(
                "translate must be in [0, 0.5], got {}",
                self.translate
            ));
        }

        for (name, (lo, hi)) in [("scale", self.scale), ("mixup_scale", self.mixup_scale)] {
            if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
                return invalid(format!(
                    "{name} must be a positive increasing range, got ({lo}, {hi})"
                ));
            }
        }

        if self.mixup_max_attempts == 0 {
            return invalid("mixup_max_attempts must be at least 1".to_string());
        }

        Ok(())
    }
}
