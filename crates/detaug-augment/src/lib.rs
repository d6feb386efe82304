#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// bounding box annotations and annotated images.
pub mod boxes;

/// box survival filter applied after geometric transforms.
pub mod candidates;

/// augmentation configuration.
pub mod config;

/// dataset seam and an in-memory implementation.
pub mod dataset;

/// the mosaic/mixup dataset wrapper.
pub mod detection;

/// error types for the augmentation crate.
pub mod error;

/// mixup blending of a donor sample.
pub mod mixup;

/// four-sample mosaic composition.
pub mod mosaic;

/// random geometric transform of an image and its boxes.
pub mod perspective;

/// preprocessing seam and the default training transform.
pub mod preproc;

mod random;
mod resize;

pub use crate::boxes::{AnnotatedImage, Annotation};
pub use crate::candidates::{box_candidates, CandidateThresholds};
pub use crate::config::MosaicConfig;
pub use crate::dataset::{DatasetError, DatasetItem, DetectionDataset, InMemoryDataset, Stream};
pub use crate::detection::{MosaicDetection, TrainingSample};
pub use crate::error::AugmentError;
pub use crate::preproc::{Passthrough, Preprocess, TrainTarget, TrainTransform};
