use detaug_image::ImageError;

use crate::dataset::DatasetError;

/// An error type for the augmentation crate.
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    /// Error raised by an image operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised by the wrapped dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The wrapped dataset has no samples.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A sample image has zero width or height.
    #[error("Sample image has an empty size")]
    EmptyImage,

    /// The output canvas of a geometric transform would be empty.
    #[error("Invalid output canvas of size {width}x{height}")]
    InvalidCanvas {
        /// requested canvas width
        width: i64,
        /// requested canvas height
        height: i64,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
