use detaug_image::ImageSize;

use crate::boxes::AnnotatedImage;

/// An error type for dataset access.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DatasetError {
    /// The requested index is past the end of the dataset.
    #[error("Index {index} is out of bounds for a dataset of {len} samples")]
    IndexOutOfBounds {
        /// the requested index
        index: usize,
        /// the number of samples
        len: usize,
    },

    /// The sample could not be loaded.
    #[error("Failed to load sample {index}: {reason}")]
    Load {
        /// the requested index
        index: usize,
        /// a description of the failure
        reason: String,
    },
}

/// Selects one of the two paired streams of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// the query image and its boxes.
    Query,
    /// the support image and its boxes.
    Support,
}

/// A sample pulled from a dataset: a query and a support image with their boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetItem {
    /// the query stream.
    pub query: AnnotatedImage,
    /// the support stream.
    pub support: AnnotatedImage,
    /// the original size of the query image.
    pub info: ImageSize,
    /// the sample identifier.
    pub id: usize,
}

impl DatasetItem {
    /// Borrow one stream of the sample.
    pub fn stream(&self, stream: Stream) -> &AnnotatedImage {
        match stream {
            Stream::Query => &self.query,
            Stream::Support => &self.support,
        }
    }

    /// Take one stream of the sample.
    pub fn into_stream(self, stream: Stream) -> AnnotatedImage {
        match stream {
            Stream::Query => self.query,
            Stream::Support => self.support,
        }
    }
}

/// A source of paired detection samples.
pub trait DetectionDataset {
    /// The number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The input size the samples are prepared for. Mosaics are composed on a
    /// canvas twice this size.
    fn input_dim(&self) -> ImageSize;

    /// Change the input size, e.g. when the training size changes between
    /// epochs. Datasets with a fixed size can ignore it.
    fn set_input_dim(&mut self, _input_dim: ImageSize) {}

    /// Load the sample at `index`.
    fn pull_item(&self, index: usize) -> Result<DatasetItem, DatasetError>;
}

/// A dataset holding its samples in memory.
///
/// # Example
///
/// ```
/// use detaug_augment::{AnnotatedImage, DatasetItem, DetectionDataset, InMemoryDataset};
/// use detaug_image::Image;
///
/// let image = Image::<u8, 3>::from_size_val([8, 8].into(), 0).unwrap();
/// let sample = AnnotatedImage::new(image, vec![]);
/// let item = DatasetItem {
///     query: sample.clone(),
///     support: sample,
///     info: [8, 8].into(),
///     id: 0,
/// };
///
/// let dataset = InMemoryDataset::new(vec![item], [8, 8].into());
/// assert_eq!(dataset.len(), 1);
/// assert!(dataset.pull_item(1).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataset {
    items: Vec<DatasetItem>,
    input_dim: ImageSize,
}

impl InMemoryDataset {
    /// Create a dataset from its samples and input size.
    pub fn new(items: Vec<DatasetItem>, input_dim: ImageSize) -> Self {
        Self { items, input_dim }
    }

    /// Append a sample.
    pub fn push(&mut self, item: DatasetItem) {
        self.items.push(item);
    }

    /// The samples of the dataset.
    pub fn items(&self) -> &[DatasetItem] {
        &self.items
    }
}

impl DetectionDataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn input_dim(&self) -> ImageSize {
        self.input_dim
    }

    fn set_input_dim(&mut self, input_dim: ImageSize) {
        self.input_dim = input_dim;
    }

    fn pull_item(&self, index: usize) -> Result<DatasetItem, DatasetError> {
        self.items
            .get(index)
            .cloned()
            .ok_or(DatasetError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
    }
}
