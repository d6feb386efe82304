use detaug_image::ImageSize;
use rand::{rngs::StdRng, Rng};

use crate::{
    boxes::AnnotatedImage,
    config::MosaicConfig,
    dataset::{DatasetError, DatasetItem, DetectionDataset, Stream},
    error::AugmentError,
    mixup::{mixup, MixupDraw},
    mosaic::{compose_mosaic, mosaic_border, mosaic_center},
    perspective::random_perspective,
    preproc::Preprocess,
    random::{make_rng, randint_below},
};

/// A prepared pair of query and support samples.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSample<O> {
    /// the prepared query sample.
    pub query: O,
    /// the prepared support sample.
    pub support: O,
    /// the size of the query image before preprocessing: the dataset's value
    /// in the plain branch, the mosaic canvas size (the dataset's input size,
    /// not the training `input_dim`) in the mosaic branch.
    pub info: ImageSize,
    /// the sample identifier.
    pub id: usize,
}

/// Wraps a detection dataset with mosaic and mixup augmentation.
///
/// A mosaic sample combines the requested item with three random items. The
/// query and support streams share the mosaic centre and the picked items
/// but are otherwise augmented independently.
///
/// # Example
///
/// ```
/// use detaug_augment::{
///     AnnotatedImage, Annotation, DatasetItem, InMemoryDataset, MosaicConfig, MosaicDetection,
///     Passthrough,
/// };
/// use detaug_image::Image;
///
/// let image = Image::<u8, 3>::from_size_val([32, 32].into(), 0).unwrap();
/// let sample = AnnotatedImage::new(image, vec![Annotation::new(4.0, 4.0, 28.0, 28.0, 0)]);
/// let item = DatasetItem {
///     query: sample.clone(),
///     support: sample,
///     info: [32, 32].into(),
///     id: 0,
/// };
/// let dataset = InMemoryDataset::new(vec![item], [32, 32].into());
///
/// let config = MosaicConfig {
///     input_dim: [32, 32].into(),
///     seed: Some(0),
///     ..Default::default()
/// };
/// let mut loader = MosaicDetection::new(dataset, Passthrough, config).unwrap();
///
/// let sample = loader.get_item(0).unwrap();
/// assert_eq!(sample.query.image.size(), [32, 32].into());
/// ```
pub struct MosaicDetection<D, P> {
    dataset: D,
    preproc: P,
    config: MosaicConfig,
    rng: StdRng,
}

impl<D: DetectionDataset, P: Preprocess> MosaicDetection<D, P> {
    /// Wrap a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidConfig`] if the configuration is out of range.
    pub fn new(dataset: D, preproc: P, config: MosaicConfig) -> Result<Self, AugmentError> {
        config.validate()?;
        let rng = make_rng(config.seed);
        Ok(Self {
            dataset,
            preproc,
            config,
            rng,
        })
    }

    /// The number of samples of the wrapped dataset.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Whether the wrapped dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// The wrapped dataset.
    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// The active configuration.
    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// The training input size used by mixup and preprocessing.
    pub fn input_dim(&self) -> ImageSize {
        self.config.input_dim
    }

    /// Change the training input size, e.g. for multi-scale training.
    ///
    /// The dataset picks up the new size, and with it the next mosaic canvas,
    /// on the next sample taken without mosaic.
    pub fn set_input_dim(&mut self, input_dim: ImageSize) -> Result<(), AugmentError> {
        let mut config = self.config.clone();
        config.input_dim = input_dim;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Whether [`Self::get_item`] composes mosaics.
    pub fn mosaic_enabled(&self) -> bool {
        self.config.enable_mosaic
    }

    /// Switch mosaic composition on or off.
    pub fn set_mosaic(&mut self, enable: bool) {
        self.config.enable_mosaic = enable;
    }

    /// Switch mosaic composition off, typically for the last epochs.
    pub fn close_mosaic(&mut self) {
        log::debug!("mosaic closed");
        self.set_mosaic(false);
    }

    /// Prepare the sample at `index` with the configured mosaic switch.
    pub fn get_item(&mut self, index: usize) -> Result<TrainingSample<P::Output>, AugmentError> {
        let mosaic = self.config.enable_mosaic;
        self.get_item_with(index, mosaic)
    }

    /// Prepare the sample at `index`, overriding the mosaic switch.
    pub fn get_item_with(
        &mut self,
        index: usize,
        mosaic: bool,
    ) -> Result<TrainingSample<P::Output>, AugmentError> {
        let len = self.dataset.len();
        if len == 0 {
            return Err(AugmentError::EmptyDataset);
        }
        if index >= len {
            return Err(DatasetError::IndexOutOfBounds { index, len }.into());
        }

        if mosaic && self.rng.random::<f32>() < self.config.mosaic_prob {
            self.mosaic_item(index)
        } else {
            let input_dim = self.config.input_dim;
            // the next mosaic canvas follows the current training size
            self.dataset.set_input_dim(input_dim);
            let item = self.dataset.pull_item(index)?;
            let query = self.preproc.preprocess(item.query, input_dim, &mut self.rng)?;
            let support = self.preproc.preprocess(item.support, input_dim, &mut self.rng)?;
            Ok(TrainingSample {
                query,
                support,
                info: item.info,
                id: item.id,
            })
        }
    }

    fn mosaic_item(&mut self, index: usize) -> Result<TrainingSample<P::Output>, AugmentError> {
        let len = self.dataset.len();
        let canvas_dim = self.dataset.input_dim();

        let center = mosaic_center(canvas_dim, &mut self.rng);
        let indices = [
            index,
            randint_below(&mut self.rng, len),
            randint_below(&mut self.rng, len),
            randint_below(&mut self.rng, len),
        ];
        log::debug!("mosaic index={index} center={center:?} indices={indices:?}");

        let items = indices
            .iter()
            .map(|&i| self.dataset.pull_item(i))
            .collect::<Result<Vec<DatasetItem>, _>>()?;
        let pick = |stream: Stream| [0, 1, 2, 3].map(|i| items[i].stream(stream));

        let query = compose_mosaic(pick(Stream::Query), canvas_dim, center)?;
        let support = compose_mosaic(pick(Stream::Support), canvas_dim, center)?;

        let params = self.config.perspective_params();
        let border = mosaic_border(canvas_dim);
        let (image, labels) =
            random_perspective(&query.image, &query.labels, &params, border, &mut self.rng)?;
        let query = AnnotatedImage::new(image, labels);
        let (image, labels) = random_perspective(
            &support.image,
            &support.labels,
            &params,
            border,
            &mut self.rng,
        )?;
        let support = AnnotatedImage::new(image, labels);

        let query = self.maybe_mixup(query, Stream::Query)?;
        let support = self.maybe_mixup(support, Stream::Support)?;

        let info = query.image.size();
        let input_dim = self.config.input_dim;
        let query = self.preproc.preprocess(query, input_dim, &mut self.rng)?;
        let support = self.preproc.preprocess(support, input_dim, &mut self.rng)?;

        Ok(TrainingSample {
            query,
            support,
            info,
            id: index,
        })
    }

    fn maybe_mixup(
        &mut self,
        origin: AnnotatedImage,
        stream: Stream,
    ) -> Result<AnnotatedImage, AugmentError> {
        if !self.config.enable_mixup
            || origin.labels.is_empty()
            || self.rng.random::<f32>() >= self.config.mixup_prob
        {
            return Ok(origin);
        }

        let draw = MixupDraw::sample(self.config.mixup_scale, &mut self.rng);

        let len = self.dataset.len();
        let mut donor = None;
        for _ in 0..self.config.mixup_max_attempts {
            let cp_index = randint_below(&mut self.rng, len);
            let item = self.dataset.pull_item(cp_index)?;
            if !item.stream(stream).labels.is_empty() {
                donor = Some(item.into_stream(stream));
                break;
            }
        }

        let Some(donor) = donor else {
            log::warn!(
                "no {stream:?} mixup donor with boxes after {} attempts, skipping mixup",
                self.config.mixup_max_attempts
            );
            return Ok(origin);
        };

        mixup(origin, &donor, self.config.input_dim, draw, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        boxes::Annotation,
        dataset::InMemoryDataset,
        preproc::{Passthrough, TrainTransform},
    };
    use detaug_image::Image;

    fn item(id: usize, size: ImageSize, labels: Vec<Annotation>) -> DatasetItem {
        let image = Image::from_size_val(size, (id * 10) as u8).unwrap();
        let query = AnnotatedImage::new(image.clone(), labels);
        let support = AnnotatedImage::new(image, vec![]);
        DatasetItem {
            query,
            support,
            info: size,
            id,
        }
    }

    fn dataset(n: usize) -> InMemoryDataset {
        let size: ImageSize = [32, 24].into();
        let items = (0..n)
            .map(|i| item(i, size, vec![Annotation::new(4.0, 4.0, 28.0, 20.0, i as u32)]))
            .collect();
        InMemoryDataset::new(items, size)
    }

    fn config() -> MosaicConfig {
        MosaicConfig {
            input_dim: [32, 24].into(),
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn empty_dataset() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(InMemoryDataset::default(), Passthrough, config())?;
        assert!(loader.is_empty());
        assert!(matches!(loader.get_item(0), Err(AugmentError::EmptyDataset)));
        Ok(())
    }

    #[test]
    fn index_out_of_bounds() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(dataset(2), Passthrough, config())?;
        assert!(matches!(
            loader.get_item(2),
            Err(AugmentError::Dataset(DatasetError::IndexOutOfBounds {
                index: 2,
                len: 2
            }))
        ));
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MosaicConfig {
            mosaic_prob: 2.0,
            ..config()
        };
        assert!(matches!(
            MosaicDetection::new(dataset(1), Passthrough, config),
            Err(AugmentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn plain_branch_returns_dataset_item() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(dataset(3), Passthrough, config())?;
        let sample = loader.get_item_with(1, false)?;
        let expected = loader.dataset().pull_item(1)?;

        assert_eq!(sample.query, expected.query);
        assert_eq!(sample.support, expected.support);
        assert_eq!(sample.info, expected.info);
        assert_eq!(sample.id, 1);
        Ok(())
    }

    #[test]
    fn mosaic_branch_output_size() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(dataset(4), Passthrough, config())?;
        for idx in 0..4 {
            let sample = loader.get_item(idx)?;
            assert_eq!(sample.query.image.size(), [32, 24].into());
            assert_eq!(sample.support.image.size(), [32, 24].into());
            assert_eq!(sample.info, [32, 24].into());
            assert_eq!(sample.id, idx);
            // support items carry no boxes and nothing is mixed into them
            assert!(sample.support.labels.is_empty());
            for label in &sample.query.labels {
                assert!(label.bbox[0] >= 0.0 && label.bbox[2] <= 32.0);
                assert!(label.bbox[1] >= 0.0 && label.bbox[3] <= 24.0);
            }
        }
        Ok(())
    }

    #[test]
    fn close_mosaic_switches_branch() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(dataset(2), Passthrough, config())?;
        assert!(loader.mosaic_enabled());
        loader.close_mosaic();
        assert!(!loader.mosaic_enabled());

        let sample = loader.get_item(0)?;
        assert_eq!(sample.query, loader.dataset().pull_item(0)?.query);
        Ok(())
    }

    #[test]
    fn seeded_loaders_agree() -> Result<(), AugmentError> {
        let mut a = MosaicDetection::new(dataset(5), Passthrough, config())?;
        let mut b = MosaicDetection::new(dataset(5), Passthrough, config())?;
        for idx in [0, 3, 4] {
            assert_eq!(a.get_item(idx)?, b.get_item(idx)?);
        }
        Ok(())
    }

    #[test]
    fn mixup_without_donors_is_skipped() -> Result<(), AugmentError> {
        // only the query streams carry boxes, the support stream never finds a donor
        let config = MosaicConfig {
            mixup_max_attempts: 3,
            ..config()
        };
        let mut loader = MosaicDetection::new(dataset(2), Passthrough, config)?;
        let origin = AnnotatedImage::new(
            Image::from_size_val([32, 24].into(), 1)?,
            vec![Annotation::new(0.0, 0.0, 10.0, 10.0, 0)],
        );
        let out = loader.maybe_mixup(origin.clone(), Stream::Support)?;
        assert_eq!(out, origin);
        Ok(())
    }

    #[test]
    fn set_input_dim_drives_preproc() -> Result<(), AugmentError> {
        let mut loader = MosaicDetection::new(dataset(3), TrainTransform::default(), config())?;
        loader.set_input_dim([64, 48].into())?;
        assert_eq!(loader.input_dim(), [64, 48].into());

        let sample = loader.get_item(0)?;
        assert_eq!(sample.query.image.size(), [64, 48].into());
        assert_eq!(sample.query.labels.len(), 50);

        assert!(loader.set_input_dim([0, 48].into()).is_err());
        assert_eq!(loader.input_dim(), [64, 48].into());
        Ok(())
    }

    #[test]
    fn plain_pull_forwards_input_dim_to_mosaic_canvas() -> Result<(), AugmentError> {
        let config = MosaicConfig {
            enable_mixup: false,
            ..config()
        };
        let mut loader = MosaicDetection::new(dataset(4), Passthrough, config)?;

        // the mosaic canvas is still the dataset's size
        loader.set_input_dim([64, 48].into())?;
        let sample = loader.get_item_with(0, true)?;
        assert_eq!(sample.info, [32, 24].into());
        assert_eq!(loader.dataset().input_dim(), [32, 24].into());

        loader.get_item_with(0, false)?;
        assert_eq!(loader.dataset().input_dim(), [64, 48].into());

        let sample = loader.get_item_with(1, true)?;
        assert_eq!(sample.info, [64, 48].into());
        assert_eq!(sample.query.image.size(), [64, 48].into());
        Ok(())
    }
}
