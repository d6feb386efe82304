use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;

use detaug::augment::{
    AnnotatedImage, Annotation, DatasetItem, InMemoryDataset, MosaicConfig, MosaicDetection,
    TrainTransform,
};
use detaug::image::{Image, ImageSize};

#[derive(FromArgs)]
/// Compose mosaic/mixup training samples from a synthetic dataset
struct Args {
    /// path to a JSON augmentation config
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// number of samples in the synthetic dataset
    #[argh(option, short = 'n', default = "16")]
    num_samples: usize,

    /// input width
    #[argh(option, default = "640")]
    width: usize,

    /// input height
    #[argh(option, default = "640")]
    height: usize,

    /// random seed, overrides the config
    #[argh(option, short = 's')]
    seed: Option<u64>,

    /// disable the mosaic branch
    #[argh(switch)]
    no_mosaic: bool,
}

#[derive(Serialize)]
struct SampleSummary {
    id: usize,
    info: [usize; 2],
    query_boxes: usize,
    support_boxes: usize,
}

/// A flat colour image with a few random boxes painted on it.
fn synthetic_sample<R: Rng>(
    size: ImageSize,
    class_id: u32,
    rng: &mut R,
) -> Result<AnnotatedImage, Box<dyn std::error::Error>> {
    let mut image = Image::<u8, 3>::from_size_val(size, rng.random_range(0..=255))?;
    let mut labels = Vec::new();

    for _ in 0..rng.random_range(0..4) {
        let w = rng.random_range(size.width / 8..=size.width / 2);
        let h = rng.random_range(size.height / 8..=size.height / 2);
        let x = rng.random_range(0..size.width - w);
        let y = rng.random_range(0..size.height - h);
        let color: [u8; 3] = rng.random();

        for yy in y..y + h {
            for xx in x..x + w {
                for (ch, &v) in color.iter().enumerate() {
                    image.set_pixel(xx, yy, ch, v)?;
                }
            }
        }
        labels.push(Annotation::new(
            x as f32,
            y as f32,
            (x + w) as f32,
            (y + h) as f32,
            class_id,
        ));
    }

    Ok(AnnotatedImage::new(image, labels))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.width < 16 || args.height < 16 {
        return Err("input size must be at least 16x16".into());
    }

    let mut config = match &args.config {
        Some(path) => MosaicConfig::from_path(path)?,
        None => MosaicConfig::default(),
    };
    config.input_dim = ImageSize {
        width: args.width,
        height: args.height,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    // build the synthetic dataset with varied image sizes
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
    let mut dataset = InMemoryDataset::new(Vec::new(), config.input_dim);
    for id in 0..args.num_samples {
        let size = ImageSize {
            width: rng.random_range(args.width / 2..=args.width * 3 / 2),
            height: rng.random_range(args.height / 2..=args.height * 3 / 2),
        };
        let query = synthetic_sample(size, 0, &mut rng)?;
        let support = synthetic_sample(size, 1, &mut rng)?;
        dataset.push(DatasetItem {
            query,
            support,
            info: size,
            id,
        });
    }
    log::info!("synthetic dataset with {} samples", args.num_samples);

    let mut loader = MosaicDetection::new(dataset, TrainTransform::default(), config)?;
    if args.no_mosaic {
        loader.close_mosaic();
    }

    for idx in 0..loader.len() {
        let sample = loader.get_item(idx)?;
        let count = |labels: &[[f32; 5]]| labels.iter().filter(|row| row[3] > 0.0).count();
        let summary = SampleSummary {
            id: sample.id,
            info: [sample.info.width, sample.info.height],
            query_boxes: count(&sample.query.labels),
            support_boxes: count(&sample.support.labels),
        };
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
