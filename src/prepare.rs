use indicatif::{ProgressFinish, ProgressIterator};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::dataset::{
    DatasetFormat, ImageEncoding, aggregate_annotations, deserialize_dataset_format,
    join_annotations,
};
use crate::error::{AppError, Result};
use crate::progress_bar::progress_bar_style;
use crate::sample::SampleRecord;
use crate::source::{Source, SourceLoader};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrepareArgs {
    /// Directory holding `<name>.image.*` and `<name>.mask.*` files
    pub source: PathBuf,

    /// Dataset file to write
    pub output: PathBuf,

    /// Walk sub-directories of `source`
    pub recursive: bool,

    /// Dataset file layout
    #[serde(deserialize_with = "deserialize_dataset_format")]
    pub format: DatasetFormat,

    /// Codec for the embedded image column
    pub image_encoding: ImageEncoding,

    /// Log every file as it is processed
    pub verbose: bool,
}

impl Default for PrepareArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            output: PathBuf::from("dataset.json"),
            recursive: true,
            format: DatasetFormat::default(),
            image_encoding: ImageEncoding::default(),
            verbose: false,
        }
    }
}

impl PrepareArgs {
    fn to_source(&self) -> Source {
        Source {
            path: self.source.clone(),
            recursive: self.recursive,
        }
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub files_loaded: usize,
    pub images: usize,
    pub masks: usize,
    /// Files whose name carries neither the `image` nor the `mask` tag
    pub unclassified: usize,
    pub empty_masks: usize,
    pub orphan_annotations: usize,
    pub rows_written: usize,
    pub annotations_written: usize,
}

/// Core preparation API: load, classify, extract boxes, join and save.
///
/// Any unreadable directory, undecodable image or write failure aborts the run.
pub fn run_preparation(args: &PrepareArgs) -> Result<PrepareSummary> {
    let start_time = Instant::now();

    if args.source.as_os_str().is_empty() {
        return Err(AppError::Config("`source` directory is not set".to_string()));
    }
    if !args.source.is_dir() {
        return Err(AppError::Config(format!(
            "`source` is not a directory: {:?}",
            args.source
        )));
    }

    tracing::info!("[Source]: {:?}", args.source);
    let loader = SourceLoader::new(&args.to_source())?;
    tracing::info!("Total files to load: {}", loader.len());
    tracing::info!("-----------------------------------------");

    let mut records: Vec<SampleRecord> = Vec::with_capacity(loader.len());
    for item in loader
        .progress_with_style(progress_bar_style())
        .with_message("Loading files")
        .with_finish(ProgressFinish::WithMessage("Loaded".into()))
    {
        let (image, meta) = item?;
        if args.verbose {
            tracing::debug!(
                "Loading [{}/{}]: {}",
                meta.frame_idx + 1,
                meta.total_frames,
                meta.frame_name()
            );
        }
        let record = SampleRecord::new(image, meta);
        if record.kind.is_none() {
            tracing::debug!("No image/mask tag in {:?}, ignoring", record.path);
        }
        records.push(record);
    }

    let (images, masks): (Vec<&SampleRecord>, Vec<&SampleRecord>) = records
        .iter()
        .filter(|r| r.kind.is_some())
        .partition(|r| r.is_image());
    let mut summary = PrepareSummary {
        files_loaded: records.len(),
        images: images.len(),
        masks: masks.len(),
        unclassified: records.len() - images.len() - masks.len(),
        ..Default::default()
    };
    tracing::info!(
        "Classified {} images, {} masks, {} unclassified",
        summary.images,
        summary.masks,
        summary.unclassified
    );

    let annotations = aggregate_annotations(masks.iter().copied());
    summary.empty_masks = annotations.empty_masks;

    let joined = join_annotations(images.iter().copied(), annotations, args.image_encoding)?;
    summary.orphan_annotations = joined.orphan_annotations;
    summary.rows_written = joined.dataset.len();
    summary.annotations_written = joined.dataset.num_annotations();

    joined.dataset.save(&args.output, args.format)?;
    tracing::info!(
        "Wrote {} rows with {} annotations to {:?}",
        summary.rows_written,
        summary.annotations_written,
        args.output
    );

    let duration = start_time.elapsed();
    tracing::info!("Total preparation time: {:.3?}", duration);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use image::{GrayImage, Luma, Rgb, Rgb32FImage, RgbImage};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn save_photo(path: &Path) {
        RgbImage::from_pixel(10, 8, Rgb([40, 80, 160]))
            .save(path)
            .unwrap();
    }

    fn save_mask(path: &Path, pixels: &[(u32, u32)]) {
        let mut mask = GrayImage::new(10, 8);
        for &(x, y) in pixels {
            mask.put_pixel(x, y, Luma([255]));
        }
        mask.save(path).unwrap();
    }

    #[test]
    fn test_run_preparation_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("ig02");
        let bikes = source.join("bikes");
        let people = source.join("people");
        fs::create_dir_all(&bikes).unwrap();
        fs::create_dir_all(&people).unwrap();

        save_photo(&bikes.join("bike_001.image.png"));
        save_mask(&bikes.join("bike_001.mask.0.png"), &[(1, 1), (3, 5)]);
        save_mask(&bikes.join("bike_001.mask.1.png"), &[(7, 2)]);
        save_mask(&bikes.join("bike_001.mask.2.png"), &[]);
        save_photo(&people.join("person_004.image.png"));
        save_mask(&people.join("person_009.mask.png"), &[(0, 0)]);
        save_photo(&source.join("cover.png"));
        fs::write(source.join("notes.txt"), "not an image").unwrap();

        let output = temp_dir.path().join("out/ppl.jsonl");
        let args = PrepareArgs {
            source: source.clone(),
            output: output.clone(),
            format: DatasetFormat::JsonLines,
            ..Default::default()
        };

        let summary = run_preparation(&args).unwrap();
        assert_eq!(
            summary,
            PrepareSummary {
                files_loaded: 7,
                images: 2,
                masks: 4,
                unclassified: 1,
                empty_masks: 1,
                orphan_annotations: 1,
                rows_written: 2,
                annotations_written: 2,
            }
        );

        let dataset = Dataset::load(&output, DatasetFormat::JsonLines).unwrap();
        assert_eq!(dataset.len(), 2);

        let bike = &dataset.rows[0];
        assert_eq!(bike.name, "bike_001");
        assert_eq!(bike.annotations.len(), 2);
        assert_eq!(bike.annotations[0].label, "bike");
        assert_eq!(bike.annotations[0].coordinates.x, 2.0);
        assert_eq!(bike.annotations[0].coordinates.y, 3.0);
        assert_eq!(bike.annotations[0].coordinates.width, 2);
        assert_eq!(bike.annotations[0].coordinates.height, 4);
        assert_eq!(bike.annotations[1].coordinates.x, 7.0);

        let person = &dataset.rows[1];
        assert_eq!(person.name, "person_004");
        assert!(person.annotations.is_empty());

        let decoded = person.image.decode().unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 8));
    }

    #[test]
    fn test_run_preparation_aborts_on_corrupt_image() {
        let temp_dir = TempDir::new().unwrap();
        save_photo(&temp_dir.path().join("a_1.image.png"));
        fs::write(temp_dir.path().join("a_1.mask.png"), b"garbage").unwrap();

        let output = temp_dir.path().join("out.json");
        let args = PrepareArgs {
            source: temp_dir.path().to_path_buf(),
            output: output.clone(),
            ..Default::default()
        };

        assert!(matches!(
            run_preparation(&args),
            Err(AppError::ImageLoad { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_preparation_accepts_float_tiff() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("float");
        fs::create_dir_all(&source).unwrap();
        Rgb32FImage::from_pixel(4, 4, Rgb([0.25, 0.5, 1.0]))
            .save(source.join("a_1.image.tiff"))
            .unwrap();
        save_mask(&source.join("a_1.mask.png"), &[(2, 3)]);

        let output = temp_dir.path().join("float.json");
        let args = PrepareArgs {
            source,
            output: output.clone(),
            ..Default::default()
        };
        let summary = run_preparation(&args).unwrap();
        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.annotations_written, 1);

        let dataset = Dataset::load(&output, DatasetFormat::Json).unwrap();
        let row = &dataset.rows[0];
        assert_eq!(row.image.channels, 3);
        let decoded = row.image.decode().unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
        assert_eq!(row.annotations[0].coordinates.x, 2.0);
        assert_eq!(row.annotations[0].coordinates.y, 3.0);
    }

    #[test]
    fn test_run_preparation_requires_source_dir() {
        let args = PrepareArgs::default();
        assert!(matches!(run_preparation(&args), Err(AppError::Config(_))));

        let temp_dir = TempDir::new().unwrap();
        let args = PrepareArgs {
            source: temp_dir.path().join("missing"),
            ..Default::default()
        };
        assert!(matches!(run_preparation(&args), Err(AppError::Config(_))));
    }

    #[test]
    fn test_non_recursive_skips_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        save_photo(&temp_dir.path().join("top_1.image.png"));
        save_photo(&nested.join("deep_1.image.png"));

        let args = PrepareArgs {
            source: temp_dir.path().to_path_buf(),
            output: temp_dir.path().join("out.json"),
            recursive: false,
            ..Default::default()
        };
        let summary = run_preparation(&args).unwrap();
        assert_eq!(summary.files_loaded, 1);
        assert_eq!(summary.rows_written, 1);
    }
}
