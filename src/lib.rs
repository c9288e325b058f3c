mod bbox;
mod dataset;
mod error;
mod logging;
mod prepare;
mod progress_bar;
mod sample;
mod source;
mod toml_utils;

pub use bbox::{Annotation, Bbox, mask_to_bbox};
pub use dataset::{
    Dataset, DatasetFormat, DatasetRow, EncodedImage, ImageEncoding, JoinedDataset,
    MaskAnnotations, aggregate_annotations, join_annotations,
};
pub use error::{AppError, Result};
pub use logging::init_logger;
pub use progress_bar::progress_bar_style;
pub use sample::{FileTags, SampleKind, SampleRecord, classify_path};
pub use source::{Source, SourceLoader, SourceMeta};
pub use toml_utils::parse_toml;

// Core preparation function
pub use prepare::{PrepareArgs, PrepareSummary, run_preparation};
