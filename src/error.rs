use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum AppError {
    #[error("TOML config file error: {0}")]
    TomlConfig(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image loading failed for {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image codec error: {0}")]
    ImageCodec(#[from] image::ImageError),

    #[error("Embedded image data is not valid base64: {0}")]
    ImageData(#[from] base64::DecodeError),

    #[error("Dataset serialization error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("Sample name {name:?} is shared by more than one image: {first:?} and {second:?}")]
    DuplicateSample {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type with default AppError
pub type Result<T, E = AppError> = std::result::Result<T, E>;
