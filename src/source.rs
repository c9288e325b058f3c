// -- submodules
mod loader;
mod source_utils;

pub use loader::SourceLoader;

// -- external imports
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SourceMeta {
    /// Current file index (0-based).
    pub frame_idx: usize,
    /// Total files in the source.
    pub total_frames: usize,
    /// Path the image was decoded from.
    pub source_path: PathBuf,
}

impl SourceMeta {
    pub fn frame_name(&self) -> String {
        self.source_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// Directory of image files, optionally walked recursively
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub recursive: bool,
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source {
            path,
            recursive: true,
        }
    }
}
