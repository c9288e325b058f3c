use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

pub fn is_image_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(
            ext.as_str(),
            "jpg" | "jpeg" | "png" | "bmp" | "gif" | "webp" | "tiff" | "tif"
        )
    })
}

/// Collect image files under `dir`, sorted by file name at each level.
///
/// Any traversal error (unreadable directory, broken entry) aborts the collection.
pub fn collect_images_from_dir(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).follow_links(true).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut image_paths = vec![];
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            image_paths.push(entry.into_path());
        }
    }
    Ok(image_paths)
}
