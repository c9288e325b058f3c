use image::DynamicImage;
use std::iter::ExactSizeIterator;
use std::path::PathBuf;

use crate::error::{AppError, Result};

use super::source_utils::collect_images_from_dir;
use super::{Source, SourceMeta};

#[derive(Debug)]
pub struct SourceLoader {
    current_idx: usize,
    frames: Vec<PathBuf>,
    len: usize,
}

impl SourceLoader {
    pub fn new(source: &Source) -> Result<Self> {
        let frames = collect_images_from_dir(&source.path, source.recursive)?;
        let len = frames.len();

        Ok(Self {
            current_idx: 0,
            frames,
            len,
        })
    }

    pub const fn len(&self) -> usize {
        self.len
    }
}

impl Iterator for SourceLoader {
    type Item = Result<(DynamicImage, SourceMeta)>;

    /// Decode the next file. A decode failure is yielded as an error rather than skipped.
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_idx >= self.len {
            return None;
        }

        let path = self.frames[self.current_idx].clone();
        let meta = SourceMeta {
            frame_idx: self.current_idx,
            total_frames: self.len,
            source_path: path.clone(),
        };
        self.current_idx += 1;

        let item = image::open(&path)
            .map(|image| (image, meta))
            .map_err(|source| AppError::ImageLoad { path, source });
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.current_idx;
        (remaining, Some(remaining))
    }
}

/// Implement ExactSizeIterator (to use indicatif's ProgressIterator)
impl ExactSizeIterator for SourceLoader {}
