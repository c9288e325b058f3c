use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::source::SourceMeta;

/// Type tag carried in the second dot-separated token of a file name
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SampleKind {
    Image,
    Mask,
}

/// Name, type tag and class label parsed from a file name.
///
/// Nothing here is validated: `kind` is `None` when the second token is missing or unknown,
/// and `label` may be the whole name or an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTags {
    pub name: String,
    pub kind: Option<SampleKind>,
    pub label: String,
}

/// One loaded file together with the tags parsed from its name
#[derive(Debug, Clone)]
pub struct SampleRecord {
    pub path: PathBuf,
    pub image: DynamicImage,
    pub name: String,
    pub kind: Option<SampleKind>,
    pub label: String,
}

impl SampleRecord {
    pub fn new(image: DynamicImage, meta: SourceMeta) -> Self {
        let FileTags { name, kind, label } = classify_path(&meta.source_path);
        Self {
            path: meta.source_path,
            image,
            name,
            kind,
            label,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == Some(SampleKind::Image)
    }

    pub fn is_mask(&self) -> bool {
        self.kind == Some(SampleKind::Mask)
    }
}

/// Split the basename on `.` into (name, type) and the name on `_` into its label.
///
/// `person_12.mask.png` gives name `person_12`, kind `mask`, label `person`.
pub fn classify_path(path: &Path) -> FileTags {
    let basename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let mut parts = basename.split('.');
    let name = parts.next().unwrap_or_default().to_string();
    let kind = parts.next().and_then(|tag| SampleKind::from_str(tag).ok());
    let label = name.split('_').next().unwrap_or_default().to_string();

    FileTags { name, kind, label }
}
