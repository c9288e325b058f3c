// -- submodules
mod format;
mod image_column;

pub use format::{DatasetFormat, deserialize_dataset_format};
pub use image_column::{EncodedImage, ImageEncoding};

// -- external imports
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::bbox::{Annotation, mask_to_bbox};
use crate::error::{AppError, Result};
use crate::sample::SampleRecord;

// -- structs

/// One output row: an image and every box derived from its masks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub image: EncodedImage,
    pub name: String,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_annotations(&self) -> usize {
        self.rows.iter().map(|row| row.annotations.len()).sum()
    }

    /// Write all rows to `path`, creating parent directories as needed.
    ///
    /// Rows go to a temporary file next to `path` that replaces it only once fully written, so a
    /// failed save leaves any existing dataset untouched.
    pub fn save(&self, path: &Path, format: DatasetFormat) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
        match format {
            DatasetFormat::Json => serde_json::to_writer(&mut writer, &self.rows)?,
            DatasetFormat::JsonPretty => serde_json::to_writer_pretty(&mut writer, &self.rows)?,
            DatasetFormat::JsonLines => {
                for row in &self.rows {
                    serde_json::to_writer(&mut writer, row)?;
                    writeln!(&mut writer)?;
                }
            }
        }
        let temp_file = writer.into_inner().map_err(|e| e.into_error())?;
        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn load(path: &Path, format: DatasetFormat) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let rows = match format {
            DatasetFormat::Json | DatasetFormat::JsonPretty => serde_json::from_reader(reader)?,
            DatasetFormat::JsonLines => {
                let mut rows = Vec::new();
                for line in reader.lines() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    rows.push(serde_json::from_str(&line)?);
                }
                rows
            }
        };
        Ok(Self { rows })
    }
}

/// Boxes grouped by sample name, in the order their masks were seen
#[derive(Debug, Default)]
pub struct MaskAnnotations {
    by_name: HashMap<String, Vec<Annotation>>,
    /// Masks without a single non-zero pixel
    pub empty_masks: usize,
}

impl MaskAnnotations {
    pub fn get(&self, name: &str) -> Option<&[Annotation]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    pub fn num_annotations(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }
}

/// Result of joining mask annotations onto image records
#[derive(Debug)]
pub struct JoinedDataset {
    pub dataset: Dataset,
    /// Annotations whose sample name matched no image
    pub orphan_annotations: usize,
}

// -- public API

/// Compute a box for every mask record and group the results by sample name.
///
/// All-zero masks contribute nothing.
pub fn aggregate_annotations<'a, I>(masks: I) -> MaskAnnotations
where
    I: IntoIterator<Item = &'a SampleRecord>,
{
    let mut aggregated = MaskAnnotations::default();
    for mask in masks {
        match mask_to_bbox(&mask.image) {
            Some(coordinates) => {
                tracing::debug!("Mask {:?}: {:?}", mask.path, coordinates);
                aggregated
                    .by_name
                    .entry(mask.name.clone())
                    .or_default()
                    .push(Annotation {
                        label: mask.label.clone(),
                        coordinates,
                    });
            }
            None => {
                tracing::warn!("Mask {:?} is empty, dropping it", mask.path);
                aggregated.empty_masks += 1;
            }
        }
    }
    aggregated
}

/// Left-join `annotations` onto `images` by sample name.
///
/// Images without masks get an empty annotation list. Two images sharing a name is an error.
pub fn join_annotations<'a, I>(
    images: I,
    mut annotations: MaskAnnotations,
    encoding: ImageEncoding,
) -> Result<JoinedDataset>
where
    I: IntoIterator<Item = &'a SampleRecord>,
{
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut rows = Vec::new();

    for record in images {
        match seen.entry(record.name.clone()) {
            Entry::Occupied(first) => {
                return Err(AppError::DuplicateSample {
                    name: record.name.clone(),
                    first: first.get().clone(),
                    second: record.path.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(record.path.clone());
            }
        }

        let sample_annotations = annotations
            .by_name
            .remove(&record.name)
            .unwrap_or_default();
        rows.push(DatasetRow {
            image: EncodedImage::encode(&record.image, encoding)?,
            name: record.name.clone(),
            annotations: sample_annotations,
        });
    }

    let mut orphan_annotations = 0;
    for (name, unmatched) in &annotations.by_name {
        tracing::warn!(
            "{} annotation(s) for {:?} have no matching image, dropping them",
            unmatched.len(),
            name
        );
        orphan_annotations += unmatched.len();
    }

    Ok(JoinedDataset {
        dataset: Dataset { rows },
        orphan_annotations,
    })
}

// -- tests
