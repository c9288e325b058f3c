use serde::Deserialize;
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

/// On-disk layout of the dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, VariantNames)]
pub enum DatasetFormat {
    /// A single JSON array of rows
    #[default]
    #[strum(serialize = "json")]
    Json,

    /// Same as `json`, indented
    #[strum(serialize = "json-pretty")]
    JsonPretty,

    /// One JSON row per line
    #[strum(serialize = "jsonl")]
    JsonLines,
}

/// Custom deserializer with helpful error message
pub fn deserialize_dataset_format<'de, D>(deserializer: D) -> Result<DatasetFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    DatasetFormat::from_str(&value).map_err(|_| {
        let variants = DatasetFormat::VARIANTS;
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", variants.join(", ")).as_str(),
        )
    })
}
