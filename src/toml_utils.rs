// -- imports
use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::prepare::PrepareArgs;

// -- config

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    prepare: PrepareArgs,
}

impl TomlConfig {
    /// Parse TOML config file with explicit project root for path resolution.
    ///
    /// # Arguments
    ///
    /// * `toml_path` - Path to the TOML config file
    /// * `project_root` - Base directory for resolving relative paths
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    pub fn from_toml(toml_path: &Path, project_root: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().is_none_or(|ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve_paths(project_root);

        Ok(config)
    }

    /// Resolve relative paths against project root
    fn resolve_paths(&mut self, project_root: &Path) {
        let prepare = &mut self.prepare;

        // An unset source stays unset so the run reports it
        if !prepare.source.as_os_str().is_empty() && !prepare.source.is_absolute() {
            prepare.source = project_root.join(&prepare.source);
        }

        if !prepare.output.is_absolute() {
            prepare.output = project_root.join(&prepare.output);
        }
    }
}

impl From<TomlConfig> for PrepareArgs {
    fn from(config: TomlConfig) -> Self {
        config.prepare
    }
}

// -- public API

/// Parse TOML config file and return PrepareArgs.
///
/// # Errors
///
/// Returns `AppError` if TOML parsing or path resolution fails.
pub fn parse_toml(toml_path: &Path, project_root: &Path) -> Result<PrepareArgs> {
    TomlConfig::from_toml(toml_path, project_root).map(Into::into)
}

// -- tests
