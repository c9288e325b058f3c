/// Build the object-detection dataset described by the bundled config file.
use anyhow::{Context, Result};
use std::path::PathBuf;

use mask_dataset::{init_logger, parse_toml, run_preparation};

fn main() -> Result<()> {
    let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_toml = project_root.join("assets/configs/prepare.toml");

    let args = parse_toml(&config_toml, &project_root)
        .with_context(|| format!("Failed to parse TOML config {:?}", config_toml))?;

    init_logger(args.verbose);
    tracing::debug!("{:?}", args);

    let summary = run_preparation(&args).context("Failed to prepare dataset")?;
    tracing::info!("{:?}", summary);

    Ok(())
}
