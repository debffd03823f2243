//! Init command - write a commented config file

use crate::config::{CONFIG_TEMPLATE, TOML_CONFIG_NAME};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the init command
pub fn run(dir: &Path) -> Result<()> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", dir.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(TOML_CONFIG_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists, not overwriting",
            config_path.display()
        );
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!("Created {}", config_path.display());

    Ok(())
}
