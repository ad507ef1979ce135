//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ChordpadConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {:?}", path))?;
    let config: ChordpadConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`, or fall back to defaults when none is given
pub fn load_or_default(path: Option<&Path>) -> Result<ChordpadConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ChordpadConfig::default()),
    }
}
