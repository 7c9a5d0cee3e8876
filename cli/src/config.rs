use anyhow::{Context, Result};
use ashram_core::{get_default_config_file, AshramConfig};
use std::path::PathBuf;

use crate::cli::Args;

/// Loads the config file and applies command-line / environment overrides on top.
///
/// Returns the effective config and the config file path it was read from.
pub fn resolve(args: &Args) -> Result<(AshramConfig, PathBuf)> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file().context("Could not locate config file")?,
    };

    let from_file = AshramConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let overrides = AshramConfig {
        endpoint: args.endpoint.clone(),
        app_name: None,
        app_version: None,
        mailbox_dir: args.mailbox_dir.clone(),
        log_level: None,
    };

    Ok((from_file.merge(&overrides), path))
}
