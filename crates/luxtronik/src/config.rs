//! CLI configuration: thin wrapper around `luxtronik_config`.
//!
//! Adds `GlobalOpts`-aware resolution (`--config`, `--output`).

use std::path::PathBuf;

use clap::ValueEnum;

pub use luxtronik_config::{Config, config_path, to_toml};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The config file in effect: `--config` if given, else the platform path.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(luxtronik_config::load_config_from(&active_path(global))?)
}

/// `--output` wins over the configured default.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|reason| CliError::Validation {
        field: "output".into(),
        reason,
    })
}
