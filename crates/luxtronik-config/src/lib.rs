//! Shared configuration for Luxtronik tools.
//!
//! A flat TOML file plus `LUXTRONIK_*` environment overrides, translated
//! to `luxtronik_core::CoordinatorConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use luxtronik_core::CoordinatorConfig;
use luxtronik_core::config::{DEFAULT_LANGUAGE, DEFAULT_PORT, DEFAULT_SENSOR_PREFIX};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level configuration. Every key can be overridden by an upper-case
/// `LUXTRONIK_` environment variable (`LUXTRONIK_LOCK_TIMEOUT=10`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Heat pump host name or address.
    pub host: String,
    pub port: u16,
    /// Entity-name prefix.
    pub sensor_prefix: String,
    /// Seconds between scheduled refreshes; 0 disables them.
    pub scan_interval: u64,
    /// Seconds a device read may take.
    pub read_timeout: u64,
    /// Seconds a write waits for the device lock.
    pub lock_timeout: u64,
    /// Seconds between a write and its follow-up read.
    pub write_refresh_delay: u64,
    /// Milliseconds in which repeated writes to one parameter collapse.
    pub debounce_window_ms: u64,
    pub update_immediately_after_write: bool,
    pub language: String,
    /// Directory with `texts.{lang}.json` files.
    pub translations_dir: Option<PathBuf>,
    /// Default CLI output format.
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        let core = CoordinatorConfig::default();
        Self {
            host: String::from("localhost"),
            port: DEFAULT_PORT,
            sensor_prefix: DEFAULT_SENSOR_PREFIX.into(),
            scan_interval: core.scan_interval.as_secs(),
            read_timeout: core.read_timeout.as_secs(),
            lock_timeout: core.lock_timeout.as_secs(),
            write_refresh_delay: core.write_refresh_delay.as_secs(),
            debounce_window_ms: 0,
            update_immediately_after_write: core.update_immediately_after_write,
            language: DEFAULT_LANGUAGE.into(),
            translations_dir: None,
            output: "table".into(),
        }
    }
}

impl Config {
    /// Build a `CoordinatorConfig`, rejecting values the coordinator
    /// cannot work with.
    pub fn to_coordinator_config(&self) -> Result<CoordinatorConfig, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port", "must be between 1 and 65535"));
        }
        if self.read_timeout == 0 {
            return Err(invalid("read_timeout", "must be at least 1 second"));
        }
        if self.lock_timeout == 0 {
            return Err(invalid("lock_timeout", "must be at least 1 second"));
        }
        if self.sensor_prefix.is_empty() {
            return Err(invalid("sensor_prefix", "must not be empty"));
        }

        Ok(CoordinatorConfig {
            host: self.host.trim().to_owned(),
            port: self.port,
            sensor_prefix: self.sensor_prefix.clone(),
            scan_interval: Duration::from_secs(self.scan_interval),
            read_timeout: Duration::from_secs(self.read_timeout),
            lock_timeout: Duration::from_secs(self.lock_timeout),
            write_refresh_delay: Duration::from_secs(self.write_refresh_delay),
            debounce_window: Duration::from_millis(self.debounce_window_ms),
            update_immediately_after_write: self.update_immediately_after_write,
            language: self.language.clone(),
            translations_dir: self.translations_dir.clone(),
        })
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "luxtronik", "luxtronik").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("luxtronik");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LUXTRONIK_"))
}

/// Load config from the platform path + environment. A missing file is
/// not an error.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment(path).extract()?)
}

/// Render a config as TOML.
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}
