// ── Runtime coordinator configuration ──
//
// Describes *where* the heat pump is and how the coordinator paces its
// I/O. Never touches disk: `luxtronik-config` (or any embedder) builds a
// `CoordinatorConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8889;
pub const DEFAULT_SENSOR_PREFIX: &str = "luxtronik";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Configuration for a [`Coordinator`](crate::Coordinator).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Controller host, used for device-info URLs.
    pub host: String,
    pub port: u16,
    /// Entity-name prefix, as in `sensor.{prefix}_outdoor_temperature`.
    pub sensor_prefix: String,
    /// Periodic refresh interval. `Duration::ZERO` disables the refresh task.
    pub scan_interval: Duration,
    /// Upper bound for a single device read, lock wait included.
    pub read_timeout: Duration,
    /// Upper bound for acquiring the device lock on the write path.
    pub lock_timeout: Duration,
    /// Pause between a committed write and the follow-up read.
    pub write_refresh_delay: Duration,
    /// Window in which repeated writes to one field collapse into the last.
    /// `Duration::ZERO` forwards every write.
    pub debounce_window: Duration,
    /// Default for [`WriteOptions::refresh_after`](crate::WriteOptions).
    pub update_immediately_after_write: bool,
    /// UI language for entity titles (`"de"`, `"en-GB"`, ...).
    pub language: String,
    /// Directory holding `texts.{lang}.json` files. `None` uses key titles.
    pub translations_dir: Option<PathBuf>,
}

impl CoordinatorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            sensor_prefix: DEFAULT_SENSOR_PREFIX.into(),
            scan_interval: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            lock_timeout: Duration::from_secs(30),
            write_refresh_delay: Duration::from_secs(3),
            debounce_window: Duration::ZERO,
            update_immediately_after_write: true,
            language: DEFAULT_LANGUAGE.into(),
            translations_dir: None,
        }
    }
}
