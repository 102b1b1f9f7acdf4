//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use luxtronik_config::ConfigError;
use luxtronik_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Snapshot file ────────────────────────────────────────────────
    #[error("No snapshot file given")]
    #[diagnostic(
        code(luxtronik::no_snapshot),
        help("Pass --snapshot <file.json> or set LUXTRONIK_SNAPSHOT.")
    )]
    NoSnapshot,

    #[error("Snapshot file {path} not found")]
    #[diagnostic(code(luxtronik::snapshot_not_found))]
    SnapshotNotFound { path: String },

    #[error("Snapshot file {path} is not a valid controller dump")]
    #[diagnostic(
        code(luxtronik::invalid_snapshot),
        help(
            "Expected a JSON object with `parameters`, `calculations` and\n\
             `visibilities` lists of {{ index, name, value }} entries.\n\
             {reason}"
        )
    )]
    InvalidSnapshot { path: String, reason: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not read the heat pump")]
    #[diagnostic(code(luxtronik::update_failed), help("{reason}"))]
    UpdateFailed { reason: String },

    #[error("Heat pump did not answer within {seconds}s")]
    #[diagnostic(
        code(luxtronik::timeout),
        help("Increase read_timeout in the config file or check the controller.")
    )]
    Timeout { seconds: u64 },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Invalid identifier '{identifier}'")]
    #[diagnostic(
        code(luxtronik::invalid_identifier),
        help(
            "Identifiers are `<group>.<field>` with group one of parameters,\n\
             calculations or visibilities, e.g. parameters.ID_Ba_Hz_akt"
        )
    )]
    InvalidIdentifier { identifier: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(luxtronik::not_found),
        help("Run: luxtronik {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Writes ───────────────────────────────────────────────────────
    #[error("Write of {parameter} rejected: {reason}")]
    #[diagnostic(code(luxtronik::rejected))]
    Rejected { parameter: String, reason: String },

    #[error("Write of {parameter} dropped: device busy for {seconds}s")]
    #[diagnostic(
        code(luxtronik::lock_timeout),
        help("Another read or write held the device. Retry, or raise lock_timeout.")
    )]
    LockTimeout { parameter: String, seconds: u64 },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(luxtronik::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(luxtronik::config))]
    Config(Box<figment::Error>),

    #[error("{message}")]
    #[diagnostic(code(luxtronik::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(luxtronik::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(luxtronik::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpdateFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } | Self::LockTimeout { .. } => exit_code::TIMEOUT,
            Self::SnapshotNotFound { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NoSnapshot
            | Self::InvalidIdentifier { .. }
            | Self::Validation { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::Rejected { .. } => exit_code::PERMISSION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidIdentifier { identifier } => {
                CliError::InvalidIdentifier { identifier }
            }

            CoreError::UpdateFailed { reason } | CoreError::ConnectionFailed { reason } => {
                CliError::UpdateFailed { reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::UnknownParameter { name } => CliError::NotFound {
                resource_type: "parameter".into(),
                identifier: name,
                list_command: "fields parameters".into(),
            },

            CoreError::Rejected { message } => CliError::Rejected {
                parameter: "parameter".into(),
                reason: message,
            },

            other @ (CoreError::NoData
            | CoreError::Shutdown
            | CoreError::Protocol { .. }
            | CoreError::Translations { .. }) => CliError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<luxtronik_device::Error> for CliError {
    fn from(err: luxtronik_device::Error) -> Self {
        CoreError::from(err).into()
    }
}
