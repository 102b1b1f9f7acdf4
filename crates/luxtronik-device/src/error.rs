use thiserror::Error;

/// Top-level error type for the `luxtronik-device` crate.
///
/// Covers every failure a device client can report: transport, timeouts,
/// rejected writes and malformed payloads. `luxtronik-core` maps these into
/// coordinator-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Socket-level failure (connection refused, reset, DNS failure, etc.)
    #[error("I/O error talking to heat pump: {0}")]
    Io(#[from] std::io::Error),

    /// The device did not answer in time.
    #[error("Device timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Writes ──────────────────────────────────────────────────────
    /// The controller refused a staged parameter change.
    #[error("Write of {field} rejected: {reason}")]
    Rejected { field: String, reason: String },

    /// Tried to stage a parameter the device does not expose.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Response could not be decoded.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Snapshot (de)serialization failed.
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a transient error the next poll may not hit.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Timeout { .. })
    }
}
