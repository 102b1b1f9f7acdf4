// ── Core error types ──
//
// Errors surfaced by the coordinator. Callers never see raw device
// transport errors: the `From<luxtronik_device::Error>` impl folds them
// into coordinator-level variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Invalid field identifier '{identifier}': expected '<group>.<field>'")]
    InvalidIdentifier { identifier: String },

    #[error("No snapshot available yet")]
    NoData,

    // ── Update errors ────────────────────────────────────────────────
    /// A refresh failed. The previous snapshot stays authoritative.
    #[error("Update failed: {reason}")]
    UpdateFailed { reason: String },

    #[error("Cannot reach heat pump: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Heat pump did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Coordinator has been shut down")]
    Shutdown,

    // ── Write errors ─────────────────────────────────────────────────
    #[error("Write rejected by heat pump: {message}")]
    Rejected { message: String },

    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed device data: {message}")]
    Protocol { message: String },

    #[error("Translation file error: {message}")]
    Translations { message: String },
}

impl CoreError {
    /// `true` for failures the next scheduled refresh may recover from.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpdateFailed { .. } | Self::ConnectionFailed { .. } | Self::Timeout { .. }
        )
    }
}

// ── Conversion from device errors ────────────────────────────────────

impl From<luxtronik_device::Error> for CoreError {
    fn from(err: luxtronik_device::Error) -> Self {
        use luxtronik_device::Error as DeviceError;

        match err {
            DeviceError::Io(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            DeviceError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            DeviceError::Rejected { field, reason } => CoreError::Rejected {
                message: format!("{field}: {reason}"),
            },
            DeviceError::UnknownParameter(name) => CoreError::UnknownParameter { name },
            DeviceError::Protocol(message) => CoreError::Protocol { message },
            DeviceError::Serialization(e) => CoreError::Protocol {
                message: e.to_string(),
            },
        }
    }
}
