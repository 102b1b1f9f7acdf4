// ── Write requests ──
//
// A write is a `(parameter, value)` pair applied once and discarded.
// The outcome is returned to the caller instead of being swallowed.

use serde::Serialize;

/// How a write is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Collapse repeated writes to one parameter within the debounce window.
    pub use_debounce: bool,
    /// Force a read after the write, once the write-refresh delay elapsed.
    pub refresh_after: bool,
}

impl WriteOptions {
    /// Forward immediately and refresh afterwards, as a switch toggle does.
    pub const IMMEDIATE_WITH_REFRESH: Self = Self {
        use_debounce: false,
        refresh_after: true,
    };
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            use_debounce: true,
            refresh_after: false,
        }
    }
}

/// What happened to a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The device accepted and committed the change.
    Written,
    /// The device lock was not acquired in time. Nothing was sent.
    LockTimeout,
    /// The device (or the coordinator) refused the change.
    Rejected { reason: String },
    /// A newer write to the same parameter arrived within the debounce window.
    Superseded,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}
