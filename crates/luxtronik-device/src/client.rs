// Device client seam
//
// The wire protocol to the controller lives behind `DeviceClient`. The
// coordinator only ever reads whole snapshots, stages parameter changes
// and commits them. `MemoryDevice` is a faithful in-memory implementation
// used for snapshot files and tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::Error;
use crate::model::{Snapshot, Value};

/// A connection to a heat pump controller.
///
/// Implementations are not expected to be reentrant: callers serialize
/// all I/O on one client.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Read all three tables from the device.
    ///
    /// Must be cancel-safe: the coordinator drops the future when the read
    /// timeout elapses and sends nothing to the device. An implementation
    /// interrupted mid-frame has to resynchronise (or reconnect) on its
    /// next call.
    async fn read(&mut self) -> Result<Snapshot, Error>;

    /// Stage a parameter change. Nothing reaches the device until [`write`](Self::write).
    fn set_parameter(&mut self, name: &str, value: Value) -> Result<(), Error>;

    /// Commit all staged parameter changes.
    async fn write(&mut self) -> Result<(), Error>;
}

// ── MemoryDevice ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Snapshot,
    staged: Vec<(String, Value)>,
    reads: u32,
    commits: u32,
    failing_reads: u32,
    reject_writes: Option<String>,
    read_delay: Duration,
}

/// In-memory device that echoes committed writes into its parameter table.
///
/// Clones share state, so a caller can keep a handle for inspection after
/// moving the device into a coordinator.
#[derive(Debug, Clone, Default)]
pub struct MemoryDevice {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDevice {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                snapshot,
                ..MemoryState::default()
            })),
        }
    }

    /// Load a device from a JSON snapshot dump.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Serialize the device's current tables as a JSON snapshot dump.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.lock().snapshot)?)
    }

    /// The device's current tables (including committed writes).
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    /// Number of successful reads served.
    pub fn reads(&self) -> u32 {
        self.lock().reads
    }

    /// Number of successful commits.
    pub fn commits(&self) -> u32 {
        self.lock().commits
    }

    /// Make the next `n` reads fail with a connection error.
    pub fn fail_next_reads(&self, n: u32) {
        self.lock().failing_reads = n;
    }

    /// Reject every subsequent commit with the given reason.
    pub fn reject_writes(&self, reason: impl Into<String>) {
        self.lock().reject_writes = Some(reason.into());
    }

    /// Delay every read by `delay` to simulate a slow controller.
    pub fn set_read_delay(&self, delay: Duration) {
        self.lock().read_delay = delay;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DeviceClient for MemoryDevice {
    async fn read(&mut self) -> Result<Snapshot, Error> {
        let delay = self.lock().read_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "memory device: simulated read failure",
            )));
        }
        state.reads += 1;
        trace!(reads = state.reads, "memory device read");
        Ok(state.snapshot.clone())
    }

    fn set_parameter(&mut self, name: &str, value: Value) -> Result<(), Error> {
        let mut state = self.lock();
        if state.snapshot.parameters.get(name).is_none() {
            return Err(Error::UnknownParameter(name.to_owned()));
        }
        if matches!(value, Value::Float(f) if !f.is_finite()) {
            return Err(Error::Rejected {
                field: name.to_owned(),
                reason: format!("{value} is not a finite number"),
            });
        }
        state.staged.push((name.to_owned(), value));
        Ok(())
    }

    async fn write(&mut self) -> Result<(), Error> {
        let mut state = self.lock();
        let staged = std::mem::take(&mut state.staged);

        if let Some(reason) = state.reject_writes.clone() {
            let field = staged
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_default();
            return Err(Error::Rejected { field, reason });
        }

        for (name, value) in staged {
            debug!(parameter = %name, %value, "memory device commit");
            state.snapshot.parameters.set_value(&name, value);
        }
        state.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Field, Table};

    fn device() -> MemoryDevice {
        let parameters: Table = [Field::new(3, "ID_Ba_Hz_akt", "Automatic")]
            .into_iter()
            .collect();
        MemoryDevice::new(Snapshot {
            parameters,
            ..Snapshot::default()
        })
    }

    #[tokio::test]
    async fn staged_writes_apply_only_on_commit() {
        let mut dev = device();
        dev.set_parameter("ID_Ba_Hz_akt", Value::from("Off")).unwrap();

        let before = dev.read().await.unwrap();
        assert_eq!(before.parameters.get("ID_Ba_Hz_akt").unwrap().value, Value::from("Automatic"));

        dev.write().await.unwrap();
        let after = dev.read().await.unwrap();
        assert_eq!(after.parameters.get("ID_Ba_Hz_akt").unwrap().value, Value::from("Off"));
        assert_eq!(dev.commits(), 1);
        assert_eq!(dev.reads(), 2);
    }

    #[tokio::test]
    async fn unknown_parameter_is_refused() {
        let mut dev = device();
        let err = dev.set_parameter("ID_Nope", Value::Integer(1)).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "ID_Nope"));
    }

    #[tokio::test]
    async fn simulated_failures_are_consumed() {
        let mut dev = device();
        dev.fail_next_reads(1);
        let err = dev.read().await.unwrap_err();
        assert!(err.is_transient());
        assert!(dev.read().await.is_ok());
    }

    #[tokio::test]
    async fn rejected_commit_discards_staged_changes() {
        let mut dev = device();
        dev.reject_writes("locked by installer");
        dev.set_parameter("ID_Ba_Hz_akt", Value::from("Party")).unwrap();

        let err = dev.write().await.unwrap_err();
        assert!(matches!(err, Error::Rejected { ref field, .. } if field == "ID_Ba_Hz_akt"));
        assert_eq!(
            dev.snapshot().parameters.get("ID_Ba_Hz_akt").unwrap().value,
            Value::from("Automatic")
        );
    }

    #[test]
    fn json_dump_round_trips_tables() {
        let dev = device();
        let json = dev.to_json().unwrap();
        let restored = MemoryDevice::from_json(&json).unwrap();
        assert_eq!(restored.snapshot(), dev.snapshot());
    }
}
