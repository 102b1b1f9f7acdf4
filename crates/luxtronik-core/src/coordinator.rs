// ── Coordinator ──
//
// Owns the device client, keeps the latest snapshot, and routes every
// device read and write through a single lock. Scheduled refreshes are
// skipped while a write is in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use luxtronik_device::{DeviceClient, Field, Group, Snapshot, Value};
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::command::{WriteOptions, WriteOutcome};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::{DeviceInfo, DeviceKey, FieldId, SwitchDescription};
use crate::store::SnapshotStore;
use crate::stream::SnapshotStream;
use crate::translations::Translations;
use crate::{features, identity};

const SUGGESTED_AREA: &str = "Utility room";

// ── Update status ────────────────────────────────────────────────

/// Outcome of the most recent refresh, observable via [`Coordinator::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// No refresh attempted yet.
    Pending,
    Ok { at: DateTime<Utc> },
    /// The last refresh failed; the cached snapshot is stale.
    Failed { reason: String, at: DateTime<Utc> },
    Shutdown,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Polling coordinator for one heat pump.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Call
/// [`first_refresh()`](Self::first_refresh) to load the initial snapshot
/// and [`start()`](Self::start) to begin periodic refreshes.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: CoordinatorConfig,
    store: SnapshotStore,
    status: watch::Sender<UpdateStatus>,
    device: Mutex<Option<Box<dyn DeviceClient>>>,
    pending_writes: AtomicUsize,
    debounce: StdMutex<HashMap<String, u64>>,
    translations: Translations,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator around `device`. Performs no I/O.
    ///
    /// Translations are loaded from `config.translations_dir` when set; a
    /// missing or malformed file falls back to key titles.
    pub fn new(device: impl DeviceClient + 'static, config: CoordinatorConfig) -> Self {
        let translations = match &config.translations_dir {
            Some(dir) => Translations::load(dir, &config.language).unwrap_or_else(|e| {
                warn!(error = %e, "translations unavailable, using key titles");
                Translations::empty(&config.language)
            }),
            None => Translations::empty(&config.language),
        };
        Self::with_translations(device, config, translations)
    }

    pub fn with_translations(
        device: impl DeviceClient + 'static,
        config: CoordinatorConfig,
        translations: Translations,
    ) -> Self {
        let (status, _) = watch::channel(UpdateStatus::Pending);
        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                store: SnapshotStore::new(),
                status,
                device: Mutex::new(Some(Box::new(device))),
                pending_writes: AtomicUsize::new(0),
                debounce: StdMutex::new(HashMap::new()),
                translations,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the initial snapshot. Fails if the device cannot be read.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        self.read_device().await.map(|_| ())
    }

    /// Spawn the periodic refresh task. A zero scan interval disables it.
    pub async fn start(&self) {
        let interval = self.inner.config.scan_interval;
        if interval.is_zero() {
            debug!("scan interval is zero, periodic refresh disabled");
            return;
        }

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(refresh_task(
            self.clone(),
            interval,
            self.inner.cancel.clone(),
        )));
        info!(interval_secs = interval.as_secs(), "periodic refresh started");
    }

    /// Stop background tasks and release the device client.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        *self.inner.device.lock().await = None;
        self.inner.store.clear();
        self.inner.status.send_replace(UpdateStatus::Shutdown);
        info!("coordinator shut down");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Scheduled refresh. While a write is in flight the device is left
    /// alone and the cached snapshot is returned.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        if self.is_write_pending() {
            debug!("write in flight, skipping device read");
            return self.inner.store.current().ok_or(CoreError::NoData);
        }
        self.read_device().await
    }

    /// Fire-and-forget refresh for callers that only need fresher data.
    pub async fn request_refresh(&self) {
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "requested refresh failed");
        }
    }

    /// One bounded device read. On failure the cached snapshot is kept
    /// and the status turns `Failed`.
    async fn read_device(&self) -> Result<Arc<Snapshot>, CoreError> {
        let timeout = self.inner.config.read_timeout;
        let read = async {
            let mut device = self.inner.device.lock().await;
            let client = device.as_mut().ok_or(CoreError::Shutdown)?;
            client.read().await.map_err(CoreError::from)
        };
        let result = tokio::time::timeout(timeout, read)
            .await
            .unwrap_or_else(|_| {
                Err(CoreError::Timeout {
                    timeout_secs: timeout.as_secs(),
                })
            });

        match result {
            Ok(snapshot) => {
                debug!(
                    parameters = snapshot.parameters.len(),
                    calculations = snapshot.calculations.len(),
                    visibilities = snapshot.visibilities.len(),
                    "snapshot refreshed"
                );
                let snapshot = self.inner.store.replace(snapshot);
                self.inner
                    .status
                    .send_replace(UpdateStatus::Ok { at: Utc::now() });
                Ok(snapshot)
            }
            Err(CoreError::Shutdown) => Err(CoreError::Shutdown),
            Err(e) => {
                warn!(error = %e, "luxtronik update failed");
                let reason = e.to_string();
                self.inner.status.send_replace(UpdateStatus::Failed {
                    reason: reason.clone(),
                    at: Utc::now(),
                });
                Err(CoreError::UpdateFailed { reason })
            }
        }
    }

    // ── Status and subscriptions ─────────────────────────────────

    pub fn status(&self) -> UpdateStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<UpdateStatus> {
        self.inner.status.subscribe()
    }

    pub fn last_update_success(&self) -> bool {
        matches!(*self.inner.status.borrow(), UpdateStatus::Ok { .. })
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.store.last_refresh()
    }

    /// Age of the cached snapshot, `None` before the first successful read.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.inner.store.data_age()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.current()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub fn translations(&self) -> &Translations {
        &self.inner.translations
    }

    // ── Value lookup ─────────────────────────────────────────────

    /// Resolve a `"group.field"` identifier against the cached snapshot.
    ///
    /// Malformed identifiers fail with [`CoreError::InvalidIdentifier`];
    /// a field the device does not expose is `Ok(None)`.
    pub fn get_field(&self, id: &str) -> Result<Option<Field>, CoreError> {
        let id: FieldId = id.parse()?;
        Ok(self.inner.store.field(&id))
    }

    pub fn get_value(&self, id: &str) -> Result<Option<Value>, CoreError> {
        Ok(self.get_field(id)?.map(|field| field.value))
    }

    /// `true` when the cached value of `id` equals `on_state`, comparing
    /// numbers by value (`1` matches `true`).
    pub fn is_on(&self, id: &str, on_state: &Value) -> Result<bool, CoreError> {
        Ok(self
            .get_value(id)?
            .is_some_and(|value| value.loosely_eq(on_state)))
    }

    /// Current state of a built-in switch, `None` if the field is absent.
    pub fn switch_state(&self, switch: &SwitchDescription) -> Option<bool> {
        let value = self.inner.store.field(&switch.field)?.value;
        Some(value.loosely_eq(&switch.on_state) != switch.inverted)
    }

    // ── Identity ─────────────────────────────────────────────────

    fn derive<T>(&self, default: T, f: impl FnOnce(&Snapshot) -> T) -> T {
        self.inner.store.current().map_or(default, |s| f(s.as_ref()))
    }

    pub fn serial_number(&self) -> String {
        self.derive(String::new(), identity::serial_number)
    }

    pub fn model(&self) -> Option<String> {
        self.derive(None, identity::model)
    }

    pub fn manufacturer(&self) -> String {
        self.derive(String::new(), identity::manufacturer)
    }

    pub fn firmware_version(&self) -> Option<String> {
        self.derive(None, identity::firmware_version)
    }

    pub fn has_heating(&self) -> bool {
        true
    }

    pub fn has_domestic_water(&self) -> bool {
        true
    }

    pub fn has_cooling(&self) -> bool {
        self.derive(false, features::cooling_present)
    }

    // ── Feature detection ────────────────────────────────────────

    pub fn cooling_zones(&self) -> Vec<&'static str> {
        self.derive(Vec::new(), features::cooling_zones)
    }

    pub fn cooling_target_temperature_field(&self) -> Option<FieldId> {
        self.derive(None, features::cooling_target_temperature_field)
    }

    pub fn solar_present(&self) -> bool {
        self.derive(false, features::solar_present)
    }

    // ── Presentation ─────────────────────────────────────────────

    /// Registry metadata for `key`, built from the current snapshot.
    pub fn device_info(&self, key: DeviceKey) -> DeviceInfo {
        let serial = self.serial_number();
        let model = self.model();
        let manufacturer = self.manufacturer();
        let title = self.inner.translations.title(key.as_ref());

        DeviceInfo {
            key,
            identifier: format!(
                "{manufacturer}_{}_{serial}_{key}",
                model.as_deref().unwrap_or_default()
            )
            .to_lowercase(),
            name: format!("{title} S/N {serial}"),
            manufacturer,
            model,
            sw_version: self.firmware_version(),
            configuration_url: format!("http://{}/", self.inner.config.host),
            suggested_area: SUGGESTED_AREA.to_owned(),
        }
    }

    pub fn device_infos(&self) -> Vec<DeviceInfo> {
        DeviceKey::iter().map(|key| self.device_info(key)).collect()
    }

    /// `"{platform}.{prefix}_{key}"`, e.g. `switch.luxtronik_heating`.
    pub fn entity_id(&self, platform: &str, key: &str) -> String {
        format!("{platform}.{}_{key}", self.inner.config.sensor_prefix)
    }

    // ── Write path ───────────────────────────────────────────────

    /// Options honoring `update_immediately_after_write`.
    pub fn default_write_options(&self) -> WriteOptions {
        WriteOptions {
            refresh_after: self.inner.config.update_immediately_after_write,
            ..WriteOptions::default()
        }
    }

    pub fn is_write_pending(&self) -> bool {
        self.inner.pending_writes.load(Ordering::Acquire) > 0
    }

    /// Write one parameter.
    ///
    /// `parameter` is a bare parameter name or a `parameters.` identifier.
    /// Scheduled refreshes are suppressed until this returns. When
    /// `refresh_after` is set a read follows the write whatever its
    /// outcome, unless a newer write superseded it.
    pub async fn write(
        &self,
        parameter: &str,
        value: impl Into<Value>,
        options: WriteOptions,
    ) -> WriteOutcome {
        let value = value.into();
        let _pending = PendingWrite::enter(&self.inner.pending_writes);

        let name = match parameter_name(parameter) {
            Ok(name) => name,
            Err(reason) => {
                warn!(parameter, %reason, "refusing write");
                return WriteOutcome::Rejected { reason };
            }
        };

        if options.use_debounce && !self.debounce(name).await {
            debug!(parameter = name, %value, "write superseded within debounce window");
            return WriteOutcome::Superseded;
        }

        let outcome = self.write_locked(name, value, options.refresh_after).await;

        if options.refresh_after {
            tokio::time::sleep(self.inner.config.write_refresh_delay).await;
            if let Err(e) = self.read_device().await {
                debug!(error = %e, "refresh after write failed");
            }
        }
        outcome
    }

    /// Write and always refresh afterwards, as a switch toggle does.
    pub async fn write_and_refresh(
        &self,
        parameter: &str,
        value: impl Into<Value>,
    ) -> WriteOutcome {
        self.write(parameter, value, WriteOptions::IMMEDIATE_WITH_REFRESH)
            .await
    }

    /// Turn a built-in switch on or off.
    pub async fn set_switch(&self, switch: &SwitchDescription, on: bool) -> WriteOutcome {
        let value = switch.state_for(on).clone();
        self.write_and_refresh(switch.field.field(), value).await
    }

    async fn write_locked(&self, name: &str, value: Value, refresh_after: bool) -> WriteOutcome {
        let lock_timeout = self.inner.config.lock_timeout;
        let Ok(mut device) = tokio::time::timeout(lock_timeout, self.inner.device.lock()).await
        else {
            warn!(
                parameter = name,
                %value,
                timeout_secs = lock_timeout.as_secs(),
                "couldn't write luxtronik parameter because of lock timeout"
            );
            return WriteOutcome::LockTimeout;
        };
        let Some(client) = device.as_mut() else {
            return WriteOutcome::Rejected {
                reason: CoreError::Shutdown.to_string(),
            };
        };

        info!(parameter = name, %value, refresh_after, "luxtronik write");
        let result = match client.set_parameter(name, value) {
            Ok(()) => client.write().await,
            Err(e) => Err(e),
        };
        drop(device);

        match result {
            Ok(()) => {
                info!(parameter = name, "luxtronik write finished");
                WriteOutcome::Written
            }
            Err(e) => {
                let e = CoreError::from(e);
                error!(parameter = name, error = %e, "luxtronik write failed");
                WriteOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Wait out the debounce window. Returns `false` if a newer write to
    /// the same parameter arrived meanwhile.
    async fn debounce(&self, name: &str) -> bool {
        let window = self.inner.config.debounce_window;
        if window.is_zero() {
            return true;
        }

        let generation = {
            let mut latest = self
                .inner
                .debounce
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let slot = latest.entry(name.to_owned()).or_insert(0);
            *slot = slot.wrapping_add(1);
            *slot
        };
        tokio::time::sleep(window).await;

        let latest = self
            .inner
            .debounce
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        latest.get(name) == Some(&generation)
    }
}

/// Strip an optional `parameters.` group; other groups are read-only.
fn parameter_name(parameter: &str) -> Result<&str, String> {
    if !parameter.contains('.') {
        return if parameter.is_empty() {
            Err("empty parameter name".into())
        } else {
            Ok(parameter)
        };
    }
    let id: FieldId = parameter.parse().map_err(|e: CoreError| e.to_string())?;
    if id.group() != Group::Parameters {
        return Err(format!("{} are read-only", id.group()));
    }
    let (_, name) = parameter.split_once('.').unwrap_or_default();
    Ok(name)
}

/// Marks a write as in flight for as long as it lives.
struct PendingWrite<'a>(&'a AtomicUsize);

impl<'a> PendingWrite<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    debug!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parameter_names() {
        assert_eq!(parameter_name("ID_Ba_Hz_akt"), Ok("ID_Ba_Hz_akt"));
        assert_eq!(parameter_name("parameters.ID_Ba_Hz_akt"), Ok("ID_Ba_Hz_akt"));
        assert!(parameter_name("calculations.ID_WEB_SoftStand").is_err());
        assert!(parameter_name("parameters.").is_err());
        assert!(parameter_name("").is_err());
    }

    #[test]
    fn pending_write_guard_counts() {
        let counter = AtomicUsize::new(0);
        {
            let _a = PendingWrite::enter(&counter);
            let _b = PendingWrite::enter(&counter);
            assert_eq!(counter.load(Ordering::Acquire), 2);
        }
        assert_eq!(counter.load(Ordering::Acquire), 0);
    }
}
