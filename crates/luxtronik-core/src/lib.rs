//! Update coordination for Luxtronik heat pump controllers.
//!
//! This crate sits between a [`DeviceClient`](luxtronik_device::DeviceClient)
//! and whatever presents the heat pump's values:
//!
//! - **[`Coordinator`]**: owns the device client, refreshes the cached
//!   [`Snapshot`](luxtronik_device::Snapshot) every scan interval, and
//!   serializes every read and write through one lock. Failed reads leave
//!   the previous snapshot in place.
//!
//! - **Value lookup**: `"group.field"` identifiers ([`FieldId`]) resolve
//!   against the cached snapshot. Malformed identifiers are errors, absent
//!   fields are `None`.
//!
//! - **Write path**: [`Coordinator::write`] returns a [`WriteOutcome`]
//!   instead of swallowing failures.
//!
//! - **Derived facts**: device identity ([`identity`]), cooling and solar
//!   detection ([`features`]), per-device registry metadata and titles.
//!
//! - **[`SnapshotStream`]**: subscription handle with `current()` /
//!   `latest()` / `changed()`.

pub mod command;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod features;
pub mod identity;
pub mod model;
pub mod store;
pub mod stream;
pub mod translations;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{WriteOptions, WriteOutcome};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, UpdateStatus};
pub use error::CoreError;
pub use store::SnapshotStore;
pub use stream::SnapshotStream;
pub use translations::Translations;

pub use model::{DeviceInfo, DeviceKey, FieldId, LuxMkType, LuxMode, SwitchDescription};
