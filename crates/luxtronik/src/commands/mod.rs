//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod config_cmd;
pub mod features;
pub mod get;
pub mod identity;
pub mod set;
pub mod switch;

use std::io::ErrorKind;
use std::path::PathBuf;

use luxtronik_core::{Coordinator, WriteOutcome};
use luxtronik_device::MemoryDevice;
use tracing::info;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output::OutputOpts;

// ── Session ─────────────────────────────────────────────────────────

/// A coordinator running over a snapshot file.
pub struct Session {
    pub coordinator: Coordinator,
    device: MemoryDevice,
    path: PathBuf,
}

impl Session {
    /// Load the snapshot file and perform the first refresh.
    pub async fn open(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let path = global.snapshot.clone().ok_or(CliError::NoSnapshot)?;
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CliError::SnapshotNotFound {
                path: display.clone(),
            },
            _ => CliError::Io(e),
        })?;
        let device = MemoryDevice::from_json(&raw).map_err(|e| CliError::InvalidSnapshot {
            path: display,
            reason: e.to_string(),
        })?;

        let coordinator = Coordinator::new(device.clone(), cfg.to_coordinator_config()?);
        coordinator.first_refresh().await?;

        Ok(Self {
            coordinator,
            device,
            path,
        })
    }

    /// Write the device tables back to the snapshot file.
    pub fn persist(&self) -> Result<(), CliError> {
        let mut json = self.device.to_json()?;
        json.push('\n');
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    pub async fn close(self) {
        self.coordinator.shutdown().await;
    }
}

/// Turn a non-success write outcome into an error.
pub fn check_outcome(
    session: &Session,
    parameter: &str,
    outcome: &WriteOutcome,
) -> Result<(), CliError> {
    match outcome {
        WriteOutcome::Written => Ok(()),
        WriteOutcome::LockTimeout => Err(CliError::LockTimeout {
            parameter: parameter.into(),
            seconds: session.coordinator.config().lock_timeout.as_secs(),
        }),
        WriteOutcome::Rejected { reason } => Err(CliError::Rejected {
            parameter: parameter.into(),
            reason: reason.clone(),
        }),
        WriteOutcome::Superseded => Err(CliError::Internal {
            message: format!("write of {parameter} was superseded by a newer write"),
        }),
    }
}

/// Dispatch a snapshot-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, out: OutputOpts) -> Result<(), CliError> {
    match cmd {
        Command::Get(args) => get::handle(session, &args, out),
        Command::Fields(args) => get::fields(session, &args, out),
        Command::Identity => identity::handle(session, out),
        Command::Devices => identity::devices(session, out),
        Command::Features => features::handle(session, out),
        Command::Switches => switch::list(session, out),
        Command::Switch(args) => switch::handle(session, &args, out).await,
        Command::Set(args) => set::handle(session, &args, out).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
