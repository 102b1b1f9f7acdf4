//! Identity and device registry handlers.

use luxtronik_core::{DeviceInfo, UpdateStatus};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::Session;

#[derive(Serialize)]
struct Identity {
    serial_number: String,
    model: Option<String>,
    manufacturer: String,
    firmware_version: Option<String>,
    status: UpdateStatus,
    last_refresh: Option<String>,
    data_age_secs: Option<i64>,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Firmware")]
    sw_version: String,
}

impl From<&DeviceInfo> for DeviceRow {
    fn from(d: &DeviceInfo) -> Self {
        Self {
            key: d.key.to_string(),
            name: d.name.clone(),
            identifier: d.identifier.clone(),
            model: d.model.clone().unwrap_or_default(),
            sw_version: d.sw_version.clone().unwrap_or_default(),
        }
    }
}

fn status_label(status: &UpdateStatus) -> String {
    match status {
        UpdateStatus::Pending => "pending".into(),
        UpdateStatus::Ok { .. } => "ok".into(),
        UpdateStatus::Failed { reason, .. } => format!("failed ({reason})"),
        UpdateStatus::Shutdown => "shut down".into(),
    }
}

pub fn handle(session: &Session, out: OutputOpts) -> Result<(), CliError> {
    let c = &session.coordinator;
    let identity = Identity {
        serial_number: c.serial_number(),
        model: c.model(),
        manufacturer: c.manufacturer(),
        firmware_version: c.firmware_version(),
        status: c.status(),
        last_refresh: c.last_refresh().map(|t| t.to_rfc3339()),
        data_age_secs: c.data_age().map(|age| age.num_seconds()),
    };

    let rendered = output::render_single(
        out.format,
        &identity,
        |i| {
            output::detail(&[
                ("Serial", i.serial_number.clone()),
                ("Model", i.model.clone().unwrap_or_else(|| "-".into())),
                ("Manufacturer", i.manufacturer.clone()),
                (
                    "Firmware",
                    i.firmware_version.clone().unwrap_or_else(|| "-".into()),
                ),
                ("Status", status_label(&i.status)),
                (
                    "Last refresh",
                    i.last_refresh.clone().unwrap_or_else(|| "never".into()),
                ),
                (
                    "Data age",
                    i.data_age_secs
                        .map_or_else(|| "-".into(), |secs| format!("{secs}s")),
                ),
            ])
        },
        |i| i.serial_number.clone(),
    )?;
    out.print(&rendered);
    Ok(())
}

pub fn devices(session: &Session, out: OutputOpts) -> Result<(), CliError> {
    let infos = session.coordinator.device_infos();
    let rendered =
        output::render_list(out.format, &infos, DeviceRow::from, |d| d.identifier.clone())?;
    out.print(&rendered);
    Ok(())
}
