//! Built-in switch handlers.

use luxtronik_core::WriteOutcome;
use luxtronik_core::model::SwitchDescription;
use luxtronik_core::model::switch::{switch as find_switch, switches};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{SwitchArgs, SwitchState};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::{Session, check_outcome};

#[derive(Serialize)]
struct SwitchView {
    key: &'static str,
    entity_id: String,
    field: String,
    on: Option<bool>,
}

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Entity")]
    entity_id: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "State")]
    state: &'static str,
}

fn state_label(on: Option<bool>) -> &'static str {
    match on {
        Some(true) => "on",
        Some(false) => "off",
        None => "-",
    }
}

impl From<&SwitchView> for SwitchRow {
    fn from(s: &SwitchView) -> Self {
        Self {
            key: s.key,
            entity_id: s.entity_id.clone(),
            field: s.field.clone(),
            state: state_label(s.on),
        }
    }
}

fn view(session: &Session, switch: &SwitchDescription) -> SwitchView {
    SwitchView {
        key: switch.key,
        entity_id: session.coordinator.entity_id("switch", switch.key),
        field: switch.field.to_string(),
        on: session.coordinator.switch_state(switch),
    }
}

pub fn list(session: &Session, out: OutputOpts) -> Result<(), CliError> {
    let views: Vec<SwitchView> = switches().iter().map(|s| view(session, s)).collect();
    let rendered = output::render_list(out.format, &views, SwitchRow::from, |s| {
        format!("{}={}", s.key, state_label(s.on))
    })?;
    out.print(&rendered);
    Ok(())
}

#[derive(Serialize)]
struct SwitchReport {
    #[serde(flatten)]
    switch: SwitchView,
    #[serde(flatten)]
    outcome: WriteOutcome,
}

pub async fn handle(session: &Session, args: &SwitchArgs, out: OutputOpts) -> Result<(), CliError> {
    let switch = find_switch(&args.key).ok_or_else(|| CliError::NotFound {
        resource_type: "switch".into(),
        identifier: args.key.clone(),
        list_command: "switches".into(),
    })?;

    let on = args.state == SwitchState::On;
    let outcome = session.coordinator.set_switch(&switch, on).await;
    check_outcome(session, &switch.field.to_string(), &outcome)?;
    session.persist()?;

    let report = SwitchReport {
        switch: view(session, &switch),
        outcome,
    };
    let rendered = output::render_single(
        out.format,
        &report,
        |r| format!("{} is now {}", r.switch.entity_id, state_label(r.switch.on)),
        |r| state_label(r.switch.on).to_owned(),
    )?;
    out.print(&rendered);
    Ok(())
}
