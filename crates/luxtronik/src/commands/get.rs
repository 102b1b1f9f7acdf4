//! Value lookup handlers.

use luxtronik_device::{Field, Group, Value};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{FieldsArgs, GetArgs};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::Session;

const ABSENT: &str = "-";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct Reading {
    id: String,
    value: Option<Value>,
    unit: Option<String>,
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Identifier")]
    id: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&Reading> for ReadingRow {
    fn from(r: &Reading) -> Self {
        Self {
            id: r.id.clone(),
            value: display_value(r.value.as_ref()),
            unit: r.unit.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Index")]
    index: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&Field> for FieldRow {
    fn from(f: &Field) -> Self {
        Self {
            index: f.index,
            name: f.name.clone(),
            value: f.value.to_string(),
            unit: f.unit.clone().unwrap_or_default(),
        }
    }
}

fn display_value(value: Option<&Value>) -> String {
    value.map_or_else(|| ABSENT.to_owned(), ToString::to_string)
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle(session: &Session, args: &GetArgs, out: OutputOpts) -> Result<(), CliError> {
    let readings = args
        .ids
        .iter()
        .map(|id| {
            let field = session.coordinator.get_field(id)?;
            Ok(Reading {
                id: id.clone(),
                unit: field.as_ref().and_then(|f| f.unit.clone()),
                value: field.map(|f| f.value),
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let rendered = output::render_list(out.format, &readings, ReadingRow::from, |r| {
        display_value(r.value.as_ref())
    })?;
    out.print(&rendered);
    Ok(())
}

pub fn fields(session: &Session, args: &FieldsArgs, out: OutputOpts) -> Result<(), CliError> {
    let group: Group = args.group.parse().map_err(|_| CliError::Validation {
        field: "group".into(),
        reason: format!("unknown table '{}'", args.group),
    })?;
    let fields: Vec<Field> = session
        .coordinator
        .snapshot()
        .map(|s| s.table(group).iter().cloned().collect())
        .unwrap_or_default();

    let rendered = output::render_list(out.format, &fields, FieldRow::from, |f| {
        format!("{}.{}={}", group, f.name, f.value)
    })?;
    out.print(&rendered);
    Ok(())
}
