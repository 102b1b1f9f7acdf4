//! Parameter write handler.

use luxtronik_core::WriteOutcome;
use luxtronik_device::Value;
use serde::Serialize;

use crate::cli::SetArgs;
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::{Session, check_outcome};

#[derive(Serialize)]
struct WriteReport {
    parameter: String,
    value: Value,
    #[serde(flatten)]
    outcome: WriteOutcome,
    /// Value held by the coordinator after the write.
    current: Option<Value>,
}

fn qualified(parameter: &str) -> String {
    if parameter.contains('.') {
        parameter.to_owned()
    } else {
        format!("parameters.{parameter}")
    }
}

pub async fn handle(session: &Session, args: &SetArgs, out: OutputOpts) -> Result<(), CliError> {
    let value: Value = args.value.parse().unwrap_or_else(|never| match never {});
    let mut options = session.coordinator.default_write_options();
    if args.no_refresh {
        options.refresh_after = false;
    }

    let outcome = session
        .coordinator
        .write(&args.parameter, value.clone(), options)
        .await;
    check_outcome(session, &args.parameter, &outcome)?;
    session.persist()?;

    let parameter = qualified(&args.parameter);
    let report = WriteReport {
        current: session.coordinator.get_value(&parameter)?,
        parameter,
        value,
        outcome,
    };
    let rendered = output::render_single(
        out.format,
        &report,
        |r| {
            output::detail(&[
                ("Parameter", r.parameter.clone()),
                ("Written", r.value.to_string()),
                (
                    "Current",
                    r.current
                        .as_ref()
                        .map_or_else(|| "-".into(), ToString::to_string),
                ),
            ])
        },
        |r| r.value.to_string(),
    )?;
    out.print(&rendered);
    Ok(())
}
