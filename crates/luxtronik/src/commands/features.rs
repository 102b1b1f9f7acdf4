//! Detected feature handler.

use luxtronik_device::Value;
use serde::Serialize;

use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::Session;

#[derive(Serialize)]
struct Features {
    heating: bool,
    domestic_water: bool,
    cooling: bool,
    cooling_zones: Vec<&'static str>,
    cooling_target_field: Option<String>,
    cooling_target_value: Option<Value>,
    solar: bool,
}

fn yes_no(b: bool) -> String {
    let label = if b { "yes" } else { "no" };
    label.to_owned()
}

pub fn handle(session: &Session, out: OutputOpts) -> Result<(), CliError> {
    let c = &session.coordinator;
    let target = c.cooling_target_temperature_field();
    let cooling_target_value = match &target {
        Some(id) => c.get_value(&id.to_string())?,
        None => None,
    };
    let features = Features {
        heating: c.has_heating(),
        domestic_water: c.has_domestic_water(),
        cooling: c.has_cooling(),
        cooling_zones: c.cooling_zones(),
        cooling_target_field: target.map(|id| id.to_string()),
        cooling_target_value,
        solar: c.solar_present(),
    };

    let rendered = output::render_single(
        out.format,
        &features,
        |f| {
            let target = match (&f.cooling_target_field, &f.cooling_target_value) {
                (Some(id), Some(v)) => format!("{id} = {v}"),
                (Some(id), None) => id.clone(),
                _ => "-".into(),
            };
            output::detail(&[
                ("Heating", yes_no(f.heating)),
                ("Domestic water", yes_no(f.domestic_water)),
                ("Cooling", yes_no(f.cooling)),
                ("Cooling zones", f.cooling_zones.join(", ")),
                ("Cooling target", target),
                ("Solar", yes_no(f.solar)),
            ])
        },
        |f| {
            let mut names = Vec::new();
            if f.heating {
                names.push("heating");
            }
            if f.domestic_water {
                names.push("domestic_water");
            }
            if f.cooling {
                names.push("cooling");
            }
            if f.solar {
                names.push("solar");
            }
            names.join("\n")
        },
    )?;
    out.print(&rendered);
    Ok(())
}
