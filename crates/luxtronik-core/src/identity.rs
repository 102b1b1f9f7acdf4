// ── Device identity ──
//
// Serial number, model, manufacturer and firmware are derived from the
// current snapshot on every access. Missing fields give empty strings or
// `None`; nothing here fails.

use luxtronik_device::{Snapshot, Value};

use crate::model::FieldId;
use crate::model::constants::{
    FIRMWARE_VERSION, MANUFACTURER_ALPHA_INNOTEC, MANUFACTURER_NOVELAN, MODEL_CODE,
    MODELS_ALPHA_INNOTEC, MODELS_NOVELAN, SERIAL_NUMBER_DATE, SERIAL_NUMBER_HEX,
};

pub(crate) fn lookup<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a Value> {
    let id: FieldId = id.parse().ok()?;
    snapshot
        .get(id.group(), id.field())
        .map(|field| &field.value)
}

/// `"{date}-{hex}"`, e.g. `"123456-0ff"`, with every `x` dropped.
pub fn serial_number(snapshot: &Snapshot) -> String {
    let date = lookup(snapshot, SERIAL_NUMBER_DATE);
    let hex = lookup(snapshot, SERIAL_NUMBER_HEX).and_then(serial_integer);
    match (date, hex) {
        (Some(date), Some(hex)) => format!("{date}-{}", prefixed_hex(hex)).replace('x', ""),
        _ => String::new(),
    }
}

fn serial_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// `0x`-prefixed lower-case hex with a leading sign for negatives.
fn prefixed_hex(n: i64) -> String {
    if n < 0 {
        format!("-0x{:x}", n.unsigned_abs())
    } else {
        format!("0x{n:x}")
    }
}

pub fn model(snapshot: &Snapshot) -> Option<String> {
    lookup(snapshot, MODEL_CODE).map(ToString::to_string)
}

pub fn firmware_version(snapshot: &Snapshot) -> Option<String> {
    lookup(snapshot, FIRMWARE_VERSION).map(ToString::to_string)
}

/// Manufacturer inferred from the model prefix. Novelan prefixes are
/// checked first. Unknown models give `""`.
pub fn manufacturer_for_model(model: Option<&str>) -> &'static str {
    let Some(model) = model else {
        return "";
    };
    if MODELS_NOVELAN.iter().any(|p| model.starts_with(p)) {
        MANUFACTURER_NOVELAN
    } else if MODELS_ALPHA_INNOTEC.iter().any(|p| model.starts_with(p)) {
        MANUFACTURER_ALPHA_INNOTEC
    } else {
        ""
    }
}

pub fn manufacturer(snapshot: &Snapshot) -> String {
    manufacturer_for_model(model(snapshot).as_deref()).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxtronik_device::{Field, Table};
    use pretty_assertions::assert_eq;

    fn snapshot(date: Option<Value>, hex: Option<Value>, model: Option<&str>) -> Snapshot {
        let mut parameters = Table::new();
        if let Some(date) = date {
            parameters.insert(Field::new(874, "ID_WP_SerienNummer_DATUM", date));
        }
        if let Some(hex) = hex {
            parameters.insert(Field::new(875, "ID_WP_SerienNummer_HEX", hex));
        }
        let mut calculations = Table::new();
        if let Some(model) = model {
            calculations.insert(Field::new(78, "ID_WEB_Code_WP_akt", model));
        }
        calculations.insert(Field::new(81, "ID_WEB_SoftStand", "V3.89.0"));
        Snapshot {
            parameters,
            calculations,
            ..Snapshot::default()
        }
    }

    #[test]
    fn serial_number_formats_hex_without_x() {
        let snap = snapshot(Some(Value::Integer(123_456)), Some(Value::Integer(255)), None);
        assert_eq!(serial_number(&snap), "123456-0ff");
    }

    #[test]
    fn serial_number_accepts_textual_hex_part() {
        let snap = snapshot(Some(Value::from("2016")), Some(Value::from("16")), None);
        assert_eq!(serial_number(&snap), "2016-010");
    }

    #[test]
    fn serial_number_empty_when_part_missing() {
        assert_eq!(serial_number(&snapshot(Some(Value::Integer(1)), None, None)), "");
        assert_eq!(serial_number(&snapshot(None, Some(Value::Integer(1)), None)), "");
        assert_eq!(
            serial_number(&snapshot(Some(Value::Integer(1)), Some(Value::from("zz")), None)),
            ""
        );
    }

    #[test]
    fn manufacturer_from_model_prefix() {
        assert_eq!(manufacturer_for_model(Some("SWC311")), "Alpha Innotec");
        assert_eq!(manufacturer_for_model(Some("LD9")), "Novelan");
        assert_eq!(manufacturer_for_model(Some("XYZ")), "");
        assert_eq!(manufacturer_for_model(Some("CS10")), "");
        assert_eq!(manufacturer_for_model(None), "");
    }

    #[test]
    fn model_and_firmware_from_calculations() {
        let snap = snapshot(None, None, Some("LWP 8"));
        assert_eq!(model(&snap).as_deref(), Some("LWP 8"));
        assert_eq!(manufacturer(&snap), "Alpha Innotec");
        assert_eq!(firmware_version(&snap).as_deref(), Some("V3.89.0"));
        assert_eq!(model(&Snapshot::default()), None);
    }
}
