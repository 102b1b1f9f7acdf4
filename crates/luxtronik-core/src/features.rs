// ── Feature detection ──
//
// Facts derived by scanning fixed identifiers against the snapshot.

use luxtronik_device::Snapshot;
use tracing::debug;

use crate::identity::lookup;
use crate::model::constants::{MK_ZONE_FIELDS, SOLAR_DETECT, SOLAR_THRESHOLD, cooling_target_field};
use crate::model::{FieldId, LuxMkType};

/// Zone type identifiers whose code is `cooling` or `heating_cooling`.
pub fn cooling_zones(snapshot: &Snapshot) -> Vec<&'static str> {
    MK_ZONE_FIELDS
        .into_iter()
        .filter(|id| {
            lookup(snapshot, id)
                .and_then(luxtronik_device::Value::as_i64)
                .and_then(LuxMkType::from_code)
                .is_some_and(LuxMkType::supports_cooling)
        })
        .collect()
}

pub fn cooling_present(snapshot: &Snapshot) -> bool {
    !cooling_zones(snapshot).is_empty()
}

/// Setpoint field of the single cooling-capable zone.
///
/// `None` when no zone, or more than one, can cool.
pub fn cooling_target_temperature_field(snapshot: &Snapshot) -> Option<FieldId> {
    let zones = cooling_zones(snapshot);
    let [zone] = zones.as_slice() else {
        debug!(zones = zones.len(), "no unique cooling zone");
        return None;
    };
    let number = first_digit_run(zone)?;
    cooling_target_field(number).parse().ok()
}

fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Solar presence: the reading is coerced to a boolean and then compared
/// against a small threshold, so any truthy reading counts.
// NOTE: the threshold has no effect after the boolean coercion. Left as is
// until the intended check is known.
pub fn solar_present(snapshot: &Snapshot) -> bool {
    let truthy = lookup(snapshot, SOLAR_DETECT).is_some_and(luxtronik_device::Value::is_truthy);
    f64::from(u8::from(truthy)) > SOLAR_THRESHOLD
}
