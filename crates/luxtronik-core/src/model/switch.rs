use luxtronik_device::Value;
use serde::Serialize;

use super::constants::{
    LuxMode, MODE_COOLING, MODE_DOMESTIC_WATER, MODE_HEATING, REMOTE_MAINTENANCE,
};
use super::device::DeviceKey;
use super::field_id::FieldId;

/// A two-state control backed by one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchDescription {
    pub key: &'static str,
    pub device: DeviceKey,
    pub field: FieldId,
    pub on_state: Value,
    pub off_state: Value,
    /// Report "on" when the parameter does *not* hold `on_state`.
    pub inverted: bool,
}

impl SwitchDescription {
    fn boolean(key: &'static str, device: DeviceKey, field: &str) -> Self {
        Self::with_states(key, device, field, Value::Bool(true), Value::Bool(false))
    }

    fn mode(key: &'static str, device: DeviceKey, field: &str) -> Self {
        Self::with_states(
            key,
            device,
            field,
            Value::from(LuxMode::Automatic.as_ref()),
            Value::from(LuxMode::Off.as_ref()),
        )
    }

    fn with_states(
        key: &'static str,
        device: DeviceKey,
        field: &str,
        on_state: Value,
        off_state: Value,
    ) -> Self {
        let (_, name) = field.split_once('.').unwrap_or(("", field));
        Self {
            key,
            device,
            field: FieldId::parameter(name),
            on_state,
            off_state,
            inverted: false,
        }
    }

    /// The state to write for `on`.
    pub fn state_for(&self, on: bool) -> &Value {
        if on { &self.on_state } else { &self.off_state }
    }
}

/// Built-in switch catalog.
pub fn switches() -> Vec<SwitchDescription> {
    vec![
        SwitchDescription::boolean("remote_maintenance", DeviceKey::Heatpump, REMOTE_MAINTENANCE),
        SwitchDescription::mode("heating", DeviceKey::Heating, MODE_HEATING),
        SwitchDescription::mode("domestic_water", DeviceKey::DomesticWater, MODE_DOMESTIC_WATER),
        SwitchDescription::mode("cooling", DeviceKey::Cooling, MODE_COOLING),
    ]
}

/// Look up a built-in switch by key.
pub fn switch(key: &str) -> Option<SwitchDescription> {
    switches().into_iter().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_fields_are_parameters() {
        for s in switches() {
            assert_eq!(s.field.group(), luxtronik_device::Group::Parameters, "{}", s.key);
            assert!(!s.field.field().contains('.'));
        }
    }

    #[test]
    fn mode_switches_toggle_between_automatic_and_off() {
        let Some(heating) = switch("heating") else {
            panic!("heating switch missing");
        };
        assert_eq!(heating.state_for(true), &Value::from("Automatic"));
        assert_eq!(heating.state_for(false), &Value::from("Off"));
        assert!(switch("sauna").is_none());
    }
}
