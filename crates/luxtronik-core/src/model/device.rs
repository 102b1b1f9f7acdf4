use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The logical devices a heat pump is presented as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceKey {
    Heatpump,
    Heating,
    DomesticWater,
    Cooling,
}

/// Registry metadata for one logical device, computed from the current
/// snapshot on every access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub key: DeviceKey,
    /// `{manufacturer}_{model}_{serial}_{key}`, lower-cased.
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub model: Option<String>,
    pub sw_version: Option<String>,
    pub configuration_url: String,
    pub suggested_area: String,
}
