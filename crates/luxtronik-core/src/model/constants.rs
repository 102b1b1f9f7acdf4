// ── Luxtronik identifiers and enum codes ──
//
// Field names here follow the controller's own naming and are addressed
// as `"<group>.<field>"` identifiers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Field identifiers ───────────────────────────────────────────────

/// Zone (MK) type parameters, one per mixing circuit.
pub const MK_ZONE_FIELDS: [&str; 3] = [
    "parameters.ID_Einst_MK1Typ_akt",
    "parameters.ID_Einst_MK2Typ_akt",
    "parameters.ID_Einst_MK3Typ_akt",
];

pub const SOLAR_DETECT: &str = "parameters.ID_BSTD_Solar";
pub const SERIAL_NUMBER_DATE: &str = "parameters.ID_WP_SerienNummer_DATUM";
pub const SERIAL_NUMBER_HEX: &str = "parameters.ID_WP_SerienNummer_HEX";
pub const MODEL_CODE: &str = "calculations.ID_WEB_Code_WP_akt";
pub const FIRMWARE_VERSION: &str = "calculations.ID_WEB_SoftStand";

pub const MODE_HEATING: &str = "parameters.ID_Ba_Hz_akt";
pub const MODE_DOMESTIC_WATER: &str = "parameters.ID_Ba_Bw_akt";
pub const MODE_COOLING: &str = "parameters.ID_Einst_BA_Kuehl_akt";
pub const REMOTE_MAINTENANCE: &str = "parameters.ID_Einst_Fernwartung_akt";

/// Cooling setpoint of zone `n`.
pub fn cooling_target_field(zone: &str) -> String {
    format!("parameters.ID_Sollwert_KuCft{zone}_akt")
}

/// Threshold the solar reading is compared against after boolean coercion.
pub const SOLAR_THRESHOLD: f64 = 0.01;

// ── Model prefixes ──────────────────────────────────────────────────

pub const MODELS_ALPHA_INNOTEC: [&str; 5] = ["LWP", "LWV", "MSW", "SWC", "SWP"];
pub const MODELS_NOVELAN: [&str; 6] = ["BW", "LA", "LD", "LI", "SI", "ZLW"];

pub const MANUFACTURER_ALPHA_INNOTEC: &str = "Alpha Innotec";
pub const MANUFACTURER_NOVELAN: &str = "Novelan";

// ── Enum codes ──────────────────────────────────────────────────────

/// Operating mode strings used by the heating, domestic water and
/// cooling mode parameters.
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
pub enum LuxMode {
    #[strum(serialize = "Off")]
    #[serde(rename = "Off")]
    Off,
    #[strum(serialize = "Automatic")]
    #[serde(rename = "Automatic")]
    Automatic,
    #[strum(serialize = "Second heatsource")]
    #[serde(rename = "Second heatsource")]
    SecondHeatsource,
    #[strum(serialize = "Party")]
    #[serde(rename = "Party")]
    Party,
    #[strum(serialize = "Holidays")]
    #[serde(rename = "Holidays")]
    Holidays,
}

/// Zone (MK) type codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LuxMkType {
    Off = 0,
    Discharge = 1,
    Load = 2,
    Cooling = 3,
    HeatingCooling = 4,
}

impl LuxMkType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::Discharge),
            2 => Some(Self::Load),
            3 => Some(Self::Cooling),
            4 => Some(Self::HeatingCooling),
            _ => None,
        }
    }

    pub fn supports_cooling(self) -> bool {
        matches!(self, Self::Cooling | Self::HeatingCooling)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn mk_codes_cover_every_type() {
        let decoded: Vec<_> = (0..=4).filter_map(LuxMkType::from_code).collect();
        assert_eq!(decoded, LuxMkType::iter().collect::<Vec<_>>());
        assert_eq!(LuxMkType::from_code(5), None);
    }

    #[test]
    fn mode_strings_match_controller() {
        assert_eq!(LuxMode::SecondHeatsource.to_string(), "Second heatsource");
        assert_eq!("Party".parse::<LuxMode>().unwrap(), LuxMode::Party);
    }

    #[test]
    fn cooling_target_field_name() {
        assert_eq!(
            cooling_target_field("2"),
            "parameters.ID_Sollwert_KuCft2_akt"
        );
    }
}
