// ── Domain model ──
//
// Field addressing, controller constants, logical devices and the
// built-in switch catalog.

pub mod constants;
pub mod device;
pub mod field_id;
pub mod switch;

pub use constants::{LuxMkType, LuxMode};
pub use device::{DeviceInfo, DeviceKey};
pub use field_id::FieldId;
pub use switch::SwitchDescription;
