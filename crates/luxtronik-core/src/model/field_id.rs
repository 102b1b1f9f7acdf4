use std::fmt;
use std::str::FromStr;

use luxtronik_device::Group;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A `"<group>.<field>"` address into a snapshot.
///
/// The identifier is split on the *first* `.`; the field part may itself
/// contain dots. Both parts must be non-empty and the group must name one
/// of the three device tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    group: Group,
    field: String,
}

impl FieldId {
    pub fn new(group: Group, field: impl Into<String>) -> Self {
        Self {
            group,
            field: field.into(),
        }
    }

    pub fn parameter(field: impl Into<String>) -> Self {
        Self::new(Group::Parameters, field)
    }

    pub fn calculation(field: impl Into<String>) -> Self {
        Self::new(Group::Calculations, field)
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl FromStr for FieldId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidIdentifier {
            identifier: s.to_owned(),
        };

        let (group, field) = s.split_once('.').ok_or_else(invalid)?;
        if group.is_empty() || field.is_empty() {
            return Err(invalid());
        }
        let group: Group = group.parse().map_err(|_| invalid())?;
        Ok(Self::new(group, field))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.field)
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
