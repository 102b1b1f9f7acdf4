// ── Heat pump value model ──
//
// A Luxtronik controller exposes three flat tables of numbered, named
// fields. A `Snapshot` is one complete read of all three.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Value ───────────────────────────────────────────────────────────

/// A single raw reading as decoded by the device client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Integer view of the reading. Integral floats such as `3.0` count.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::as_conversions
    )]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            Self::Float(_) | Self::Text(_) => None,
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Equality across the numeric variants: `3.0` matches `3` and `1`
    /// matches `true`. Text only ever matches identical text.
    #[allow(clippy::float_cmp)]
    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Truthiness of the raw reading: `false`, zero and empty text are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parses user input: booleans, then integers, then finite floats, else
/// text. `NaN` and `inf` stay text since JSON has no encoding for them.
impl FromStr for Value {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(b) = trimmed.parse::<bool>() {
            return Ok(Self::Bool(b));
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Self::Integer(i));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => return Ok(Self::Float(f)),
            _ => {}
        }
        Ok(Self::Text(s.to_owned()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ── Field ───────────────────────────────────────────────────────────

/// One entry of a device table: numeric address, symbolic name, reading, unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub index: u16,
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Field {
    pub fn new(index: u16, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            index,
            name: name.into(),
            value: value.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

// ── Table ───────────────────────────────────────────────────────────

/// An ordered table of fields, addressable by name or by numeric index.
///
/// Serializes as a plain list of fields in device order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct Table {
    by_name: IndexMap<String, Field>,
    by_index: HashMap<u16, String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Returns the previous field with that name.
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        let stale = self
            .by_name
            .get(&field.name)
            .map(|previous| previous.index)
            .filter(|index| self.by_index.get(index) == Some(&field.name));
        if let Some(index) = stale {
            self.by_index.remove(&index);
        }
        self.by_index.insert(field.index, field.name.clone());
        self.by_name.insert(field.name.clone(), field)
    }

    /// Look up a field by name, falling back to its numeric index
    /// (`"860"` resolves the field at index 860).
    pub fn get(&self, id: &str) -> Option<&Field> {
        if let Some(field) = self.by_name.get(id) {
            return Some(field);
        }
        let index: u16 = id.parse().ok()?;
        let name = self.by_index.get(&index)?;
        self.by_name.get(name)
    }

    /// Replace the reading of an existing field. Returns `false` if absent.
    pub fn set_value(&mut self, id: &str, value: Value) -> bool {
        let name = match self.get(id) {
            Some(field) => field.name.clone(),
            None => return false,
        };
        match self.by_name.get_mut(&name) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.by_name.values()
    }
}

impl From<Vec<Field>> for Table {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Table> for Vec<Field> {
    fn from(table: Table) -> Self {
        table.by_name.into_values().collect()
    }
}

impl FromIterator<Field> for Table {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut table = Self::new();
        for field in iter {
            table.insert(field);
        }
        table
    }
}

// ── Group ───────────────────────────────────────────────────────────

/// Which of the three device tables a field lives in.
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
pub enum Group {
    Parameters,
    Calculations,
    Visibilities,
}

// ── Snapshot ────────────────────────────────────────────────────────

/// One complete read of the controller. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub parameters: Table,
    #[serde(default)]
    pub calculations: Table,
    #[serde(default)]
    pub visibilities: Table,
}

impl Snapshot {
    pub fn table(&self, group: Group) -> &Table {
        match group {
            Group::Parameters => &self.parameters,
            Group::Calculations => &self.calculations,
            Group::Visibilities => &self.visibilities,
        }
    }

    pub fn table_mut(&mut self, group: Group) -> &mut Table {
        match group {
            Group::Parameters => &mut self.parameters,
            Group::Calculations => &mut self.calculations,
            Group::Visibilities => &mut self.visibilities,
        }
    }

    pub fn get(&self, group: Group, id: &str) -> Option<&Field> {
        self.table(group).get(id)
    }
}
