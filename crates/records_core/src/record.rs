//! Validated records.

use crate::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

/// An ordered mapping from field name to coerced value.
///
/// Produced by a successful validation with one entry per declared field, in
/// schema order. Record validators may replace values but never add or remove
/// fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Replaces the value of an existing field, returning the previous value.
    ///
    /// Returns `None` and leaves the record untouched if the field is unknown.
    pub fn replace(&mut self, field: &str, value: Value) -> Option<Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, slot)| std::mem::replace(slot, value))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Exports the record as an input mapping.
    ///
    /// Validating the result against the same schema yields an identical record.
    pub fn into_map(self) -> HashMap<String, Value> {
        self.entries.into_iter().collect()
    }

    /// Exports the record as a [`Value::Map`].
    pub fn to_value(&self) -> Value {
        Value::Map(self.entries.iter().cloned().collect::<BTreeMap<_, _>>())
    }

    /// Exports the record as a JSON object.
    ///
    /// Key order follows `serde_json`'s map; serialize the record directly to keep schema order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

/// Later duplicates overwrite earlier entries in place.
impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            if record.replace(&name, value.clone()).is_none() {
                record.entries.push((name, value));
            }
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
