// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field lookup capability and a map-backed record.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::Value;

/// Lookup-by-name capability that filter predicates evaluate against.
///
/// Returning `None` means the record has no attribute with that name.
///
/// # Absent fields
///
/// An absent attribute never equals and is never a member of anything, so
/// `filter` on it keeps nothing and `exclude` on it keeps everything. A
/// misspelled field name is not an error: `exclude(criteria! { "staus" =>
/// "closed" })` silently keeps every record.
pub trait Record {
    /// Value of the attribute named `name`, or `None` if absent.
    fn field(&self, name: &str) -> Option<Value>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Record + ?Sized> Record for Rc<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Record + ?Sized> Record for Arc<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

/// Record backed by an ordered `field -> Value` map.
///
/// Serializes as a plain JSON object when the `serde` feature is on.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MapRecord {
    fields: BTreeMap<String, Value>,
}

impl MapRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs.into_iter().collect()
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Borrow the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for MapRecord {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for MapRecord {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_none() {
        let rec = MapRecord::from_pairs([("a", 1)]);
        assert_eq!(rec.field("a"), Some(Value::Int(1)));
        assert_eq!(rec.field("b"), None);
    }

    #[test]
    fn later_duplicate_wins() {
        let rec = MapRecord::from_pairs([("a", 1), ("a", 2)]);
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn smart_pointers_forward_lookup() {
        let rec = Arc::new(MapRecord::from_pairs([("name", "ada")]));
        assert_eq!(rec.field("name"), Some(Value::from("ada")));
        let boxed: Box<dyn Record> = Box::new(MapRecord::from_pairs([("n", 3)]));
        assert_eq!(boxed.field("n"), Some(Value::Int(3)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_flat_object() {
        let rec = MapRecord::from_pairs([("b", Value::from(2)), ("a", Value::from("x"))]);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"a":"x","b":2}"#);
        let back: MapRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
