//! Marker payload values.
//!
//! The introspection layer hands marker payloads over as [`Value`]s. Lists and
//! maps use persistent collections so a payload can be shared between the
//! introspector and the enrichers without deep copies.

use std::fmt;
use std::sync::Arc;

use im::{OrdMap, Vector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Payload of a declarative marker.
///
/// Values are immutable and cheaply cloneable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// No payload.
    #[default]
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// String value.
    String(Arc<str>),
    /// Persistent list.
    List(Vector<Value>),
    /// Persistent map keyed by field name.
    Map(OrdMap<Arc<str>, Value>),
}

impl Value {
    /// Creates a list value.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates a map value.
    #[must_use]
    pub fn map<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a list reference.
    #[must_use]
    pub const fn as_list(&self) -> Option<&Vector<Value>> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a map reference.
    #[must_use]
    pub const fn as_map(&self) -> Option<&OrdMap<Arc<str>, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a field of a map value.
    ///
    /// Returns `None` for missing fields and for non-map values.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(field))
    }

    /// Looks up a string field of a map value.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns the strings of a list value, or a single string as a one-element list.
    ///
    /// Non-string items are skipped.
    #[must_use]
    pub fn string_items(&self) -> Vec<&str> {
        match self {
            Self::String(s) => vec![&**s],
            Self::List(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns a short name for the shape of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn map_field_access() {
        let v = Value::map([("name", Value::from("TIMEOUT")), ("parent", Value::from("CONNECTIVITY"))]);
        assert_eq!(v.get_str("name"), Some("TIMEOUT"));
        assert_eq!(v.get_str("parent"), Some("CONNECTIVITY"));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::from(3_i64).get("name"), None);
    }

    #[test]
    fn string_items_accepts_single_and_list() {
        assert_eq!(Value::from("A").string_items(), vec!["A"]);
        let list = Value::list([Value::from("A"), Value::from(1_i64), Value::from("B")]);
        assert_eq!(list.string_items(), vec!["A", "B"]);
        assert!(Value::Nil.string_items().is_empty());
    }

    #[test]
    fn display_nested() {
        let v = Value::map([("modes", Value::list([Value::from("WAIT"), Value::from("FAIL")]))]);
        assert_eq!(v.to_string(), "{modes [\"WAIT\" \"FAIL\"]}");
    }

    #[test]
    fn clone_shares_structure() {
        let v = Value::list((0..100_i64).map(Value::from));
        let c = v.clone();
        assert_eq!(v, c);
        assert_eq!(c.as_list().map(Vector::len), Some(100));
    }

    proptest! {
        #[test]
        fn string_roundtrip(s in "[a-zA-Z0-9_]{0,20}") {
            let v = Value::from(s.as_str());
            prop_assert_eq!(v.as_str(), Some(s.as_str()));
            prop_assert_eq!(v.type_name(), "string");
        }

        #[test]
        fn int_eq(n1 in any::<i64>(), n2 in any::<i64>()) {
            let v1 = Value::from(n1);
            let v2 = Value::from(n2);
            prop_assert_eq!(v1 == v2, n1 == n2);
        }
    }
}
