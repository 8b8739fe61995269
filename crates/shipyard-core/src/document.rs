//! Typed document tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

/// Parsed input document.
///
/// Mappings are keyed by `String` and kept in a `BTreeMap`, so every level is
/// already in ascending key order when it reaches the emitter.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Document>),
    Mapping(BTreeMap<String, Document>),
}

/// Numeric scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer within `i64` range.
    Int(i64),
    /// Integer above `i64::MAX`.
    UInt(u64),
    Float(f64),
}

impl Document {
    /// Look up a key in a mapping. `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(Number::Int(i)) => Some(*i),
            Self::Number(Number::UInt(u)) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl Number {
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            Self::Int(_) | Self::UInt(_) => true,
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::UInt(u),
        }
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// JSON text of the number; non-finite floats have none.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Float(x) => match serde_json::Number::from_f64(*x) {
                Some(n) => write!(f, "{}", n),
                None => write!(f, "{}", x),
            },
        }
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Document {
    fn from(i: i64) -> Self {
        Self::Number(Number::Int(i))
    }
}

impl From<f64> for Document {
    fn from(f: f64) -> Self {
        Self::Number(Number::Float(f))
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Self::Sequence(items)
    }
}

impl From<BTreeMap<String, Document>> for Document {
    fn from(map: BTreeMap<String, Document>) -> Self {
        Self::Mapping(map)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::UInt(u) => serializer.serialize_u64(*u),
            // serde_json would silently write `null` here
            Self::Float(f) if !f.is_finite() => {
                Err(S::Error::custom(format!("non-finite float {}", f)))
            }
            Self::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}
