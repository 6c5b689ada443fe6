//! Parsed definition values.

use serde_json::Value as Json;

/// A value in a definition document.
///
/// Objects keep their entries in source order. Numbers keep their literal text so that ids
/// like `007` survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `null` or `undefined`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A numeric literal as written.
    Number(String),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<Self>),
    /// An object, in source order.
    Object(Vec<(String, Self)>),
}

impl Value {
    /// Looks up `key` in an object. When a key repeats, the last entry wins.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(entries) => entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the elements of an array, or an empty slice for anything else.
    pub fn items(&self) -> &[Self] {
        match self {
            Self::Array(items) => items,
            _ => &[],
        }
    }

    /// Returns the entries of an object.
    pub fn entries(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders a scalar as an id: strings as-is, numbers by their literal text.
    pub fn as_id(&self) -> Option<String> {
        match self {
            Self::String(s) | Self::Number(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Returns true for `null`/`undefined`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => Self::Number(n.to_string()),
            Json::String(s) => Self::String(s),
            Json::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            Json::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
