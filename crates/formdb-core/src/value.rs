use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// Value
///
/// Scalar cell value carried between models, criteria, and the row store.
/// Columns are uniformly typed per schema, so the derived ordering only
/// ever compares same-variant values on real data.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Text(_) => "text",
        }
    }

    /// Read this value as a primary key. `Id::UNSET` reads as absent.
    #[must_use]
    pub fn as_id(&self) -> Option<Id> {
        let raw = match self {
            Self::Uint(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        };
        raw.filter(|&n| n > 0).map(Id::new)
    }

    /// Read this value as an entity reference: numeric ids directly, text
    /// holding a decimal id by parsing. Used by duplication fixups where
    /// references may be stored in text-typed setting values.
    #[must_use]
    pub fn as_ref_id(&self) -> Option<Id> {
        match self {
            Self::Text(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&n| n > 0)
                .map(Id::new),
            other => other.as_id(),
        }
    }

    /// Rewrite this value to reference `id`, preserving its shape: text
    /// stays text, integers stay integers.
    #[must_use]
    pub fn with_ref_id(&self, id: Id) -> Self {
        match self {
            Self::Text(_) => Self::Text(id.to_string()),
            Self::Int(_) => i64::try_from(id.get()).map_or(Self::Uint(id.get()), Self::Int),
            _ => Self::Uint(id.get()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        Self::Uint(id.get())
    }
}

///
/// FieldType
///
/// Declared column type. Every declared column has a typed zero default,
/// so freshly created models are always fully populated.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FieldType {
    Bool,
    Int,
    Uint,
    Text,
}

impl FieldType {
    #[must_use]
    pub const fn zero(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Uint => Value::Uint(0),
            Self::Text => Value::Text(String::new()),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Text => "text",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_never_reads_as_an_id() {
        assert_eq!(Value::Uint(0).as_id(), None);
        assert_eq!(Value::Int(-3).as_id(), None);
        assert_eq!(Value::Uint(7).as_id(), Some(Id::new(7)));
    }

    #[test]
    fn text_references_parse_as_ids() {
        assert_eq!(Value::Text("101".into()).as_ref_id(), Some(Id::new(101)));
        assert_eq!(Value::Text("  5 ".into()).as_ref_id(), Some(Id::new(5)));
        assert_eq!(Value::Text("draft".into()).as_ref_id(), None);
        assert_eq!(Value::Text("0".into()).as_ref_id(), None);
    }

    #[test]
    fn ref_rewrite_preserves_shape() {
        let text = Value::Text("101".into());
        assert_eq!(text.with_ref_id(Id::new(204)), Value::Text("204".into()));

        let uint = Value::Uint(101);
        assert_eq!(uint.with_ref_id(Id::new(204)), Value::Uint(204));
    }

    #[test]
    fn zero_defaults_match_their_type() {
        assert_eq!(FieldType::Uint.zero(), Value::Uint(0));
        assert_eq!(FieldType::Text.zero(), Value::Text(String::new()));
    }
}
