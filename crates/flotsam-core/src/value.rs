use crate::types::{Timestamp, Ulid};
use flotsam_schema::types::Primitive;
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Closed scalar value set for rows. `Null` is the absence marker for
/// optional fields and unset foreign keys.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    Null,
    Text(String),
    Timestamp(Timestamp),
    Ulid(Ulid),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_ulid(&self) -> Option<Ulid> {
        match self {
            Self::Ulid(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Does this value satisfy the declared primitive? `Null` satisfies
    /// every primitive; presence and optionality are schema concerns.
    #[must_use]
    pub const fn matches(&self, primitive: Primitive) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => matches!(primitive, Primitive::Bool),
            Self::Float(_) => matches!(primitive, Primitive::Float),
            Self::Int(_) => matches!(primitive, Primitive::Int),
            Self::Text(_) => matches!(primitive, Primitive::Text),
            Self::Timestamp(_) => matches!(primitive, Primitive::Timestamp),
            Self::Ulid(_) => matches!(primitive, Primitive::Ulid),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Ulid> for Value {
    fn from(id: Ulid) -> Self {
        Self::Ulid(id)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
