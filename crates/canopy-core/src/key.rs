use crate::value::Value;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

///
/// Key
///
/// Primary key of a stored row. Relationship fields hold keys of their
/// target rows, encoded as `Value::Uint`.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Key(u64);

impl Key {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Decode a key from a stored value.
    ///
    /// Only non-negative integers are keys; anything else yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uint(raw) => Some(Self(*raw)),
            Value::Int(raw) => u64::try_from(*raw).ok().map(Self),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_value(self) -> Value {
        Value::Uint(self.0)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        key.to_value()
    }
}
