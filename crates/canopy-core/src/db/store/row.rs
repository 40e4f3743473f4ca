use crate::{
    key::Key,
    traits::EntityKind,
    value::Value,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// DecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("field '{field}' is missing from the stored row")]
    MissingField { field: String },

    #[error("field '{field}' does not hold a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
}

impl DecodeError {
    fn mismatch(field: &str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}

///
/// Row
///
/// Type-erased stored record: field name to value.
/// Relationship attributes are never stored; only their key fields are.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: BTreeMap<&'static str, Value>,
}

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Snapshot every stored field of an entity. Missing fields become `Null`.
    #[must_use]
    pub fn from_entity<E: EntityKind>(entity: &E) -> Self {
        let fields = E::MODEL
            .stored_fields()
            .map(|field| (field.name, entity.get_value(field.name).unwrap_or(Value::Null)))
            .collect();

        Self { fields }
    }

    #[must_use]
    pub fn with(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    fn require(&self, field: &str) -> Result<&Value, DecodeError> {
        self.get(field).ok_or_else(|| DecodeError::MissingField {
            field: field.to_string(),
        })
    }

    // ---------------------------------------------------------------------
    // Typed readers used by `EntityValue::from_row`
    // ---------------------------------------------------------------------

    pub fn text(&self, field: &str) -> Result<String, DecodeError> {
        self.opt_text(field)?
            .ok_or_else(|| DecodeError::mismatch(field, "text"))
    }

    pub fn opt_text(&self, field: &str) -> Result<Option<String>, DecodeError> {
        match self.require(field)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            _ => Err(DecodeError::mismatch(field, "text")),
        }
    }

    pub fn key(&self, field: &str) -> Result<Key, DecodeError> {
        self.opt_key(field)?
            .ok_or_else(|| DecodeError::mismatch(field, "key"))
    }

    pub fn opt_key(&self, field: &str) -> Result<Option<Key>, DecodeError> {
        match self.require(field)? {
            Value::Null => Ok(None),
            value => Key::from_value(value)
                .map(Some)
                .ok_or_else(|| DecodeError::mismatch(field, "key")),
        }
    }

    pub fn keys(&self, field: &str) -> Result<Vec<Key>, DecodeError> {
        match self.require(field)? {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items
                .iter()
                .map(|item| Key::from_value(item).ok_or_else(|| DecodeError::mismatch(field, "key")))
                .collect(),
            _ => Err(DecodeError::mismatch(field, "key list")),
        }
    }
}
