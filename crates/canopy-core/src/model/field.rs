use crate::value::Value;
use std::fmt;

///
/// EntityFieldModel
/// Runtime field metadata used by path resolution and the store.
///

#[derive(Debug)]
pub struct EntityFieldModel {
    /// Field name as used in conditions and relationship paths.
    pub name: &'static str,
    /// Runtime shape of the field.
    pub kind: EntityFieldKind,
}

impl EntityFieldModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: EntityFieldKind) -> Self {
        Self { name, kind }
    }
}

///
/// EntityFieldKind
///
/// Scalar kinds are comparable in conditions. `Keys` holds the key list that
/// backs a many-relationship and is storage only. `Relation` is a virtual
/// attribute: it stores nothing itself and is only traversable.
///

#[derive(Debug)]
pub enum EntityFieldKind {
    // Scalar primitives
    Bool,
    Float64,
    Int,
    Text,
    Uint,

    /// List of foreign keys.
    Keys,

    /// Traversable relationship.
    Relation(RelationModel),
}

impl EntityFieldKind {
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Float64 | Self::Int | Self::Text | Self::Uint
        )
    }

    #[must_use]
    pub const fn relation(&self) -> Option<&RelationModel> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// Whether a stored value has the shape this field expects.
    ///
    /// `Null` is accepted for every stored kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Relation(_), _) => false,
            (_, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Float64, Value::Float64(_))
            | (Self::Int, Value::Int(_))
            | (Self::Text, Value::Text(_))
            | (Self::Uint, Value::Uint(_)) => true,
            (Self::Keys, Value::List(items)) => items.iter().all(|v| matches!(v, Value::Uint(_))),
            _ => false,
        }
    }

    /// Whether the field is persisted on the row.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        !matches!(self, Self::Relation(_))
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Many => write!(f, "many"),
        }
    }
}

///
/// RelationSource
///
/// Where the keys linking source and target rows are stored.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationSource {
    /// The named field on the source row holds the target key(s): a `Uint`
    /// (or `Null`) for `One`, a key list for `Many`.
    Forward { key_field: &'static str },

    /// Target rows whose named field holds the source key are related.
    Reverse { key_field: &'static str },
}

///
/// RelationModel
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub target_entity_name: &'static str,
    pub cardinality: Cardinality,
    pub source: RelationSource,
}

impl RelationModel {
    /// Relation whose key(s) are stored on the source row.
    #[must_use]
    pub const fn forward(
        target_entity_name: &'static str,
        cardinality: Cardinality,
        key_field: &'static str,
    ) -> Self {
        Self {
            target_entity_name,
            cardinality,
            source: RelationSource::Forward { key_field },
        }
    }

    /// Inverse of a forward relation declared on the target entity.
    #[must_use]
    pub const fn reverse(
        target_entity_name: &'static str,
        cardinality: Cardinality,
        key_field: &'static str,
    ) -> Self {
        Self {
            target_entity_name,
            cardinality,
            source: RelationSource::Reverse { key_field },
        }
    }
}
