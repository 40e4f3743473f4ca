mod row;


use crate::{
    db::registry::{SchemaRegistry, SchemaSource},
    key::Key,
    model::entity::EntityModel,
    traits::EntityKind,
    value::Value,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

// re-exports
pub use row::{DecodeError, Row};

///
/// StoreError
///
/// Collaborator-level failures. The query engine passes these through
/// untouched.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("entity '{entity}' is not registered with this store")]
    UnknownEntity { entity: String },

    #[error("{entity} row {key} already exists")]
    DuplicateKey { entity: &'static str, key: Key },

    #[error("{entity} row {key} not found")]
    NotFound { entity: &'static str, key: Key },

    #[error("{entity}.{field} does not accept value {value}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("unique constraint {index} violated on {entity} by row {key}")]
    UniqueViolation {
        entity: &'static str,
        index: &'static str,
        key: Key,
    },

    #[error("failed to decode {entity} row {key}: {source}")]
    Decode {
        entity: &'static str,
        key: Key,
        source: DecodeError,
    },
}

///
/// RowSource
///
/// Read surface the query engine executes against.
///

pub trait RowSource {
    /// Fetch one row by key.
    fn row(&self, entity_name: &str, key: Key) -> Option<&Row>;

    /// Iterate every row of an entity in ascending key order.
    fn rows<'a>(&'a self, entity_name: &str) -> Box<dyn Iterator<Item = (Key, &'a Row)> + 'a>;
}

///
/// MemoryStore
///
/// In-memory record store: one key-ordered table per registered entity.
/// Enforces key uniqueness and the unique indexes declared on each model.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: SchemaRegistry,
    tables: BTreeMap<&'static str, BTreeMap<Key, Row>>,
}

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: SchemaRegistry::new(),
            tables: BTreeMap::new(),
        }
    }

    /// Register an entity type, creating its table.
    #[must_use]
    pub fn with_entity<E: EntityKind>(mut self) -> Self {
        self.register_model(E::MODEL);
        self
    }

    pub fn register_model(&mut self, model: &'static EntityModel) {
        if self.registry.register(model) {
            self.tables.insert(model.entity_name, BTreeMap::new());
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    pub fn insert<E: EntityKind>(&mut self, entity: &E) -> Result<Key, StoreError> {
        let key = entity.key();
        let row = Row::from_entity(entity);
        self.write_row(E::MODEL, key, row, WriteMode::Insert)?;

        Ok(key)
    }

    pub fn insert_all<'e, E: EntityKind>(
        &mut self,
        entities: impl IntoIterator<Item = &'e E>,
    ) -> Result<Vec<Key>, StoreError> {
        entities.into_iter().map(|entity| self.insert(entity)).collect()
    }

    /// Overwrite an existing row.
    pub fn replace<E: EntityKind>(&mut self, entity: &E) -> Result<(), StoreError> {
        let key = entity.key();
        let row = Row::from_entity(entity);

        self.write_row(E::MODEL, key, row, WriteMode::Replace)
    }

    /// Remove a row; returns whether it existed.
    pub fn delete<E: EntityKind>(&mut self, key: Key) -> Result<bool, StoreError> {
        let table = self.table_mut(E::MODEL.entity_name)?;

        Ok(table.remove(&key).is_some())
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn get<E: EntityKind>(&self, key: Key) -> Result<Option<E>, StoreError> {
        let table = self.table(E::MODEL.entity_name)?;

        table
            .get(&key)
            .map(|row| decode_row::<E>(key, row))
            .transpose()
    }

    /// Find the lowest-keyed row whose field equals `value`.
    pub fn find_by<E: EntityKind>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<E>, StoreError> {
        let value = value.into();
        let table = self.table(E::MODEL.entity_name)?;

        table
            .iter()
            .find(|(_, row)| row.get(field) == Some(&value))
            .map(|(key, row)| decode_row::<E>(*key, row))
            .transpose()
    }

    pub fn len<E: EntityKind>(&self) -> usize {
        self.tables
            .get(E::MODEL.entity_name)
            .map_or(0, BTreeMap::len)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn table(&self, entity_name: &str) -> Result<&BTreeMap<Key, Row>, StoreError> {
        self.tables
            .get(entity_name)
            .ok_or_else(|| StoreError::UnknownEntity {
                entity: entity_name.to_string(),
            })
    }

    fn table_mut(&mut self, entity_name: &str) -> Result<&mut BTreeMap<Key, Row>, StoreError> {
        self.tables
            .get_mut(entity_name)
            .ok_or_else(|| StoreError::UnknownEntity {
                entity: entity_name.to_string(),
            })
    }

    fn write_row(
        &mut self,
        model: &'static EntityModel,
        key: Key,
        row: Row,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        validate_row(model, &row)?;

        let table = self.table_mut(model.entity_name)?;
        match (mode, table.contains_key(&key)) {
            (WriteMode::Insert, true) => {
                return Err(StoreError::DuplicateKey {
                    entity: model.entity_name,
                    key,
                });
            }
            (WriteMode::Replace, false) => {
                return Err(StoreError::NotFound {
                    entity: model.entity_name,
                    key,
                });
            }
            _ => {}
        }

        check_unique_indexes(model, table, key, &row)?;
        table.insert(key, row);
        tracing::trace!(entity = model.entity_name, %key, "row written");

        Ok(())
    }
}

impl SchemaSource for MemoryStore {
    fn entity_model(&self, entity_name: &str) -> Option<&'static EntityModel> {
        self.registry.entity_model(entity_name)
    }
}

impl RowSource for MemoryStore {
    fn row(&self, entity_name: &str, key: Key) -> Option<&Row> {
        self.tables.get(entity_name)?.get(&key)
    }

    fn rows<'a>(&'a self, entity_name: &str) -> Box<dyn Iterator<Item = (Key, &'a Row)> + 'a> {
        match self.tables.get(entity_name) {
            Some(table) => Box::new(table.iter().map(|(key, row)| (*key, row))),
            None => Box::new(std::iter::empty()),
        }
    }
}

///
/// WriteMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WriteMode {
    Insert,
    Replace,
}

pub(crate) fn decode_row<E: EntityKind>(key: Key, row: &Row) -> Result<E, StoreError> {
    E::from_row(row).map_err(|source| StoreError::Decode {
        entity: E::MODEL.entity_name,
        key,
        source,
    })
}

fn validate_row(model: &'static EntityModel, row: &Row) -> Result<(), StoreError> {
    for field in model.stored_fields() {
        let value = row.get(field.name).unwrap_or(&Value::Null);
        if !field.kind.accepts(value) {
            return Err(StoreError::InvalidField {
                entity: model.entity_name,
                field: field.name,
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

// Null never collides, so rows with a null in any indexed field are exempt.
fn check_unique_indexes(
    model: &'static EntityModel,
    table: &BTreeMap<Key, Row>,
    key: Key,
    row: &Row,
) -> Result<(), StoreError> {
    for index in model.indexes.iter().filter(|index| index.unique) {
        let Some(tuple) = index_tuple(index.fields, row) else {
            continue;
        };

        let collides = table
            .iter()
            .filter(|(other_key, _)| **other_key != key)
            .any(|(_, other)| index_tuple(index.fields, other).as_ref() == Some(&tuple));

        if collides {
            tracing::debug!(entity = model.entity_name, index = index.name, %key, "unique violation");
            return Err(StoreError::UniqueViolation {
                entity: model.entity_name,
                index: index.name,
                key,
            });
        }
    }

    Ok(())
}

fn index_tuple<'r>(fields: &[&str], row: &'r Row) -> Option<Vec<&'r Value>> {
    fields
        .iter()
        .map(|field| row.get(field).filter(|value| !value.is_null()))
        .collect()
}
