use crate::{
    db::store::{DecodeError, Row},
    key::Key,
    model::entity::EntityModel,
    value::Value,
};

///
/// EntityKind
///
/// A typed record with a statically declared model.
///

pub trait EntityKind: EntityValue + 'static {
    const MODEL: &'static EntityModel;

    fn key(&self) -> Key;
}

///
/// EntityValue
///
/// Field-level access used by the store to persist and rehydrate records.
///

pub trait EntityValue: Sized {
    /// Read a stored field by name; `None` when the entity has no such field.
    fn get_value(&self, field: &str) -> Option<Value>;

    /// Rebuild the entity from a stored row.
    fn from_row(row: &Row) -> Result<Self, DecodeError>;
}

///
/// HierarchyKind
///
/// Entity that forms a forest through a self-referential parent relation.
///

pub trait HierarchyKind: EntityKind {
    /// Text field used to look up the root of a closure.
    const NAME_FIELD: &'static str;

    /// `One` relationship pointing at the parent row.
    const PARENT_RELATION: &'static str;
}
