use crate::model::{
    field::{EntityFieldKind, EntityFieldModel, RelationModel},
    index::IndexModel,
};

///
/// EntityModel
/// Statically declared runtime model for one entity.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for diagnostics).
    pub path: &'static str,
    /// Stable external name used in scopes and the store.
    pub entity_name: &'static str,
    /// Primary key field (points at an entry in `fields`).
    pub primary_key: &'static EntityFieldModel,
    /// Ordered field list, relationship attributes included.
    pub fields: &'static [EntityFieldModel],
    /// Uniqueness constraints.
    pub indexes: &'static [&'static IndexModel],
}

impl EntityModel {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static EntityFieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Typed attribute lookup used by path resolution.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Attribute> {
        let field = self.field(name)?;

        Some(match &field.kind {
            EntityFieldKind::Relation(relation) => Attribute::Relation(relation),
            kind => Attribute::Column(kind),
        })
    }

    /// Fields persisted on each row.
    pub fn stored_fields(&self) -> impl Iterator<Item = &'static EntityFieldModel> {
        self.fields.iter().filter(|field| field.kind.is_stored())
    }

    /// Relationship attributes with their names.
    pub fn relations(&self) -> impl Iterator<Item = (&'static str, &'static RelationModel)> {
        self.fields
            .iter()
            .filter_map(|field| field.kind.relation().map(|rel| (field.name, rel)))
    }
}

///
/// Attribute
///
/// Result of an attribute lookup: a stored column or a relationship.
///

#[derive(Clone, Copy, Debug)]
pub enum Attribute {
    Column(&'static EntityFieldKind),
    Relation(&'static RelationModel),
}
