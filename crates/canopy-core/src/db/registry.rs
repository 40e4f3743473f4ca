use crate::model::entity::{Attribute, EntityModel};
use std::collections::BTreeMap;

///
/// SchemaSource
///
/// Relationship metadata provider: resolves entity names to their models.
///

pub trait SchemaSource {
    fn entity_model(&self, entity_name: &str) -> Option<&'static EntityModel>;

    /// Look up one attribute of one entity.
    fn attribute(&self, entity_name: &str, name: &str) -> Option<Attribute> {
        self.entity_model(entity_name)?.attribute(name)
    }
}

///
/// SchemaRegistry
///
/// Name-keyed set of entity models known to a store.
///

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    models: BTreeMap<&'static str, &'static EntityModel>,
}

impl SchemaRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Register a model; returns `false` if the name was already taken.
    pub fn register(&mut self, model: &'static EntityModel) -> bool {
        if self.models.contains_key(model.entity_name) {
            return false;
        }
        self.models.insert(model.entity_name, model);

        true
    }

    pub fn models(&self) -> impl Iterator<Item = &'static EntityModel> + '_ {
        self.models.values().copied()
    }
}

impl SchemaSource for SchemaRegistry {
    fn entity_model(&self, entity_name: &str) -> Option<&'static EntityModel> {
        self.models.get(entity_name).copied()
    }
}
