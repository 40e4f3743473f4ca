//! Shared entities and seed data for Canopy integration tests.
//!
//! `Dataset` rows link to `Category`, `Locale` and `Principal` rows through
//! key lists; `Locale` forms a forest through `parent_id`.

use canopy_core::{
    db::{
        MemoryStore, Row,
        store::{DecodeError, StoreError},
    },
    key::Key,
    model::{
        entity::EntityModel,
        field::{Cardinality, EntityFieldKind, EntityFieldModel, RelationModel},
        index::IndexModel,
    },
    traits::{EntityKind, EntityValue, HierarchyKind},
    value::Value,
};

fn keys(raw: &[u64]) -> Vec<Key> {
    raw.iter().copied().map(Key::new).collect()
}

fn keys_value(keys: &[Key]) -> Value {
    Value::List(keys.iter().map(|key| key.to_value()).collect())
}

///
/// Category
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Category {
    pub id: Key,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
        }
    }
}

static CATEGORY_FIELDS: [EntityFieldModel; 3] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new(
        "datasets",
        EntityFieldKind::Relation(RelationModel::reverse(
            "Dataset",
            Cardinality::Many,
            "asset_class_ids",
        )),
    ),
];

static CATEGORY_MODEL: EntityModel = EntityModel {
    path: "canopy_testing_fixtures::Category",
    entity_name: "Category",
    primary_key: &CATEGORY_FIELDS[0],
    fields: &CATEGORY_FIELDS,
    indexes: &[],
};

impl EntityKind for Category {
    const MODEL: &'static EntityModel = &CATEGORY_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Category {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(Value::from(self.name.as_str())),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.key("id")?,
            name: row.text("name")?,
        })
    }
}

///
/// Locale
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Locale {
    pub id: Key,
    pub name: String,
    pub parent_id: Option<Key>,
}

impl Locale {
    #[must_use]
    pub fn new(id: u64, name: &str, parent: Option<u64>) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
            parent_id: parent.map(Key::new),
        }
    }
}

static LOCALE_FIELDS: [EntityFieldModel; 6] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new("parent_id", EntityFieldKind::Uint),
    EntityFieldModel::new(
        "parent",
        EntityFieldKind::Relation(RelationModel::forward(
            "Locale",
            Cardinality::One,
            "parent_id",
        )),
    ),
    EntityFieldModel::new(
        "children",
        EntityFieldKind::Relation(RelationModel::reverse(
            "Locale",
            Cardinality::Many,
            "parent_id",
        )),
    ),
    EntityFieldModel::new(
        "datasets",
        EntityFieldKind::Relation(RelationModel::reverse(
            "Dataset",
            Cardinality::Many,
            "region_ids",
        )),
    ),
];

static LOCALE_MODEL: EntityModel = EntityModel {
    path: "canopy_testing_fixtures::Locale",
    entity_name: "Locale",
    primary_key: &LOCALE_FIELDS[0],
    fields: &LOCALE_FIELDS,
    indexes: &[],
};

impl EntityKind for Locale {
    const MODEL: &'static EntityModel = &LOCALE_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Locale {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(Value::from(self.name.as_str())),
            "parent_id" => Some(self.parent_id.into()),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.key("id")?,
            name: row.text("name")?,
            parent_id: row.opt_key("parent_id")?,
        })
    }
}

impl HierarchyKind for Locale {
    const NAME_FIELD: &'static str = "name";
    const PARENT_RELATION: &'static str = "parent";
}

///
/// Principal
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Principal {
    pub id: Key,
    pub name: String,
}

impl Principal {
    #[must_use]
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
        }
    }
}

static PRINCIPAL_FIELDS: [EntityFieldModel; 3] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new(
        "datasets",
        EntityFieldKind::Relation(RelationModel::reverse(
            "Dataset",
            Cardinality::Many,
            "maintainer_ids",
        )),
    ),
];

static PRINCIPAL_NAME_UNIQUE: IndexModel = IndexModel::unique("principal_name", &["name"]);

static PRINCIPAL_MODEL: EntityModel = EntityModel {
    path: "canopy_testing_fixtures::Principal",
    entity_name: "Principal",
    primary_key: &PRINCIPAL_FIELDS[0],
    fields: &PRINCIPAL_FIELDS,
    indexes: &[&PRINCIPAL_NAME_UNIQUE],
};

impl EntityKind for Principal {
    const MODEL: &'static EntityModel = &PRINCIPAL_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Principal {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(Value::from(self.name.as_str())),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.key("id")?,
            name: row.text("name")?,
        })
    }
}

///
/// Dataset
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dataset {
    pub id: Key,
    pub name: String,
    pub description: Option<String>,
    pub asset_class_ids: Vec<Key>,
    pub region_ids: Vec<Key>,
    pub maintainer_ids: Vec<Key>,
}

impl Dataset {
    #[must_use]
    pub fn new(id: u64, name: &str, description: Option<&str>) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
            description: description.map(str::to_string),
            asset_class_ids: Vec::new(),
            region_ids: Vec::new(),
            maintainer_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn asset_classes(mut self, ids: &[u64]) -> Self {
        self.asset_class_ids = keys(ids);
        self
    }

    #[must_use]
    pub fn regions(mut self, ids: &[u64]) -> Self {
        self.region_ids = keys(ids);
        self
    }

    #[must_use]
    pub fn maintainers(mut self, ids: &[u64]) -> Self {
        self.maintainer_ids = keys(ids);
        self
    }
}

static DATASET_FIELDS: [EntityFieldModel; 9] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new("description", EntityFieldKind::Text),
    EntityFieldModel::new("asset_class_ids", EntityFieldKind::Keys),
    EntityFieldModel::new("region_ids", EntityFieldKind::Keys),
    EntityFieldModel::new("maintainer_ids", EntityFieldKind::Keys),
    EntityFieldModel::new(
        "asset_classes",
        EntityFieldKind::Relation(RelationModel::forward(
            "Category",
            Cardinality::Many,
            "asset_class_ids",
        )),
    ),
    EntityFieldModel::new(
        "regions",
        EntityFieldKind::Relation(RelationModel::forward(
            "Locale",
            Cardinality::Many,
            "region_ids",
        )),
    ),
    EntityFieldModel::new(
        "maintainers",
        EntityFieldKind::Relation(RelationModel::forward(
            "Principal",
            Cardinality::Many,
            "maintainer_ids",
        )),
    ),
];

static DATASET_MODEL: EntityModel = EntityModel {
    path: "canopy_testing_fixtures::Dataset",
    entity_name: "Dataset",
    primary_key: &DATASET_FIELDS[0],
    fields: &DATASET_FIELDS,
    indexes: &[],
};

impl EntityKind for Dataset {
    const MODEL: &'static EntityModel = &DATASET_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Dataset {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(Value::from(self.name.as_str())),
            "description" => Some(self.description.clone().into()),
            "asset_class_ids" => Some(keys_value(&self.asset_class_ids)),
            "region_ids" => Some(keys_value(&self.region_ids)),
            "maintainer_ids" => Some(keys_value(&self.maintainer_ids)),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.key("id")?,
            name: row.text("name")?,
            description: row.opt_text("description")?,
            asset_class_ids: row.keys("asset_class_ids")?,
            region_ids: row.keys("region_ids")?,
            maintainer_ids: row.keys("maintainer_ids")?,
        })
    }
}

// ---------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------

/// Empty store with every fixture entity registered.
#[must_use]
pub fn store() -> MemoryStore {
    MemoryStore::new()
        .with_entity::<Category>()
        .with_entity::<Locale>()
        .with_entity::<Principal>()
        .with_entity::<Dataset>()
}

/// The four-dataset sample.
///
/// Categories: Commodities(1), Equities(2), Real Estate(3).
/// Locales: North America(1) → {US(2), Canada(3)}; Europe(4).
/// Principals: user1(1), user2(2).
pub fn sample_store() -> Result<MemoryStore, StoreError> {
    let mut store = store();

    store.insert_all(&[
        Category::new(1, "Commodities"),
        Category::new(2, "Equities"),
        Category::new(3, "Real Estate"),
    ])?;
    store.insert_all(&[
        Locale::new(1, "North America", None),
        Locale::new(2, "US", Some(1)),
        Locale::new(3, "Canada", Some(1)),
        Locale::new(4, "Europe", None),
    ])?;
    store.insert_all(&[Principal::new(1, "user1"), Principal::new(2, "user2")])?;
    store.insert_all(&[
        Dataset::new(1, "US Commodities", Some("Commodity prices in the US"))
            .asset_classes(&[1])
            .regions(&[2])
            .maintainers(&[1]),
        Dataset::new(2, "Global Equities", Some("World-wide stock prices"))
            .asset_classes(&[2])
            .regions(&[1, 4])
            .maintainers(&[2]),
        Dataset::new(3, "NA Real Estate", Some("Real estate data for North America"))
            .asset_classes(&[3])
            .regions(&[2, 3])
            .maintainers(&[1]),
        Dataset::new(4, "Mixed Assets", Some("Various asset types"))
            .asset_classes(&[1, 2])
            .regions(&[1])
            .maintainers(&[1, 2]),
    ])?;

    Ok(store)
}

/// Three-level locale tree.
///
/// North America(1) → {US(2), Canada(3)}; US → {NY(4), CA(5)};
/// Canada → {Ontario(6), Quebec(7)}.
pub fn region_tree_store() -> Result<MemoryStore, StoreError> {
    let mut store = store();

    store.insert_all(&[
        Locale::new(1, "North America", None),
        Locale::new(2, "US", Some(1)),
        Locale::new(3, "Canada", Some(1)),
        Locale::new(4, "NY", Some(2)),
        Locale::new(5, "CA", Some(2)),
        Locale::new(6, "Ontario", Some(3)),
        Locale::new(7, "Quebec", Some(3)),
    ])?;

    Ok(store)
}

/// Names of `rows`, in order.
#[must_use]
pub fn names<'a>(rows: impl IntoIterator<Item = &'a Dataset>) -> Vec<&'a str> {
    rows.into_iter().map(|row| row.name.as_str()).collect()
}
