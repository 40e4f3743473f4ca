//! Small entity set for unit tests: a `Node` forest, `Tag`s, and `Item`s
//! linked to both through key lists.

use crate::{
    db::store::{DecodeError, MemoryStore, Row},
    key::Key,
    model::{
        entity::EntityModel,
        field::{Cardinality, EntityFieldKind, EntityFieldModel, RelationModel},
        index::IndexModel,
    },
    traits::{EntityKind, EntityValue, HierarchyKind},
    value::Value,
};

fn keys_value(keys: &[Key]) -> Value {
    Value::List(keys.iter().map(|key| key.to_value()).collect())
}

///
/// Node
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub id: Key,
    pub label: String,
    pub parent_id: Option<Key>,
}

impl Node {
    pub fn new(id: u64, label: &str, parent: Option<u64>) -> Self {
        Self {
            id: Key::new(id),
            label: label.to_string(),
            parent_id: parent.map(Key::new),
        }
    }
}

static NODE_FIELDS: [EntityFieldModel; 5] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("label", EntityFieldKind::Text),
    EntityFieldModel::new("parent_id", EntityFieldKind::Uint),
    EntityFieldModel::new(
        "parent",
        EntityFieldKind::Relation(RelationModel::forward("Node", Cardinality::One, "parent_id")),
    ),
    EntityFieldModel::new(
        "children",
        EntityFieldKind::Relation(RelationModel::reverse("Node", Cardinality::Many, "parent_id")),
    ),
];

static NODE_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Node",
    entity_name: "Node",
    primary_key: &NODE_FIELDS[0],
    fields: &NODE_FIELDS,
    indexes: &[],
};

impl EntityKind for Node {
    const MODEL: &'static EntityModel = &NODE_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Node {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "label" => Some(Value::from(self.label.as_str())),
            "parent_id" => Some(self.parent_id.into()),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.key("id")?,
            label: row.text("label")?,
            parent_id: row.opt_key("parent_id")?,
        })
    }
}

impl HierarchyKind for Node {
    const NAME_FIELD: &'static str = "label";
    const PARENT_RELATION: &'static str = "parent";
}

///
/// Tag
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    pub id: Key,
    pub name: String,
}

impl Tag {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
        }
    }
}

static TAG_FIELDS: [EntityFieldModel; 3] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new(
        "items",
        EntityFieldKind::Relation(RelationModel::reverse("Item", Cardinality::Many, "tag_ids")),
    ),
];

static TAG_NAME_UNIQUE: IndexModel = IndexModel::unique("tag_name", &["name"]);

static TAG_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Tag",
    entity_name: "Tag",
    primary_key: &TAG_FIELDS[0],
    fields: &TAG_FIELDS,
    indexes: &[&TAG_NAME_UNIQUE],
};

impl EntityKind for Tag {
    const MODEL: &'static EntityModel = &TAG_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Tag {
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
/// Item
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub id: Key,
    pub name: String,
    pub score: Option<i64>,
    pub tag_ids: Vec<Key>,
    pub node_ids: Vec<Key>,
}

impl Item {
    pub fn new(id: u64, name: &str, score: Option<i64>, tags: &[u64], nodes: &[u64]) -> Self {
        Self {
            id: Key::new(id),
            name: name.to_string(),
            score,
            tag_ids: tags.iter().copied().map(Key::new).collect(),
            node_ids: nodes.iter().copied().map(Key::new).collect(),
        }
    }
}

static ITEM_FIELDS: [EntityFieldModel; 7] = [
    EntityFieldModel::new("id", EntityFieldKind::Uint),
    EntityFieldModel::new("name", EntityFieldKind::Text),
    EntityFieldModel::new("score", EntityFieldKind::Int),
    EntityFieldModel::new("tag_ids", EntityFieldKind::Keys),
    EntityFieldModel::new("node_ids", EntityFieldKind::Keys),
    EntityFieldModel::new(
        "tags",
        EntityFieldKind::Relation(RelationModel::forward("Tag", Cardinality::Many, "tag_ids")),
    ),
    EntityFieldModel::new(
        "nodes",
        EntityFieldKind::Relation(RelationModel::forward("Node", Cardinality::Many, "node_ids")),
    ),
];

static ITEM_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Item",
    entity_name: "Item",
    primary_key: &ITEM_FIELDS[0],
    fields: &ITEM_FIELDS,
    indexes: &[],
};

impl EntityKind for Item {
    const MODEL: &'static EntityModel = &ITEM_MODEL;

    fn key(&self) -> Key {
        self.id
    }
}

impl EntityValue for Item {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(Value::from(self.name.as_str())),
            "score" => Some(self.score.into()),
            "tag_ids" => Some(keys_value(&self.tag_ids)),
            "node_ids" => Some(keys_value(&self.node_ids)),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        let score = match row.get("score") {
            Some(Value::Int(v)) => Some(*v),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(DecodeError::TypeMismatch {
                    field: "score".to_string(),
                    expected: "int",
                });
            }
        };

        Ok(Self {
            id: row.key("id")?,
            name: row.text("name")?,
            score,
            tag_ids: row.keys("tag_ids")?,
            node_ids: row.keys("node_ids")?,
        })
    }
}

/// Empty store with every fixture entity registered.
pub fn empty_store() -> MemoryStore {
    MemoryStore::new()
        .with_entity::<Node>()
        .with_entity::<Tag>()
        .with_entity::<Item>()
}

/// Seeded store.
///
/// Nodes: root(1) → {a(2), b(3)}; a → {a1(4), a2(5)}; b → {b1(6)}; lone(7).
/// Tags: red(1), blue(2), green(3).
/// Items:
///   one(1)   score 10  tags {red}        nodes {a}
///   two(2)   score 20  tags {red, blue}  nodes {root, a1}
///   three(3) score -    tags {blue}       nodes {b1}
///   four(4)  score 5   tags {}           nodes {}
pub fn seeded_store() -> MemoryStore {
    let mut store = empty_store();

    let nodes = [
        Node::new(1, "root", None),
        Node::new(2, "a", Some(1)),
        Node::new(3, "b", Some(1)),
        Node::new(4, "a1", Some(2)),
        Node::new(5, "a2", Some(2)),
        Node::new(6, "b1", Some(3)),
        Node::new(7, "lone", None),
    ];
    let tags = [Tag::new(1, "red"), Tag::new(2, "blue"), Tag::new(3, "green")];
    let items = [
        Item::new(1, "one", Some(10), &[1], &[2]),
        Item::new(2, "two", Some(20), &[1, 2], &[1, 4]),
        Item::new(3, "three", None, &[2], &[6]),
        Item::new(4, "four", Some(5), &[], &[]),
    ];

    for node in &nodes {
        store.insert(node).expect("node seed should insert");
    }
    for tag in &tags {
        store.insert(tag).expect("tag seed should insert");
    }
    for item in &items {
        store.insert(item).expect("item seed should insert");
    }

    store
}
