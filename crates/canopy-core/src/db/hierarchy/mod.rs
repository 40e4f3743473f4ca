//! Hierarchy closure over self-referential entities.
//!
//! Breadth-first frontier expansion from a named root: the root is level 1,
//! its children level 2, and so on until a frontier comes back empty.


use crate::{
    db::{registry::SchemaSource, store::RowSource},
    error::InternalError,
    key::Key,
    model::{
        entity::EntityModel,
        field::{Cardinality, EntityFieldKind, RelationSource},
    },
    obs::sink::{self, MetricsEvent, MetricsSink},
    traits::HierarchyKind,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

///
/// HierarchyError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum HierarchyError {
    #[error("entity '{entity}' is not registered with this store")]
    UnknownEntity { entity: String },

    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: String, field: String },

    #[error("{entity}.{field} is not a text field")]
    NameNotText { entity: String, field: String },

    #[error("{entity}.{relation} is not a forward one-relationship to {entity}")]
    NotSelfReferential { entity: String, relation: String },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

///
/// ClosureRow
///
/// One node of a closure. `level` is 1 for the root and grows by one per
/// hop down the tree.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClosureRow {
    pub id: Key,
    pub name: String,
    pub parent_id: Option<Key>,
    pub level: u32,
}

impl ClosureRow {
    /// Two spaces per level below the root.
    #[must_use]
    pub fn indent(&self) -> String {
        "  ".repeat(self.level.saturating_sub(1) as usize)
    }
}

impl fmt::Display for ClosureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} (level {})", self.indent(), self.name, self.level)
    }
}

///
/// Node
///

struct Node {
    name: Option<String>,
    parent: Option<Key>,
}

/// Every descendant of the node named `root_name`, with levels.
///
/// Ordered by level, then by ascending key. An unknown root yields an empty
/// result. When several nodes share the name the lowest key wins. Each node
/// appears at most once even if the parent links form a cycle.
pub fn closure<S, E>(
    store: &S,
    root_name: &str,
    metrics: Option<&dyn MetricsSink>,
) -> Result<Vec<ClosureRow>, HierarchyError>
where
    S: RowSource + SchemaSource + ?Sized,
    E: HierarchyKind,
{
    let model = E::MODEL;
    if store.entity_model(model.entity_name).is_none() {
        return Err(HierarchyError::UnknownEntity {
            entity: model.entity_name.to_string(),
        });
    }
    let parent_field = parent_key_field(model, E::PARENT_RELATION)?;
    check_name_field(model, E::NAME_FIELD)?;

    let nodes = load_nodes(store, model, E::NAME_FIELD, parent_field)?;

    let Some(root) = nodes
        .iter()
        .find(|(_, node)| node.name.as_deref() == Some(root_name))
        .map(|(key, _)| *key)
    else {
        debug!(entity = model.entity_name, root = root_name, "closure root not found");
        return Ok(Vec::new());
    };

    // parent → children, each list ascending because `nodes` is key-ordered
    let mut children: BTreeMap<Key, Vec<Key>> = BTreeMap::new();
    for (key, node) in &nodes {
        if let Some(parent) = node.parent {
            children.entry(parent).or_default().push(*key);
        }
    }

    let mut out = Vec::new();
    let mut visited = BTreeSet::from([root]);
    let mut frontier = vec![root];
    let mut level = 1u32;

    while !frontier.is_empty() {
        let mut next = Vec::new();

        for key in &frontier {
            let Some(node) = nodes.get(key) else {
                continue;
            };
            out.push(ClosureRow {
                id: *key,
                name: node.name.clone().unwrap_or_default(),
                parent_id: node.parent,
                level,
            });

            for child in children.get(key).into_iter().flatten() {
                if visited.insert(*child) {
                    next.push(*child);
                } else {
                    warn!(
                        entity = model.entity_name,
                        node = %child,
                        parent = %key,
                        "hierarchy cycle detected; node already visited"
                    );
                }
            }
        }

        next.sort_unstable();
        frontier = next;
        level += 1;
    }

    debug!(
        entity = model.entity_name,
        root = root_name,
        nodes = out.len(),
        depth = level - 1,
        "closure expanded"
    );
    sink::record(
        metrics,
        MetricsEvent::ClosureExpanded {
            entity_path: model.path,
            nodes: u64::try_from(out.len()).unwrap_or(u64::MAX),
        },
    );

    Ok(out)
}

// The parent relation must be a forward `One` relationship onto the same
// entity; its key field is what the scan reads.
fn parent_key_field(
    model: &EntityModel,
    relation: &'static str,
) -> Result<&'static str, HierarchyError> {
    let field = model
        .field(relation)
        .ok_or_else(|| HierarchyError::UnknownField {
            entity: model.entity_name.to_string(),
            field: relation.to_string(),
        })?;

    match field.kind.relation() {
        Some(rel)
            if rel.target_entity_name == model.entity_name
                && rel.cardinality == Cardinality::One =>
        {
            match rel.source {
                RelationSource::Forward { key_field } => Ok(key_field),
                RelationSource::Reverse { .. } => Err(not_self_referential(model, relation)),
            }
        }
        _ => Err(not_self_referential(model, relation)),
    }
}

fn not_self_referential(model: &EntityModel, relation: &str) -> HierarchyError {
    HierarchyError::NotSelfReferential {
        entity: model.entity_name.to_string(),
        relation: relation.to_string(),
    }
}

fn check_name_field(model: &EntityModel, name_field: &str) -> Result<(), HierarchyError> {
    match model.field(name_field).map(|field| &field.kind) {
        Some(EntityFieldKind::Text) => Ok(()),
        Some(_) => Err(HierarchyError::NameNotText {
            entity: model.entity_name.to_string(),
            field: name_field.to_string(),
        }),
        None => Err(HierarchyError::UnknownField {
            entity: model.entity_name.to_string(),
            field: name_field.to_string(),
        }),
    }
}

fn load_nodes<S: RowSource + ?Sized>(
    store: &S,
    model: &EntityModel,
    name_field: &str,
    parent_field: &str,
) -> Result<BTreeMap<Key, Node>, InternalError> {
    store
        .rows(model.entity_name)
        .map(|(key, row)| {
            let name = match row.get(name_field) {
                Some(Value::Text(name)) => Some(name.clone()),
                Some(Value::Null) | None => None,
                Some(other) => {
                    return Err(InternalError::hierarchy_corruption(format!(
                        "{} row {key}: {name_field} holds {other}",
                        model.entity_name
                    )));
                }
            };
            let parent = match row.get(parent_field) {
                Some(Value::Null) | None => None,
                Some(value) => Some(Key::from_value(value).ok_or_else(|| {
                    InternalError::hierarchy_corruption(format!(
                        "{} row {key}: {parent_field} holds {value}",
                        model.entity_name
                    ))
                })?),
            };

            Ok((key, Node { name, parent }))
        })
        .collect()
}
