//! Dotted relationship-path resolution.
//!
//! `regions.parent.name` on `Dataset` resolves to two hops
//! (`Dataset -regions-> Locale`, `Locale -parent-> Locale AS Locale_1`) and a
//! terminal scalar `Locale_1.name`.


use crate::{
    PATH_SEPARATOR,
    db::{
        query::{FieldResolutionError, ResolutionFailure},
        registry::SchemaSource,
    },
    model::{
        entity::EntityModel,
        field::{EntityFieldKind, RelationModel},
    },
};
use std::fmt;

///
/// Scope
///
/// A row binding inside a compiled predicate. `Entity` is the plain table
/// binding; `Alias` is a fresh binding of the same table introduced so that a
/// chain can visit one entity more than once.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Scope {
    Entity(&'static str),
    Alias { entity: &'static str, id: u32 },
}

impl Scope {
    #[must_use]
    pub const fn entity(self) -> &'static str {
        match self {
            Self::Entity(entity) | Self::Alias { entity, .. } => entity,
        }
    }

    #[must_use]
    pub const fn is_alias(self) -> bool {
        matches!(self, Self::Alias { .. })
    }

    /// `Entity` or `Entity AS Entity_n`, as it would appear in a FROM list.
    #[must_use]
    pub fn declaration(self) -> String {
        match self {
            Self::Entity(entity) => entity.to_string(),
            Self::Alias { entity, .. } => format!("{entity} AS {self}"),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(entity) => write!(f, "{entity}"),
            Self::Alias { entity, id } => write!(f, "{entity}_{id}"),
        }
    }
}

///
/// AliasAllocator
///
/// Hands out alias ids for one compilation. Ids are never reused, so aliases
/// from different paths of the same condition tree stay distinct.
///

#[derive(Debug, Default)]
pub struct AliasAllocator {
    next: u32,
}

impl AliasAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub const fn fresh(&mut self, entity: &'static str) -> Scope {
        self.next += 1;

        Scope::Alias {
            entity,
            id: self.next,
        }
    }

    #[must_use]
    pub const fn allocated(&self) -> u32 {
        self.next
    }
}

///
/// Hop
///
/// One relationship traversal from a bound source row to target rows.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hop {
    pub source: Scope,
    pub relation: &'static str,
    pub target: Scope,
    pub model: &'static RelationModel,
}

///
/// ResolvedPath
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPath {
    /// Relationship hops in traversal order; empty for a plain column.
    pub hops: Vec<Hop>,
    /// Binding that owns the terminal field.
    pub scope: Scope,
    /// Terminal scalar field.
    pub field: &'static str,
}

impl ResolvedPath {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.hops.is_empty()
    }
}

/// Resolve a dotted field path against `base`.
///
/// Every segment but the last must name a relationship on the current entity;
/// the last must name a comparable scalar. A hop is aliased when its target
/// is the entity it starts from, or when the target is already bound earlier
/// in the chain.
pub fn resolve<S: SchemaSource + ?Sized>(
    schema: &S,
    base: &'static EntityModel,
    path: &str,
    aliases: &mut AliasAllocator,
) -> Result<ResolvedPath, FieldResolutionError> {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let (terminal, relations) = segments
        .split_last()
        .ok_or_else(|| failure(base, "", path, ResolutionFailure::EmptySegment))?;

    let mut model = base;
    let mut scope = Scope::Entity(base.entity_name);
    let mut bound = vec![scope];
    let mut hops = Vec::with_capacity(relations.len());

    for segment in relations {
        if segment.is_empty() {
            return Err(failure(model, segment, path, ResolutionFailure::EmptySegment));
        }

        let Some(field) = model.field(segment) else {
            return Err(failure(model, segment, path, ResolutionFailure::UnknownField));
        };
        let EntityFieldKind::Relation(relation) = &field.kind else {
            return Err(failure(model, segment, path, ResolutionFailure::NotRelation));
        };

        let target_model = schema
            .entity_model(relation.target_entity_name)
            .ok_or_else(|| {
                failure(
                    model,
                    segment,
                    path,
                    ResolutionFailure::UnknownTarget {
                        target: relation.target_entity_name.to_string(),
                    },
                )
            })?;

        let target_name = target_model.entity_name;
        let self_referential = target_name == model.entity_name;
        let revisits = bound.contains(&Scope::Entity(target_name));
        let target = if self_referential || revisits {
            aliases.fresh(target_name)
        } else {
            Scope::Entity(target_name)
        };

        hops.push(Hop {
            source: scope,
            relation: field.name,
            target,
            model: relation,
        });
        bound.push(target);
        scope = target;
        model = target_model;
    }

    if terminal.is_empty() {
        return Err(failure(model, terminal, path, ResolutionFailure::EmptySegment));
    }

    let field = match model.field(terminal) {
        Some(field) if field.kind.is_scalar() => field,
        Some(_) => return Err(failure(model, terminal, path, ResolutionFailure::NotScalar)),
        None => return Err(failure(model, terminal, path, ResolutionFailure::UnknownField)),
    };

    Ok(ResolvedPath {
        hops,
        scope,
        field: field.name,
    })
}

fn failure(
    model: &EntityModel,
    segment: &str,
    path: &str,
    reason: ResolutionFailure,
) -> FieldResolutionError {
    FieldResolutionError {
        entity: model.entity_name.to_string(),
        segment: segment.to_string(),
        path: path.to_string(),
        reason,
    }
}
