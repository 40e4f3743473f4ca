//! Relationship-aware condition queries.
//!
//! Pipeline: `Condition` (parsed or built) → `compile` against the base entity
//! model → `normalize` → row-by-row evaluation over a full scan of the base
//! entity.

pub mod condition;
pub mod fluent;
pub mod path;
pub mod predicate;
pub mod rows;

use thiserror::Error as ThisError;

// re-exports
pub use condition::{Condition, Leaf};
pub use fluent::FluentLoadQuery;
pub use path::{AliasAllocator, Hop, ResolvedPath, Scope};
pub use predicate::{CompareOp, ComparePredicate, ExistsPredicate, Predicate};
pub use rows::QueryRows;

///
/// QueryError
///
/// Everything that can reject a query before a single row is read.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error(transparent)]
    FieldResolution(#[from] FieldResolutionError),

    #[error(transparent)]
    MalformedCondition(#[from] MalformedConditionError),

    #[error(transparent)]
    UnsupportedOperator(#[from] UnsupportedOperatorError),

    #[error("entity '{entity}' is not registered with this store")]
    UnknownEntity { entity: String },
}

///
/// FieldResolutionError
///
/// A field path segment did not resolve against the entity it was applied to.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("cannot resolve '{segment}' on {entity} in path '{path}': {reason}")]
pub struct FieldResolutionError {
    pub entity: String,
    pub segment: String,
    pub path: String,
    pub reason: ResolutionFailure,
}

///
/// ResolutionFailure
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolutionFailure {
    #[error("unknown field")]
    UnknownField,

    #[error("field is not a relationship")]
    NotRelation,

    #[error("field is not a comparable scalar")]
    NotScalar,

    #[error("empty path segment")]
    EmptySegment,

    #[error("relationship target '{target}' is not registered")]
    UnknownTarget { target: String },
}

///
/// UnsupportedOperatorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unsupported operator '{op}'")]
pub struct UnsupportedOperatorError {
    pub op: String,
}

///
/// MalformedConditionError
///
/// Shape violations in a condition tree.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MalformedConditionError {
    #[error("condition is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("condition must be a non-empty list")]
    NotAList,

    #[error("NOT expects exactly one operand, got {got}")]
    NotArity { got: usize },

    #[error("{op} expects at least one operand")]
    EmptyCombinator { op: &'static str },

    #[error("leaf condition expects (field, operator, value), got {got} elements")]
    LeafArity { got: usize },

    #[error("leaf field must be a non-empty string")]
    InvalidField,

    #[error("leaf operator must be a string")]
    InvalidOperator,

    #[error("value for '{field}' is not a supported literal")]
    UnsupportedLiteral { field: String },

    #[error("'in' on '{field}' requires a list literal")]
    InRequiresList { field: String },

    #[error("'{op}' on '{field}' does not accept a list literal")]
    UnexpectedList { field: String, op: CompareOp },

    #[error("'like' on '{field}' requires a text pattern")]
    LikeRequiresText { field: String },
}
