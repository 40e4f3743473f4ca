//! Core runtime for Canopy: entity models, values, the in-memory record store,
//! hierarchy closure, and the relationship-aware condition compiler.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod key;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Field-path separator used by relationship paths (`regions.parent.name`).
pub const PATH_SEPARATOR: char = '.';

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::query::{CompareOp, Condition},
        key::Key,
        model::{
            entity::EntityModel,
            field::{Cardinality, EntityFieldKind, EntityFieldModel, RelationSource},
        },
        traits::{EntityKind, EntityValue, HierarchyKind},
        value::Value,
    };
}
