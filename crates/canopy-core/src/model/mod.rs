//! Runtime data model definitions.
//!
//! Each entity declares a static `EntityModel` listing its fields. Scalar
//! fields carry a value shape; relationship fields carry their target entity,
//! cardinality, and where the linking keys live. This is the metadata the
//! path resolver and the hierarchy engine consult; nothing is discovered by
//! reflection.
//!
//! In general:
//! - entity crates define *what exists*
//! - `model` defines *what the engine reads*
pub mod entity;
pub mod field;
pub mod index;
