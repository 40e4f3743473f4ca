pub mod hierarchy;
pub mod query;
pub mod registry;
pub mod session;
pub mod store;

use crate::{
    db::{hierarchy::HierarchyError, query::QueryError, store::StoreError},
    error::InternalError,
};
use thiserror::Error as ThisError;

// re-exports
pub use hierarchy::ClosureRow;
pub use registry::{SchemaRegistry, SchemaSource};
pub use session::{DbSession, SessionConfig};
pub use store::{MemoryStore, Row, RowSource};

///
/// DbError
///

#[derive(Debug, ThisError)]
pub enum DbError {
    #[error(transparent)]
    HierarchyError(#[from] HierarchyError),

    #[error(transparent)]
    InternalError(#[from] InternalError),

    #[error(transparent)]
    QueryError(#[from] QueryError),

    #[error(transparent)]
    StoreError(#[from] StoreError),
}
