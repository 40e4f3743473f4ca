//! Fluent load-query builder over a session.

use crate::{
    db::{
        DbError, DbSession,
        query::{Condition, QueryError, QueryRows},
        registry::SchemaSource,
        store::RowSource,
    },
    traits::EntityKind,
};
use std::marker::PhantomData;

///
/// FluentLoadQuery
///
/// Session-bound load query wrapper. Filters accumulate with AND; nothing is
/// compiled until `explain`, `execute`, `entities` or `count` is called.
///

pub struct FluentLoadQuery<'a, S: ?Sized, E> {
    session: &'a DbSession<'a, S>,
    condition: Option<Condition>,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, S, E> FluentLoadQuery<'a, S, E>
where
    S: RowSource + SchemaSource + ?Sized,
    E: EntityKind,
{
    pub(crate) const fn new(session: &'a DbSession<'a, S>) -> Self {
        Self {
            session,
            condition: None,
            _marker: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Intent
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Add a condition; repeated calls are combined with AND.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.condition = Some(match self.condition.take() {
            Some(existing) => existing & condition,
            None => condition,
        });
        self
    }

    /// Add a condition given in its nested-list JSON form.
    pub fn filter_json(self, json: &str) -> Result<Self, QueryError> {
        let condition: Condition = json.parse()?;

        Ok(self.filter(condition))
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Compiled, normalized predicate as text.
    pub fn explain(&self) -> Result<String, QueryError> {
        let predicate = self.session.prepare::<E>(self.condition.as_ref())?;

        Ok(predicate.to_string())
    }

    pub fn execute(&self) -> Result<QueryRows<'a, S, E>, QueryError> {
        let predicate = self.session.prepare::<E>(self.condition.as_ref())?;

        Ok(self.session.scan(predicate))
    }

    pub fn entities(&self) -> Result<Vec<E>, DbError> {
        Ok(self.execute()?.entities()?)
    }

    pub fn count(&self) -> Result<usize, DbError> {
        let count = self
            .execute()?
            .try_fold(0usize, |count, row| row.map(|_| count + 1))?;

        Ok(count)
    }
}
