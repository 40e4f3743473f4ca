use crate::{
    db::{
        query::{Scope, predicate::{Evaluator, Predicate}},
        registry::SchemaSource,
        store::{Row, RowSource, decode_row},
    },
    error::InternalError,
    key::Key,
    obs::sink::{self, MetricsEvent, MetricsSink},
    traits::EntityKind,
    value::TextMode,
};
use std::marker::PhantomData;

///
/// QueryRows
///
/// Lazy result of a compiled query: a full scan of the base entity in key
/// order, yielding each row the predicate accepts as a typed entity.
///
/// Scan counters are reported to the metrics sink when the iterator is
/// dropped, so partially consumed results report what they actually read.
///

pub struct QueryRows<'a, S, E>
where
    S: RowSource + SchemaSource + ?Sized,
    E: EntityKind,
{
    evaluator: Evaluator<'a, S>,
    predicate: Predicate,
    rows: Box<dyn Iterator<Item = (Key, &'a Row)> + 'a>,
    metrics: Option<&'a dyn MetricsSink>,
    scanned: u64,
    matched: u64,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, S, E> QueryRows<'a, S, E>
where
    S: RowSource + SchemaSource + ?Sized,
    E: EntityKind,
{
    pub(crate) fn new(
        store: &'a S,
        predicate: Predicate,
        like_mode: TextMode,
        metrics: Option<&'a dyn MetricsSink>,
    ) -> Self {
        Self {
            evaluator: Evaluator::new(store, like_mode),
            predicate,
            rows: store.rows(E::MODEL.entity_name),
            metrics,
            scanned: 0,
            matched: 0,
            _marker: PhantomData,
        }
    }

    /// The normalized predicate driving this scan.
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Collect every remaining match, stopping at the first error.
    pub fn entities(self) -> Result<Vec<E>, InternalError> {
        self.collect()
    }
}

impl<S, E> Iterator for QueryRows<'_, S, E>
where
    S: RowSource + SchemaSource + ?Sized,
    E: EntityKind,
{
    type Item = Result<E, InternalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let base = Scope::Entity(E::MODEL.entity_name);

        loop {
            let (key, row) = self.rows.next()?;
            self.scanned += 1;

            match self.evaluator.matches(&self.predicate, base, row) {
                Ok(false) => {}
                Ok(true) => {
                    self.matched += 1;
                    return Some(
                        decode_row::<E>(key, row)
                            .map_err(|err| InternalError::store_corruption(err.to_string())),
                    );
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<S, E> Drop for QueryRows<'_, S, E>
where
    S: RowSource + SchemaSource + ?Sized,
    E: EntityKind,
{
    fn drop(&mut self) {
        sink::record(
            self.metrics,
            MetricsEvent::RowsScanned {
                entity_path: E::MODEL.path,
                rows_scanned: self.scanned,
                rows_matched: self.matched,
            },
        );
    }
}
