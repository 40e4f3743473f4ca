use crate::{
    db::{
        hierarchy::{self, ClosureRow, HierarchyError},
        query::{Condition, FluentLoadQuery, QueryError, QueryRows, predicate::{self, Predicate}},
        registry::SchemaSource,
        store::RowSource,
    },
    obs::sink::{self, MetricsEvent, MetricsSink},
    traits::{EntityKind, HierarchyKind},
    value::TextMode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

///
/// SessionConfig
///
/// `debug` raises the compiled-predicate log from `debug` to `info`.
/// `like_mode` selects case handling for `like`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub debug: bool,
    pub like_mode: TextMode,
}

///
/// DbSession
///
/// Read-only handle over a store with policy (debug, like mode, metrics).
/// Entry point for condition queries and hierarchy closures.
///

pub struct DbSession<'a, S: ?Sized> {
    store: &'a S,
    config: SessionConfig,
    metrics: Option<&'a dyn MetricsSink>,
}

impl<'a, S> DbSession<'a, S>
where
    S: RowSource + SchemaSource + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            config: SessionConfig {
                debug: false,
                like_mode: TextMode::Ci,
            },
            metrics: None,
        }
    }

    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    #[must_use]
    pub const fn like_mode(mut self, mode: TextMode) -> Self {
        self.config.like_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'a dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    #[must_use]
    pub const fn store(&self) -> &'a S {
        self.store
    }

    // ---------------------------------------------------------------------
    // Query entry points
    // ---------------------------------------------------------------------

    #[must_use]
    pub const fn load<E: EntityKind>(&'a self) -> FluentLoadQuery<'a, S, E> {
        FluentLoadQuery::new(self)
    }

    /// Compile `condition` against `E` and scan for matches.
    pub fn query<E: EntityKind>(
        &self,
        condition: &Condition,
    ) -> Result<QueryRows<'a, S, E>, QueryError> {
        let predicate = self.compile::<E>(condition)?;

        Ok(self.scan(predicate))
    }

    /// Compile and normalize `condition` against `E` without scanning.
    pub fn compile<E: EntityKind>(&self, condition: &Condition) -> Result<Predicate, QueryError> {
        self.prepare::<E>(Some(condition))
    }

    /// Descendants of the node named `root_name`, root included.
    pub fn closure<E: HierarchyKind>(
        &self,
        root_name: &str,
    ) -> Result<Vec<ClosureRow>, HierarchyError> {
        hierarchy::closure::<S, E>(self.store, root_name, self.metrics)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    // No condition means every row.
    pub(crate) fn prepare<E: EntityKind>(
        &self,
        condition: Option<&Condition>,
    ) -> Result<Predicate, QueryError> {
        let model = E::MODEL;

        let compiled = if self.store.entity_model(model.entity_name).is_none() {
            Err(QueryError::UnknownEntity {
                entity: model.entity_name.to_string(),
            })
        } else {
            condition.map_or(Ok(Predicate::True), |condition| {
                predicate::compile(self.store, model, condition)
            })
        };

        let predicate = match compiled {
            Ok(predicate) => predicate::normalize(&predicate),
            Err(err) => {
                debug!(entity = model.entity_name, error = %err, "condition rejected");
                sink::record(
                    self.metrics,
                    MetricsEvent::QueryRejected {
                        entity_path: model.path,
                    },
                );
                return Err(err);
            }
        };

        if self.config.debug {
            info!(entity = model.entity_name, %predicate, "compiled condition");
        } else {
            debug!(entity = model.entity_name, %predicate, "compiled condition");
        }

        sink::record(
            self.metrics,
            MetricsEvent::QueryCompiled {
                entity_path: model.path,
                exists_predicates: u64::try_from(predicate.exists_count()).unwrap_or(u64::MAX),
            },
        );

        Ok(predicate)
    }

    pub(crate) fn scan<E: EntityKind>(&self, predicate: Predicate) -> QueryRows<'a, S, E> {
        QueryRows::new(self.store, predicate, self.config.like_mode, self.metrics)
    }
}
