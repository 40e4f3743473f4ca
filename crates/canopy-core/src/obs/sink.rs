//! Metrics sink boundary.
//!
//! Query and hierarchy code never touch `obs::metrics` directly; they emit
//! `MetricsEvent`s through a `MetricsSink`. The global sink writes into the
//! thread-local counters.
use crate::obs::metrics::{self, EventReport};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    QueryCompiled {
        entity_path: &'static str,
        exists_predicates: u64,
    },
    QueryRejected {
        entity_path: &'static str,
    },
    RowsScanned {
        entity_path: &'static str,
        rows_scanned: u64,
        rows_matched: u64,
    },
    ClosureExpanded {
        entity_path: &'static str,
        nodes: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::QueryCompiled {
                entity_path,
                exists_predicates,
            } => metrics::with_state_mut(|m| {
                m.ops.queries_compiled = m.ops.queries_compiled.saturating_add(1);
                m.ops.exists_predicates = m.ops.exists_predicates.saturating_add(exists_predicates);
                let entry = m.entities.entry(entity_path.to_string()).or_default();
                entry.queries_compiled = entry.queries_compiled.saturating_add(1);
            }),

            MetricsEvent::QueryRejected { entity_path } => metrics::with_state_mut(|m| {
                m.ops.queries_rejected = m.ops.queries_rejected.saturating_add(1);
                let entry = m.entities.entry(entity_path.to_string()).or_default();
                entry.queries_rejected = entry.queries_rejected.saturating_add(1);
            }),

            MetricsEvent::RowsScanned {
                entity_path,
                rows_scanned,
                rows_matched,
            } => metrics::with_state_mut(|m| {
                m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                m.ops.rows_matched = m.ops.rows_matched.saturating_add(rows_matched);
                let entry = m.entities.entry(entity_path.to_string()).or_default();
                entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                entry.rows_matched = entry.rows_matched.saturating_add(rows_matched);
            }),

            MetricsEvent::ClosureExpanded { entity_path, nodes } => metrics::with_state_mut(|m| {
                m.ops.closure_calls = m.ops.closure_calls.saturating_add(1);
                m.ops.closure_nodes = m.ops.closure_nodes.saturating_add(nodes);
                let entry = m.entities.entry(entity_path.to_string()).or_default();
                entry.closure_calls = entry.closure_calls.saturating_add(1);
                entry.closure_nodes = entry.closure_nodes.saturating_add(nodes);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route an event to `sink`, or to the global sink when none is installed.
pub(crate) fn record(sink: Option<&dyn MetricsSink>, event: MetricsEvent) {
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}
