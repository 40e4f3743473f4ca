use crate::{
    db::{
        query::{
            path::{Hop, Scope},
            predicate::{CompareOp, ComparePredicate, ExistsPredicate, Predicate},
        },
        registry::SchemaSource,
        store::{Row, RowSource},
    },
    error::InternalError,
    key::Key,
    model::field::RelationSource,
    value::{TextMode, Value, compare_eq, compare_order, in_list, like_match},
};
use std::cmp::Ordering;

///
/// Evaluator
///
/// Row-at-a-time predicate evaluation against a store.
///
/// The candidate base row is bound to its entity scope; every `Exists` walks
/// its hop chain depth-first, binding each target scope in turn, and succeeds
/// on the first chain whose terminal row satisfies the comparison.
///

pub(crate) struct Evaluator<'a, S: ?Sized> {
    source: &'a S,
    like_mode: TextMode,
}

impl<'a, S> Evaluator<'a, S>
where
    S: RowSource + SchemaSource + ?Sized,
{
    pub(crate) const fn new(source: &'a S, like_mode: TextMode) -> Self {
        Self { source, like_mode }
    }

    /// Evaluate `predicate` with `row` bound to `base`.
    pub(crate) fn matches(
        &self,
        predicate: &Predicate,
        base: Scope,
        row: &'a Row,
    ) -> Result<bool, InternalError> {
        let mut bindings = Bindings::default();
        bindings.bind(base, row)?;

        self.eval(predicate, &mut bindings)
    }

    fn eval(
        &self,
        predicate: &Predicate,
        bindings: &mut Bindings<'a>,
    ) -> Result<bool, InternalError> {
        match predicate {
            Predicate::True => Ok(true),
            Predicate::False => Ok(false),
            Predicate::And(children) => {
                for child in children {
                    if !self.eval(child, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(children) => {
                for child in children {
                    if self.eval(child, bindings)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!self.eval(inner, bindings)?),
            Predicate::Compare(cmp) => {
                let row = bindings.get(cmp.scope)?;
                Ok(self.compare(row, cmp))
            }
            Predicate::Exists(exists) => self.exists(exists, bindings),
        }
    }

    fn exists(
        &self,
        exists: &ExistsPredicate,
        bindings: &mut Bindings<'a>,
    ) -> Result<bool, InternalError> {
        let Some(first) = exists.hops.first() else {
            return Err(InternalError::executor_invariant(
                "existence predicate without hops",
            ));
        };
        if first.source != exists.correlate {
            return Err(InternalError::executor_invariant(format!(
                "existence chain starts at {} but is correlated to {}",
                first.source, exists.correlate
            )));
        }

        self.walk(&exists.hops, &exists.compare, bindings)
    }

    fn walk(
        &self,
        hops: &[Hop],
        compare: &ComparePredicate,
        bindings: &mut Bindings<'a>,
    ) -> Result<bool, InternalError> {
        let Some((hop, rest)) = hops.split_first() else {
            let row = bindings.get(compare.scope)?;
            return Ok(self.compare(row, compare));
        };

        let source = bindings.get(hop.source)?;
        for target in self.related(hop, source)? {
            bindings.bind(hop.target, target)?;
            let found = self.walk(rest, compare, bindings);
            bindings.unbind();

            if found? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Rows reachable from `source` through one relationship hop.
    fn related(&self, hop: &Hop, source: &'a Row) -> Result<Vec<&'a Row>, InternalError> {
        let target_entity = hop.target.entity();

        match hop.model.source {
            RelationSource::Forward { key_field } => {
                let keys = read_keys(source.get(key_field)).ok_or_else(|| {
                    InternalError::store_corruption(format!(
                        "{}.{key_field} does not hold keys",
                        hop.source.entity()
                    ))
                })?;

                Ok(keys
                    .into_iter()
                    .filter_map(|key| {
                        let row = self.source.row(target_entity, key);
                        if row.is_none() {
                            tracing::trace!(
                                entity = target_entity,
                                %key,
                                relation = hop.relation,
                                "dangling relation key skipped"
                            );
                        }
                        row
                    })
                    .collect())
            }
            RelationSource::Reverse { key_field } => {
                let source_key = self.row_key(hop.source, source)?;

                Ok(self
                    .source
                    .rows(target_entity)
                    .filter(|(_, row)| {
                        read_keys(row.get(key_field)).is_some_and(|keys| keys.contains(&source_key))
                    })
                    .map(|(_, row)| row)
                    .collect())
            }
        }
    }

    fn row_key(&self, scope: Scope, row: &Row) -> Result<Key, InternalError> {
        let model = self.source.entity_model(scope.entity()).ok_or_else(|| {
            InternalError::executor_invariant(format!(
                "entity '{}' bound without a registered model",
                scope.entity()
            ))
        })?;

        row.get(model.primary_key.name)
            .and_then(Key::from_value)
            .ok_or_else(|| {
                InternalError::store_corruption(format!(
                    "{} row has no readable primary key",
                    model.entity_name
                ))
            })
    }

    fn compare(&self, row: &Row, cmp: &ComparePredicate) -> bool {
        let actual = row.get(cmp.field).unwrap_or(&Value::Null);

        eval_compare(actual, cmp.op, &cmp.value, self.like_mode)
    }
}

/// Apply one comparison operator.
///
/// Undefined comparisons (null on either side, mismatched types) are false.
pub(crate) fn eval_compare(actual: &Value, op: CompareOp, value: &Value, mode: TextMode) -> bool {
    match op {
        CompareOp::Eq => compare_eq(actual, value) == Some(true),
        CompareOp::Ne => compare_eq(actual, value) == Some(false),
        CompareOp::Lt => compare_order(actual, value) == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            compare_order(actual, value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => compare_order(actual, value) == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            compare_order(actual, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Like => match (actual, value) {
            (Value::Text(text), Value::Text(pattern)) => like_match(text, pattern, mode),
            _ => false,
        },
        CompareOp::In => in_list(actual, value) == Some(true),
    }
}

// Null and a missing field both mean "no related rows".
fn read_keys(value: Option<&Value>) -> Option<Vec<Key>> {
    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::List(items)) => items.iter().map(Key::from_value).collect(),
        Some(value) => Key::from_value(value).map(|key| vec![key]),
    }
}

///
/// Bindings
///
/// Stack of scope → row bindings for one candidate base row.
///

#[derive(Default)]
struct Bindings<'a> {
    slots: Vec<(Scope, &'a Row)>,
}

impl<'a> Bindings<'a> {
    fn bind(&mut self, scope: Scope, row: &'a Row) -> Result<(), InternalError> {
        if self.slots.iter().any(|(bound, _)| *bound == scope) {
            return Err(InternalError::executor_invariant(format!(
                "scope {scope} is already bound"
            )));
        }
        self.slots.push((scope, row));

        Ok(())
    }

    fn unbind(&mut self) {
        self.slots.pop();
    }

    fn get(&self, scope: Scope) -> Result<&'a Row, InternalError> {
        self.slots
            .iter()
            .rev()
            .find(|(bound, _)| *bound == scope)
            .map(|(_, row)| *row)
            .ok_or_else(|| InternalError::executor_invariant(format!("scope {scope} is not bound")))
    }
}
