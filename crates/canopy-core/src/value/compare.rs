use crate::value::Value;
use std::cmp::Ordering;

///
/// NumericRepr
///

enum NumericRepr {
    Exact(i128),
    F64(f64),
}

fn numeric_repr(value: &Value) -> Option<NumericRepr> {
    match value {
        Value::Int(v) => Some(NumericRepr::Exact(i128::from(*v))),
        Value::Uint(v) => Some(NumericRepr::Exact(i128::from(*v))),
        Value::Float64(v) => Some(NumericRepr::F64(*v)),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss)]
fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (numeric_repr(left)?, numeric_repr(right)?) {
        (NumericRepr::Exact(a), NumericRepr::Exact(b)) => Some(a.cmp(&b)),
        (NumericRepr::Exact(a), NumericRepr::F64(b)) => (a as f64).partial_cmp(&b),
        (NumericRepr::F64(a), NumericRepr::Exact(b)) => a.partial_cmp(&(b as f64)),
        (NumericRepr::F64(a), NumericRepr::F64(b)) => a.partial_cmp(&b),
    }
}

/// Compare two values for equality.
///
/// Numeric variants widen to a common representation. Returns `None` when
/// the comparison is undefined: either side is `Null`, or the variants are
/// not comparable. Callers treat `None` as a non-match.
#[must_use]
pub fn compare_eq(left: &Value, right: &Value) -> Option<bool> {
    if left.is_numeric() && right.is_numeric() {
        return numeric_cmp(left, right).map(Ordering::is_eq);
    }

    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Text(a), Value::Text(b)) => Some(a == b),
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            let mut all = true;
            for (x, y) in a.iter().zip(b) {
                all &= compare_eq(x, y)?;
            }
            Some(all)
        }
        _ => None,
    }
}

/// Order two values.
///
/// Only numeric, text and bool values are orderable; text orders by bytes.
#[must_use]
pub fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_numeric() && right.is_numeric() {
        return numeric_cmp(left, right);
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

/// Check whether a value equals any element in a list.
///
/// `None` when `list` is not a list or no element was comparable.
#[must_use]
pub fn in_list(actual: &Value, list: &Value) -> Option<bool> {
    let Value::List(items) = list else {
        return None;
    };

    let mut saw_valid = false;
    for item in items {
        match compare_eq(actual, item) {
            Some(true) => return Some(true),
            Some(false) => saw_valid = true,
            None => {}
        }
    }

    saw_valid.then_some(false)
}
