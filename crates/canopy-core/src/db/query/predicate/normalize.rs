use crate::db::query::predicate::ast::Predicate;

///
/// Normalize a predicate into negation normal form.
///
/// Guarantees:
/// - Evaluation results are preserved
/// - NOT is pushed through AND / OR by De Morgan and stops at
///   `Compare` / `Exists` leaves, which are wrapped, never inverted
/// - Double negation is eliminated
/// - Nested AND / OR nodes are flattened
/// - Neutral elements are removed (True / False)
/// - Single-child AND / OR collapse to the child
///
/// Child order is kept as written so explain output follows the condition.
///
#[must_use]
pub fn normalize(predicate: &Predicate) -> Predicate {
    push(predicate, false)
}

fn push(predicate: &Predicate, negate: bool) -> Predicate {
    match predicate {
        Predicate::True | Predicate::False => {
            let value = matches!(predicate, Predicate::True) != negate;
            if value { Predicate::True } else { Predicate::False }
        }

        Predicate::Not(inner) => push(inner, !negate),

        // De Morgan: NOT (a AND b) → NOT a OR NOT b
        Predicate::And(children) if negate => disjunction(children, true),
        Predicate::Or(children) if negate => conjunction(children, true),
        Predicate::And(children) => conjunction(children, false),
        Predicate::Or(children) => disjunction(children, false),

        leaf @ (Predicate::Compare(_) | Predicate::Exists(_)) => {
            if negate {
                Predicate::not(leaf.clone())
            } else {
                leaf.clone()
            }
        }
    }
}

///
/// Rules:
/// - AND(True, x)        → x
/// - AND(False, x)       → False
/// - AND(AND(a, b), c)   → AND(a, b, c)
/// - AND(x)              → x
/// - AND()               → True
///
fn conjunction(children: &[Predicate], negate: bool) -> Predicate {
    let mut out = Vec::with_capacity(children.len());

    for child in children {
        match push(child, negate) {
            Predicate::True => {}
            Predicate::False => return Predicate::False,
            Predicate::And(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    match out.len() {
        0 => Predicate::True,
        1 => out.swap_remove(0),
        _ => Predicate::And(out),
    }
}

///
/// Rules:
/// - OR(False, x)       → x
/// - OR(True, x)        → True
/// - OR(OR(a, b), c)    → OR(a, b, c)
/// - OR(x)              → x
/// - OR()               → False
///
fn disjunction(children: &[Predicate], negate: bool) -> Predicate {
    let mut out = Vec::with_capacity(children.len());

    for child in children {
        match push(child, negate) {
            Predicate::False => {}
            Predicate::True => return Predicate::True,
            Predicate::Or(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    match out.len() {
        0 => Predicate::False,
        1 => out.swap_remove(0),
        _ => Predicate::Or(out),
    }
}
