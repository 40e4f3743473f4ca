use crate::{
    db::query::{CompareOp, MalformedConditionError, condition::Condition},
    value::Value,
};

/// Check the shape of a condition tree.
///
/// Parsed trees are already checked; this catches trees built through the
/// API with empty combinators or literals that do not fit their operator.
pub(crate) fn validate(condition: &Condition) -> Result<(), MalformedConditionError> {
    match condition {
        Condition::And(children) => validate_all("AND", children),
        Condition::Or(children) => validate_all("OR", children),
        Condition::Not(inner) => validate(inner),
        Condition::Leaf(leaf) => {
            if leaf.field.is_empty() {
                return Err(MalformedConditionError::InvalidField);
            }

            let field = || leaf.field.clone();
            match (leaf.op, &leaf.value) {
                (CompareOp::In, Value::List(_)) => Ok(()),
                (CompareOp::In, _) => {
                    Err(MalformedConditionError::InRequiresList { field: field() })
                }
                (op, Value::List(_)) => {
                    Err(MalformedConditionError::UnexpectedList { field: field(), op })
                }
                (CompareOp::Like, Value::Text(_)) => Ok(()),
                (CompareOp::Like, _) => {
                    Err(MalformedConditionError::LikeRequiresText { field: field() })
                }
                _ => Ok(()),
            }
        }
    }
}

fn validate_all(op: &'static str, children: &[Condition]) -> Result<(), MalformedConditionError> {
    if children.is_empty() {
        return Err(MalformedConditionError::EmptyCombinator { op });
    }

    children.iter().try_for_each(validate)
}
