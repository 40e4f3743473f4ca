use crate::{
    db::query::{
        CompareOp, MalformedConditionError, QueryError,
        condition::{Condition, Leaf, validate},
    },
    value::Value,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value as Json;
use std::str::FromStr;

const AND: &str = "AND";
const OR: &str = "OR";
const NOT: &str = "NOT";

impl Condition {
    /// Parse the nested-list JSON form.
    ///
    /// `["AND", c1, c2, ..]`, `["OR", c1, ..]`, `["NOT", c]` and leaves
    /// `[field, op, value]`. At the top level only, a list whose first element
    /// is itself a list is read as an implicit AND of its elements.
    pub fn from_json(json: &Json) -> Result<Self, QueryError> {
        let items = as_list(json)?;

        let condition = if items.first().is_some_and(Json::is_array) {
            Self::And(items.iter().map(parse_node).collect::<Result<_, _>>()?)
        } else {
            parse_node(json)?
        };

        validate(&condition)?;

        Ok(condition)
    }
}

impl FromStr for Condition {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let json: Json = serde_json::from_str(s).map_err(|err| {
            MalformedConditionError::InvalidJson {
                message: err.to_string(),
            }
        })?;

        Self::from_json(&json)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;

        Self::from_json(&json).map_err(serde::de::Error::custom)
    }
}

fn as_list(json: &Json) -> Result<&[Json], MalformedConditionError> {
    match json {
        Json::Array(items) if !items.is_empty() => Ok(items),
        _ => Err(MalformedConditionError::NotAList),
    }
}

fn parse_node(json: &Json) -> Result<Condition, QueryError> {
    let items = as_list(json)?;
    let (head, rest) = (&items[0], &items[1..]);

    match head.as_str() {
        Some(AND) => Ok(Condition::And(parse_operands(AND, rest)?)),
        Some(OR) => Ok(Condition::Or(parse_operands(OR, rest)?)),
        Some(NOT) => match rest {
            [inner] => Ok(Condition::Not(Box::new(parse_node(inner)?))),
            _ => Err(MalformedConditionError::NotArity { got: rest.len() }.into()),
        },
        _ => parse_leaf(items).map(Condition::Leaf),
    }
}

fn parse_operands(op: &'static str, rest: &[Json]) -> Result<Vec<Condition>, QueryError> {
    if rest.is_empty() {
        return Err(MalformedConditionError::EmptyCombinator { op }.into());
    }

    rest.iter().map(parse_node).collect()
}

fn parse_leaf(items: &[Json]) -> Result<Leaf, QueryError> {
    let [field, op, value] = items else {
        return Err(MalformedConditionError::LeafArity { got: items.len() }.into());
    };

    let field = field
        .as_str()
        .filter(|field| !field.is_empty())
        .ok_or(MalformedConditionError::InvalidField)?;
    let op = op.as_str().ok_or(MalformedConditionError::InvalidOperator)?;
    let op = CompareOp::from_str(op)?;
    let value = Value::from_json(value).ok_or_else(|| MalformedConditionError::UnsupportedLiteral {
        field: field.to_string(),
    })?;

    Ok(Leaf::new(field, op, value))
}
