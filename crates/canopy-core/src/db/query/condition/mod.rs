//! Condition trees: the caller-facing filter grammar.
//!
//! A leaf is `(field, operator, value)`; combinators are `AND`, `OR` and
//! `NOT`. Trees are built through the constructors here or parsed from the
//! nested-list JSON form:
//!
//! ```text
//! ["AND", ["regions.name", "=", "North America"],
//!         ["NOT", ["asset_classes.name", "=", "Real Estate"]]]
//! ```
//!
//! A top-level list whose first element is itself a list is an implicit AND.

mod parse;
mod validate;


use crate::{db::query::CompareOp, value::Value};
use std::ops::{BitAnd, BitOr, Not};

pub(crate) use validate::validate;

///
/// Leaf
///

#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Leaf {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Whether the field crosses at least one relationship.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.field.contains(crate::PATH_SEPARATOR)
    }
}

///
/// Condition
///

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Leaf(Leaf),
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl Condition {
    #[must_use]
    pub fn leaf(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(field, op, value))
    }

    #[must_use]
    pub const fn and(conditions: Vec<Self>) -> Self {
        Self::And(conditions)
    }

    #[must_use]
    pub const fn or(conditions: Vec<Self>) -> Self {
        Self::Or(conditions)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(condition: Self) -> Self {
        Self::Not(Box::new(condition))
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(field, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::leaf(field, CompareOp::Like, Value::Text(pattern.into()))
    }

    #[must_use]
    pub fn in_<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();

        Self::leaf(field, CompareOp::In, Value::List(values))
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Not(inner) => inner.leaf_count(),
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }
}

impl From<Leaf> for Condition {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl BitAnd for Condition {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Condition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}

impl Not for Condition {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}
