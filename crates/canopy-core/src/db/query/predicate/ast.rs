use crate::{
    db::query::{
        UnsupportedOperatorError,
        path::{Hop, Scope},
    },
    value::Value,
};
use std::{fmt, str::FromStr};

///
/// Compiled predicate AST
///
/// Schema-resolved representation of a condition tree over one base entity.
/// Every field reference is bound to a `Scope`; relationship traversals are
/// `Exists` nodes correlated to the candidate base row. Evaluation happens in
/// `eval`, rewriting in `normalize`.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    In,
}

impl CompareOp {
    pub const ALL: [Self; 8] = [
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::Like,
        Self::In,
    ];

    /// Operator token as written in condition trees.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "like",
            Self::In => "in",
        }
    }

    const fn sql(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::In => "IN",
            other => other.as_str(),
        }
    }
}

impl FromStr for CompareOp {
    type Err = UnsupportedOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnsupportedOperatorError { op: s.to_string() })
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// ComparePredicate
///
/// `scope.field op value` on one bound row.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub scope: Scope,
    pub field: &'static str,
    pub op: CompareOp,
    pub value: Value,
}

impl fmt::Display for ComparePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} {}",
            self.scope,
            self.field,
            self.op.sql(),
            self.value
        )
    }
}

///
/// ExistsPredicate
///
/// True when at least one chain of rows reachable from the correlated base
/// row through `hops` satisfies `compare`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ExistsPredicate {
    pub correlate: Scope,
    pub hops: Vec<Hop>,
    pub compare: ComparePredicate,
}

impl fmt::Display for ExistsPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXISTS ({}", self.correlate)?;
        for hop in &self.hops {
            write!(f, " -[{}]-> {}", hop.relation, hop.target.declaration())?;
        }
        write!(f, " WHERE {})", self.compare)
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    Exists(ExistsPredicate),
}

impl Predicate {
    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    /// Number of existence checks in the tree.
    #[must_use]
    pub fn exists_count(&self) -> usize {
        match self {
            Self::True | Self::False | Self::Compare(_) => 0,
            Self::Exists(_) => 1,
            Self::Not(inner) => inner.exists_count(),
            Self::And(children) | Self::Or(children) => {
                children.iter().map(Self::exists_count).sum()
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "TRUE"),
            Self::False => write!(f, "FALSE"),
            Self::And(children) => write_joined(f, children, "AND"),
            Self::Or(children) => write_joined(f, children, "OR"),
            Self::Not(inner) => match inner.as_ref() {
                Self::Compare(cmp) => write!(f, "NOT ({cmp})"),
                other => write!(f, "NOT {other}"),
            },
            Self::Compare(cmp) => write!(f, "{cmp}"),
            Self::Exists(exists) => write!(f, "{exists}"),
        }
    }
}
