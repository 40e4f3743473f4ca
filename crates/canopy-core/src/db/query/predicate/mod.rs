mod ast;
mod compile;
mod eval;
mod normalize;

#[cfg(test)]
mod tests;

// re-exports
pub use ast::{CompareOp, ComparePredicate, ExistsPredicate, Predicate};
pub use compile::compile;
pub use normalize::normalize;

pub(crate) use eval::{Evaluator, eval_compare};
