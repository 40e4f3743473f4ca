use crate::{
    db::{
        query::{
            QueryError,
            condition::{self, Condition, Leaf},
            path::{self, AliasAllocator, Scope},
            predicate::{ComparePredicate, ExistsPredicate, Predicate},
        },
        registry::SchemaSource,
    },
    model::entity::EntityModel,
};

/// Lower a condition tree into a predicate over `base`.
///
/// Plain fields become comparisons on the base row. Dotted paths become
/// existence checks correlated to the base row, so `NOT` over a path leaf
/// means "no related chain satisfies the comparison". Every error is raised
/// here, before any row is read.
pub fn compile<S: SchemaSource + ?Sized>(
    schema: &S,
    base: &'static EntityModel,
    condition: &Condition,
) -> Result<Predicate, QueryError> {
    condition::validate(condition)?;

    let mut aliases = AliasAllocator::new();

    compile_node(schema, base, condition, &mut aliases)
}

fn compile_node<S: SchemaSource + ?Sized>(
    schema: &S,
    base: &'static EntityModel,
    condition: &Condition,
    aliases: &mut AliasAllocator,
) -> Result<Predicate, QueryError> {
    match condition {
        Condition::Leaf(leaf) => compile_leaf(schema, base, leaf, aliases),
        Condition::And(children) => children
            .iter()
            .map(|child| compile_node(schema, base, child, aliases))
            .collect::<Result<_, _>>()
            .map(Predicate::And),
        Condition::Or(children) => children
            .iter()
            .map(|child| compile_node(schema, base, child, aliases))
            .collect::<Result<_, _>>()
            .map(Predicate::Or),
        Condition::Not(inner) => compile_node(schema, base, inner, aliases).map(Predicate::not),
    }
}

fn compile_leaf<S: SchemaSource + ?Sized>(
    schema: &S,
    base: &'static EntityModel,
    leaf: &Leaf,
    aliases: &mut AliasAllocator,
) -> Result<Predicate, QueryError> {
    let resolved = path::resolve(schema, base, &leaf.field, aliases)?;

    let compare = ComparePredicate {
        scope: resolved.scope,
        field: resolved.field,
        op: leaf.op,
        value: leaf.value.clone(),
    };

    if resolved.is_direct() {
        return Ok(Predicate::Compare(compare));
    }

    Ok(Predicate::Exists(ExistsPredicate {
        correlate: Scope::Entity(base.entity_name),
        hops: resolved.hops,
        compare,
    }))
}
