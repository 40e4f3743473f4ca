
use crate::{
    db::{
        query::{
            Condition, Scope,
            predicate::{Evaluator, Predicate, compile},
        },
        store::{MemoryStore, RowSource},
    },
    test_fixtures::Item,
    traits::EntityKind,
    value::TextMode,
};

fn compile_item(store: &MemoryStore, condition: &Condition) -> Predicate {
    compile(store, Item::MODEL, condition).expect("condition should compile")
}

/// Keys of every `E` row the predicate accepts, ascending.
fn matching<E: EntityKind>(store: &MemoryStore, predicate: &Predicate, mode: TextMode) -> Vec<u64> {
    let evaluator = Evaluator::new(store, mode);
    let base = Scope::Entity(E::MODEL.entity_name);

    store
        .rows(E::MODEL.entity_name)
        .filter(|(_, row)| {
            evaluator
                .matches(predicate, base, row)
                .expect("evaluation should succeed")
        })
        .map(|(key, _)| key.get())
        .collect()
}

fn matching_items(store: &MemoryStore, predicate: &Predicate) -> Vec<u64> {
    matching::<Item>(store, predicate, TextMode::Ci)
}

/// Compile against `Item` and return the accepted keys.
fn query_items(store: &MemoryStore, condition: &Condition) -> Vec<u64> {
    matching_items(store, &compile_item(store, condition))
}
