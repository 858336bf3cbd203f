//! Integration tests for entity identity
//!
//! Tests proposal, registration, id assignment, and id reuse rules.

use eko_storage::Model;
use proptest::prelude::*;

// =============================================================================
// Registration
// =============================================================================

#[test]
fn identity_round_trip() {
    let mut model = Model::new();
    let entities: Vec<_> = (0..5).map(|_| model.entity()).collect();
    for &e in &entities {
        model.create(e);
    }

    for &e in &entities {
        let id = model.id(e).unwrap();
        assert_eq!(model.entity_by_id(id), Some(e));
    }
}

#[test]
fn create_is_idempotent() {
    let mut model = Model::new();
    let e = model.entity();
    model.create(e);
    let id = model.id(e);
    model.create(e);

    assert_eq!(model.id(e), id);
    assert_eq!(model.len(), 1);
}

#[test]
fn entities_enumerate_in_id_order() {
    let mut model = Model::new();
    let a = model.entity();
    let b = model.entity();
    model.create(b);
    model.create(a);

    assert_eq!(model.entities(None), vec![b, a]);
}

// =============================================================================
// Deletion
// =============================================================================

#[test]
fn deleted_id_resolves_to_nothing() {
    let mut model = Model::new();
    let e = model.entity();
    model.create(e);
    let id = model.id(e).unwrap();

    model.delete(e);

    assert_eq!(model.entity_by_id(id), None);
    assert_eq!(model.id(e), None);
}

#[test]
fn delete_of_unknown_entity_is_a_no_op() {
    let mut model = Model::new();
    let e = model.entity();
    model.delete(e);
    assert!(model.is_empty());
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn ids_are_never_reused(ops in prop::collection::vec((0usize..8, any::<bool>()), 1..60)) {
        let mut model = Model::new();
        let pool: Vec<_> = (0..8).map(|_| model.entity()).collect();
        let mut seen = std::collections::BTreeSet::new();

        for (index, create) in ops {
            let e = pool[index];
            if create {
                let fresh = !model.exists(e);
                model.create(e);
                let id = model.id(e).unwrap();
                if fresh {
                    prop_assert!(seen.insert(id), "id {} handed out twice", id);
                }
            } else {
                model.delete(e);
            }
        }
    }
}
