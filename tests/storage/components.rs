//! Integration tests for components
//!
//! Tests component creation, uniqueness, properties, and stale handles.

use eko_foundation::{ErrorKind, StructureKind, Value};
use eko_storage::Model;

// =============================================================================
// Creation
// =============================================================================

#[test]
fn proposed_component_is_not_live() {
    let mut model = Model::new();
    let cup = model.entity();
    let container = model.component(cup, "container");

    assert!(!model.component_exists(container));
    assert!(model.components(cup).is_empty());
    assert_eq!(model.component_type(container), Some("container"));
    assert_eq!(model.component_entity(container), Some(cup));
}

#[test]
fn component_returns_the_live_one() {
    let mut model = Model::new();
    let cup = model.entity();
    let first = model.component(cup, "container");
    model.create_component(first).unwrap();

    assert_eq!(model.component(cup, "container"), first);
}

#[test]
fn second_live_component_is_rejected() {
    let mut model = Model::new();
    let cup = model.entity();
    let first = model.component(cup, "container");
    model.set_component_property(first, "volume", 0.2).unwrap();
    let second = model.component(cup, "container");
    model.create_component(first).unwrap();

    let err = model.create_component(second).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::Duplicate {
            structure: StructureKind::Component,
            ..
        }
    ));
    assert_eq!(model.components(cup), vec![first]);
    assert_eq!(model.get(cup, "container", "volume"), Some(&Value::Float(0.2)));
}

#[test]
fn creating_a_live_component_again_is_a_no_op() {
    let mut model = Model::new();
    let cup = model.entity();
    let container = model.component(cup, "container");
    model.create_component(container).unwrap();

    assert!(model.create_component(container).is_ok());
    assert_eq!(model.components(cup).len(), 1);
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn removed_component_keeps_its_properties() {
    let mut model = Model::new();
    let cup = model.entity();
    let container = model.component(cup, "container");
    model.create_component(container).unwrap();
    model.set_component_property(container, "volume", 0.2).unwrap();

    model.delete_component(container);
    assert!(!model.component_exists(container));
    assert_eq!(model.get(cup, "container", "volume"), None);

    model.create_component(container).unwrap();
    assert_eq!(
        model.component_property(container, "volume"),
        Some(&Value::Float(0.2))
    );
}

#[test]
fn components_of_type_span_entities() {
    let mut model = Model::new();
    let cup = model.entity();
    let bowl = model.entity();
    model.set(cup, "container", "volume", 0.2).unwrap();
    model.set(bowl, "container", "volume", 0.5).unwrap();
    model.set(bowl, "portable", "weight", 1).unwrap();

    let containers = model.components_of_type("container");
    assert_eq!(containers.len(), 2);
    assert_eq!(model.component_entity(containers[0]), Some(cup));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn bulk_set_then_read_back() {
    let mut model = Model::new();
    let wine = model.entity();
    let liquid = model.component(wine, "liquid");
    model.create_component(liquid).unwrap();

    model
        .set_component_properties(
            liquid,
            [("volume", Value::Float(1.0)), ("name", Value::from("wine"))],
        )
        .unwrap();
    model
        .set_component_properties(liquid, [("name", Value::Nil)])
        .unwrap();

    let all = model.component_properties(liquid);
    assert_eq!(all.len(), 1);
    assert_eq!(all.get("volume"), Some(&Value::Float(1.0)));
}

#[test]
fn stale_component_handle() {
    let mut model = Model::new();
    let cup = model.entity();
    let container = model.component(cup, "container");
    model.create_component(container).unwrap();
    model.delete(cup);

    assert!(!model.component_exists(container));
    assert!(model.component_properties(container).is_empty());
    let err = model.create_component(container).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleHandle(_)));
    assert!(!model.exists(cup));
}
