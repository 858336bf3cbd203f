//! Integration tests for the content registry

use std::sync::Arc;

use eko_engine::{ContentKind, ContentRegistry, Receiver, Simulation, StandardMethods};
use eko_foundation::{Entity, Result, Value};
use eko_storage::Model;

use crate::{Tally, registry};

fn shout(model: &mut Model, receiver: Receiver, _: &[Value]) -> Result<Value> {
    let entity = receiver.entity()?;
    let name = model
        .get(entity, "name", "text")
        .and_then(Value::as_str)
        .unwrap_or("nothing")
        .to_uppercase();
    Ok(name.into())
}

fn count_entities(model: &mut Model, _: Receiver, _: &[Value]) -> Result<Value> {
    Ok(Value::from(model.len() as i64))
}

#[test]
fn every_kind_has_its_own_shelf() {
    let content = registry(vec![("wait", Tally::lasting(0))]);

    assert_eq!(content.names(ContentKind::Action), vec![Arc::from("wait")]);
    assert!(content.names(ContentKind::Template).is_empty());
    assert!(content.methods().contains("getContents"));
    assert!(!content.actions().contains("getContents"));
}

#[test]
fn actions_list_in_registration_order() {
    let content = registry(vec![
        ("zeta", Tally::lasting(1)),
        ("alpha", Tally::lasting(1)),
    ]);

    let names: Vec<_> = content.actions().names().collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

#[test]
fn lookup_miss_names_kind_and_name() {
    let content = ContentRegistry::new();
    let Err(err) = content.templates().get("fountain") else {
        panic!("empty registry should not resolve fountain");
    };
    assert_eq!(format!("{err}"), "template not found: fountain");
}

#[test]
fn simulation_dispatches_methods() {
    let mut content = ContentRegistry::new();
    StandardMethods::install(&mut content);
    content.methods_mut().set("shout", Arc::new(shout));
    content.methods_mut().set("countEntities", Arc::new(count_entities));
    let mut simulation = Simulation::new(content);

    let bird: Entity = simulation.model_mut().entity();
    simulation
        .model_mut()
        .set(bird, "name", "text", "parrot")
        .unwrap();

    assert_eq!(
        simulation.call("shout", bird, &[]).unwrap(),
        Value::from("PARROT")
    );
    assert_eq!(simulation.call_model("countEntities", &[]).unwrap(), Value::Int(1));
    assert!(simulation.call_model("shout", &[]).is_err());
    assert!(simulation.call("whistle", bird, &[]).unwrap_err().is_not_found());
}
