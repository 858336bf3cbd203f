//! Integration tests for option discovery

use eko_engine::Simulation;
use eko_engine::action::CONTAINS;

use crate::{Tally, registry};

fn pour() -> Tally {
    Tally {
        duration: 1,
        target_needs: Some("container"),
        using_needs: Some("container"),
    }
}

fn look() -> Tally {
    Tally {
        duration: 0,
        target_needs: Some("container"),
        using_needs: None,
    }
}

#[test]
fn union_of_plain_and_instrument_matches() {
    let mut simulation = Simulation::new(registry(vec![("look", look()), ("pour", pour())]));
    let model = simulation.model_mut();
    let player = model.entity();
    let cup = model.entity();
    let jug = model.entity();
    let stone = model.entity();
    let bottle = model.entity();
    model.set(cup, "container", "ok", true).unwrap();
    model.set(jug, "container", "ok", true).unwrap();
    model.set(bottle, "container", "ok", true).unwrap();
    model.link(player, CONTAINS, jug).unwrap();
    model.link(player, CONTAINS, stone).unwrap();
    model.link(player, CONTAINS, bottle).unwrap();

    let options = simulation.get_options(player, Some(cup)).unwrap();
    let summary: Vec<_> = options
        .iter()
        .map(|o| (o.action.to_string(), o.context.using))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("look".to_string(), None),
            ("pour".to_string(), Some(jug)),
            ("pour".to_string(), Some(bottle)),
        ]
    );
    assert!(options.iter().all(|o| o.context.target == Some(cup)));
}

#[test]
fn no_options_when_nothing_matches() {
    let mut simulation = Simulation::new(registry(vec![("look", look()), ("pour", pour())]));
    let model = simulation.model_mut();
    let player = model.entity();
    let rock = model.entity();
    model.create(player);
    model.create(rock);

    assert!(simulation.get_options(player, Some(rock)).unwrap().is_empty());
}

#[test]
fn discovery_does_not_mutate_the_model() {
    let mut simulation = Simulation::new(registry(vec![("pour", pour())]));
    let model = simulation.model_mut();
    let player = model.entity();
    let cup = model.entity();
    let jug = model.entity();
    model.set(cup, "container", "ok", true).unwrap();
    model.set(jug, "container", "ok", true).unwrap();
    model.link(player, CONTAINS, jug).unwrap();
    let before = (simulation.model().len(), simulation.model().properties(cup));

    simulation.get_options(player, Some(cup)).unwrap();
    simulation.get_options(player, Some(cup)).unwrap();

    assert_eq!(
        (simulation.model().len(), simulation.model().properties(cup)),
        before
    );
}

#[test]
fn selecting_an_option_links_every_role() {
    let mut simulation = Simulation::new(registry(vec![("pour", pour())]));
    let model = simulation.model_mut();
    let player = model.entity();
    let cup = model.entity();
    let jug = model.entity();
    model.set(cup, "container", "ok", true).unwrap();
    model.set(jug, "container", "ok", true).unwrap();
    model.link(player, CONTAINS, jug).unwrap();

    let option = simulation.get_options(player, Some(cup)).unwrap().remove(0);
    let action = simulation.select(&option).unwrap();

    let actions = simulation.call("getActions", player, &[]).unwrap();
    assert_eq!(actions.entities(), vec![action]);
    let model = simulation.model();
    assert_eq!(model.targets(action, "targeting"), vec![cup]);
    assert_eq!(model.targets(action, "using"), vec![jug]);
    assert_eq!(model.get(action, "action", "progress").and_then(|v| v.as_int()), Some(0));
}
