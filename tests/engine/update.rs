//! Integration tests for the update cycle

use eko_engine::{ActionContext, ActionOption, EngineConfig, Simulation};
use eko_foundation::{ErrorKind, SemanticLimit};

use crate::{Tally, completions, registry};

fn option(name: &str, agent: eko_foundation::Entity) -> ActionOption {
    ActionOption {
        action: name.into(),
        label: name.into(),
        context: ActionContext::new(agent),
    }
}

#[test]
fn three_tick_action_completes_exactly_once() {
    let mut simulation = Simulation::new(registry(vec![("sleep", Tally::lasting(3))]));
    let player = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    let action = simulation.select(&option("sleep", player)).unwrap();

    for tick in 1..=3 {
        assert!(simulation.model().exists(action), "gone before tick {tick}");
        let report = simulation.update().unwrap();
        assert_eq!(report.steps, 1);
    }

    assert!(!simulation.model().exists(action));
    assert_eq!(completions(simulation.model(), player), 1);
    assert_eq!(simulation.tick_number(), 3);

    let report = simulation.update().unwrap();
    assert!(report.is_idle());
    assert_eq!(completions(simulation.model(), player), 1);
}

#[test]
fn zero_duration_action_completes_on_the_next_update() {
    let mut simulation = Simulation::new(registry(vec![("blink", Tally::lasting(0))]));
    let player = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    let action = simulation.select(&option("blink", player)).unwrap();

    let report = simulation.update().unwrap();

    assert_eq!(report.completed, vec![action]);
    assert_eq!(report.steps, 0);
    assert_eq!(completions(simulation.model(), player), 1);
}

#[test]
fn background_actions_finish_while_perspective_waits() {
    let mut simulation = Simulation::new(registry(vec![
        ("sleep", Tally::lasting(4)),
        ("nap", Tally::lasting(2)),
    ]));
    let player = simulation.model_mut().entity();
    let cat = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    simulation.select(&option("sleep", player)).unwrap();
    simulation.select(&option("nap", cat)).unwrap();

    simulation.update().unwrap();
    assert_eq!(completions(simulation.model(), cat), 0);
    simulation.update().unwrap();
    assert_eq!(completions(simulation.model(), cat), 1);
    assert_eq!(completions(simulation.model(), player), 0);
}

#[test]
fn idle_perspective_fast_forwards_everyone_else() {
    let mut simulation = Simulation::new(registry(vec![("nap", Tally::lasting(5))]));
    let player = simulation.model_mut().entity();
    simulation.model_mut().create(player);
    let cat = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    simulation.select(&option("nap", cat)).unwrap();

    let report = simulation.update().unwrap();

    assert_eq!(report.steps, 5);
    assert_eq!(completions(simulation.model(), cat), 1);
}

#[test]
fn step_cap_trips_the_kill_switch() {
    let mut simulation = Simulation::new(registry(vec![("nap", Tally::lasting(50))]))
        .with_config(EngineConfig::new().with_max_steps_per_update(10));
    let player = simulation.model_mut().entity();
    simulation.model_mut().create(player);
    let cat = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    let nap = simulation.select(&option("nap", cat)).unwrap();

    let err = simulation.update().unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxSteps {
            limit: 10,
            pending: 1
        })
    ));
    assert_eq!(
        simulation
            .model()
            .get(nap, "action", "progress")
            .and_then(|v| v.as_int()),
        Some(10)
    );
}

#[test]
fn action_survives_deletion_of_its_target() {
    let mut simulation = Simulation::new(registry(vec![("sleep", Tally::lasting(2))]));
    let player = simulation.model_mut().entity();
    let bed = simulation.model_mut().entity();
    simulation.set_perspective(Some(player));
    let mut choice = option("sleep", player);
    choice.context = choice.context.with_target(Some(bed));
    simulation.select(&choice).unwrap();

    simulation.model_mut().delete(bed);
    simulation.update().unwrap();
    simulation.update().unwrap();

    assert_eq!(completions(simulation.model(), player), 1);
}
