//! Pouring liquid between containers.
//!
//! A `liquid` entity lives inside a `container` entity. Pouring moves as much
//! liquid as the destination has room for into a fresh liquid entity inside
//! the destination.

use std::sync::Arc;

use eko_engine::action::CONTAINS;
use eko_engine::{Action, ActionContext, ContentRegistry, Simulation, StandardMethods};
use eko_foundation::{Entity, Result, Value};
use eko_storage::{Model, Predicate};

fn number(model: &Model, entity: Entity, ty: &str, key: &str) -> f64 {
    model
        .get(entity, ty, key)
        .and_then(Value::as_number)
        .unwrap_or(0.0)
}

fn liquids(model: &Model, container: Entity) -> Vec<Entity> {
    let liquid = Predicate::new().has("liquid");
    model
        .targets(container, CONTAINS)
        .into_iter()
        .filter(|&e| model.matches(e, &liquid))
        .collect()
}

struct Pour;

impl Action for Pour {
    fn duration(&self) -> u32 {
        1
    }

    fn matches(&self, model: &Model, context: &ActionContext) -> bool {
        let container = Predicate::new().has("container");
        let (Some(target), Some(source)) = (context.target, context.using) else {
            return false;
        };
        target != source
            && model.matches(target, &container)
            && model.matches(source, &container)
            && !liquids(model, source).is_empty()
    }

    fn complete(&self, model: &mut Model, context: &ActionContext) -> Result<()> {
        let (Some(target), Some(source)) = (context.target, context.using) else {
            return Ok(());
        };
        let Some(&liquid) = liquids(model, source).first() else {
            return Ok(());
        };
        let held: f64 = liquids(model, target)
            .into_iter()
            .map(|l| number(model, l, "liquid", "volume"))
            .sum();
        let room = number(model, target, "container", "volume") - held;
        let available = number(model, liquid, "liquid", "volume");
        let amount = available.min(room);
        if amount <= 0.0 {
            return Ok(());
        }

        model.set(liquid, "liquid", "volume", available - amount)?;
        let poured = model.entity();
        let mut properties = model.properties(liquid);
        if let Some(bag) = properties.get_mut("liquid") {
            bag.insert("volume".into(), Value::Float(amount));
        }
        model.set_properties(poured, &properties)?;
        model.link(target, CONTAINS, poured)?;
        Ok(())
    }

    fn name(&self, model: &Model, context: &ActionContext) -> String {
        let label = |e: Option<Entity>| {
            e.and_then(|e| model.get(e, "name", "text"))
                .and_then(Value::as_str)
                .unwrap_or("something")
                .to_owned()
        };
        format!("pour from {} into {}", label(context.using), label(context.target))
    }
}

struct Scene {
    simulation: Simulation,
    player: Entity,
    cup: Entity,
    calabash: Entity,
    wine: Entity,
}

fn scene() -> Scene {
    let mut content = ContentRegistry::new();
    StandardMethods::install(&mut content);
    content.actions_mut().set("pour", Arc::new(Pour));
    let mut simulation = Simulation::new(content);

    let model = simulation.model_mut();
    let player = model.entity();
    let cup = model.entity();
    let calabash = model.entity();
    let wine = model.entity();
    model.set(cup, "container", "volume", 0.2).unwrap();
    model.set(cup, "name", "text", "cup").unwrap();
    model.set(calabash, "container", "volume", 1).unwrap();
    model.set(calabash, "name", "text", "calabash").unwrap();
    model.set(wine, "liquid", "volume", 1).unwrap();
    model.set(wine, "liquid", "name", "wine").unwrap();
    model.link(calabash, CONTAINS, wine).unwrap();
    model.link(player, CONTAINS, calabash).unwrap();
    simulation.set_perspective(Some(player));

    Scene {
        simulation,
        player,
        cup,
        calabash,
        wine,
    }
}

#[test]
fn pour_wine_into_cup() {
    let Scene {
        mut simulation,
        player,
        cup,
        calabash,
        wine,
    } = scene();

    let options = simulation.get_options(player, Some(cup)).unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, "pour from calabash into cup");
    assert_eq!(options[0].context.using, Some(calabash));

    simulation.select(&options[0]).unwrap();
    let report = simulation.update().unwrap();
    assert_eq!(report.completed.len(), 1);

    let model = simulation.model();
    let remaining = number(model, wine, "liquid", "volume");
    assert!((remaining - 0.8).abs() < 1e-9, "calabash holds {remaining}");

    let poured = liquids(model, cup);
    assert_eq!(poured.len(), 1);
    assert!((number(model, poured[0], "liquid", "volume") - 0.2).abs() < 1e-9);
    assert_eq!(
        model.get(poured[0], "liquid", "name"),
        Some(&Value::from("wine"))
    );
    assert_eq!(liquids(model, calabash), vec![wine]);
}

#[test]
fn full_cup_takes_no_more() {
    let Scene {
        mut simulation,
        player,
        cup,
        wine,
        ..
    } = scene();

    for _ in 0..2 {
        let option = simulation
            .get_options(player, Some(cup))
            .unwrap()
            .remove(0);
        simulation.select(&option).unwrap();
        simulation.update().unwrap();
    }

    let model = simulation.model();
    assert_eq!(liquids(model, cup).len(), 1);
    assert!((number(model, wine, "liquid", "volume") - 0.8).abs() < 1e-9);
}

#[test]
fn cannot_pour_a_container_into_itself() {
    let Scene {
        mut simulation,
        player,
        calabash,
        ..
    } = scene();

    assert!(
        simulation
            .get_options(player, Some(calabash))
            .unwrap()
            .is_empty()
    );
}
