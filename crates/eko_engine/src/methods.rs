//! Methods the engine and most content rely on.
//!
//! Containment is expressed with `contains` edges from container to
//! contents. These are ordinary registered methods; content may replace any
//! of them by registering its own under the same name.

use std::sync::Arc;

use eko_foundation::{Error, Result, Value};
use eko_storage::Model;
use tracing::trace;

use crate::action::{self, CONTAINS, PERFORMING};
use crate::content::{ContentRegistry, Receiver};

/// Name of the contents method used by option discovery.
pub const GET_CONTENTS: &str = "getContents";
/// Name of the location method.
pub const GET_LOCATION: &str = "getLocation";
/// Name of the move method.
pub const MOVE_TO: &str = "moveTo";
/// Name of the pending-actions method.
pub const GET_ACTIONS: &str = "getActions";

/// Installs the standard methods.
pub struct StandardMethods;

impl StandardMethods {
    /// Registers every standard method on `content`.
    pub fn install(content: &mut ContentRegistry) {
        let methods = content.methods_mut();
        methods.set(GET_CONTENTS, Arc::new(get_contents));
        methods.set(GET_LOCATION, Arc::new(get_location));
        methods.set(MOVE_TO, Arc::new(move_to));
        methods.set(GET_ACTIONS, Arc::new(get_actions));
    }
}

/// Entities the receiver contains, in ascending id order.
fn get_contents(model: &mut Model, receiver: Receiver, _: &[Value]) -> Result<Value> {
    let entity = receiver.entity()?;
    let mut contents = model.targets(entity, CONTAINS);
    contents.sort_by_key(|&e| model.id(e));
    Ok(contents.into())
}

/// The receiver's container, or `Nil`.
fn get_location(model: &mut Model, receiver: Receiver, _: &[Value]) -> Result<Value> {
    let entity = receiver.entity()?;
    Ok(model.sources(entity, CONTAINS).first().copied().into())
}

/// Moves the receiver into the entity given as the first argument.
fn move_to(model: &mut Model, receiver: Receiver, args: &[Value]) -> Result<Value> {
    let entity = receiver.entity()?;
    let destination = args
        .first()
        .and_then(Value::as_entity)
        .ok_or_else(|| Error::invalid_argument("moveTo expects a destination entity"))?;
    for container in model.sources(entity, CONTAINS) {
        model.unlink(container, CONTAINS, entity);
    }
    model.link(destination, CONTAINS, entity)?;
    trace!(%entity, %destination, "moved");
    Ok(Value::Nil)
}

/// Action entities the receiver is performing.
fn get_actions(model: &mut Model, receiver: Receiver, _: &[Value]) -> Result<Value> {
    let entity = receiver.entity()?;
    let actions: Vec<_> = model
        .targets(entity, PERFORMING)
        .into_iter()
        .filter(|&a| model.get(a, action::ACTION, "name").is_some())
        .collect();
    Ok(actions.into())
}
