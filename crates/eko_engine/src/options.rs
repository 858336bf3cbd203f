//! Option discovery.
//!
//! For every registered action, in registration order, an agent may act
//! with no instrument or, failing that, with any one of the things it
//! carries. The agent's contents come from the `getContents` method so
//! content can redefine what "carrying" means.

use std::sync::Arc;

use eko_foundation::{Entity, Result};
use eko_storage::Model;
use tracing::{debug, trace};

use crate::action::{Action, ActionContext, ActionOption};
use crate::content::{ContentRegistry, Receiver};
use crate::methods::GET_CONTENTS;

/// Lists every option `agent` has against `target`.
///
/// An action that matches with no instrument yields exactly one option and
/// is not tried with instruments.
///
/// # Errors
///
/// `NotFound` if an action needs instruments and `getContents` is not
/// registered, or whatever that method reports.
pub fn get_options(
    model: &mut Model,
    content: &ContentRegistry,
    agent: Entity,
    target: Option<Entity>,
) -> Result<Vec<ActionOption>> {
    let base = ActionContext::new(agent).with_target(target);
    let mut contents: Option<Vec<Entity>> = None;

    let mut options = Vec::new();
    for (name, action) in content.actions().list() {
        if action.matches(model, &base) {
            trace!(action = %name, "matched without instrument");
            options.push(option(model, &name, action.as_ref(), base));
            continue;
        }
        if contents.is_none() {
            let items = content.call(model, GET_CONTENTS, Receiver::Entity(agent), &[])?;
            contents = Some(items.entities());
        }
        for &item in contents.as_deref().unwrap_or_default() {
            let context = base.with_using(Some(item));
            if action.matches(model, &context) {
                trace!(action = %name, using = %item, "matched with instrument");
                options.push(option(model, &name, action.as_ref(), context));
            }
        }
    }
    debug!(%agent, count = options.len(), "options discovered");
    Ok(options)
}

fn option(
    model: &Model,
    name: &Arc<str>,
    action: &dyn Action,
    context: ActionContext,
) -> ActionOption {
    ActionOption {
        action: Arc::clone(name),
        label: action.name(model, &context),
        context,
    }
}
