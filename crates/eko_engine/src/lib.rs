//! Action resolution for the Eko kernel.
//!
//! This crate provides:
//! - [`ContentRegistry`] - Authored actions, methods, descriptions, templates, and initials
//! - [`get_options`] - Option discovery for an agent against a target
//! - [`TickExecutor`] - The update cycle that advances and completes actions
//! - [`StandardMethods`] - Containment and action methods most content needs
//! - [`Simulation`] - A model, its content, and the perspective entity

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod config;
pub mod content;
pub mod methods;
pub mod options;
pub mod simulation;
pub mod tick;

pub use action::{Action, ActionContext, ActionOption, ActionState};
pub use config::EngineConfig;
pub use content::{
    ContentKind, ContentRegistry, Description, Initial, Method, Receiver, Shelf, Template,
};
pub use methods::StandardMethods;
pub use options::get_options;
pub use simulation::Simulation;
pub use tick::{TickExecutor, UpdateReport};
