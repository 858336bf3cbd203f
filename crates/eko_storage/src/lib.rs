//! Graph storage for the Eko kernel.
//!
//! This crate provides:
//! - [`IdentityRegistry`] - Entity to id mapping with never-reused ids
//! - [`PropertyBag`] - Key/value bags carried by structures
//! - [`ComponentStore`] - Components indexed by (type, entity)
//! - [`ConnectionStore`] - Directed edges indexed by (type, source, target)
//! - [`Model`] - The graph facade composing all of the above
//! - [`Predicate`] - Declarative entity filters

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod component;
pub mod connection;
pub mod model;
pub mod predicate;
pub mod properties;
pub mod registry;

pub use arena::{Arena, Key};
pub use component::{ComponentId, ComponentRecord, ComponentStore};
pub use connection::{ConnectionId, ConnectionRecord, ConnectionStore};
pub use model::{Model, Properties};
pub use predicate::Predicate;
pub use properties::{PropertyBag, PropertyMap, props};
pub use registry::IdentityRegistry;
