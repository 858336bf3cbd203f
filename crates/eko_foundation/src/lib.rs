//! Core types for the Eko interactive-fiction kernel.
//!
//! This crate provides:
//! - [`Entity`] - Opaque graph node handles
//! - [`Direction`] - Connection traversal filters
//! - [`Value`] - Property values carried by components and connections
//! - [`Error`] - Error taxonomy shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod value;

pub use entity::{Direction, Entity};
pub use error::{Error, ErrorKind, Result, SemanticLimit, StructureKind};
pub use value::Value;
