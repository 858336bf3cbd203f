//! Eko - Interactive-fiction simulation kernel
//!
//! This crate re-exports all layers of the Eko kernel for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: eko_engine     - Content registry, options, update cycle
//! Layer 1: eko_storage    - Identity registry, stores, graph model
//! Layer 0: eko_foundation - Core types (Value, Entity, Error)
//! ```

pub use eko_engine as engine;
pub use eko_foundation as foundation;
pub use eko_storage as storage;
