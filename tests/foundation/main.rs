//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Entity, Direction, and Error.

mod errors;
