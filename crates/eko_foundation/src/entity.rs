//! Entity handles and traversal directions.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Opaque handle naming a graph node.
///
/// An entity carries no data of its own. Handles are minted by a model from
/// a counter that never repeats and are tagged with that model's origin, so
/// two handles compare equal only if they were produced by the same
/// proposal. Whether the entity *exists* is a question for the model's
/// identity registry, not for the handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Entity {
    origin: u32,
    key: u64,
}

impl Entity {
    /// Smallest handle in sort order.
    pub const MIN: Self = Self::new(0, 0);
    /// Largest handle in sort order.
    pub const MAX: Self = Self::new(u32::MAX, u64::MAX);

    /// Builds a handle from an origin tag and a key.
    ///
    /// Models use a nonzero origin of their own; origin 0 never belongs to
    /// a model.
    #[must_use]
    pub const fn new(origin: u32, key: u64) -> Self {
        Self { origin, key }
    }

    /// Wraps a raw key under origin 0.
    ///
    /// Such handles never collide with the ones a model mints.
    #[must_use]
    pub const fn from_key(key: u64) -> Self {
        Self::new(0, key)
    }

    /// Returns the origin tag.
    #[must_use]
    pub const fn origin(self) -> u32 {
        self.origin
    }

    /// Returns the raw handle key.
    #[must_use]
    pub const fn key(self) -> u64 {
        self.key
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.origin == 0 {
            write!(f, "Entity(#{})", self.key)
        } else {
            write!(f, "Entity({}#{})", self.origin, self.key)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.key)
    }
}

/// Which incident edges of an entity a connection query considers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges where the entity is source or target.
    #[default]
    Both,
    /// Edges where the entity is the target.
    Incoming,
    /// Edges where the entity is the source.
    Outgoing,
}

impl Direction {
    /// Returns the lowercase name used when parsing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }

    /// True if an edge `source -> target` is incident to `entity` in this direction.
    #[must_use]
    pub fn admits(self, entity: Entity, source: Entity, target: Entity) -> bool {
        match self {
            Self::Both => source == entity || target == entity,
            Self::Incoming => target == entity,
            Self::Outgoing => source == entity,
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "both" => Ok(Self::Both),
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            other => Err(Error::invalid_argument(format!(
                "unknown connection direction: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
