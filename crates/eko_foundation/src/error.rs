//! Error types for the Eko kernel.
//!
//! Uses `thiserror` for ergonomic error definition. Every kind here marks a
//! caller or content-authoring defect; the kernel never retries or recovers
//! from one on its own.

use std::fmt;

use thiserror::Error;

/// The main error type for Eko operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

/// Result alias used across the Eko crates.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a duplicate structure error.
    #[must_use]
    pub fn duplicate(structure: StructureKind, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate {
            structure,
            description: description.into(),
        })
    }

    /// Creates a content lookup miss.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            kind: kind.into(),
            name: name.into(),
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a stale handle error.
    #[must_use]
    pub fn stale_handle(handle: impl fmt::Debug) -> Self {
        Self::new(ErrorKind::StaleHandle(format!("{handle:?}")))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// True if this is a duplicate structure error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, ErrorKind::Duplicate { .. })
    }

    /// True if this is a content lookup miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A second live structure was added under an occupied key.
    #[error("duplicate {structure}: {description}")]
    Duplicate {
        /// Which store rejected the structure.
        structure: StructureKind,
        /// The occupied key, rendered for humans.
        description: String,
    },

    /// A content registry lookup missed.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Content kind that was searched.
        kind: String,
        /// Name that was not registered.
        name: String,
    },

    /// An argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mutation went through a handle whose record was freed.
    #[error("stale handle: {0}")]
    StaleHandle(String),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),
}

/// The two kinds of structure kept by the model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// A typed attribute attached to one entity.
    Component,
    /// A typed directed edge between two entities.
    Connection,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => f.write_str("component"),
            Self::Connection => f.write_str("connection"),
        }
    }
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// One update cycle fast-forwarded more steps than allowed.
    MaxSteps {
        /// The configured limit.
        limit: u32,
        /// Actions still in progress when the switch tripped.
        pending: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxSteps { limit, pending } => {
                write!(
                    f,
                    "max steps per update ({limit}) exceeded with {pending} action(s) pending"
                )
            }
        }
    }
}
