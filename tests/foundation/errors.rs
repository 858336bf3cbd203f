//! Integration tests for Error types
//!
//! Tests error construction, display, and error kinds.

use eko_foundation::{Error, ErrorKind, SemanticLimit, StructureKind};

#[test]
fn duplicate_connection_display() {
    let err = Error::duplicate(StructureKind::Connection, "contains #1 -> #2");
    assert!(err.is_duplicate());
    assert_eq!(
        format!("{err}"),
        "duplicate connection: contains #1 -> #2"
    );
}

#[test]
fn not_found_is_not_duplicate() {
    let err = Error::not_found("template", "fountain");
    assert!(err.is_not_found());
    assert!(!err.is_duplicate());
}

#[test]
fn limit_exceeded_carries_the_limit() {
    let limit = SemanticLimit::MaxSteps {
        limit: 3,
        pending: 1,
    };
    let err = Error::limit_exceeded(limit.clone());
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(ref l) if *l == limit));
    assert!(format!("{err}").starts_with("limit exceeded"));
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    assert_error(&Error::invalid_argument("x"));
}
