//! Integration tests for Error types
//!
//! Tests error construction, display, context, and structural classification.

use extmodel_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_duplicate_error_type() {
    let err = Error::duplicate_error_type("HTTP", "TIMEOUT");
    assert!(matches!(err.kind, ErrorKind::DuplicateErrorType { .. }));
    assert_eq!(err.to_string(), "duplicate error type: HTTP:TIMEOUT");
}

#[test]
fn error_cyclic_error_types() {
    let err = Error::cyclic_error_types(vec!["A".into(), "B".into(), "A".into()]);
    assert!(matches!(err.kind, ErrorKind::CyclicErrorTypes(_)));
    assert!(err.to_string().contains("A -> B -> A"));
}

#[test]
fn error_undeclared_error_type() {
    let err = Error::undeclared_error_type("request", "MISSING");
    let msg = err.to_string();
    assert!(msg.contains("request"));
    assert!(msg.contains("MISSING"));
}

#[test]
fn error_marker_conflict() {
    let err = Error::marker_conflict("query", "connection", 2);
    assert!(matches!(err.kind, ErrorKind::MarkerConflict { count: 2, .. }));
    assert!(err.to_string().contains("connection"));
}

#[test]
fn error_resource_load() {
    let err = Error::resource_load("order.xsd", "not found");
    assert!(matches!(err.kind, ErrorKind::ResourceLoad { .. }));
    assert!(err.to_string().contains("order.xsd"));
}

// =============================================================================
// Structural classification
// =============================================================================

#[test]
fn every_kind_but_internal_is_structural() {
    let structural = [
        Error::illegal_model("x"),
        Error::duplicate_error_type("NS", "X"),
        Error::cyclic_error_types(vec![]),
        Error::unknown_error_type("X"),
        Error::undeclared_error_type("c", "X"),
        Error::marker_conflict("c", "m", 2),
        Error::invalid_marker_payload("m", "bad"),
        Error::resource_load("l", "bad"),
        Error::node_not_found(7),
        Error::wrong_node_kind("operation", "source"),
    ];
    for err in &structural {
        assert!(err.is_structural_violation(), "{err}");
    }
    assert!(!Error::internal("bug").is_structural_violation());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn frames_accumulate_innermost_first() {
    let err = Error::illegal_model("bad")
        .with_frame("in enricher 'display'")
        .with_frame("in pipeline");
    let stack = err.context.map(|c| c.stack).unwrap_or_default();
    assert_eq!(stack, vec!["in enricher 'display'", "in pipeline"]);
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_source("http")
        .with_frame("phase STRUCTURE");
    let text = context.to_string();
    assert!(text.starts_with("at http"));
    assert!(text.contains("in phase STRUCTURE"));
}
