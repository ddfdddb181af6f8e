//! Integration tests for error taxonomy resolution

use extmodel_foundation::{ErrorKind, Value};
use extmodel_taxonomy::{BuiltinErrorType, ErrorModel, ErrorTaxonomy, ErrorTypeDefinition};

fn identifiers(models: &[&ErrorModel]) -> Vec<String> {
    models.iter().map(|m| m.identifier()).collect()
}

// =============================================================================
// Hierarchy shape
// =============================================================================

#[test]
fn chain_to_any_declares_three_models() {
    let taxonomy = ErrorTaxonomy::resolve(
        "http",
        vec![
            ErrorTypeDefinition::new("A").with_declared_parent("B"),
            ErrorTypeDefinition::new("B"),
        ],
    )
    .unwrap();

    let declared = taxonomy.declared_models();
    assert_eq!(declared.len(), 3);
    let ids = identifiers(&declared);
    assert!(ids.contains(&"HTTP:A".to_string()));
    assert!(ids.contains(&"HTTP:B".to_string()));
    assert!(ids.contains(&"MULE:ANY".to_string()));

    let a = taxonomy.lookup("A").unwrap();
    assert_eq!(a.depth(), 2);
    assert!(a.is_a(taxonomy.lookup("B").unwrap()));
}

#[test]
fn every_reference_shares_one_instance() {
    let taxonomy = ErrorTaxonomy::resolve(
        "http",
        vec![
            ErrorTypeDefinition::new("CHILD_1").with_declared_parent("BASE"),
            ErrorTypeDefinition::new("CHILD_2").with_declared_parent("BASE"),
            ErrorTypeDefinition::new("BASE"),
        ],
    )
    .unwrap();

    let one = taxonomy.lookup("CHILD_1").unwrap().parent().unwrap();
    let two = taxonomy.lookup("CHILD_2").unwrap().parent().unwrap();
    assert!(one.ptr_eq(two));
    assert!(one.ptr_eq(taxonomy.lookup("BASE").unwrap()));
}

#[test]
fn empty_definitions_still_carry_builtins() {
    let taxonomy = ErrorTaxonomy::resolve("ftp", Vec::new()).unwrap();
    assert!(taxonomy.declared_models().is_empty());
    assert!(taxonomy.builtin(BuiltinErrorType::Any).is_some());
    assert_eq!(
        taxonomy.connectivity().map(ErrorModel::identifier).as_deref(),
        Some("FTP:CONNECTIVITY")
    );
    assert_eq!(
        taxonomy.retry_exhausted().map(ErrorModel::identifier).as_deref(),
        Some("FTP:RETRY_EXHAUSTED")
    );
    assert!(taxonomy.len() >= 5);
}

// =============================================================================
// Violations
// =============================================================================

#[test]
fn two_node_cycle_rejected() {
    let err = ErrorTaxonomy::resolve(
        "http",
        vec![
            ErrorTypeDefinition::new("A").with_declared_parent("B"),
            ErrorTypeDefinition::new("B").with_declared_parent("A"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicErrorTypes(_)));
    assert!(err.is_structural_violation());
}

#[test]
fn identical_duplicates_collapse() {
    let taxonomy = ErrorTaxonomy::resolve(
        "http",
        vec![ErrorTypeDefinition::new("TIMEOUT"), ErrorTypeDefinition::new("TIMEOUT")],
    )
    .unwrap();
    assert_eq!(taxonomy.declared_models().len(), 2);
}

#[test]
fn conflicting_duplicates_rejected() {
    let err = ErrorTaxonomy::resolve(
        "http",
        vec![
            ErrorTypeDefinition::new("TIMEOUT"),
            ErrorTypeDefinition::new("TIMEOUT").with_parent(BuiltinErrorType::Connectivity),
        ],
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateErrorType { .. }));
}

#[test]
fn unknown_parent_rejected() {
    let err = ErrorTaxonomy::resolve(
        "http",
        vec![ErrorTypeDefinition::new("A").with_declared_parent("NOWHERE")],
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownErrorType(_)));
}

#[test]
fn reserved_root_rejected() {
    let err = ErrorTaxonomy::resolve("http", vec![ErrorTypeDefinition::new("CRITICAL")]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalModel(_)));
}

// =============================================================================
// Marker payloads
// =============================================================================

#[test]
fn definitions_from_marker_payloads() {
    let payloads = [
        Value::from("TIMEOUT"),
        Value::map([("type", Value::from("BAD_CERT")), ("parent", Value::from("MULE:SECURITY"))]),
    ];
    let definitions: Vec<_> = payloads
        .iter()
        .map(|p| ErrorTypeDefinition::from_value("error-types", p).unwrap())
        .collect();
    let taxonomy = ErrorTaxonomy::resolve("http", definitions).unwrap();

    let bad_cert = taxonomy.lookup("BAD_CERT").unwrap();
    assert_eq!(bad_cert.parent().unwrap().identifier(), "MULE:SECURITY");
    assert_eq!(taxonomy.lookup_qualified("MULE:SECURITY").map(ErrorModel::identifier).as_deref(), Some("MULE:SECURITY"));
}

#[test]
fn malformed_payload_rejected() {
    let err = ErrorTypeDefinition::from_value("error-types", &Value::Int(3)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidMarkerPayload { .. }));
}
