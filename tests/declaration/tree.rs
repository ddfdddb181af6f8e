//! Integration tests for the declaration tree

use extmodel_declaration::{
    BaseDeclaration, ConfigurationDeclaration, ConnectionProviderDeclaration, DEFAULT_GROUP_NAME,
    DeclarationKind, DeclarationTree, ExtensionDeclaration, NodeRef, OperationDeclaration, Owner,
    ParameterDeclaration, ParameterGroupDeclaration, SemanticType, SourceDeclaration,
};
use extmodel_foundation::ErrorKind;

fn tree() -> DeclarationTree {
    DeclarationTree::new(ExtensionDeclaration::new("http"))
}

fn named_operation(name: &str) -> OperationDeclaration {
    OperationDeclaration {
        base: BaseDeclaration::new(name),
        ..OperationDeclaration::default()
    }
}

// =============================================================================
// Extension
// =============================================================================

#[test]
fn namespace_prefers_xml_prefix() {
    let extension = ExtensionDeclaration::new("HTTP Connector");
    assert_eq!(extension.namespace(), "HTTP CONNECTOR");

    let extension = ExtensionDeclaration::new("HTTP Connector")
        .with_xml_dsl("http", "http://www.mulesoft.org/schema/mule/http");
    assert_eq!(extension.namespace(), "HTTP");
    assert_eq!(extension.xml_dsl.prefix, "http");
}

// =============================================================================
// Components
// =============================================================================

#[test]
fn components_attach_to_owner() {
    let mut tree = tree();
    let config = tree.add_configuration(ConfigurationDeclaration::default()).unwrap();
    let inner = tree.add_operation(Owner::Component(config), named_operation("request")).unwrap();
    let outer = tree.add_operation(Owner::Extension, named_operation("ping")).unwrap();

    assert_eq!(tree.extension().operations, vec![outer]);
    let config_decl = tree.get(config).unwrap().as_configuration().unwrap();
    assert_eq!(config_decl.operations, vec![inner]);
    assert_eq!(tree.kind(inner.into()).unwrap(), DeclarationKind::Operation);
    assert_eq!(tree.name(NodeRef::Extension).unwrap(), "http");
}

#[test]
fn component_under_non_configuration_rejected() {
    let mut tree = tree();
    let op = tree.add_operation(Owner::Extension, named_operation("a")).unwrap();
    let len = tree.len();
    let err = tree
        .add_source(Owner::Component(op), SourceDeclaration::default())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongNodeKind { .. }));
    assert_eq!(tree.len(), len);
}

#[test]
fn shared_provider_listed_by_both_configurations() {
    let mut tree = tree();
    let first = tree.add_configuration(ConfigurationDeclaration::default()).unwrap();
    let second = tree.add_configuration(ConfigurationDeclaration::default()).unwrap();
    let provider = tree
        .add_connection_provider(Owner::Component(first), ConnectionProviderDeclaration::default())
        .unwrap();
    tree.share_connection_provider(Owner::Component(second), provider)
        .unwrap();

    for config in [first, second] {
        let decl = tree.get(config).unwrap().as_configuration().unwrap();
        assert_eq!(decl.connection_providers, vec![provider]);
    }
}

// =============================================================================
// Groups and parameters
// =============================================================================

#[test]
fn default_group_created_once() {
    let mut tree = tree();
    let op = tree.add_operation(Owner::Extension, named_operation("a")).unwrap();
    let first = tree.default_group(op).unwrap();
    let second = tree.default_group(op).unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.get(first).unwrap().name(), DEFAULT_GROUP_NAME);
}

#[test]
fn shared_group_parameters_found_from_each_owner() {
    let mut tree = tree();
    let a = tree.add_operation(Owner::Extension, named_operation("a")).unwrap();
    let b = tree.add_operation(Owner::Extension, named_operation("b")).unwrap();
    let group = tree
        .add_parameter_group(a, ParameterGroupDeclaration::new("Connection"))
        .unwrap();
    let param = tree
        .add_parameter(group, ParameterDeclaration::new("host", SemanticType::String).required())
        .unwrap();
    let default_b = tree.default_group(b).unwrap();
    tree.share_group(b, group).unwrap();
    tree.share_group(b, group).unwrap();

    assert_eq!(tree.find_parameter(a, "host").unwrap(), Some(param));
    assert_eq!(tree.find_parameter(b, "host").unwrap(), Some(param));
    assert_eq!(tree.get(b).unwrap().parameter_groups(), &[default_b, group]);
    assert!(tree.get(param).unwrap().as_parameter().unwrap().required);
}

#[test]
fn missing_node_reported() {
    let empty = tree();
    let mut other = tree();
    let foreign = other.add_operation(Owner::Extension, named_operation("x")).unwrap();
    let err = empty.get(foreign).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NodeNotFound(_)));
}
