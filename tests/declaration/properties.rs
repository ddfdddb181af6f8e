//! Integration tests for model properties

use extmodel_declaration::{
    DeclarationTree, ExtensionDeclaration, ModelProperty, NodeRef, OperationDeclaration, Owner,
};

#[derive(Debug, PartialEq)]
struct Marker(u32);

impl ModelProperty for Marker {
    const KIND: &'static str = "test-marker";
}

#[derive(Debug)]
struct Other;

impl ModelProperty for Other {
    const KIND: &'static str = "test-other";
}

#[test]
fn same_kind_overwrites() {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
    let op = tree
        .add_operation(Owner::Extension, OperationDeclaration::default())
        .unwrap();

    assert!(!tree.add_property(op.into(), Marker(1)).unwrap());
    assert!(tree.add_property(op.into(), Marker(2)).unwrap());
    assert_eq!(tree.property::<Marker>(op.into()), Some(&Marker(2)));
    assert_eq!(tree.properties(op.into()).unwrap().len(), 1);
}

#[test]
fn kinds_are_independent() {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
    tree.add_property(NodeRef::Extension, Marker(7)).unwrap();
    tree.add_property(NodeRef::Extension, Other).unwrap();

    let properties = tree.properties(NodeRef::Extension).unwrap();
    assert_eq!(properties.kinds(), vec!["test-marker", "test-other"]);
    assert!(properties.contains_kind(Marker::KIND));
    assert!(properties.contains::<Other>());
}

#[test]
fn absent_property_is_none() {
    let tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
    assert!(tree.property::<Marker>(NodeRef::Extension).is_none());
}
