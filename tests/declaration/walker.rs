//! Integration tests for the declaration walker

use extmodel_declaration::{
    BaseDeclaration, CallbackKind, ConfigurationDeclaration, ConnectionProviderDeclaration,
    ConstructDeclaration, DeclarationTree, DeclarationVisitor, DeclarationWalker,
    ExtensionDeclaration, NodeId, OperationDeclaration, Owner, ParameterDeclaration,
    ParameterGroupDeclaration, SemanticType, SourceDeclaration, Walk,
};
use extmodel_foundation::Result;

/// Records each callback as `kind:name`.
#[derive(Default)]
struct Trace(Vec<String>);

impl Trace {
    fn record(&mut self, tree: &DeclarationTree, kind: &str, id: NodeId) -> Result<Walk> {
        self.0.push(format!("{kind}:{}", tree.get(id)?.name()));
        Ok(Walk::Continue)
    }
}

impl DeclarationVisitor for Trace {
    fn on_configuration(&mut self, tree: &mut DeclarationTree, id: NodeId) -> Result<Walk> {
        self.record(tree, "config", id)
    }

    fn on_connection_provider(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.record(tree, "provider", id)
    }

    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.record(tree, "source", id)
    }

    fn on_operation(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.record(tree, "operation", id)
    }

    fn on_construct(&mut self, tree: &mut DeclarationTree, id: NodeId) -> Result<Walk> {
        self.record(tree, "construct", id)
    }

    fn on_parameter_group(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.record(tree, "group", id)
    }

    fn on_parameter(
        &mut self,
        tree: &mut DeclarationTree,
        _: Owner,
        _: NodeId,
        id: NodeId,
    ) -> Result<Walk> {
        self.record(tree, "param", id)
    }
}

fn base(name: &str) -> BaseDeclaration {
    BaseDeclaration::new(name)
}

/// Two configurations sharing a provider and a group, plus a source whose
/// success callback aliases one of its own groups.
fn sample() -> DeclarationTree {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
    let first = tree
        .add_configuration(ConfigurationDeclaration { base: base("first"), ..Default::default() })
        .unwrap();
    let second = tree
        .add_configuration(ConfigurationDeclaration { base: base("second"), ..Default::default() })
        .unwrap();
    let provider = tree
        .add_connection_provider(
            Owner::Component(first),
            ConnectionProviderDeclaration { base: base("basic"), ..Default::default() },
        )
        .unwrap();
    tree.share_connection_provider(Owner::Component(second), provider)
        .unwrap();

    let shared = tree
        .add_parameter_group(first, ParameterGroupDeclaration::new("shared"))
        .unwrap();
    tree.add_parameter(shared, ParameterDeclaration::new("timeout", SemanticType::Number))
        .unwrap();
    tree.share_group(second, shared).unwrap();

    let source = tree
        .add_source(
            Owner::Component(first),
            SourceDeclaration { base: base("listener"), ..Default::default() },
        )
        .unwrap();
    let response = tree
        .add_parameter_group(source, ParameterGroupDeclaration::new("response"))
        .unwrap();
    tree.add_parameter(response, ParameterDeclaration::new("status", SemanticType::Number))
        .unwrap();
    tree.set_callback(source, CallbackKind::Success, vec![response])
        .unwrap();

    tree.add_operation(Owner::Extension, OperationDeclaration { base: base("request"), ..Default::default() })
        .unwrap();
    tree.add_construct(ConstructDeclaration { base: base("router"), ..Default::default() })
        .unwrap();
    tree
}

#[test]
fn idempotent_walk_visits_shared_nodes_once() {
    let mut tree = sample();
    let mut trace = Trace::default();
    DeclarationWalker::idempotent().walk(&mut tree, &mut trace).unwrap();

    assert_eq!(
        trace.0,
        vec![
            "config:first",
            "group:default",
            "group:shared",
            "param:timeout",
            "provider:basic",
            "group:default",
            "source:listener",
            "group:default",
            "group:response",
            "param:status",
            "config:second",
            "group:default",
            "operation:request",
            "group:default",
            "construct:router",
            "group:default",
        ]
    );
}

#[test]
fn plain_walk_reports_every_owner() {
    let mut tree = sample();
    let mut trace = Trace::default();
    DeclarationWalker::new().walk(&mut tree, &mut trace).unwrap();

    let count = |entry: &str| trace.0.iter().filter(|e| *e == entry).count();
    assert_eq!(count("provider:basic"), 2);
    assert_eq!(count("group:shared"), 2);
    assert_eq!(count("group:response"), 2);
}

#[test]
fn repeated_walks_start_fresh() {
    let mut tree = sample();
    let mut walker = DeclarationWalker::idempotent();
    for _ in 0..2 {
        let mut trace = Trace::default();
        walker.walk(&mut tree, &mut trace).unwrap();
        assert_eq!(trace.0.len(), 16);
    }
}

#[test]
fn stop_ends_walk_without_error() {
    struct StopAtSource(usize);

    impl DeclarationVisitor for StopAtSource {
        fn on_parameter_group(&mut self, _: &mut DeclarationTree, _: Owner, _: NodeId) -> Result<Walk> {
            self.0 += 1;
            Ok(Walk::Continue)
        }

        fn on_source(&mut self, _: &mut DeclarationTree, _: Owner, _: NodeId) -> Result<Walk> {
            Ok(Walk::Stop)
        }
    }

    let mut tree = sample();
    let mut visitor = StopAtSource(0);
    let outcome = DeclarationWalker::idempotent().walk(&mut tree, &mut visitor).unwrap();
    assert_eq!(outcome, Walk::Stop);
    // default and shared of "first", then the provider's default
    assert_eq!(visitor.0, 3);
}

proptest::proptest! {
    #[test]
    fn aliased_group_is_visited_once(owners in 1usize..12) {
        let mut tree = DeclarationTree::new(ExtensionDeclaration::new("alias"));
        let ids: Vec<NodeId> = (0..owners)
            .map(|i| {
                tree.add_operation(
                    Owner::Extension,
                    OperationDeclaration { base: base(&format!("op{i}")), ..Default::default() },
                )
                .unwrap()
            })
            .collect();
        let shared = tree
            .add_parameter_group(ids[0], ParameterGroupDeclaration::new("shared"))
            .unwrap();
        tree.add_parameter(shared, ParameterDeclaration::new("timeout", SemanticType::Number))
            .unwrap();
        for &owner in &ids[1..] {
            tree.share_group(owner, shared).unwrap();
        }

        let mut once = Trace::default();
        DeclarationWalker::idempotent().walk(&mut tree, &mut once).unwrap();
        let mut every = Trace::default();
        DeclarationWalker::new().walk(&mut tree, &mut every).unwrap();

        let count = |trace: &Trace, entry: &str| trace.0.iter().filter(|e| *e == entry).count();
        proptest::prop_assert_eq!(count(&once, "group:shared"), 1);
        proptest::prop_assert_eq!(count(&once, "param:timeout"), 1);
        proptest::prop_assert_eq!(count(&every, "group:shared"), owners);
    }
}
