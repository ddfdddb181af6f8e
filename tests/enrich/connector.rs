//! End-to-end enrichment of a small database connector
//!
//! The connector declares error types and a notification, one configuration
//! with a connection provider, a connected listener, and a streaming
//! `select` operation.

use extmodel_declaration::{
    BaseDeclaration, ConfigurationDeclaration, ConnectionProviderDeclaration, DeclarationTree,
    ExtensionDeclaration, NodeId, NodeRef, OperationDeclaration, Owner, ParameterDeclaration,
    SemanticType, SourceDeclaration,
};
use extmodel_enrich::{
    ClusterSupport, ClusterSupportProperty, EnrichmentConfig, EnrichmentContext,
    EnrichmentPipeline, ErrorTaxonomyProperty, InfrastructureParameterProperty, MemberKind,
    PipelineState, StaticIntrospector, StaticMember, markers,
};
use extmodel_foundation::{ErrorKind, Value};

struct Connector {
    tree: DeclarationTree,
    introspector: StaticIntrospector,
    provider: NodeId,
    listener: NodeId,
    select: NodeId,
    sql: NodeId,
}

fn base(name: &str) -> BaseDeclaration {
    BaseDeclaration::new(name)
}

fn connector() -> Connector {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("Database").with_xml_dsl("db", "urn:db"));
    let mut introspector = StaticIntrospector::new();

    introspector.add(
        StaticMember::element(NodeRef::Extension, MemberKind::Type)
            .marker_value(
                markers::ERROR_TYPES,
                Value::list([
                    Value::from("QUERY"),
                    Value::map([("type", Value::from("BAD_SQL")), ("parent", Value::from("QUERY"))]),
                ]),
            )
            .marker_value(
                markers::NOTIFICATION_ACTIONS,
                Value::map([("name", Value::from("ROW_READ")), ("type", Value::from("number"))]),
            ),
    );

    let config = tree
        .add_configuration(ConfigurationDeclaration { base: base("config"), ..Default::default() })
        .unwrap();
    let provider = tree
        .add_connection_provider(
            Owner::Component(config),
            ConnectionProviderDeclaration { base: base("pooled"), ..Default::default() },
        )
        .unwrap();

    let listener = tree
        .add_source(
            Owner::Component(config),
            SourceDeclaration { base: base("listener"), ..Default::default() },
        )
        .unwrap();
    introspector.add(
        StaticMember::new(listener, "connection", MemberKind::Field, SemanticType::Any)
            .marker(markers::CONNECTION),
    );

    let select = tree
        .add_operation(
            Owner::Component(config),
            OperationDeclaration { base: base("select"), ..Default::default() },
        )
        .unwrap();
    let group = tree.default_group(select).unwrap();
    let sql = tree
        .add_parameter(group, ParameterDeclaration::new("sql", SemanticType::String).required())
        .unwrap();
    introspector
        .add(
            StaticMember::element(select, MemberKind::Method)
                .marker(markers::STREAMING)
                .marker_value(markers::THROWS, "BAD_SQL")
                .marker_value(markers::FIRES, "ROW_READ"),
        )
        .add(
            StaticMember::new(select, "connection", MemberKind::Parameter, SemanticType::Any)
                .marker(markers::CONNECTION),
        )
        .add(
            StaticMember::new(sql, "sql", MemberKind::Parameter, SemanticType::String)
                .marker_value(markers::DISPLAY_NAME, "SQL Query Text")
                .marker(markers::TEXT),
        );

    Connector {
        tree,
        introspector,
        provider,
        listener,
        select,
        sql,
    }
}

fn enrich(connector: &mut Connector) {
    let mut ctx = EnrichmentContext::new(&mut connector.tree, &connector.introspector);
    let mut pipeline = EnrichmentPipeline::with_default_enrichers();
    pipeline.run(&mut ctx).unwrap();
    assert_eq!(pipeline.state(), PipelineState::Completed);
}

fn error_ids(tree: &DeclarationTree, id: NodeId) -> Vec<String> {
    tree.get(id)
        .unwrap()
        .errors()
        .unwrap()
        .iter()
        .map(|model| model.identifier())
        .collect()
}

// =============================================================================
// Extension level
// =============================================================================

#[test]
fn extension_error_models_and_notifications() {
    let mut c = connector();
    enrich(&mut c);

    let extension = c.tree.extension();
    let ids: Vec<String> = extension.error_models.iter().map(|m| m.identifier()).collect();
    for expected in ["DB:QUERY", "DB:BAD_SQL", "DB:CONNECTIVITY", "DB:RETRY_EXHAUSTED", "MULE:ANY"] {
        assert!(ids.contains(&expected.to_string()), "missing {expected} in {ids:?}");
    }
    assert!(c.tree.property::<ErrorTaxonomyProperty>(NodeRef::Extension).is_some());

    let notification = extension.notification("ROW_READ").unwrap();
    assert_eq!(notification.data_type, "number");
    assert_eq!(notification.qualified_name(), "DB:ROW_READ");
}

// =============================================================================
// Components
// =============================================================================

#[test]
fn select_operation_enriched() {
    let mut c = connector();
    enrich(&mut c);

    let op = c.tree.get(c.select).unwrap().as_operation().unwrap();
    assert!(op.requires_connection);
    assert!(op.supports_streaming);
    assert_eq!(op.notifications, vec!["DB:ROW_READ"]);
    assert_eq!(op.stereotype.as_ref().map(ToString::to_string).as_deref(), Some("MULE:PROCESSOR"));

    let errors = error_ids(&c.tree, c.select);
    assert!(errors.contains(&"DB:BAD_SQL".to_string()));
    assert!(errors.contains(&"DB:CONNECTIVITY".to_string()));
    assert!(errors.contains(&"DB:RETRY_EXHAUSTED".to_string()));

    let streaming = c.tree.find_parameter(c.select, "streamingStrategy").unwrap().unwrap();
    let infrastructure = c
        .tree
        .property::<InfrastructureParameterProperty>(streaming.into())
        .unwrap();
    assert_eq!(infrastructure.added_by, "streaming");

    let sql = c.tree.get(c.sql).unwrap().as_parameter().unwrap();
    assert_eq!(sql.display.display_name.as_deref(), Some("SQL Query Text"));
    assert!(sql.layout.text);
}

#[test]
fn listener_defaults_to_all_nodes() {
    let mut c = connector();
    enrich(&mut c);

    let source = c.tree.get(c.listener).unwrap().as_source().unwrap();
    assert!(!source.runs_on_primary_node_only);
    assert!(source.requires_connection);
    assert_eq!(
        source.stereotype.as_ref().map(ToString::to_string).as_deref(),
        Some("MULE:SOURCE")
    );
    assert_eq!(
        c.tree
            .property::<ClusterSupportProperty>(c.listener.into())
            .map(|p| p.support),
        Some(ClusterSupport::DefaultAllNodes)
    );

    let primary = c.tree.find_parameter(c.listener, "primaryNodeOnly").unwrap().unwrap();
    let primary = c.tree.get(primary).unwrap().as_parameter().unwrap();
    assert!(!primary.required);
    assert_eq!(primary.ty, SemanticType::Boolean);
    assert_eq!(primary.default_value, Some(Value::Bool(false)));

    assert!(
        c.tree
            .find_parameter(c.listener, "reconnectionStrategy")
            .unwrap()
            .is_some()
    );
}

#[test]
fn provider_gets_reconnection_and_config_stereotype() {
    let mut c = connector();
    enrich(&mut c);

    assert!(c.tree.find_parameter(c.provider, "reconnection").unwrap().is_some());
    let provider = c.tree.get(c.provider).unwrap();
    assert_eq!(
        provider.stereotype().map(ToString::to_string).as_deref(),
        Some("DB:CONNECTION")
    );
}

// =============================================================================
// Re-running
// =============================================================================

#[test]
fn second_run_adds_nothing() {
    let mut c = connector();
    enrich(&mut c);
    let nodes = c.tree.len();
    let error_models = c.tree.extension().error_models.clone();
    let select_errors = error_ids(&c.tree, c.select);
    let listener_params = c.tree.parameters(c.listener).unwrap();

    enrich(&mut c);

    assert_eq!(c.tree.len(), nodes);
    assert_eq!(c.tree.extension().error_models, error_models);
    assert_eq!(error_ids(&c.tree, c.select), select_errors);
    assert_eq!(c.tree.parameters(c.listener).unwrap(), listener_params);
    assert_eq!(
        c.tree.get(c.select).unwrap().as_operation().unwrap().notifications,
        vec!["DB:ROW_READ"]
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn renamed_infrastructure_parameters() {
    let mut c = connector();
    let config = EnrichmentConfig::default().with_primary_node_only_parameter("primaryOnly");
    let mut ctx = EnrichmentContext::new(&mut c.tree, &c.introspector).with_config(config);
    EnrichmentPipeline::with_default_enrichers().run(&mut ctx).unwrap();

    assert!(c.tree.find_parameter(c.listener, "primaryOnly").unwrap().is_some());
    assert!(c.tree.find_parameter(c.listener, "primaryNodeOnly").unwrap().is_none());
}

#[test]
fn undeclared_throws_fails_the_run() {
    let mut c = connector();
    c.introspector.add(
        StaticMember::element(c.listener, MemberKind::Type).marker_value(markers::THROWS, "NOPE"),
    );
    let mut ctx = EnrichmentContext::new(&mut c.tree, &c.introspector);
    let mut pipeline = EnrichmentPipeline::with_default_enrichers();
    let err = pipeline.run(&mut ctx).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UndeclaredErrorType { .. }));
    let frames = err.context.map(|context| context.stack).unwrap_or_default();
    assert!(frames[0].contains("component-errors"));
}
