//! The standard enrichers.
//!
//! | Enricher | Phase |
//! |---|---|
//! | [`ErrorTypesEnricher`] | INITIALIZE |
//! | [`NotificationsEnricher`] | STRUCTURE |
//! | [`ConnectivityEnricher`] | STRUCTURE |
//! | [`DefaultEncodingEnricher`] | STRUCTURE |
//! | [`ClusterSupportEnricher`] | STRUCTURE |
//! | [`BackPressureEnricher`] | STRUCTURE |
//! | [`StreamingEnricher`] | STRUCTURE |
//! | [`CustomTypesEnricher`] | STRUCTURE |
//! | [`MetadataResolversEnricher`] | STRUCTURE |
//! | [`RequiredForMetadataEnricher`] | STRUCTURE |
//! | [`ValueProvidersEnricher`] | STRUCTURE |
//! | [`ComponentErrorsEnricher`] | POST_STRUCTURE |
//! | [`StereotypesEnricher`] | POST_STRUCTURE |
//! | [`DisplayEnricher`] | POST_STRUCTURE |
//! | [`ConnectionInfrastructureEnricher`] | WIRING |

mod back_pressure;
mod cluster_support;
mod component_errors;
mod connection_infrastructure;
mod connectivity;
mod custom_types;
mod default_encoding;
mod display;
mod error_types;
mod metadata;
mod notifications;
mod required_for_metadata;
mod stereotypes;
mod streaming;
mod value_providers;

pub use back_pressure::BackPressureEnricher;
pub use cluster_support::ClusterSupportEnricher;
pub use component_errors::ComponentErrorsEnricher;
pub use connection_infrastructure::ConnectionInfrastructureEnricher;
pub use connectivity::ConnectivityEnricher;
pub use custom_types::CustomTypesEnricher;
pub use default_encoding::DefaultEncodingEnricher;
pub use display::DisplayEnricher;
pub use error_types::ErrorTypesEnricher;
pub use metadata::MetadataResolversEnricher;
pub use notifications::NotificationsEnricher;
pub use required_for_metadata::RequiredForMetadataEnricher;
pub use stereotypes::StereotypesEnricher;
pub use streaming::StreamingEnricher;
pub use value_providers::ValueProvidersEnricher;

use extmodel_declaration::{
    DeclarationKind, DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, Owner,
    ParameterDeclaration, Walk,
};
use extmodel_foundation::{Result, Value};
use tracing::debug;

use crate::pipeline::DeclarationEnricher;
use crate::properties::InfrastructureParameterProperty;

/// Returns the standard enrichers in registration order.
#[must_use]
pub fn standard() -> Vec<Box<dyn DeclarationEnricher>> {
    vec![
        Box::new(ErrorTypesEnricher),
        Box::new(NotificationsEnricher),
        Box::new(ConnectivityEnricher),
        Box::new(DefaultEncodingEnricher),
        Box::new(ClusterSupportEnricher),
        Box::new(BackPressureEnricher),
        Box::new(StreamingEnricher),
        Box::new(CustomTypesEnricher),
        Box::new(MetadataResolversEnricher),
        Box::new(RequiredForMetadataEnricher),
        Box::new(ValueProvidersEnricher),
        Box::new(ComponentErrorsEnricher),
        Box::new(StereotypesEnricher),
        Box::new(DisplayEnricher),
        Box::new(ConnectionInfrastructureEnricher),
    ]
}

// Position of each infrastructure parameter among its siblings.
const STREAMING_STRATEGY_SEQUENCE: u32 = 1;
const RECONNECTION_STRATEGY_SEQUENCE: u32 = 2;
const RECONNECTION_SEQUENCE: u32 = 3;
const PRIMARY_NODE_ONLY_SEQUENCE: u32 = 4;
const BACK_PRESSURE_SEQUENCE: u32 = 5;

// =============================================================================
// Shared helpers
// =============================================================================

/// A component reached by a walk.
#[derive(Copy, Clone, Debug)]
struct Reached {
    kind: DeclarationKind,
    id: NodeId,
}

/// Collects every component once, in walk order.
#[derive(Default)]
struct Collector(Vec<Reached>);

impl Collector {
    fn push(&mut self, kind: DeclarationKind, id: NodeId) -> Result<Walk> {
        self.0.push(Reached { kind, id });
        Ok(Walk::Continue)
    }
}

impl DeclarationVisitor for Collector {
    fn on_configuration(&mut self, _: &mut DeclarationTree, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::Configuration, id)
    }

    fn on_connection_provider(&mut self, _: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::ConnectionProvider, id)
    }

    fn on_source(&mut self, _: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::Source, id)
    }

    fn on_operation(&mut self, _: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::Operation, id)
    }

    fn on_function(&mut self, _: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::Function, id)
    }

    fn on_construct(&mut self, _: &mut DeclarationTree, id: NodeId) -> Result<Walk> {
        self.push(DeclarationKind::Construct, id)
    }
}

/// Returns the components of `tree` whose kind is in `kinds`, in walk order.
fn components(tree: &mut DeclarationTree, kinds: &[DeclarationKind]) -> Result<Vec<NodeId>> {
    let mut collector = Collector::default();
    DeclarationWalker::idempotent().walk(tree, &mut collector)?;
    Ok(collector
        .0
        .into_iter()
        .filter(|reached| kinds.contains(&reached.kind))
        .map(|reached| reached.id)
        .collect())
}

/// Adds an enricher-owned parameter to the default group of `owner`.
///
/// Returns `None` if `owner` already has a parameter of that name.
fn add_infrastructure_parameter(
    tree: &mut DeclarationTree,
    owner: NodeId,
    parameter: ParameterDeclaration,
    added_by: &'static str,
    sequence: u32,
) -> Result<Option<NodeId>> {
    if tree.find_parameter(owner, &parameter.base.name)?.is_some() {
        debug!(parameter = %parameter.base.name, enricher = added_by, "parameter already present");
        return Ok(None);
    }
    let group = tree.default_group(owner)?;
    let id = tree.add_parameter(group, parameter)?;
    tree.add_property(id.into(), InfrastructureParameterProperty { added_by, sequence })?;
    Ok(Some(id))
}

/// Returns the items of a payload that may be a single value or a list.
fn payload_items(value: &Value) -> Vec<Value> {
    match value.as_list() {
        Some(items) => items.iter().cloned().collect(),
        None if value.is_nil() => Vec::new(),
        None => vec![value.clone()],
    }
}
