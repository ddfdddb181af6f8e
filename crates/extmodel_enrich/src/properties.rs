//! Model properties produced by the standard enrichers.

use std::collections::BTreeMap;
use std::fmt;

use extmodel_declaration::{ModelProperty, StereotypeModel};
use extmodel_taxonomy::ErrorTaxonomy;

use crate::type_loader::TypeFormat;

/// The resolved error taxonomy, attached to the extension.
#[derive(Clone, Debug)]
pub struct ErrorTaxonomyProperty {
    /// The taxonomy.
    pub taxonomy: ErrorTaxonomy,
}

impl ModelProperty for ErrorTaxonomyProperty {
    const KIND: &'static str = "error-taxonomy";
}

/// The member of a component receiving its connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityProperty {
    /// Name of the connection member.
    pub member: String,
}

impl ModelProperty for ConnectivityProperty {
    const KIND: &'static str = "connectivity";
}

/// The member of a component receiving the runtime default encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultEncodingProperty {
    /// Name of the encoding member.
    pub member: String,
}

impl ModelProperty for DefaultEncodingProperty {
    const KIND: &'static str = "default-encoding";
}

/// How a source behaves in a cluster.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClusterSupport {
    /// The source always runs on the primary node only.
    NotSupported,
    /// Configurable, primary node only unless told otherwise.
    DefaultPrimaryNodeOnly,
    /// Configurable, every node unless told otherwise.
    #[default]
    DefaultAllNodes,
}

impl ClusterSupport {
    /// Parses a marker payload name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NOT_SUPPORTED" => Some(Self::NotSupported),
            "DEFAULT_PRIMARY_NODE_ONLY" => Some(Self::DefaultPrimaryNodeOnly),
            "DEFAULT_ALL_NODES" => Some(Self::DefaultAllNodes),
            _ => None,
        }
    }
}

/// Cluster support of a source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClusterSupportProperty {
    /// The support mode.
    pub support: ClusterSupport,
}

impl ModelProperty for ClusterSupportProperty {
    const KIND: &'static str = "cluster-support";
}

/// What a source does when the flow cannot accept more messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackPressureMode {
    /// Block until the flow accepts the message.
    Wait,
    /// Fail the message.
    Fail,
    /// Drop the message.
    Drop,
}

impl BackPressureMode {
    /// Parses a marker payload name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "WAIT" => Some(Self::Wait),
            "FAIL" => Some(Self::Fail),
            "DROP" => Some(Self::Drop),
            _ => None,
        }
    }

    /// Returns the upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wait => "WAIT",
            Self::Fail => "FAIL",
            Self::Drop => "DROP",
        }
    }
}

impl fmt::Display for BackPressureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Back-pressure modes of a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackPressureStrategyProperty {
    /// Mode used when none is configured.
    pub default_mode: BackPressureMode,
    /// Modes the source supports, the default included.
    pub supported_modes: Vec<BackPressureMode>,
}

impl ModelProperty for BackPressureStrategyProperty {
    const KIND: &'static str = "back-pressure-strategy";
}

/// Marks a parameter added by an enricher rather than declared by the author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfrastructureParameterProperty {
    /// Name of the enricher that added the parameter.
    pub added_by: &'static str,
    /// Position among infrastructure parameters.
    pub sequence: u32,
}

impl ModelProperty for InfrastructureParameterProperty {
    const KIND: &'static str = "infrastructure-parameter";
}

/// Members of a configuration or provider needed to resolve metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredForMetadataProperty {
    /// Member names, in declared order.
    pub parameters: Vec<String>,
}

impl ModelProperty for RequiredForMetadataProperty {
    const KIND: &'static str = "required-for-metadata";
}

/// Metadata resolvers of a component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataResolverProperty {
    /// Category of the resolvers.
    pub category: Option<String>,
    /// Key resolver.
    pub keys_resolver: Option<String>,
    /// Input resolvers with the parameter they resolve.
    pub input_resolvers: Vec<(String, String)>,
    /// Output resolver.
    pub output_resolver: Option<String>,
}

impl ModelProperty for MetadataResolverProperty {
    const KIND: &'static str = "metadata-resolver";
}

/// A parameter typed by an external schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomTypeProperty {
    /// Schema format.
    pub format: TypeFormat,
    /// Schema locator.
    pub locator: String,
}

impl ModelProperty for CustomTypeProperty {
    const KIND: &'static str = "custom-type";
}

/// Notifications a component can fire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationEmitterProperty {
    /// Qualified notification names.
    pub notifications: Vec<String>,
}

impl ModelProperty for NotificationEmitterProperty {
    const KIND: &'static str = "notification-emitter";
}

/// Stereotypes a parameter accepts as a reference or as chained processors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowedStereotypesProperty {
    /// Accepted stereotypes, in declared order.
    pub stereotypes: Vec<StereotypeModel>,
}

impl ModelProperty for AllowedStereotypesProperty {
    const KIND: &'static str = "allowed-stereotypes";
}

/// Stereotypes of the object types the extension declares, attached to the extension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeStereotypesProperty {
    /// Stereotypes by type name.
    pub stereotypes: BTreeMap<String, Vec<StereotypeModel>>,
}

impl ModelProperty for TypeStereotypesProperty {
    const KIND: &'static str = "type-stereotypes";
}

/// A parameter of a value provider, bound to a parameter of the component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActingParameter {
    /// Name under which the provider receives the value.
    pub name: String,
    /// Whether the provider needs the value.
    pub required: bool,
    /// Component parameter or expression the value is extracted from.
    pub extraction_expression: String,
}

/// Values of a parameter come from a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueProviderProperty {
    /// Identifier of the provider.
    pub provider_id: String,
    /// Name of the parameter or group the provider serves.
    pub provider_name: String,
    /// Position of this parameter among the parts of the value, starting at 1.
    pub part_order: u32,
    /// Whether values outside the provided ones are accepted.
    pub open: bool,
    /// Parameters the provider is resolved with.
    pub acting_parameters: Vec<ActingParameter>,
    /// Whether the provider needs a connection.
    pub requires_connection: bool,
    /// Whether the provider needs a configuration.
    pub requires_configuration: bool,
}

impl ModelProperty for ValueProviderProperty {
    const KIND: &'static str = "value-provider";
}
