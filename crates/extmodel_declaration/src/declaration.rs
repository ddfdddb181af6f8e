//! Node declarations stored in the tree arena.
//!
//! Owners refer to their children by [`NodeId`]. A handle may appear under
//! more than one owner; the node behind it is then shared.

use std::collections::BTreeSet;

use extmodel_foundation::Value;
use extmodel_taxonomy::ErrorModel;

use crate::node::{BaseDeclaration, DeclarationKind, NodeId};
use crate::stereotype::StereotypeModel;
use crate::types::{DisplayModel, ExpressionSupport, LayoutModel, ParameterRole, SemanticType};

// =============================================================================
// Components
// =============================================================================

/// A configuration and the components scoped to it.
#[derive(Debug, Default)]
pub struct ConfigurationDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Connection providers usable with this configuration.
    pub connection_providers: Vec<NodeId>,
    /// Sources scoped to this configuration.
    pub sources: Vec<NodeId>,
    /// Operations scoped to this configuration.
    pub operations: Vec<NodeId>,
    /// Functions scoped to this configuration.
    pub functions: Vec<NodeId>,
    /// Assigned stereotype.
    pub stereotype: Option<StereotypeModel>,
}

/// How the runtime manages the connections a provider hands out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionManagement {
    /// Connections are pooled.
    Pooling,
    /// One connection per configuration instance is cached.
    Cached,
    /// The runtime does not manage connections.
    #[default]
    None,
}

/// A connection provider.
#[derive(Debug, Default)]
pub struct ConnectionProviderDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Connection management strategy.
    pub connection_management: ConnectionManagement,
    /// Whether the provider supports connectivity testing.
    pub supports_connectivity_testing: bool,
    /// Assigned stereotype.
    pub stereotype: Option<StereotypeModel>,
}

/// Parameter groups of a source callback.
#[derive(Debug, Default)]
pub struct SourceCallbackDeclaration {
    /// Groups, in declared order. May alias the source's own groups.
    pub parameter_groups: Vec<NodeId>,
}

/// A message source.
#[derive(Debug, Default)]
pub struct SourceDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Invoked when the flow succeeds.
    pub success_callback: Option<SourceCallbackDeclaration>,
    /// Invoked when the flow fails.
    pub error_callback: Option<SourceCallbackDeclaration>,
    /// Whether the source only runs on the primary cluster node.
    pub runs_on_primary_node_only: bool,
    /// Whether the source needs a connection.
    pub requires_connection: bool,
    /// Whether the source produces streams.
    pub supports_streaming: bool,
    /// Errors the source can raise.
    pub errors: BTreeSet<ErrorModel>,
    /// Notifications the source can fire.
    pub notifications: Vec<String>,
    /// Assigned stereotype.
    pub stereotype: Option<StereotypeModel>,
}

/// An operation.
#[derive(Debug, Default)]
pub struct OperationDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Whether the operation needs a connection.
    pub requires_connection: bool,
    /// Whether the operation produces streams.
    pub supports_streaming: bool,
    /// Whether the operation can join a transaction.
    pub transactional: bool,
    /// Whether the operation blocks its thread.
    pub blocking: bool,
    /// Output type.
    pub output: Option<SemanticType>,
    /// Errors the operation can raise.
    pub errors: BTreeSet<ErrorModel>,
    /// Notifications the operation can fire.
    pub notifications: Vec<String>,
    /// Assigned stereotype.
    pub stereotype: Option<StereotypeModel>,
}

/// An expression function.
#[derive(Debug, Default)]
pub struct FunctionDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Output type.
    pub output: Option<SemanticType>,
}

/// A scope or router.
#[derive(Debug, Default)]
pub struct ConstructDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameter groups, in declared order.
    pub parameter_groups: Vec<NodeId>,
    /// Whether the construct may appear at the top level of a flow file.
    pub allows_top_level: bool,
    /// Errors the construct can raise.
    pub errors: BTreeSet<ErrorModel>,
    /// Assigned stereotype.
    pub stereotype: Option<StereotypeModel>,
}

// =============================================================================
// Parameters
// =============================================================================

/// A named, ordered group of parameters.
#[derive(Debug)]
pub struct ParameterGroupDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Parameters, in declared order.
    pub parameters: Vec<NodeId>,
    /// Whether the group is rendered as its own DSL element.
    pub show_in_dsl: bool,
}

impl ParameterGroupDeclaration {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseDeclaration::new(name),
            parameters: Vec::new(),
            show_in_dsl: false,
        }
    }
}

/// A parameter.
#[derive(Debug)]
pub struct ParameterDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Semantic type.
    pub ty: SemanticType,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Value used when none is supplied.
    pub default_value: Option<Value>,
    /// Whether the parameter accepts expressions.
    pub expression_support: ExpressionSupport,
    /// Role of the parameter.
    pub role: ParameterRole,
    /// Placement hints.
    pub layout: LayoutModel,
    /// Display hints.
    pub display: DisplayModel,
}

impl ParameterDeclaration {
    /// Creates an optional parameter of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            base: BaseDeclaration::new(name),
            ty,
            required: false,
            default_value: None,
            expression_support: ExpressionSupport::default(),
            role: ParameterRole::default(),
            layout: LayoutModel::default(),
            display: DisplayModel::default(),
        }
    }

    /// Marks the parameter as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the expression support.
    #[must_use]
    pub fn with_expression_support(mut self, support: ExpressionSupport) -> Self {
        self.expression_support = support;
        self
    }
}

// =============================================================================
// Declaration
// =============================================================================

/// A node of the arena.
#[derive(Debug)]
pub enum Declaration {
    /// A configuration.
    Configuration(ConfigurationDeclaration),
    /// A connection provider.
    ConnectionProvider(ConnectionProviderDeclaration),
    /// A source.
    Source(SourceDeclaration),
    /// An operation.
    Operation(OperationDeclaration),
    /// A function.
    Function(FunctionDeclaration),
    /// A construct.
    Construct(ConstructDeclaration),
    /// A parameter group.
    ParameterGroup(ParameterGroupDeclaration),
    /// A parameter.
    Parameter(ParameterDeclaration),
}

impl Declaration {
    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        match self {
            Self::Configuration(_) => DeclarationKind::Configuration,
            Self::ConnectionProvider(_) => DeclarationKind::ConnectionProvider,
            Self::Source(_) => DeclarationKind::Source,
            Self::Operation(_) => DeclarationKind::Operation,
            Self::Function(_) => DeclarationKind::Function,
            Self::Construct(_) => DeclarationKind::Construct,
            Self::ParameterGroup(_) => DeclarationKind::ParameterGroup,
            Self::Parameter(_) => DeclarationKind::Parameter,
        }
    }

    /// Returns the shared node state.
    #[must_use]
    pub const fn base(&self) -> &BaseDeclaration {
        match self {
            Self::Configuration(d) => &d.base,
            Self::ConnectionProvider(d) => &d.base,
            Self::Source(d) => &d.base,
            Self::Operation(d) => &d.base,
            Self::Function(d) => &d.base,
            Self::Construct(d) => &d.base,
            Self::ParameterGroup(d) => &d.base,
            Self::Parameter(d) => &d.base,
        }
    }

    /// Returns the shared node state mutably.
    pub fn base_mut(&mut self) -> &mut BaseDeclaration {
        match self {
            Self::Configuration(d) => &mut d.base,
            Self::ConnectionProvider(d) => &mut d.base,
            Self::Source(d) => &mut d.base,
            Self::Operation(d) => &mut d.base,
            Self::Function(d) => &mut d.base,
            Self::Construct(d) => &mut d.base,
            Self::ParameterGroup(d) => &mut d.base,
            Self::Parameter(d) => &mut d.base,
        }
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// Returns the parameter groups of a parameterized node, empty otherwise.
    #[must_use]
    pub fn parameter_groups(&self) -> &[NodeId] {
        match self {
            Self::Configuration(d) => &d.parameter_groups,
            Self::ConnectionProvider(d) => &d.parameter_groups,
            Self::Source(d) => &d.parameter_groups,
            Self::Operation(d) => &d.parameter_groups,
            Self::Function(d) => &d.parameter_groups,
            Self::Construct(d) => &d.parameter_groups,
            Self::ParameterGroup(_) | Self::Parameter(_) => &[],
        }
    }

    /// Returns the parameter group list of a parameterized node mutably.
    pub fn parameter_groups_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Self::Configuration(d) => Some(&mut d.parameter_groups),
            Self::ConnectionProvider(d) => Some(&mut d.parameter_groups),
            Self::Source(d) => Some(&mut d.parameter_groups),
            Self::Operation(d) => Some(&mut d.parameter_groups),
            Self::Function(d) => Some(&mut d.parameter_groups),
            Self::Construct(d) => Some(&mut d.parameter_groups),
            Self::ParameterGroup(_) | Self::Parameter(_) => None,
        }
    }

    /// Returns the assigned stereotype, if the kind carries one.
    #[must_use]
    pub fn stereotype(&self) -> Option<&StereotypeModel> {
        match self {
            Self::Configuration(d) => d.stereotype.as_ref(),
            Self::ConnectionProvider(d) => d.stereotype.as_ref(),
            Self::Source(d) => d.stereotype.as_ref(),
            Self::Operation(d) => d.stereotype.as_ref(),
            Self::Construct(d) => d.stereotype.as_ref(),
            _ => None,
        }
    }

    /// Returns the stereotype slot of kinds that carry one.
    pub fn stereotype_mut(&mut self) -> Option<&mut Option<StereotypeModel>> {
        match self {
            Self::Configuration(d) => Some(&mut d.stereotype),
            Self::ConnectionProvider(d) => Some(&mut d.stereotype),
            Self::Source(d) => Some(&mut d.stereotype),
            Self::Operation(d) => Some(&mut d.stereotype),
            Self::Construct(d) => Some(&mut d.stereotype),
            _ => None,
        }
    }

    /// Returns the error set of kinds that can raise errors.
    pub fn errors_mut(&mut self) -> Option<&mut BTreeSet<ErrorModel>> {
        match self {
            Self::Source(d) => Some(&mut d.errors),
            Self::Operation(d) => Some(&mut d.errors),
            Self::Construct(d) => Some(&mut d.errors),
            _ => None,
        }
    }

    /// Returns the errors of kinds that can raise errors.
    #[must_use]
    pub fn errors(&self) -> Option<&BTreeSet<ErrorModel>> {
        match self {
            Self::Source(d) => Some(&d.errors),
            Self::Operation(d) => Some(&d.errors),
            Self::Construct(d) => Some(&d.errors),
            _ => None,
        }
    }

    /// Returns the `requires_connection` flag of sources and operations.
    #[must_use]
    pub const fn requires_connection(&self) -> bool {
        match self {
            Self::Source(d) => d.requires_connection,
            Self::Operation(d) => d.requires_connection,
            _ => false,
        }
    }

    /// Returns the node as a source, if it is one.
    #[must_use]
    pub const fn as_source(&self) -> Option<&SourceDeclaration> {
        match self {
            Self::Source(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a mutable source, if it is one.
    pub fn as_source_mut(&mut self) -> Option<&mut SourceDeclaration> {
        match self {
            Self::Source(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as an operation, if it is one.
    #[must_use]
    pub const fn as_operation(&self) -> Option<&OperationDeclaration> {
        match self {
            Self::Operation(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a mutable operation, if it is one.
    pub fn as_operation_mut(&mut self) -> Option<&mut OperationDeclaration> {
        match self {
            Self::Operation(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a configuration, if it is one.
    #[must_use]
    pub const fn as_configuration(&self) -> Option<&ConfigurationDeclaration> {
        match self {
            Self::Configuration(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a mutable configuration, if it is one.
    pub fn as_configuration_mut(&mut self) -> Option<&mut ConfigurationDeclaration> {
        match self {
            Self::Configuration(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a connection provider, if it is one.
    #[must_use]
    pub const fn as_connection_provider(&self) -> Option<&ConnectionProviderDeclaration> {
        match self {
            Self::ConnectionProvider(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a construct, if it is one.
    #[must_use]
    pub const fn as_construct(&self) -> Option<&ConstructDeclaration> {
        match self {
            Self::Construct(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a parameter group, if it is one.
    #[must_use]
    pub const fn as_parameter_group(&self) -> Option<&ParameterGroupDeclaration> {
        match self {
            Self::ParameterGroup(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a mutable parameter group, if it is one.
    pub fn as_parameter_group_mut(&mut self) -> Option<&mut ParameterGroupDeclaration> {
        match self {
            Self::ParameterGroup(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a parameter, if it is one.
    #[must_use]
    pub const fn as_parameter(&self) -> Option<&ParameterDeclaration> {
        match self {
            Self::Parameter(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the node as a mutable parameter, if it is one.
    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterDeclaration> {
        match self {
            Self::Parameter(d) => Some(d),
            _ => None,
        }
    }
}
