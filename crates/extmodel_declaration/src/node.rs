//! Node handles and the state every declaration shares.

use std::fmt;

use crate::property::ModelProperties;

/// Handle of a node stored in a [`DeclarationTree`].
///
/// Handles are identities: two owners holding the same handle share the node.
///
/// [`DeclarationTree`]: crate::tree::DeclarationTree
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw arena index of this node.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Any node of the tree, the extension root included.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// The extension root.
    Extension,
    /// A node of the arena.
    Node(NodeId),
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Which callback of a source owns a parameter group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Invoked when the flow processing the message succeeds.
    Success,
    /// Invoked when the flow processing the message fails.
    Error,
}

/// The owner through which the walker reached a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Declared at the top level of the extension.
    Extension,
    /// Declared inside a configuration, or a parameter group of a component.
    Component(NodeId),
    /// A parameter group of a source callback.
    Callback(NodeId, CallbackKind),
}

impl Owner {
    /// Returns the component node behind this owner, if any.
    #[must_use]
    pub const fn component(self) -> Option<NodeId> {
        match self {
            Self::Extension => None,
            Self::Component(id) | Self::Callback(id, _) => Some(id),
        }
    }
}

/// Kind tag of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// The extension root.
    Extension,
    /// A configuration.
    Configuration,
    /// A connection provider.
    ConnectionProvider,
    /// A message source.
    Source,
    /// An operation.
    Operation,
    /// An expression function.
    Function,
    /// A scope or router construct.
    Construct,
    /// A parameter group.
    ParameterGroup,
    /// A parameter.
    Parameter,
}

impl DeclarationKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Configuration => "configuration",
            Self::ConnectionProvider => "connection provider",
            Self::Source => "source",
            Self::Operation => "operation",
            Self::Function => "function",
            Self::Construct => "construct",
            Self::ParameterGroup => "parameter group",
            Self::Parameter => "parameter",
        }
    }

    /// Returns true for kinds that own parameter groups.
    #[must_use]
    pub const fn is_parameterized(self) -> bool {
        !matches!(self, Self::Extension | Self::ParameterGroup | Self::Parameter)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name, description and model properties shared by every declaration.
#[derive(Debug, Default)]
pub struct BaseDeclaration {
    /// Declared name.
    pub name: String,
    /// Optional human description.
    pub description: Option<String>,
    /// Typed attributes attached by the loader and the enrichers.
    pub properties: ModelProperties,
}

impl BaseDeclaration {
    /// Creates a base with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: ModelProperties::new(),
        }
    }
}
