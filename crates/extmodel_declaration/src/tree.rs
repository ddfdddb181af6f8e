//! The declaration arena.
//!
//! A [`DeclarationTree`] owns the extension root and every node reachable
//! from it. Nodes are never removed, so a [`NodeId`] stays valid for the
//! lifetime of the tree.
//!
//! Every parameterized node gets a group named [`DEFAULT_GROUP_NAME`] as soon
//! as it is added.

use extmodel_foundation::{Error, Result};

use crate::declaration::{
    ConfigurationDeclaration, ConnectionProviderDeclaration, ConstructDeclaration, Declaration,
    FunctionDeclaration, OperationDeclaration, ParameterDeclaration, ParameterGroupDeclaration,
    SourceCallbackDeclaration, SourceDeclaration,
};
use crate::extension::ExtensionDeclaration;
use crate::node::{CallbackKind, DeclarationKind, NodeId, NodeRef, Owner};
use crate::property::{ModelProperties, ModelProperty};

/// Name of the group every parameterized node starts with.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// An extension and the arena of its nodes.
#[derive(Debug)]
pub struct DeclarationTree {
    extension: ExtensionDeclaration,
    nodes: Vec<Declaration>,
}

impl DeclarationTree {
    /// Creates a tree with the given root and no nodes.
    #[must_use]
    pub fn new(extension: ExtensionDeclaration) -> Self {
        Self {
            extension,
            nodes: Vec::new(),
        }
    }

    /// Returns the extension root.
    #[must_use]
    pub const fn extension(&self) -> &ExtensionDeclaration {
        &self.extension
    }

    /// Returns the extension root mutably.
    pub fn extension_mut(&mut self) -> &mut ExtensionDeclaration {
        &mut self.extension
    }

    /// Returns the number of nodes in the arena, the root excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind `id`.
    pub fn get(&self, id: NodeId) -> Result<&Declaration> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| Error::node_not_found(id.0))
    }

    /// Returns the node behind `id` mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Declaration> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::node_not_found(id.0))
    }

    /// Returns the declared name of a node.
    pub fn name(&self, node: NodeRef) -> Result<&str> {
        match node {
            NodeRef::Extension => Ok(&self.extension.base.name),
            NodeRef::Node(id) => Ok(self.get(id)?.name()),
        }
    }

    /// Returns the kind of a node.
    pub fn kind(&self, node: NodeRef) -> Result<DeclarationKind> {
        match node {
            NodeRef::Extension => Ok(DeclarationKind::Extension),
            NodeRef::Node(id) => Ok(self.get(id)?.kind()),
        }
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Adds a configuration to the extension.
    pub fn add_configuration(&mut self, configuration: ConfigurationDeclaration) -> Result<NodeId> {
        self.insert(Owner::Extension, Declaration::Configuration(configuration))
    }

    /// Adds a connection provider to the extension or to a configuration.
    pub fn add_connection_provider(
        &mut self,
        owner: Owner,
        provider: ConnectionProviderDeclaration,
    ) -> Result<NodeId> {
        self.insert(owner, Declaration::ConnectionProvider(provider))
    }

    /// Adds a source to the extension or to a configuration.
    pub fn add_source(&mut self, owner: Owner, source: SourceDeclaration) -> Result<NodeId> {
        self.insert(owner, Declaration::Source(source))
    }

    /// Adds an operation to the extension or to a configuration.
    pub fn add_operation(&mut self, owner: Owner, operation: OperationDeclaration) -> Result<NodeId> {
        self.insert(owner, Declaration::Operation(operation))
    }

    /// Adds a function to the extension or to a configuration.
    pub fn add_function(&mut self, owner: Owner, function: FunctionDeclaration) -> Result<NodeId> {
        self.insert(owner, Declaration::Function(function))
    }

    /// Adds a construct to the extension.
    pub fn add_construct(&mut self, construct: ConstructDeclaration) -> Result<NodeId> {
        self.insert(Owner::Extension, Declaration::Construct(construct))
    }

    /// Makes an existing connection provider reachable from another owner.
    pub fn share_connection_provider(&mut self, owner: Owner, provider: NodeId) -> Result<()> {
        let kind = self.get(provider)?.kind();
        if kind != DeclarationKind::ConnectionProvider {
            return Err(Error::wrong_node_kind(
                DeclarationKind::ConnectionProvider.name(),
                kind.name(),
            ));
        }
        self.attach(owner, kind, provider)
    }

    fn next_id(&self) -> Result<NodeId> {
        u32::try_from(self.nodes.len())
            .map(NodeId)
            .map_err(|_| Error::internal("declaration arena is full"))
    }

    fn insert(&mut self, owner: Owner, declaration: Declaration) -> Result<NodeId> {
        let id = self.next_id()?;
        self.attach(owner, declaration.kind(), id)?;
        self.nodes.push(declaration);
        self.default_group(id)?;
        Ok(id)
    }

    fn attach(&mut self, owner: Owner, kind: DeclarationKind, id: NodeId) -> Result<()> {
        let list = match owner {
            Owner::Extension => {
                let ext = &mut self.extension;
                match kind {
                    DeclarationKind::Configuration => &mut ext.configurations,
                    DeclarationKind::ConnectionProvider => &mut ext.connection_providers,
                    DeclarationKind::Source => &mut ext.sources,
                    DeclarationKind::Operation => &mut ext.operations,
                    DeclarationKind::Function => &mut ext.functions,
                    DeclarationKind::Construct => &mut ext.constructs,
                    _ => {
                        return Err(Error::illegal_model(format!(
                            "a {kind} cannot be declared at the top level"
                        )));
                    }
                }
            }
            Owner::Component(config) => {
                let declaration = self.get_mut(config)?;
                let actual = declaration.kind();
                let Declaration::Configuration(cfg) = declaration else {
                    return Err(Error::wrong_node_kind(
                        DeclarationKind::Configuration.name(),
                        actual.name(),
                    ));
                };
                match kind {
                    DeclarationKind::ConnectionProvider => &mut cfg.connection_providers,
                    DeclarationKind::Source => &mut cfg.sources,
                    DeclarationKind::Operation => &mut cfg.operations,
                    DeclarationKind::Function => &mut cfg.functions,
                    _ => {
                        return Err(Error::illegal_model(format!(
                            "a {kind} cannot be declared inside configuration '{}'",
                            cfg.base.name
                        )));
                    }
                }
            }
            Owner::Callback(..) => {
                return Err(Error::illegal_model(format!(
                    "a {kind} cannot be owned by a source callback"
                )));
            }
        };
        if !list.contains(&id) {
            list.push(id);
        }
        Ok(())
    }

    // =========================================================================
    // Parameter groups and parameters
    // =========================================================================

    /// Appends a new parameter group to a parameterized node.
    pub fn add_parameter_group(
        &mut self,
        owner: NodeId,
        group: ParameterGroupDeclaration,
    ) -> Result<NodeId> {
        let id = self.next_id()?;
        self.groups_mut(owner)?.push(id);
        self.nodes.push(Declaration::ParameterGroup(group));
        Ok(id)
    }

    /// Makes an existing group reachable from another parameterized node.
    pub fn share_group(&mut self, owner: NodeId, group: NodeId) -> Result<()> {
        self.group(group)?;
        let groups = self.groups_mut(owner)?;
        if !groups.contains(&group) {
            groups.push(group);
        }
        Ok(())
    }

    /// Returns the group of `owner` with the given name.
    pub fn find_group(&self, owner: NodeId, name: &str) -> Result<Option<NodeId>> {
        let groups = self.get(owner)?.parameter_groups();
        Ok(groups
            .iter()
            .copied()
            .find(|&group| self.get(group).is_ok_and(|g| g.name() == name)))
    }

    /// Returns the default group of `owner`, creating it if absent.
    pub fn default_group(&mut self, owner: NodeId) -> Result<NodeId> {
        match self.find_group(owner, DEFAULT_GROUP_NAME)? {
            Some(group) => Ok(group),
            None => self.add_parameter_group(owner, ParameterGroupDeclaration::new(DEFAULT_GROUP_NAME)),
        }
    }

    /// Appends a parameter to a group.
    pub fn add_parameter(&mut self, group: NodeId, parameter: ParameterDeclaration) -> Result<NodeId> {
        let id = self.next_id()?;
        self.group_mut(group)?.parameters.push(id);
        self.nodes.push(Declaration::Parameter(parameter));
        Ok(id)
    }

    /// Returns the parameters of every group of `owner`, in walk order.
    pub fn parameters(&self, owner: NodeId) -> Result<Vec<NodeId>> {
        let mut parameters = Vec::new();
        for &group in self.get(owner)?.parameter_groups() {
            parameters.extend_from_slice(&self.group(group)?.parameters);
        }
        Ok(parameters)
    }

    /// Returns the parameter of `owner` with the given name.
    pub fn find_parameter(&self, owner: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self
            .parameters(owner)?
            .into_iter()
            .find(|&param| self.get(param).is_ok_and(|p| p.name() == name)))
    }

    /// Sets the groups of a source callback.
    ///
    /// The groups may alias groups of the source itself.
    pub fn set_callback(
        &mut self,
        source: NodeId,
        kind: CallbackKind,
        groups: Vec<NodeId>,
    ) -> Result<()> {
        for &group in &groups {
            self.group(group)?;
        }
        let declaration = self.get_mut(source)?;
        let actual = declaration.kind();
        let source = declaration
            .as_source_mut()
            .ok_or_else(|| Error::wrong_node_kind(DeclarationKind::Source.name(), actual.name()))?;
        let callback = Some(SourceCallbackDeclaration {
            parameter_groups: groups,
        });
        match kind {
            CallbackKind::Success => source.success_callback = callback,
            CallbackKind::Error => source.error_callback = callback,
        }
        Ok(())
    }

    /// Returns the groups of a source callback, empty when the callback is absent.
    pub fn callback_groups(&self, source: NodeId, kind: CallbackKind) -> Result<&[NodeId]> {
        let declaration = self.get(source)?;
        let source = declaration.as_source().ok_or_else(|| {
            Error::wrong_node_kind(DeclarationKind::Source.name(), declaration.kind().name())
        })?;
        let callback = match kind {
            CallbackKind::Success => source.success_callback.as_ref(),
            CallbackKind::Error => source.error_callback.as_ref(),
        };
        Ok(callback
            .map(|c| c.parameter_groups.as_slice())
            .unwrap_or_default())
    }

    fn group(&self, id: NodeId) -> Result<&ParameterGroupDeclaration> {
        let declaration = self.get(id)?;
        declaration.as_parameter_group().ok_or_else(|| {
            Error::wrong_node_kind(DeclarationKind::ParameterGroup.name(), declaration.kind().name())
        })
    }

    fn group_mut(&mut self, id: NodeId) -> Result<&mut ParameterGroupDeclaration> {
        let declaration = self.get_mut(id)?;
        let actual = declaration.kind();
        declaration
            .as_parameter_group_mut()
            .ok_or_else(|| Error::wrong_node_kind(DeclarationKind::ParameterGroup.name(), actual.name()))
    }

    fn groups_mut(&mut self, owner: NodeId) -> Result<&mut Vec<NodeId>> {
        let declaration = self.get_mut(owner)?;
        let actual = declaration.kind();
        declaration
            .parameter_groups_mut()
            .ok_or_else(|| Error::wrong_node_kind("parameterized component", actual.name()))
    }

    // =========================================================================
    // Model properties
    // =========================================================================

    /// Returns the property registry of a node.
    pub fn properties(&self, node: NodeRef) -> Result<&ModelProperties> {
        match node {
            NodeRef::Extension => Ok(&self.extension.base.properties),
            NodeRef::Node(id) => Ok(&self.get(id)?.base().properties),
        }
    }

    /// Returns the property registry of a node mutably.
    pub fn properties_mut(&mut self, node: NodeRef) -> Result<&mut ModelProperties> {
        match node {
            NodeRef::Extension => Ok(&mut self.extension.base.properties),
            NodeRef::Node(id) => Ok(&mut self.get_mut(id)?.base_mut().properties),
        }
    }

    /// Returns the property of type `P` on a node, `None` if absent or if the
    /// node does not exist.
    #[must_use]
    pub fn property<P: ModelProperty>(&self, node: NodeRef) -> Option<&P> {
        self.properties(node).ok()?.get::<P>()
    }

    /// Attaches a property to a node, replacing any value of the same kind.
    ///
    /// Returns true if a value was replaced.
    pub fn add_property<P: ModelProperty>(&mut self, node: NodeRef, property: P) -> Result<bool> {
        Ok(self.properties_mut(node)?.add(property))
    }
}
