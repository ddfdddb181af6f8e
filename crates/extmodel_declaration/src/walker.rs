//! Traversal of a declaration tree.
//!
//! [`DeclarationWalker::walk`] visits the tree in a fixed order:
//!
//! 1. the extension
//! 2. each configuration, its parameter groups, then its connection
//!    providers, sources, operations and functions
//! 3. the top-level connection providers, sources, operations and functions
//! 4. the constructs
//!
//! Every parameterized node gets its own callback first, then each of its
//! groups followed by that group's parameters. Sources then walk their
//! success callback groups and their error callback groups.
//!
//! An idempotent walker remembers the groups, parameters and connection
//! providers it has visited and skips them when they are reached again
//! through another owner. The memory only lasts for one `walk` call.
//!
//! # Example
//!
//! ```
//! use extmodel_declaration::{
//!     DeclarationTree, DeclarationVisitor, DeclarationWalker, ExtensionDeclaration, NodeId,
//!     OperationDeclaration, Owner, Walk,
//! };
//! use extmodel_foundation::Result;
//!
//! struct CountOperations(usize);
//!
//! impl DeclarationVisitor for CountOperations {
//!     fn on_operation(&mut self, _: &mut DeclarationTree, _: Owner, _: NodeId) -> Result<Walk> {
//!         self.0 += 1;
//!         Ok(Walk::Continue)
//!     }
//! }
//!
//! let mut tree = DeclarationTree::new(ExtensionDeclaration::new("demo"));
//! tree.add_operation(Owner::Extension, OperationDeclaration::default()).unwrap();
//!
//! let mut counter = CountOperations(0);
//! DeclarationWalker::idempotent().walk(&mut tree, &mut counter).unwrap();
//! assert_eq!(counter.0, 1);
//! ```

use std::collections::HashSet;

use extmodel_foundation::{Error, Result};
use tracing::trace;

use crate::node::{CallbackKind, DeclarationKind, NodeId, Owner};
use crate::tree::DeclarationTree;

/// Whether a walk goes on after a callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Keep walking.
    Continue,
    /// Abort the rest of the walk. Not an error.
    Stop,
}

/// Callbacks invoked by a [`DeclarationWalker`].
///
/// Every method defaults to doing nothing and continuing. Callbacks receive
/// the tree mutably so they can annotate the node they are handed.
#[allow(unused_variables)]
pub trait DeclarationVisitor {
    /// Called once per walk, before anything else.
    fn on_extension(&mut self, tree: &mut DeclarationTree) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each configuration.
    fn on_configuration(&mut self, tree: &mut DeclarationTree, configuration: NodeId) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each connection provider reached through `owner`.
    fn on_connection_provider(
        &mut self,
        tree: &mut DeclarationTree,
        owner: Owner,
        provider: NodeId,
    ) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each source reached through `owner`.
    fn on_source(&mut self, tree: &mut DeclarationTree, owner: Owner, source: NodeId) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each operation reached through `owner`.
    fn on_operation(
        &mut self,
        tree: &mut DeclarationTree,
        owner: Owner,
        operation: NodeId,
    ) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each function reached through `owner`.
    fn on_function(
        &mut self,
        tree: &mut DeclarationTree,
        owner: Owner,
        function: NodeId,
    ) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each construct.
    fn on_construct(&mut self, tree: &mut DeclarationTree, construct: NodeId) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each parameter group, with the component or callback owning it.
    fn on_parameter_group(
        &mut self,
        tree: &mut DeclarationTree,
        owner: Owner,
        group: NodeId,
    ) -> Result<Walk> {
        Ok(Walk::Continue)
    }

    /// Called for each parameter of `group`.
    fn on_parameter(
        &mut self,
        tree: &mut DeclarationTree,
        owner: Owner,
        group: NodeId,
        parameter: NodeId,
    ) -> Result<Walk> {
        Ok(Walk::Continue)
    }
}

/// Returns early with [`Walk::Stop`] when a step asks to stop.
macro_rules! step {
    ($e:expr) => {
        if $e? == Walk::Stop {
            return Ok(Walk::Stop);
        }
    };
}

/// Walks a [`DeclarationTree`], dispatching to a [`DeclarationVisitor`].
#[derive(Debug, Default)]
pub struct DeclarationWalker {
    idempotent: bool,
    visited: HashSet<NodeId>,
}

impl DeclarationWalker {
    /// Creates a walker that reports a shared node once per owner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a walker that reports every group, parameter and connection
    /// provider once per walk, however many owners share it.
    #[must_use]
    pub fn idempotent() -> Self {
        Self {
            idempotent: true,
            visited: HashSet::new(),
        }
    }

    /// Returns true if this walker skips nodes it has already visited.
    #[must_use]
    pub const fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    /// Walks `tree`.
    ///
    /// Returns [`Walk::Stop`] if a callback stopped the walk, and the first
    /// error a callback returned.
    pub fn walk<V>(&mut self, tree: &mut DeclarationTree, visitor: &mut V) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        self.visited.clear();

        step!(visitor.on_extension(tree));

        let configurations = tree.extension().configurations.clone();
        for configuration in configurations {
            step!(self.walk_configuration(tree, visitor, configuration));
        }

        let providers = tree.extension().connection_providers.clone();
        for provider in providers {
            step!(self.walk_connection_provider(tree, visitor, Owner::Extension, provider));
        }
        let sources = tree.extension().sources.clone();
        for source in sources {
            step!(self.walk_source(tree, visitor, Owner::Extension, source));
        }
        let operations = tree.extension().operations.clone();
        for operation in operations {
            step!(visitor.on_operation(tree, Owner::Extension, operation));
            step!(self.walk_groups(tree, visitor, operation));
        }
        let functions = tree.extension().functions.clone();
        for function in functions {
            step!(visitor.on_function(tree, Owner::Extension, function));
            step!(self.walk_groups(tree, visitor, function));
        }
        let constructs = tree.extension().constructs.clone();
        for construct in constructs {
            step!(visitor.on_construct(tree, construct));
            step!(self.walk_groups(tree, visitor, construct));
        }

        Ok(Walk::Continue)
    }

    fn walk_configuration<V>(
        &mut self,
        tree: &mut DeclarationTree,
        visitor: &mut V,
        configuration: NodeId,
    ) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        step!(visitor.on_configuration(tree, configuration));
        step!(self.walk_groups(tree, visitor, configuration));

        let declaration = tree.get(configuration)?;
        let config = declaration.as_configuration().ok_or_else(|| {
            Error::wrong_node_kind(DeclarationKind::Configuration.name(), declaration.kind().name())
        })?;
        let providers = config.connection_providers.clone();
        let sources = config.sources.clone();
        let operations = config.operations.clone();
        let functions = config.functions.clone();
        let owner = Owner::Component(configuration);

        for provider in providers {
            step!(self.walk_connection_provider(tree, visitor, owner, provider));
        }
        for source in sources {
            step!(self.walk_source(tree, visitor, owner, source));
        }
        for operation in operations {
            step!(visitor.on_operation(tree, owner, operation));
            step!(self.walk_groups(tree, visitor, operation));
        }
        for function in functions {
            step!(visitor.on_function(tree, owner, function));
            step!(self.walk_groups(tree, visitor, function));
        }
        Ok(Walk::Continue)
    }

    fn walk_connection_provider<V>(
        &mut self,
        tree: &mut DeclarationTree,
        visitor: &mut V,
        owner: Owner,
        provider: NodeId,
    ) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        if self.already_visited(provider) {
            return Ok(Walk::Continue);
        }
        step!(visitor.on_connection_provider(tree, owner, provider));
        self.walk_groups(tree, visitor, provider)
    }

    fn walk_source<V>(
        &mut self,
        tree: &mut DeclarationTree,
        visitor: &mut V,
        owner: Owner,
        source: NodeId,
    ) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        step!(visitor.on_source(tree, owner, source));
        step!(self.walk_groups(tree, visitor, source));

        for kind in [CallbackKind::Success, CallbackKind::Error] {
            let groups = tree.callback_groups(source, kind)?.to_vec();
            step!(self.walk_group_list(tree, visitor, Owner::Callback(source, kind), groups));
        }
        Ok(Walk::Continue)
    }

    fn walk_groups<V>(
        &mut self,
        tree: &mut DeclarationTree,
        visitor: &mut V,
        component: NodeId,
    ) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        let groups = tree.get(component)?.parameter_groups().to_vec();
        self.walk_group_list(tree, visitor, Owner::Component(component), groups)
    }

    fn walk_group_list<V>(
        &mut self,
        tree: &mut DeclarationTree,
        visitor: &mut V,
        owner: Owner,
        groups: Vec<NodeId>,
    ) -> Result<Walk>
    where
        V: DeclarationVisitor + ?Sized,
    {
        for group in groups {
            if self.already_visited(group) {
                continue;
            }
            step!(visitor.on_parameter_group(tree, owner, group));

            let declaration = tree.get(group)?;
            let parameters = declaration
                .as_parameter_group()
                .map(|g| g.parameters.clone())
                .ok_or_else(|| {
                    Error::wrong_node_kind(
                        DeclarationKind::ParameterGroup.name(),
                        declaration.kind().name(),
                    )
                })?;
            for parameter in parameters {
                if self.already_visited(parameter) {
                    continue;
                }
                step!(visitor.on_parameter(tree, owner, group, parameter));
            }
        }
        Ok(Walk::Continue)
    }

    /// Records `id` and returns true if it was already seen in this walk.
    fn already_visited(&mut self, id: NodeId) -> bool {
        if !self.idempotent || self.visited.insert(id) {
            return false;
        }
        trace!(node = id.index(), "skipping already visited node");
        true
    }
}
