//! Marks components that receive a connection.

use extmodel_declaration::{
    Declaration, DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, Owner, Walk,
};
use extmodel_foundation::Result;

use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, markers, single_marked_member};
use crate::pipeline::DeclarationEnricher;
use crate::properties::ConnectivityProperty;

/// Operations and sources with a member marked `connection` require a
/// connection.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConnectivityEnricher;

impl DeclarationEnricher for ConnectivityEnricher {
    fn name(&self) -> &str {
        "connectivity"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = ConnectivityVisitor {
            introspector: ctx.introspector(),
        };
        DeclarationWalker::idempotent().walk(ctx.tree_mut(), &mut visitor)?;
        Ok(())
    }
}

struct ConnectivityVisitor<'a> {
    introspector: &'a dyn Introspector,
}

impl ConnectivityVisitor<'_> {
    fn mark(&self, tree: &mut DeclarationTree, id: NodeId) -> Result<Walk> {
        let name = tree.get(id)?.name().to_string();
        let Some(member) = single_marked_member(self.introspector, id.into(), &name, markers::CONNECTION)?
        else {
            return Ok(Walk::Continue);
        };

        match tree.get_mut(id)? {
            Declaration::Operation(op) => op.requires_connection = true,
            Declaration::Source(source) => source.requires_connection = true,
            _ => {}
        }
        tree.add_property(id.into(), ConnectivityProperty { member: member.name })?;
        Ok(Walk::Continue)
    }
}

impl DeclarationVisitor for ConnectivityVisitor<'_> {
    fn on_operation(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.mark(tree, id)
    }

    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        self.mark(tree, id)
    }
}
