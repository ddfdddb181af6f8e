//! Reconnection parameters of providers and connected sources.

use extmodel_declaration::{
    DeclarationTree, DeclarationVisitor, DeclarationWalker, ExpressionSupport, NodeId, Owner,
    ParameterDeclaration, SemanticType, Walk,
};
use extmodel_foundation::Result;

use super::{RECONNECTION_SEQUENCE, RECONNECTION_STRATEGY_SEQUENCE, add_infrastructure_parameter};
use crate::config::EnrichmentConfig;
use crate::context::EnrichmentContext;
use crate::phase::Phase;
use crate::pipeline::DeclarationEnricher;

const NAME: &str = "connection-infrastructure";

/// Gives every connection provider an optional `reconnection` parameter and
/// every source requiring a connection an optional `reconnectionStrategy`.
///
/// Providers shared by several configurations get the parameter once.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConnectionInfrastructureEnricher;

impl DeclarationEnricher for ConnectionInfrastructureEnricher {
    fn name(&self) -> &str {
        NAME
    }

    fn phase(&self) -> Phase {
        Phase::Wiring
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = ConnectionVisitor { config: &ctx.config };
        DeclarationWalker::idempotent().walk(&mut *ctx.tree, &mut visitor)?;
        Ok(())
    }
}

struct ConnectionVisitor<'a> {
    config: &'a EnrichmentConfig,
}

fn infrastructure(name: &str, ty: &str) -> ParameterDeclaration {
    ParameterDeclaration::new(name, SemanticType::Object(ty.to_string()))
        .with_expression_support(ExpressionSupport::NotSupported)
}

impl DeclarationVisitor for ConnectionVisitor<'_> {
    fn on_connection_provider(
        &mut self,
        tree: &mut DeclarationTree,
        _: Owner,
        provider: NodeId,
    ) -> Result<Walk> {
        let parameter = infrastructure(&self.config.reconnection_parameter, "Reconnection");
        add_infrastructure_parameter(tree, provider, parameter, NAME, RECONNECTION_SEQUENCE)?;
        Ok(Walk::Continue)
    }

    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, source: NodeId) -> Result<Walk> {
        if tree.get(source)?.requires_connection() {
            let parameter = infrastructure(
                &self.config.reconnection_strategy_parameter,
                "ReconnectionStrategy",
            );
            add_infrastructure_parameter(tree, source, parameter, NAME, RECONNECTION_STRATEGY_SEQUENCE)?;
        }
        Ok(Walk::Continue)
    }
}
