//! Streaming operations.

use extmodel_declaration::{
    DeclarationTree, DeclarationVisitor, DeclarationWalker, ExpressionSupport, NodeId, Owner,
    ParameterDeclaration, SemanticType, Walk,
};
use extmodel_foundation::Result;

use super::{STREAMING_STRATEGY_SEQUENCE, add_infrastructure_parameter};
use crate::config::EnrichmentConfig;
use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, element_marker, markers};
use crate::pipeline::DeclarationEnricher;

const NAME: &str = "streaming";

/// Operations marked `streaming` support streaming and get an optional
/// streaming strategy parameter.
#[derive(Copy, Clone, Debug, Default)]
pub struct StreamingEnricher;

impl DeclarationEnricher for StreamingEnricher {
    fn name(&self) -> &str {
        NAME
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = StreamingVisitor {
            introspector: ctx.introspector,
            config: &ctx.config,
        };
        DeclarationWalker::idempotent().walk(&mut *ctx.tree, &mut visitor)?;
        Ok(())
    }
}

struct StreamingVisitor<'a> {
    introspector: &'a dyn Introspector,
    config: &'a EnrichmentConfig,
}

impl DeclarationVisitor for StreamingVisitor<'_> {
    fn on_operation(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        if element_marker(self.introspector, id.into(), markers::STREAMING).is_none() {
            return Ok(Walk::Continue);
        }
        if let Some(operation) = tree.get_mut(id)?.as_operation_mut() {
            operation.supports_streaming = true;
        }
        let parameter = ParameterDeclaration::new(
            self.config.streaming_strategy_parameter.as_str(),
            SemanticType::Object("StreamingStrategy".to_string()),
        )
        .with_expression_support(ExpressionSupport::NotSupported);
        add_infrastructure_parameter(tree, id, parameter, NAME, STREAMING_STRATEGY_SEQUENCE)?;
        Ok(Walk::Continue)
    }
}
