//! Cluster behaviour of sources.

use extmodel_declaration::{
    DeclarationTree, DeclarationVisitor, DeclarationWalker, ExpressionSupport, NodeId, Owner,
    ParameterDeclaration, SemanticType, Walk,
};
use extmodel_foundation::{Error, Result};

use super::{PRIMARY_NODE_ONLY_SEQUENCE, add_infrastructure_parameter};
use crate::config::EnrichmentConfig;
use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, element_marker, markers};
use crate::pipeline::DeclarationEnricher;
use crate::properties::{ClusterSupport, ClusterSupportProperty};

const NAME: &str = "cluster-support";

/// Decides whether each source runs on the primary node only or lets the
/// user choose through an optional boolean parameter.
#[derive(Copy, Clone, Debug, Default)]
pub struct ClusterSupportEnricher;

impl DeclarationEnricher for ClusterSupportEnricher {
    fn name(&self) -> &str {
        NAME
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = ClusterSupportVisitor {
            introspector: ctx.introspector,
            config: &ctx.config,
        };
        DeclarationWalker::idempotent().walk(&mut *ctx.tree, &mut visitor)?;
        Ok(())
    }
}

struct ClusterSupportVisitor<'a> {
    introspector: &'a dyn Introspector,
    config: &'a EnrichmentConfig,
}

impl DeclarationVisitor for ClusterSupportVisitor<'_> {
    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        let support = match element_marker(self.introspector, id.into(), markers::CLUSTER_SUPPORT) {
            None => ClusterSupport::DefaultAllNodes,
            Some(payload) => payload
                .as_str()
                .and_then(ClusterSupport::from_name)
                .ok_or_else(|| {
                    Error::invalid_marker_payload(
                        markers::CLUSTER_SUPPORT,
                        format!("unknown cluster support mode {payload}"),
                    )
                })?,
        };

        if let Some(source) = tree.get_mut(id)?.as_source_mut() {
            source.runs_on_primary_node_only = support == ClusterSupport::NotSupported;
        }
        tree.add_property(id.into(), ClusterSupportProperty { support })?;

        if support != ClusterSupport::NotSupported {
            let parameter = ParameterDeclaration::new(
                self.config.primary_node_only_parameter.as_str(),
                SemanticType::Boolean,
            )
            .with_default(support == ClusterSupport::DefaultPrimaryNodeOnly)
            .with_expression_support(ExpressionSupport::NotSupported);
            add_infrastructure_parameter(tree, id, parameter, NAME, PRIMARY_NODE_ONLY_SEQUENCE)?;
        }
        Ok(Walk::Continue)
    }
}
