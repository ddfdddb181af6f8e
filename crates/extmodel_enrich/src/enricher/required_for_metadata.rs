//! Configuration and provider members needed to resolve metadata.

use extmodel_declaration::DeclarationKind;
use extmodel_foundation::Result;

use super::components;
use crate::context::EnrichmentContext;
use crate::introspection::{markers, members_with_marker};
use crate::pipeline::DeclarationEnricher;
use crate::properties::RequiredForMetadataProperty;

/// Records the members of configurations and providers marked
/// `required-for-metadata`.
#[derive(Copy, Clone, Debug, Default)]
pub struct RequiredForMetadataEnricher;

impl DeclarationEnricher for RequiredForMetadataEnricher {
    fn name(&self) -> &str {
        "required-for-metadata"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let introspector = ctx.introspector();
        let tree = ctx.tree_mut();
        let targets = components(
            tree,
            &[DeclarationKind::Configuration, DeclarationKind::ConnectionProvider],
        )?;

        for id in targets {
            let parameters: Vec<String> =
                members_with_marker(introspector, id.into(), markers::REQUIRED_FOR_METADATA)
                    .into_iter()
                    .filter(|member| !member.kind.is_element())
                    .map(|member| member.name)
                    .collect();
            if !parameters.is_empty() {
                tree.add_property(id.into(), RequiredForMetadataProperty { parameters })?;
            }
        }
        Ok(())
    }
}
