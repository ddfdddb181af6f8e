//! Locates the member receiving the runtime default encoding.

use extmodel_declaration::{DeclarationKind, SemanticType};
use extmodel_foundation::{Error, Result};

use super::components;
use crate::context::EnrichmentContext;
use crate::introspection::{markers, single_marked_member};
use crate::pipeline::DeclarationEnricher;
use crate::properties::DefaultEncodingProperty;

const COMPONENT_KINDS: [DeclarationKind; 6] = [
    DeclarationKind::Configuration,
    DeclarationKind::ConnectionProvider,
    DeclarationKind::Source,
    DeclarationKind::Operation,
    DeclarationKind::Function,
    DeclarationKind::Construct,
];

/// At most one member per component may be marked `default-encoding`, and it
/// must be a string.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEncodingEnricher;

impl DeclarationEnricher for DefaultEncodingEnricher {
    fn name(&self) -> &str {
        "default-encoding"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let introspector = ctx.introspector();
        for id in components(ctx.tree_mut(), &COMPONENT_KINDS)? {
            let component = ctx.tree().get(id)?.name().to_string();
            let Some(member) =
                single_marked_member(introspector, id.into(), &component, markers::DEFAULT_ENCODING)?
            else {
                continue;
            };
            if member.declared_type != SemanticType::String {
                return Err(Error::illegal_model(format!(
                    "member '{}' of '{component}' is marked {} but is of type {}, expected string",
                    member.name,
                    markers::DEFAULT_ENCODING,
                    member.declared_type
                )));
            }
            ctx.tree_mut()
                .add_property(id.into(), DefaultEncodingProperty { member: member.name })?;
        }
        Ok(())
    }
}
