//! Error types raised by operations, sources and constructs.

use extmodel_declaration::{DeclarationKind, NodeRef};
use extmodel_foundation::{Error, Result};
use extmodel_taxonomy::{ErrorModel, ErrorTaxonomy};
use tracing::debug;

use super::{components, payload_items};
use crate::context::EnrichmentContext;
use crate::introspection::{element_marker, markers};
use crate::phase::Phase;
use crate::pipeline::DeclarationEnricher;
use crate::properties::ErrorTaxonomyProperty;

/// Resolves each component's `throws` marker against the extension's error
/// taxonomy. Components requiring a connection also raise `CONNECTIVITY` and
/// `RETRY_EXHAUSTED`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ComponentErrorsEnricher;

impl DeclarationEnricher for ComponentErrorsEnricher {
    fn name(&self) -> &str {
        "component-errors"
    }

    fn phase(&self) -> Phase {
        Phase::PostStructure
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let taxonomy = match ctx.tree().property::<ErrorTaxonomyProperty>(NodeRef::Extension) {
            Some(property) => property.taxonomy.clone(),
            None => {
                debug!("no error taxonomy resolved, using built-in types only");
                ErrorTaxonomy::resolve(&ctx.tree().extension().namespace(), Vec::new())?
            }
        };
        let introspector = ctx.introspector();
        let tree = ctx.tree_mut();

        let targets = components(
            tree,
            &[DeclarationKind::Operation, DeclarationKind::Source, DeclarationKind::Construct],
        )?;
        for id in targets {
            let declaration = tree.get(id)?;
            let component = declaration.name().to_string();
            let mut raised: Vec<ErrorModel> = Vec::new();

            if let Some(payload) = element_marker(introspector, id.into(), markers::THROWS) {
                for item in payload_items(&payload) {
                    let reference = item.as_str().ok_or_else(|| {
                        Error::invalid_marker_payload(
                            markers::THROWS,
                            format!("expected an error type name, got {}", item.type_name()),
                        )
                    })?;
                    let model = taxonomy
                        .lookup_qualified(reference)
                        .ok_or_else(|| Error::undeclared_error_type(component.as_str(), reference))?;
                    raised.push(model.clone());
                }
            }
            if declaration.requires_connection() {
                raised.extend(taxonomy.connectivity().cloned());
                raised.extend(taxonomy.retry_exhausted().cloned());
            }

            if let Some(errors) = tree.get_mut(id)?.errors_mut() {
                errors.extend(raised);
            }
        }
        Ok(())
    }
}
