//! Resolves the error types an extension declares.

use extmodel_declaration::NodeRef;
use extmodel_foundation::Result;
use extmodel_taxonomy::{ErrorModel, ErrorTaxonomy, ErrorTypeDefinition};
use tracing::debug;

use super::payload_items;
use crate::context::EnrichmentContext;
use crate::introspection::{markers, members_with_marker};
use crate::phase::Phase;
use crate::pipeline::DeclarationEnricher;
use crate::properties::ErrorTaxonomyProperty;

/// Reads the extension's `error-types` markers, resolves the taxonomy and
/// registers its models on the extension.
#[derive(Copy, Clone, Debug, Default)]
pub struct ErrorTypesEnricher;

impl DeclarationEnricher for ErrorTypesEnricher {
    fn name(&self) -> &str {
        "error-types"
    }

    fn phase(&self) -> Phase {
        Phase::Initialize
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        if ctx
            .tree()
            .property::<ErrorTaxonomyProperty>(NodeRef::Extension)
            .is_some()
        {
            debug!("error taxonomy already resolved");
            return Ok(());
        }

        let introspector = ctx.introspector();
        let mut definitions = Vec::new();
        for member in members_with_marker(introspector, NodeRef::Extension, markers::ERROR_TYPES) {
            let Some(payload) = introspector.marker_value(&member, markers::ERROR_TYPES) else {
                continue;
            };
            for item in payload_items(&payload) {
                definitions.push(ErrorTypeDefinition::from_value(markers::ERROR_TYPES, &item)?);
            }
        }

        let namespace = ctx.tree().extension().namespace();
        let taxonomy = ErrorTaxonomy::resolve(&namespace, definitions)?;

        let mut registered: Vec<ErrorModel> = taxonomy.declared_models().into_iter().cloned().collect();
        registered.extend(taxonomy.connectivity().cloned());
        registered.extend(taxonomy.retry_exhausted().cloned());

        let extension = ctx.tree_mut().extension_mut();
        for model in &registered {
            extension.error_models.extend(model.lineage().cloned());
        }
        debug!(
            namespace = taxonomy.namespace(),
            models = extension.error_models.len(),
            "error models registered"
        );

        ctx.tree_mut()
            .add_property(NodeRef::Extension, ErrorTaxonomyProperty { taxonomy })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::{MemberKind, StaticIntrospector, StaticMember};
    use extmodel_declaration::{DeclarationTree, ExtensionDeclaration};
    use extmodel_foundation::{ErrorKind, Value};

    fn tree() -> DeclarationTree {
        DeclarationTree::new(ExtensionDeclaration::new("http").with_xml_dsl("http", "urn:http"))
    }

    fn declaring(payload: Value) -> StaticIntrospector {
        StaticIntrospector::new().with(
            StaticMember::element(NodeRef::Extension, MemberKind::Type)
                .marker_value(markers::ERROR_TYPES, payload),
        )
    }

    #[test]
    fn registers_declared_models_with_ancestors() {
        let introspector = declaring(Value::list([
            Value::map([("type", Value::from("TIMEOUT")), ("parent", Value::from("CONNECTIVITY"))]),
            Value::from("PARSING"),
        ]));
        let mut tree = tree();
        let mut ctx = EnrichmentContext::new(&mut tree, &introspector);
        ErrorTypesEnricher.enrich(&mut ctx).unwrap();

        let ids: Vec<String> = tree
            .extension()
            .error_models
            .iter()
            .map(ErrorModel::identifier)
            .collect();
        for expected in [
            "HTTP:TIMEOUT",
            "HTTP:CONNECTIVITY",
            "HTTP:PARSING",
            "HTTP:RETRY_EXHAUSTED",
            "MULE:CONNECTIVITY",
            "MULE:ANY",
        ] {
            assert!(ids.iter().any(|id| id == expected), "missing {expected} in {ids:?}");
        }
        assert!(tree.property::<ErrorTaxonomyProperty>(NodeRef::Extension).is_some());
    }

    #[test]
    fn no_markers_still_yields_builtins() {
        let introspector = StaticIntrospector::new();
        let mut tree = tree();
        let mut ctx = EnrichmentContext::new(&mut tree, &introspector);
        ErrorTypesEnricher.enrich(&mut ctx).unwrap();

        let taxonomy = &tree
            .property::<ErrorTaxonomyProperty>(NodeRef::Extension)
            .unwrap()
            .taxonomy;
        assert!(taxonomy.connectivity().is_some());
        assert!(taxonomy.retry_exhausted().is_some());
    }

    #[test]
    fn cycle_is_rejected() {
        let introspector = declaring(Value::list([
            Value::map([("type", Value::from("A")), ("parent", Value::from("B"))]),
            Value::map([("type", Value::from("B")), ("parent", Value::from("A"))]),
        ]));
        let mut tree = tree();
        let mut ctx = EnrichmentContext::new(&mut tree, &introspector);
        let err = ErrorTypesEnricher.enrich(&mut ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CyclicErrorTypes(_)));
    }
}
