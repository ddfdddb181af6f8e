//! Parameters typed by external schemas.

use extmodel_declaration::{
    Declaration, DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, Owner,
    SemanticType, Walk,
};
use extmodel_foundation::{Error, Result};
use tracing::debug;

use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, any_marker, markers};
use crate::pipeline::DeclarationEnricher;
use crate::properties::CustomTypeProperty;
use crate::type_loader::{TypeFormat, TypeLoader};

/// Parameters marked `xml-type` or `json-type` take their type from the
/// configured [`TypeLoader`]. Loaded types are registered on the extension.
#[derive(Copy, Clone, Debug, Default)]
pub struct CustomTypesEnricher;

impl DeclarationEnricher for CustomTypesEnricher {
    fn name(&self) -> &str {
        "custom-types"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = CustomTypesVisitor {
            introspector: ctx.introspector(),
            type_loader: ctx.type_loader(),
            loaded: Vec::new(),
        };
        DeclarationWalker::idempotent().walk(ctx.tree_mut(), &mut visitor)?;

        let types = &mut ctx.tree_mut().extension_mut().types;
        for ty in visitor.loaded {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        Ok(())
    }
}

struct CustomTypesVisitor<'a> {
    introspector: &'a dyn Introspector,
    type_loader: &'a dyn TypeLoader,
    loaded: Vec<SemanticType>,
}

impl CustomTypesVisitor<'_> {
    fn locator(&self, parameter: NodeId) -> Result<Option<(TypeFormat, String)>> {
        let xml = any_marker(self.introspector, parameter.into(), markers::XML_TYPE);
        let json = any_marker(self.introspector, parameter.into(), markers::JSON_TYPE);
        let (format, marker, payload) = match (xml, json) {
            (None, None) => return Ok(None),
            (Some(payload), None) => (TypeFormat::Xml, markers::XML_TYPE, payload),
            (None, Some(payload)) => (TypeFormat::Json, markers::JSON_TYPE, payload),
            (Some(_), Some(_)) => {
                return Err(Error::illegal_model(
                    "a parameter cannot be typed by both an XML and a JSON schema",
                ));
            }
        };
        let locator = payload.as_str().ok_or_else(|| {
            Error::invalid_marker_payload(marker, format!("expected a locator, got {}", payload.type_name()))
        })?;
        Ok(Some((format, locator.to_string())))
    }
}

impl DeclarationVisitor for CustomTypesVisitor<'_> {
    fn on_parameter(
        &mut self,
        tree: &mut DeclarationTree,
        _: Owner,
        _: NodeId,
        parameter: NodeId,
    ) -> Result<Walk> {
        if tree.property::<CustomTypeProperty>(parameter.into()).is_some() {
            debug!(parameter = tree.get(parameter)?.name(), "custom type already loaded");
            return Ok(Walk::Continue);
        }
        let Some((format, locator)) = self.locator(parameter)? else {
            return Ok(Walk::Continue);
        };

        let ty = self.type_loader.load_type(format, &locator)?;
        if let Declaration::Parameter(param) = tree.get_mut(parameter)? {
            param.ty = ty.clone();
        }
        tree.add_property(parameter.into(), CustomTypeProperty { format, locator })?;
        self.loaded.push(ty);
        Ok(Walk::Continue)
    }
}
