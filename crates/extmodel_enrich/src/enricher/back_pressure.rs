//! Back-pressure modes of sources.

use extmodel_declaration::{
    DeclarationTree, DeclarationVisitor, DeclarationWalker, ExpressionSupport, NodeId, Owner,
    ParameterDeclaration, SemanticType, Walk,
};
use extmodel_foundation::{Error, Result, Value};

use super::{BACK_PRESSURE_SEQUENCE, add_infrastructure_parameter, payload_items};
use crate::config::EnrichmentConfig;
use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, element_marker, markers};
use crate::pipeline::DeclarationEnricher;
use crate::properties::{BackPressureMode, BackPressureStrategyProperty};

const NAME: &str = "back-pressure";

/// Records the back-pressure modes of each source. A source supporting more
/// than one mode gets an optional parameter selecting it.
#[derive(Copy, Clone, Debug, Default)]
pub struct BackPressureEnricher;

impl DeclarationEnricher for BackPressureEnricher {
    fn name(&self) -> &str {
        NAME
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = BackPressureVisitor {
            introspector: ctx.introspector,
            config: &ctx.config,
        };
        DeclarationWalker::idempotent().walk(&mut *ctx.tree, &mut visitor)?;
        Ok(())
    }
}

fn parse_mode(value: &Value) -> Result<BackPressureMode> {
    value
        .as_str()
        .and_then(BackPressureMode::from_name)
        .ok_or_else(|| {
            Error::invalid_marker_payload(markers::BACK_PRESSURE, format!("unknown mode {value}"))
        })
}

/// Reads `{default, supported}`; both fields are optional.
fn parse_strategy(payload: Option<&Value>) -> Result<BackPressureStrategyProperty> {
    let default_mode = match payload.and_then(|p| p.get("default")) {
        Some(mode) => parse_mode(mode)?,
        None => BackPressureMode::Wait,
    };
    let mut supported_modes = Vec::new();
    if let Some(list) = payload.and_then(|p| p.get("supported")) {
        for item in &payload_items(list) {
            let mode = parse_mode(item)?;
            if !supported_modes.contains(&mode) {
                supported_modes.push(mode);
            }
        }
    } else {
        supported_modes.push(default_mode);
    }
    Ok(BackPressureStrategyProperty {
        default_mode,
        supported_modes,
    })
}

struct BackPressureVisitor<'a> {
    introspector: &'a dyn Introspector,
    config: &'a EnrichmentConfig,
}

impl DeclarationVisitor for BackPressureVisitor<'_> {
    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, id: NodeId) -> Result<Walk> {
        let payload = element_marker(self.introspector, id.into(), markers::BACK_PRESSURE);
        let strategy = parse_strategy(payload.as_ref())?;
        if !strategy.supported_modes.contains(&strategy.default_mode) {
            return Err(Error::illegal_model(format!(
                "source '{}' defaults to back-pressure mode {} which is not among its supported modes",
                tree.get(id)?.name(),
                strategy.default_mode
            )));
        }

        if strategy.supported_modes.len() > 1 {
            let parameter = ParameterDeclaration::new(
                self.config.back_pressure_parameter.as_str(),
                SemanticType::String,
            )
            .with_default(strategy.default_mode.name())
            .with_expression_support(ExpressionSupport::NotSupported);
            add_infrastructure_parameter(tree, id, parameter, NAME, BACK_PRESSURE_SEQUENCE)?;
        }
        tree.add_property(id.into(), strategy)?;
        Ok(Walk::Continue)
    }
}
