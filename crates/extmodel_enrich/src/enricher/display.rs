//! Display and layout hints of parameters.

use extmodel_declaration::{
    Declaration, DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, Owner, Walk,
};
use extmodel_foundation::{Error, Result, Value};

use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, any_marker, markers};
use crate::phase::Phase;
use crate::pipeline::DeclarationEnricher;

/// Fills the display and layout hints of parameters from their markers.
/// Hints already set on a parameter are kept.
#[derive(Copy, Clone, Debug, Default)]
pub struct DisplayEnricher;

impl DeclarationEnricher for DisplayEnricher {
    fn name(&self) -> &str {
        "display"
    }

    fn phase(&self) -> Phase {
        Phase::PostStructure
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = DisplayVisitor {
            introspector: ctx.introspector(),
        };
        DeclarationWalker::idempotent().walk(ctx.tree_mut(), &mut visitor)?;
        Ok(())
    }
}

#[derive(Default)]
struct Hints {
    display_name: Option<String>,
    summary: Option<String>,
    example: Option<String>,
    order: Option<u32>,
    tab: Option<String>,
    password: bool,
    text: bool,
}

struct DisplayVisitor<'a> {
    introspector: &'a dyn Introspector,
}

impl DisplayVisitor<'_> {
    fn text_marker(&self, parameter: NodeId, marker: &str) -> Result<Option<String>> {
        any_marker(self.introspector, parameter.into(), marker)
            .map(|payload| {
                payload.as_str().map(str::to_string).ok_or_else(|| {
                    Error::invalid_marker_payload(marker, format!("expected a string, got {}", payload.type_name()))
                })
            })
            .transpose()
    }

    fn hints(&self, parameter: NodeId) -> Result<Hints> {
        let mut hints = Hints {
            display_name: self.text_marker(parameter, markers::DISPLAY_NAME)?,
            summary: self.text_marker(parameter, markers::SUMMARY)?,
            example: self.text_marker(parameter, markers::EXAMPLE)?,
            password: any_marker(self.introspector, parameter.into(), markers::PASSWORD).is_some(),
            text: any_marker(self.introspector, parameter.into(), markers::TEXT).is_some(),
            ..Hints::default()
        };
        if let Some(placement) = any_marker(self.introspector, parameter.into(), markers::PLACEMENT) {
            hints.order = placement.get("order").map(parse_order).transpose()?;
            hints.tab = placement.get_str("tab").map(str::to_string);
        }
        Ok(hints)
    }
}

fn parse_order(value: &Value) -> Result<u32> {
    value
        .as_int()
        .and_then(|order| u32::try_from(order).ok())
        .ok_or_else(|| {
            Error::invalid_marker_payload(
                markers::PLACEMENT,
                format!("order must be a non-negative integer, got {value}"),
            )
        })
}

impl DeclarationVisitor for DisplayVisitor<'_> {
    fn on_parameter(
        &mut self,
        tree: &mut DeclarationTree,
        _: Owner,
        _: NodeId,
        parameter: NodeId,
    ) -> Result<Walk> {
        let hints = self.hints(parameter)?;
        let Declaration::Parameter(param) = tree.get_mut(parameter)? else {
            return Ok(Walk::Continue);
        };

        let display = &mut param.display;
        display.display_name = display.display_name.take().or(hints.display_name);
        display.summary = display.summary.take().or(hints.summary);
        display.example = display.example.take().or(hints.example);

        let layout = &mut param.layout;
        layout.order = layout.order.or(hints.order);
        layout.tab = layout.tab.take().or(hints.tab);
        layout.password |= hints.password;
        layout.text |= hints.text;
        Ok(Walk::Continue)
    }
}
