//! Parameters whose values come from a provider.

use std::collections::{BTreeMap, HashMap};

use extmodel_declaration::{
    DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, NodeRef, Owner, Walk,
};
use extmodel_foundation::{Error, Result, Value};
use tracing::debug;

use super::payload_items;
use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, any_marker, markers};
use crate::pipeline::DeclarationEnricher;
use crate::properties::{ActingParameter, ValueProviderProperty};

/// Attaches a `value-provider` property to parameters whose values a
/// provider resolves.
///
/// An `of-values` marker on a parameter makes it a single-part value. On a
/// parameter group it makes every group parameter marked `value-part` one
/// part of the value, ordered by the marker payload. Configurations,
/// connection providers, sources and operations are enriched.
#[derive(Copy, Clone, Debug, Default)]
pub struct ValueProvidersEnricher;

impl DeclarationEnricher for ValueProvidersEnricher {
    fn name(&self) -> &str {
        "value-providers"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut visitor = ValueProvidersVisitor {
            introspector: ctx.introspector(),
        };
        DeclarationWalker::idempotent().walk(ctx.tree_mut(), &mut visitor)?;
        Ok(())
    }
}

/// A parameter the provider is resolved with.
struct ProviderParameter {
    name: String,
    required: bool,
}

/// Parsed `of-values` payload.
struct OfValues {
    provider: String,
    open: bool,
    parameters: Vec<ProviderParameter>,
    bindings: BTreeMap<String, String>,
    connection: bool,
    config: bool,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::invalid_marker_payload(markers::OF_VALUES, message)
}

fn flag(payload: &Value, field: &str) -> Result<bool> {
    match payload.get(field) {
        None => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| invalid(format!("'{field}' must be a boolean, got {}", value.type_name()))),
    }
}

impl OfValues {
    fn parse(payload: &Value) -> Result<Self> {
        if let Some(provider) = payload.as_str() {
            return Ok(Self {
                provider: provider.to_string(),
                open: false,
                parameters: Vec::new(),
                bindings: BTreeMap::new(),
                connection: false,
                config: false,
            });
        }
        let provider = payload.get_str("provider").ok_or_else(|| {
            invalid(format!(
                "expected a provider id or a map with 'provider', got {}",
                payload.type_name()
            ))
        })?;

        let parameters = payload
            .get("parameters")
            .map(payload_items)
            .unwrap_or_default()
            .iter()
            .map(|item| -> Result<ProviderParameter> {
                if let Some(name) = item.as_str() {
                    return Ok(ProviderParameter {
                        name: name.to_string(),
                        required: true,
                    });
                }
                let name = item.get_str("name").ok_or_else(|| {
                    invalid(format!("expected a parameter name, got {}", item.type_name()))
                })?;
                Ok(ProviderParameter {
                    name: name.to_string(),
                    required: item.get("required").and_then(Value::as_bool).unwrap_or(true),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut bindings = BTreeMap::new();
        if let Some(value) = payload.get("bindings") {
            let entries = value
                .as_map()
                .ok_or_else(|| invalid(format!("'bindings' must be a map, got {}", value.type_name())))?;
            for (acting, expression) in entries {
                if !parameters.iter().any(|p| p.name == **acting) {
                    return Err(invalid(format!(
                        "binding '{acting}' names no parameter of provider '{provider}'"
                    )));
                }
                let expression = expression.as_str().ok_or_else(|| {
                    invalid(format!("binding '{acting}' must be an expression string"))
                })?;
                bindings.insert(acting.to_string(), expression.to_string());
            }
        }

        Ok(Self {
            provider: provider.to_string(),
            open: flag(payload, "open")?,
            parameters,
            bindings,
            connection: flag(payload, "connection")?,
            config: flag(payload, "config")?,
        })
    }

    /// Builds the property of one part. `declared` maps implementing member
    /// names of the component's parameters to their declared names.
    fn property(
        &self,
        provider_name: &str,
        part_order: u32,
        declared: &HashMap<String, String>,
    ) -> ValueProviderProperty {
        let acting_parameters = self
            .parameters
            .iter()
            .map(|parameter| match self.bindings.get(&parameter.name) {
                Some(expression) => ActingParameter {
                    name: parameter.name.clone(),
                    required: parameter.required,
                    extraction_expression: expression.clone(),
                },
                None => {
                    let name = declared
                        .get(&parameter.name)
                        .cloned()
                        .unwrap_or_else(|| parameter.name.clone());
                    ActingParameter {
                        extraction_expression: name.clone(),
                        name,
                        required: parameter.required,
                    }
                }
            })
            .collect();

        ValueProviderProperty {
            provider_id: self.provider.clone(),
            provider_name: provider_name.to_string(),
            part_order,
            open: self.open,
            acting_parameters,
            requires_connection: self.connection,
            requires_configuration: self.config,
        }
    }
}

struct ValueProvidersVisitor<'a> {
    introspector: &'a dyn Introspector,
}

impl ValueProvidersVisitor<'_> {
    fn of_values(&self, node: NodeRef) -> Result<Option<OfValues>> {
        any_marker(self.introspector, node, markers::OF_VALUES)
            .map(|payload| OfValues::parse(&payload))
            .transpose()
    }

    fn part_order(&self, parameter: NodeId) -> Result<Option<u32>> {
        any_marker(self.introspector, parameter.into(), markers::VALUE_PART)
            .map(|payload| {
                payload
                    .as_int()
                    .and_then(|order| u32::try_from(order).ok())
                    .filter(|&order| order >= 1)
                    .ok_or_else(|| {
                        Error::invalid_marker_payload(
                            markers::VALUE_PART,
                            format!("order must be a positive integer, got {payload}"),
                        )
                    })
            })
            .transpose()
    }

    /// Maps the implementing member name of each parameter to its declared name.
    fn declared_names(&self, tree: &DeclarationTree, parameters: &[NodeId]) -> Result<HashMap<String, String>> {
        let mut names = HashMap::new();
        for &parameter in parameters {
            let declared = tree.get(parameter)?.name().to_string();
            let implementing = self
                .introspector
                .backing_members(parameter.into())
                .into_iter()
                .find(|m| !m.kind.is_element())
                .map_or_else(|| declared.clone(), |m| m.name);
            names.insert(implementing, declared);
        }
        Ok(names)
    }

    fn enrich_component(&self, tree: &mut DeclarationTree, component: NodeId) -> Result<Walk> {
        let declaration = tree.get(component)?;
        let component_name = declaration.name().to_string();
        let groups = declaration.parameter_groups().to_vec();
        let parameters = tree.parameters(component)?;
        let declared = self.declared_names(tree, &parameters)?;

        let mut parts: Vec<(NodeId, ValueProviderProperty)> = Vec::new();
        for &parameter in &parameters {
            if let Some(of_values) = self.of_values(parameter.into())? {
                let name = tree.get(parameter)?.name();
                parts.push((parameter, of_values.property(name, 1, &declared)));
            }
        }

        for group in groups {
            let Some(of_values) = self.of_values(group.into())? else {
                continue;
            };
            let declaration = tree.get(group)?;
            let group_name = declaration.name();
            let members = declaration
                .as_parameter_group()
                .map(|g| g.parameters.clone())
                .unwrap_or_default();
            for parameter in members {
                let Some(order) = self.part_order(parameter)? else {
                    continue;
                };
                if any_marker(self.introspector, parameter.into(), markers::OF_VALUES).is_some() {
                    return Err(Error::illegal_model(format!(
                        "parameter '{}' of '{component_name}' has its own values and is a part of group '{group_name}'",
                        tree.get(parameter)?.name()
                    )));
                }
                parts.push((parameter, of_values.property(group_name, order, &declared)));
            }
        }

        for (parameter, property) in parts {
            let node = NodeRef::from(parameter);
            if tree.property::<ValueProviderProperty>(node).is_some() {
                debug!(component = %component_name, provider = %property.provider_id, "value provider already attached");
                continue;
            }
            tree.add_property(node, property)?;
        }
        Ok(Walk::Continue)
    }
}

impl DeclarationVisitor for ValueProvidersVisitor<'_> {
    fn on_configuration(&mut self, tree: &mut DeclarationTree, configuration: NodeId) -> Result<Walk> {
        self.enrich_component(tree, configuration)
    }

    fn on_connection_provider(&mut self, tree: &mut DeclarationTree, _: Owner, provider: NodeId) -> Result<Walk> {
        self.enrich_component(tree, provider)
    }

    fn on_source(&mut self, tree: &mut DeclarationTree, _: Owner, source: NodeId) -> Result<Walk> {
        self.enrich_component(tree, source)
    }

    fn on_operation(&mut self, tree: &mut DeclarationTree, _: Owner, operation: NodeId) -> Result<Walk> {
        self.enrich_component(tree, operation)
    }
}
