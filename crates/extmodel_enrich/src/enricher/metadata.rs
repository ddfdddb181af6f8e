//! Metadata resolvers of operations and sources.

use extmodel_declaration::{DeclarationKind, NodeId};
use extmodel_foundation::{Error, Result, Value};
use tracing::warn;

use super::components;
use crate::config::CategoryMismatchPolicy;
use crate::context::EnrichmentContext;
use crate::introspection::{Introspector, element_marker, markers, members_with_marker};
use crate::pipeline::DeclarationEnricher;
use crate::properties::MetadataResolverProperty;

/// Collects the key, input and output resolvers of each operation and
/// source into a [`MetadataResolverProperty`].
///
/// The category is the one of the first resolver declaring one, in the order
/// keys, input, output. Resolvers declaring another category are flagged
/// according to [`CategoryMismatchPolicy`].
#[derive(Copy, Clone, Debug, Default)]
pub struct MetadataResolversEnricher;

impl DeclarationEnricher for MetadataResolversEnricher {
    fn name(&self) -> &str {
        "metadata-resolvers"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let introspector = ctx.introspector();
        let policy = ctx.config.category_mismatch;
        let tree = ctx.tree_mut();

        for id in components(tree, &[DeclarationKind::Operation, DeclarationKind::Source])? {
            let component = tree.get(id)?.name().to_string();
            if let Some(property) = resolvers(introspector, id, &component, policy)? {
                tree.add_property(id.into(), property)?;
            }
        }
        Ok(())
    }
}

/// A resolver marker payload: a resolver name or `{resolver, category}`.
struct Resolver {
    name: String,
    category: Option<String>,
}

fn parse_resolver(marker: &str, payload: &Value) -> Result<Resolver> {
    if let Some(name) = payload.as_str() {
        return Ok(Resolver {
            name: name.to_string(),
            category: None,
        });
    }
    let name = payload.get_str("resolver").ok_or_else(|| {
        Error::invalid_marker_payload(marker, "expected a resolver name or a map with 'resolver'")
    })?;
    Ok(Resolver {
        name: name.to_string(),
        category: payload.get_str("category").map(str::to_string),
    })
}

fn resolvers(
    introspector: &dyn Introspector,
    id: NodeId,
    component: &str,
    policy: CategoryMismatchPolicy,
) -> Result<Option<MetadataResolverProperty>> {
    let keys = element_marker(introspector, id.into(), markers::METADATA_KEYS)
        .map(|payload| parse_resolver(markers::METADATA_KEYS, &payload))
        .transpose()?;

    let mut inputs = Vec::new();
    for member in members_with_marker(introspector, id.into(), markers::INPUT_RESOLVER) {
        if member.kind.is_element() {
            continue;
        }
        if let Some(payload) = introspector.marker_value(&member, markers::INPUT_RESOLVER) {
            inputs.push((member.name, parse_resolver(markers::INPUT_RESOLVER, &payload)?));
        }
    }

    let output = element_marker(introspector, id.into(), markers::OUTPUT_RESOLVER)
        .map(|payload| parse_resolver(markers::OUTPUT_RESOLVER, &payload))
        .transpose()?;

    if keys.is_none() && inputs.is_empty() && output.is_none() {
        return Ok(None);
    }

    let declared: Vec<&str> = keys
        .iter()
        .chain(inputs.iter().map(|(_, resolver)| resolver))
        .chain(output.iter())
        .filter_map(|resolver| resolver.category.as_deref())
        .collect();
    let first = declared.first().copied();
    let other = declared.iter().copied().find(|category| Some(*category) != first);
    if let (Some(first), Some(other)) = (first, other) {
        match policy {
            CategoryMismatchPolicy::Warn => {
                warn!(component, category = first, other, "metadata resolvers declare different categories");
            }
            CategoryMismatchPolicy::Fail => {
                return Err(Error::illegal_model(format!(
                    "metadata resolvers of '{component}' declare categories '{first}' and '{other}'"
                )));
            }
        }
    }
    let category = first.map(str::to_string);

    Ok(Some(MetadataResolverProperty {
        category,
        keys_resolver: keys.map(|resolver| resolver.name),
        input_resolvers: inputs
            .into_iter()
            .map(|(member, resolver)| (member, resolver.name))
            .collect(),
        output_resolver: output.map(|resolver| resolver.name),
    }))
}
