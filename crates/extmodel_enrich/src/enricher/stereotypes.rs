//! Stereotype assignment.

use std::collections::{BTreeMap, BTreeSet};

use extmodel_declaration::{
    DeclarationKind, DeclarationTree, DeclarationVisitor, DeclarationWalker, NodeId, NodeRef, Owner,
    SemanticType, StereotypeModel, Walk,
};
use extmodel_foundation::{Error, RESERVED_NAMESPACE, Result, Value};
use tracing::debug;

use super::{components, payload_items};
use crate::context::{EnrichmentContext, StereotypeCache};
use crate::introspection::{Introspector, any_marker, element_marker, markers};
use crate::phase::Phase;
use crate::pipeline::DeclarationEnricher;
use crate::properties::{AllowedStereotypesProperty, TypeStereotypesProperty};

const VALIDATOR: &str = "VALIDATOR";

/// Assigns a stereotype to every configuration, provider, source, operation
/// and construct that has none.
///
/// | Component | Default |
/// |---|---|
/// | configuration | `<NS>:CONFIG` (parent `MULE:CONFIG`) |
/// | connection provider | `<NS>:CONNECTION` (parent `MULE:CONNECTION`) |
/// | source | `MULE:SOURCE` |
/// | operation, construct | `MULE:PROCESSOR` |
///
/// A `stereotype` marker replaces the default; a `validator` marker assigns
/// `<NS>:VALIDATOR`. Custom stereotypes are built once per run and shared.
///
/// Parameters marked `allowed-stereotypes` record the stereotypes they accept;
/// a `processor-chain` parameter without that marker accepts `MULE:PROCESSOR`.
/// The extension's `type-stereotypes` marker assigns stereotypes to its
/// declared object types.
#[derive(Copy, Clone, Debug, Default)]
pub struct StereotypesEnricher;

impl DeclarationEnricher for StereotypesEnricher {
    fn name(&self) -> &str {
        "stereotypes"
    }

    fn phase(&self) -> Phase {
        Phase::PostStructure
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let introspector = ctx.introspector();
        let resolver = Resolver {
            namespace: ctx.tree().extension().namespace(),
            strict: ctx.config.strict_stereotype_namespaces,
        };
        let cache = &mut ctx.stereotypes;
        let tree = &mut *ctx.tree;

        assign_component_stereotypes(tree, introspector, &resolver, cache)?;

        let mut visitor = AllowedStereotypesVisitor {
            introspector,
            resolver: &resolver,
            cache: &mut *cache,
        };
        DeclarationWalker::idempotent().walk(tree, &mut visitor)?;

        assign_type_stereotypes(tree, introspector, &resolver, cache)
    }
}

fn assign_component_stereotypes(
    tree: &mut DeclarationTree,
    introspector: &dyn Introspector,
    resolver: &Resolver,
    cache: &mut StereotypeCache,
) -> Result<()> {
    let targets = components(
        tree,
        &[
            DeclarationKind::Configuration,
            DeclarationKind::ConnectionProvider,
            DeclarationKind::Source,
            DeclarationKind::Operation,
            DeclarationKind::Construct,
        ],
    )?;
    for id in targets {
        let declaration = tree.get(id)?;
        if let Some(assigned) = declaration.stereotype() {
            debug!(component = declaration.name(), stereotype = %assigned, "stereotype already assigned");
            continue;
        }
        let kind = declaration.kind();

        let validator = element_marker(introspector, id.into(), markers::VALIDATOR);
        let custom = element_marker(introspector, id.into(), markers::STEREOTYPE);
        let model = match (validator, custom) {
            (Some(_), Some(_)) => {
                return Err(Error::illegal_model(format!(
                    "'{}' is marked both as a validator and with a custom stereotype",
                    declaration.name()
                )));
            }
            (Some(_), None) => resolver.validator(cache)?,
            (None, Some(payload)) => {
                resolver.custom(cache, &payload, markers::STEREOTYPE, Some(&base_stereotype(kind)))?
            }
            (None, None) => resolver.default_for(cache, kind)?,
        };

        if let Some(slot) = tree.get_mut(id)?.stereotype_mut() {
            *slot = Some(model);
        }
    }
    Ok(())
}

struct AllowedStereotypesVisitor<'a> {
    introspector: &'a dyn Introspector,
    resolver: &'a Resolver,
    cache: &'a mut StereotypeCache,
}

impl DeclarationVisitor for AllowedStereotypesVisitor<'_> {
    fn on_parameter(
        &mut self,
        tree: &mut DeclarationTree,
        _: Owner,
        _: NodeId,
        parameter: NodeId,
    ) -> Result<Walk> {
        let node = NodeRef::from(parameter);
        if tree.property::<AllowedStereotypesProperty>(node).is_some() {
            return Ok(Walk::Continue);
        }
        let stereotypes = match any_marker(self.introspector, node, markers::ALLOWED_STEREOTYPES) {
            Some(payload) => self.resolver.list(self.cache, &payload, markers::ALLOWED_STEREOTYPES)?,
            None if any_marker(self.introspector, node, markers::PROCESSOR_CHAIN).is_some() => {
                vec![StereotypeModel::processor()]
            }
            None => return Ok(Walk::Continue),
        };
        tree.add_property(node, AllowedStereotypesProperty { stereotypes })?;
        Ok(Walk::Continue)
    }
}

fn assign_type_stereotypes(
    tree: &mut DeclarationTree,
    introspector: &dyn Introspector,
    resolver: &Resolver,
    cache: &mut StereotypeCache,
) -> Result<()> {
    if tree.property::<TypeStereotypesProperty>(NodeRef::Extension).is_some() {
        return Ok(());
    }
    let Some(payload) = element_marker(introspector, NodeRef::Extension, markers::TYPE_STEREOTYPES) else {
        return Ok(());
    };
    let entries = payload.as_map().ok_or_else(|| {
        Error::invalid_marker_payload(
            markers::TYPE_STEREOTYPES,
            format!("expected a map from type name to stereotypes, got {}", payload.type_name()),
        )
    })?;

    let mut declared = BTreeSet::new();
    for ty in &tree.extension().types {
        object_type_names(ty, &mut declared);
    }
    let mut stereotypes = BTreeMap::new();
    for (type_name, item) in entries {
        if !declared.contains(&**type_name) {
            return Err(Error::illegal_model(format!(
                "stereotypes are given for type '{type_name}', which the extension does not declare"
            )));
        }
        let models = resolver.list(cache, item, markers::TYPE_STEREOTYPES)?;
        stereotypes.insert(type_name.to_string(), models);
    }

    tree.add_property(NodeRef::Extension, TypeStereotypesProperty { stereotypes })?;
    Ok(())
}

/// Collects the names of object types reachable from `ty`.
fn object_type_names<'t>(ty: &'t SemanticType, names: &mut BTreeSet<&'t str>) {
    match ty {
        SemanticType::Object(name) | SemanticType::Custom { name, .. } => {
            names.insert(name.as_str());
        }
        SemanticType::Array(item) => object_type_names(item, names),
        _ => {}
    }
}

/// Root stereotype of the reserved namespace a component kind descends from.
fn base_stereotype(kind: DeclarationKind) -> StereotypeModel {
    match kind {
        DeclarationKind::Configuration => StereotypeModel::config(),
        DeclarationKind::ConnectionProvider => StereotypeModel::connection(),
        DeclarationKind::Source => StereotypeModel::source(),
        _ => StereotypeModel::processor(),
    }
}

struct Resolver {
    namespace: String,
    strict: bool,
}

impl Resolver {
    fn default_for(&self, cache: &mut StereotypeCache, kind: DeclarationKind) -> Result<StereotypeModel> {
        let base = base_stereotype(kind);
        match kind {
            DeclarationKind::Configuration | DeclarationKind::ConnectionProvider => {
                self.cached(cache, &self.namespace, base.stereotype_type(), Some(base.clone()))
            }
            _ => Ok(base),
        }
    }

    fn validator(&self, cache: &mut StereotypeCache) -> Result<StereotypeModel> {
        self.cached(
            cache,
            &self.namespace,
            VALIDATOR,
            Some(StereotypeModel::reserved(VALIDATOR)),
        )
    }

    /// Resolves every stereotype of a payload holding one or a list of them.
    fn list(&self, cache: &mut StereotypeCache, payload: &Value, marker: &str) -> Result<Vec<StereotypeModel>> {
        let items = payload_items(payload);
        if items.is_empty() {
            return Err(Error::invalid_marker_payload(marker, "expected at least one stereotype"));
        }
        items
            .iter()
            .map(|item| self.custom(cache, item, marker, None))
            .collect()
    }

    /// Resolves a stereotype payload: a name, or `{name, namespace, parent}`
    /// where `parent` is itself a payload.
    ///
    /// Without an explicit parent, the stereotype descends from
    /// `default_parent` unless it lives in the reserved namespace.
    fn custom(
        &self,
        cache: &mut StereotypeCache,
        payload: &Value,
        marker: &str,
        default_parent: Option<&StereotypeModel>,
    ) -> Result<StereotypeModel> {
        let (name, namespace, parent) = match payload.as_str() {
            Some(name) => (name, None, None),
            None => {
                let name = payload.get_str("name").ok_or_else(|| {
                    Error::invalid_marker_payload(
                        marker,
                        format!("expected a name or a map with 'name', got {}", payload.type_name()),
                    )
                })?;
                (name, payload.get_str("namespace"), payload.get("parent"))
            }
        };
        let name = name.to_uppercase();
        let namespace = namespace.map_or_else(|| self.namespace.clone(), str::to_uppercase);

        if self.strict && namespace != self.namespace && namespace != RESERVED_NAMESPACE {
            return Err(Error::illegal_model(format!(
                "stereotype {namespace}:{name} is outside the extension namespace {}",
                self.namespace
            )));
        }

        cache.get_or_try_insert(&namespace, &name, |cache| {
            let parent = match parent {
                Some(parent) => Some(self.custom(cache, parent, marker, default_parent)?),
                None if namespace == RESERVED_NAMESPACE => None,
                None => default_parent.cloned(),
            };
            Ok(StereotypeModel::new(namespace.as_str(), name.as_str(), parent))
        })
    }

    fn cached(
        &self,
        cache: &mut StereotypeCache,
        namespace: &str,
        name: &str,
        parent: Option<StereotypeModel>,
    ) -> Result<StereotypeModel> {
        cache.get_or_try_insert(namespace, name, |_| Ok(StereotypeModel::new(namespace, name, parent)))
    }
}
