//! Error taxonomy resolution.
//!
//! The resolver turns an unordered set of [`ErrorTypeDefinition`]s into a
//! deduplicated hierarchy of [`ErrorModel`]s:
//!
//! 1. Every definition becomes a vertex with an edge to its parent. Built-in
//!    parents bring their own built-in ancestry along.
//! 2. Cycles (including self-parenting) are rejected.
//! 3. Vertices are resolved parents-first, memoized by vertex, so every
//!    reference to a definition shares one model instance.
//!
//! `CONNECTIVITY` and `RETRY_EXHAUSTED` are always declared on behalf of the
//! extension, parented under their reserved counterparts.

use std::collections::{BTreeSet, HashMap};

use extmodel_foundation::{Error, ErrorKind, RESERVED_NAMESPACE, Result};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::builtin::BuiltinErrorType;
use crate::definition::{ErrorTypeDefinition, ErrorTypeRef};
use crate::model::ErrorModel;

/// The resolved error hierarchy of one extension.
#[derive(Clone, Debug)]
pub struct ErrorTaxonomy {
    namespace: String,
    models: HashMap<ErrorTypeRef, ErrorModel>,
    /// Vertices reachable from the author's own definitions.
    declared: BTreeSet<ErrorTypeRef>,
}

/// Definitions injected into every taxonomy.
fn synthetic_definitions() -> [ErrorTypeDefinition; 2] {
    [
        ErrorTypeDefinition::new(BuiltinErrorType::Connectivity.name())
            .with_parent(BuiltinErrorType::Connectivity),
        ErrorTypeDefinition::new(BuiltinErrorType::RetryExhausted.name())
            .with_parent(BuiltinErrorType::RetryExhausted),
    ]
}

/// Directed child → parent graph under construction.
#[derive(Default)]
struct TaxonomyGraph {
    graph: DiGraph<ErrorTypeRef, ()>,
    indices: HashMap<ErrorTypeRef, NodeIndex>,
}

impl TaxonomyGraph {
    fn vertex(&mut self, vertex: &ErrorTypeRef) -> NodeIndex {
        if let Some(index) = self.indices.get(vertex) {
            return *index;
        }
        let index = self.graph.add_node(vertex.clone());
        self.indices.insert(vertex.clone(), index);
        index
    }

    fn edge(&mut self, child: &ErrorTypeRef, parent: &ErrorTypeRef) {
        let from = self.vertex(child);
        let to = self.vertex(parent);
        self.graph.update_edge(from, to, ());
    }

    /// Adds a built-in kind together with its built-in ancestry.
    fn builtin_chain(&mut self, kind: BuiltinErrorType) {
        let mut current = kind;
        self.vertex(&ErrorTypeRef::Builtin(current));
        while let Some(parent) = current.parent() {
            self.edge(&ErrorTypeRef::Builtin(current), &ErrorTypeRef::Builtin(parent));
            current = parent;
        }
    }

    /// Returns the members of the first cycle found, in edge order.
    fn find_cycle(&self) -> Option<Vec<String>> {
        for component in tarjan_scc(&self.graph) {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|n| self.graph.contains_edge(*n, *n));
            if !cyclic {
                continue;
            }

            let members: BTreeSet<NodeIndex> = component.iter().copied().collect();
            let Some(start) = members.iter().next().copied() else {
                continue;
            };
            let mut path = vec![self.graph[start].to_string()];
            let mut current = start;
            loop {
                let Some(next) = self
                    .graph
                    .neighbors(current)
                    .find(|n| members.contains(n))
                else {
                    break;
                };
                path.push(self.graph[next].to_string());
                if next == start || path.len() > members.len() {
                    break;
                }
                current = next;
            }
            return Some(path);
        }
        None
    }
}

impl ErrorTaxonomy {
    /// Resolves `definitions` declared by the extension whose namespace is `namespace`.
    ///
    /// The namespace is upper-cased. Fails with a structural violation on
    /// duplicate identifiers, reserved root names, unknown parents, and cycles.
    pub fn resolve(
        namespace: &str,
        definitions: impl IntoIterator<Item = ErrorTypeDefinition>,
    ) -> Result<Self> {
        let namespace = namespace.to_uppercase();

        let supplied = Self::collect_definitions(&namespace, definitions)?;
        let mut all = supplied.clone();
        for synthetic in synthetic_definitions() {
            match all.get(&synthetic.error_type) {
                Some(existing) if existing.effective_parent() != synthetic.effective_parent() => {
                    return Err(Error::duplicate_error_type(&namespace, &synthetic.error_type));
                }
                Some(_) => {}
                None => {
                    all.insert(synthetic.error_type.clone(), synthetic);
                }
            }
        }

        let mut graph = TaxonomyGraph::default();
        graph.builtin_chain(BuiltinErrorType::Any);
        for definition in all.values() {
            let vertex = definition.vertex();
            graph.vertex(&vertex);
            match definition.effective_parent() {
                ErrorTypeRef::Builtin(kind) => {
                    graph.builtin_chain(kind);
                    graph.edge(&vertex, &ErrorTypeRef::Builtin(kind));
                }
                ErrorTypeRef::Declared(parent) => {
                    if !all.contains_key(&parent) {
                        return Err(Error::unknown_error_type(parent));
                    }
                    graph.edge(&vertex, &ErrorTypeRef::Declared(parent));
                }
            }
        }

        if let Some(cycle) = graph.find_cycle() {
            return Err(Error::cyclic_error_types(cycle));
        }

        let order = toposort(&graph.graph, None).map_err(|cycle| {
            Error::cyclic_error_types(vec![graph.graph[cycle.node_id()].to_string()])
        })?;

        let mut models: HashMap<ErrorTypeRef, ErrorModel> = HashMap::with_capacity(order.len());
        models.insert(
            ErrorTypeRef::Builtin(BuiltinErrorType::Any),
            ErrorModel::new(RESERVED_NAMESPACE, BuiltinErrorType::Any.name(), None),
        );

        // Edges point child → parent, so the reversed topological order
        // visits every parent before its children.
        for index in order.into_iter().rev() {
            let vertex = &graph.graph[index];
            if models.contains_key(vertex) {
                continue;
            }
            let (model_namespace, parent) = match vertex {
                ErrorTypeRef::Builtin(kind) => (RESERVED_NAMESPACE, kind.parent().map(ErrorTypeRef::Builtin)),
                ErrorTypeRef::Declared(name) => (
                    namespace.as_str(),
                    all.get(name).map(ErrorTypeDefinition::effective_parent),
                ),
            };
            let parent_model = match parent {
                Some(parent) => Some(models.get(&parent).cloned().ok_or_else(|| {
                    Error::new(ErrorKind::Internal(format!(
                        "parent {parent} of {vertex} not resolved before its child"
                    )))
                })?),
                None => None,
            };
            models.insert(
                vertex.clone(),
                ErrorModel::new(model_namespace, vertex.name(), parent_model),
            );
        }

        let declared = Self::closure(&models, supplied.values().map(ErrorTypeDefinition::vertex));
        debug!(
            namespace = %namespace,
            definitions = supplied.len(),
            models = models.len(),
            "resolved error taxonomy"
        );

        Ok(Self {
            namespace,
            models,
            declared,
        })
    }

    /// Deduplicates definitions by type name, rejecting clashes.
    fn collect_definitions(
        namespace: &str,
        definitions: impl IntoIterator<Item = ErrorTypeDefinition>,
    ) -> Result<HashMap<String, ErrorTypeDefinition>> {
        let mut by_name: HashMap<String, ErrorTypeDefinition> = HashMap::new();
        for definition in definitions {
            if BuiltinErrorType::from_name(&definition.error_type).is_some_and(BuiltinErrorType::is_root) {
                return Err(Error::illegal_model(format!(
                    "error type '{}' is reserved and cannot be declared by an extension",
                    definition.error_type
                )));
            }
            match by_name.get(&definition.error_type) {
                Some(existing) if existing.effective_parent() != definition.effective_parent() => {
                    return Err(Error::duplicate_error_type(namespace, &definition.error_type));
                }
                Some(_) => {}
                None => {
                    by_name.insert(definition.error_type.clone(), definition);
                }
            }
        }
        Ok(by_name)
    }

    /// Collects `roots` and every ancestor vertex of theirs.
    fn closure(
        models: &HashMap<ErrorTypeRef, ErrorModel>,
        roots: impl Iterator<Item = ErrorTypeRef>,
    ) -> BTreeSet<ErrorTypeRef> {
        let by_model: HashMap<&ErrorModel, &ErrorTypeRef> =
            models.iter().map(|(vertex, model)| (model, vertex)).collect();
        let mut declared = BTreeSet::new();
        for root in roots {
            let Some(model) = models.get(&root) else {
                continue;
            };
            for ancestor in model.lineage() {
                if let Some(vertex) = by_model.get(ancestor) {
                    declared.insert((*vertex).clone());
                }
            }
        }
        declared
    }

    /// Returns the upper-cased namespace of the extension.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the model resolved for `definition`.
    #[must_use]
    pub fn model_for(&self, definition: &ErrorTypeDefinition) -> Option<&ErrorModel> {
        self.models.get(&definition.vertex())
    }

    /// Returns the model for a vertex reference.
    #[must_use]
    pub fn get(&self, vertex: &ErrorTypeRef) -> Option<&ErrorModel> {
        self.models.get(vertex)
    }

    /// Looks up an extension-declared type by name.
    #[must_use]
    pub fn lookup(&self, error_type: &str) -> Option<&ErrorModel> {
        self.models.get(&ErrorTypeRef::declared(error_type))
    }

    /// Looks up a type written as `TYPE` or `NAMESPACE:TYPE`.
    ///
    /// `TYPE` and the extension's own namespace resolve declared types; the
    /// reserved namespace resolves built-ins. Other namespaces never match.
    #[must_use]
    pub fn lookup_qualified(&self, reference: &str) -> Option<&ErrorModel> {
        match reference.split_once(':') {
            None => self.lookup(reference),
            Some((ns, name)) if ns.eq_ignore_ascii_case(&self.namespace) => self.lookup(name),
            Some((ns, name)) if ns.eq_ignore_ascii_case(RESERVED_NAMESPACE) => {
                BuiltinErrorType::from_name(name).and_then(|kind| self.builtin(kind))
            }
            Some(_) => None,
        }
    }

    /// Returns the model of a built-in kind, if it is part of this taxonomy.
    #[must_use]
    pub fn builtin(&self, kind: BuiltinErrorType) -> Option<&ErrorModel> {
        self.models.get(&ErrorTypeRef::Builtin(kind))
    }

    /// Returns the extension's `CONNECTIVITY` model.
    #[must_use]
    pub fn connectivity(&self) -> Option<&ErrorModel> {
        self.lookup(BuiltinErrorType::Connectivity.name())
    }

    /// Returns the extension's `RETRY_EXHAUSTED` model.
    #[must_use]
    pub fn retry_exhausted(&self) -> Option<&ErrorModel> {
        self.lookup(BuiltinErrorType::RetryExhausted.name())
    }

    /// Returns the models of the supplied definitions and their ancestors, sorted.
    #[must_use]
    pub fn declared_models(&self) -> Vec<&ErrorModel> {
        let mut models: Vec<_> = self
            .declared
            .iter()
            .filter_map(|vertex| self.models.get(vertex))
            .collect();
        models.sort();
        models
    }

    /// Returns every resolved model, synthetic ones included, sorted.
    #[must_use]
    pub fn models(&self) -> Vec<&ErrorModel> {
        let mut models: Vec<_> = self.models.values().collect();
        models.sort();
        models
    }

    /// Returns the number of resolved models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always false: the universal root is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
