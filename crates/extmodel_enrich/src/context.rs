//! State shared by the enrichers of one pipeline run.

use std::collections::HashMap;

use extmodel_declaration::{DeclarationTree, StereotypeModel};
use extmodel_foundation::Result;

use crate::config::EnrichmentConfig;
use crate::introspection::Introspector;
use crate::type_loader::{NoTypeLoader, TypeLoader};

/// Custom stereotypes built during one run, keyed by `(namespace, name)`.
///
/// Every component naming the same stereotype gets the same instance.
#[derive(Debug, Default)]
pub struct StereotypeCache {
    models: HashMap<(String, String), StereotypeModel>,
}

impl StereotypeCache {
    /// Returns the cached stereotype.
    #[must_use]
    pub fn get(&self, namespace: &str, name: &str) -> Option<&StereotypeModel> {
        self.models.get(&(namespace.to_string(), name.to_string()))
    }

    /// Returns the cached stereotype, building and caching it if absent.
    pub fn get_or_try_insert(
        &mut self,
        namespace: &str,
        name: &str,
        build: impl FnOnce(&mut Self) -> Result<StereotypeModel>,
    ) -> Result<StereotypeModel> {
        if let Some(model) = self.get(namespace, name) {
            return Ok(model.clone());
        }
        let model = build(self)?;
        self.models
            .insert((namespace.to_string(), name.to_string()), model.clone());
        Ok(model)
    }

    /// Returns the number of cached stereotypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// The tree being enriched and the collaborators the enrichers consult.
///
/// A context lives for one pipeline run. Caches never outlive it.
pub struct EnrichmentContext<'a> {
    pub(crate) tree: &'a mut DeclarationTree,
    pub(crate) introspector: &'a dyn Introspector,
    pub(crate) type_loader: &'a dyn TypeLoader,
    pub(crate) config: EnrichmentConfig,
    pub(crate) stereotypes: StereotypeCache,
}

impl<'a> EnrichmentContext<'a> {
    /// Creates a context with the default configuration and no type loader.
    pub fn new(tree: &'a mut DeclarationTree, introspector: &'a dyn Introspector) -> Self {
        Self {
            tree,
            introspector,
            type_loader: &NoTypeLoader,
            config: EnrichmentConfig::default(),
            stereotypes: StereotypeCache::default(),
        }
    }

    /// Builder method to set the type loader.
    #[must_use]
    pub fn with_type_loader(mut self, type_loader: &'a dyn TypeLoader) -> Self {
        self.type_loader = type_loader;
        self
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the tree.
    #[must_use]
    pub fn tree(&self) -> &DeclarationTree {
        &*self.tree
    }

    /// Returns the tree mutably.
    pub fn tree_mut(&mut self) -> &mut DeclarationTree {
        &mut *self.tree
    }

    /// Returns the introspector.
    #[must_use]
    pub fn introspector(&self) -> &'a dyn Introspector {
        self.introspector
    }

    /// Returns the type loader.
    #[must_use]
    pub fn type_loader(&self) -> &'a dyn TypeLoader {
        self.type_loader
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Returns the stereotypes built so far in this run.
    #[must_use]
    pub fn stereotypes(&self) -> &StereotypeCache {
        &self.stereotypes
    }
}
