//! Resolved error models.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A resolved, namespace-qualified error type with its parent chain.
///
/// Models are immutable and cheaply cloneable; clones share the same
/// allocation. Equality, ordering and hashing only consider
/// `(namespace, type)`. Use [`ErrorModel::ptr_eq`] to test instance identity.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorModel(Arc<ErrorModelData>);

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct ErrorModelData {
    namespace: String,
    error_type: String,
    parent: Option<ErrorModel>,
}

impl ErrorModel {
    /// Creates a new error model.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        error_type: impl Into<String>,
        parent: Option<ErrorModel>,
    ) -> Self {
        Self(Arc::new(ErrorModelData {
            namespace: namespace.into(),
            error_type: error_type.into(),
            parent,
        }))
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    /// Returns the type name.
    #[must_use]
    pub fn error_type(&self) -> &str {
        &self.0.error_type
    }

    /// Returns the parent model, `None` only for roots.
    #[must_use]
    pub fn parent(&self) -> Option<&ErrorModel> {
        self.0.parent.as_ref()
    }

    /// Returns the `NAMESPACE:TYPE` identifier.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.0.namespace, self.0.error_type)
    }

    /// Returns true if both handles point to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &ErrorModel) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true if `self` is `ancestor` or descends from it.
    #[must_use]
    pub fn is_a(&self, ancestor: &ErrorModel) -> bool {
        self.lineage().any(|model| model == ancestor)
    }

    /// Iterates this model and then its ancestors up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &ErrorModel> {
        std::iter::successors(Some(self), |model| model.parent())
    }

    /// Returns the number of ancestors.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lineage().count() - 1
    }
}

impl PartialEq for ErrorModel {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.0.namespace == other.0.namespace && self.0.error_type == other.0.error_type)
    }
}

impl Eq for ErrorModel {}

impl Hash for ErrorModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.namespace.hash(state);
        self.0.error_type.hash(state);
    }
}

impl PartialOrd for ErrorModel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorModel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .namespace
            .cmp(&other.0.namespace)
            .then_with(|| self.0.error_type.cmp(&other.0.error_type))
    }
}

impl fmt::Debug for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorModel({})", self.identifier())?;
        if let Some(parent) = self.parent() {
            write!(f, " < {}", parent.identifier())?;
        }
        Ok(())
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.namespace, self.0.error_type)
    }
}
