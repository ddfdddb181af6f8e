//! Stereotypes classify components so that references between them can be
//! checked (a `config-ref` must point to something that is a `CONFIG`).

use std::fmt;
use std::sync::Arc;

use extmodel_foundation::RESERVED_NAMESPACE;

/// A namespaced stereotype with its parent chain.
///
/// Equality only considers `(namespace, type)`.
#[derive(Clone)]
pub struct StereotypeModel(Arc<StereotypeData>);

#[derive(Debug)]
struct StereotypeData {
    namespace: String,
    stereotype_type: String,
    parent: Option<StereotypeModel>,
}

impl StereotypeModel {
    /// Creates a stereotype.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        stereotype_type: impl Into<String>,
        parent: Option<StereotypeModel>,
    ) -> Self {
        Self(Arc::new(StereotypeData {
            namespace: namespace.into(),
            stereotype_type: stereotype_type.into(),
            parent,
        }))
    }

    /// Creates a root stereotype of the reserved namespace.
    #[must_use]
    pub fn reserved(stereotype_type: &str) -> Self {
        Self::new(RESERVED_NAMESPACE, stereotype_type, None)
    }

    /// `MULE:CONFIG`, parent of every configuration stereotype.
    #[must_use]
    pub fn config() -> Self {
        Self::reserved("CONFIG")
    }

    /// `MULE:CONNECTION`, parent of every connection stereotype.
    #[must_use]
    pub fn connection() -> Self {
        Self::reserved("CONNECTION")
    }

    /// `MULE:PROCESSOR`, the default for operations and constructs.
    #[must_use]
    pub fn processor() -> Self {
        Self::reserved("PROCESSOR")
    }

    /// `MULE:SOURCE`, the default for sources.
    #[must_use]
    pub fn source() -> Self {
        Self::reserved("SOURCE")
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    /// Returns the type name.
    #[must_use]
    pub fn stereotype_type(&self) -> &str {
        &self.0.stereotype_type
    }

    /// Returns the parent stereotype.
    #[must_use]
    pub fn parent(&self) -> Option<&StereotypeModel> {
        self.0.parent.as_ref()
    }

    /// Returns true if `self` is `other` or descends from it.
    #[must_use]
    pub fn is_assignable_to(&self, other: &StereotypeModel) -> bool {
        std::iter::successors(Some(self), |s| s.parent()).any(|s| s == other)
    }
}

impl PartialEq for StereotypeModel {
    fn eq(&self, other: &Self) -> bool {
        self.0.namespace == other.0.namespace && self.0.stereotype_type == other.0.stereotype_type
    }
}

impl Eq for StereotypeModel {}

impl std::hash::Hash for StereotypeModel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.namespace.hash(state);
        self.0.stereotype_type.hash(state);
    }
}

impl fmt::Debug for StereotypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StereotypeModel({self})")
    }
}

impl fmt::Display for StereotypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.namespace, self.0.stereotype_type)
    }
}
