//! Author-declared error types.

use std::fmt;

use extmodel_foundation::{Error, RESERVED_NAMESPACE, Result, Value};

use crate::builtin::BuiltinErrorType;

/// Reference to an error type, either declared by the extension or built in.
///
/// This is the vertex identity of the taxonomy graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorTypeRef {
    /// A kind of the reserved namespace.
    Builtin(BuiltinErrorType),
    /// A type declared by the extension, by type name.
    Declared(String),
}

impl ErrorTypeRef {
    /// Creates a reference to a declared type.
    #[must_use]
    pub fn declared(name: impl Into<String>) -> Self {
        Self::Declared(name.into())
    }

    /// Parses a reference written as `TYPE` or `NAMESPACE:TYPE`.
    ///
    /// An explicit reserved namespace must name a built-in kind. Any other
    /// qualifier, or none, yields a declared reference.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(':') {
            Some((ns, name)) if ns.eq_ignore_ascii_case(RESERVED_NAMESPACE) => {
                BuiltinErrorType::from_name(name)
                    .map(Self::Builtin)
                    .ok_or_else(|| Error::unknown_error_type(text))
            }
            Some((_, name)) => Ok(Self::declared(name)),
            None => Ok(Self::declared(text)),
        }
    }

    /// Returns the type name of the referenced error type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.name(),
            Self::Declared(name) => name,
        }
    }
}

impl From<BuiltinErrorType> for ErrorTypeRef {
    fn from(kind: BuiltinErrorType) -> Self {
        Self::Builtin(kind)
    }
}

impl fmt::Display for ErrorTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => write!(f, "{RESERVED_NAMESPACE}:{kind}"),
            Self::Declared(name) => write!(f, "{name}"),
        }
    }
}

/// An error type declared by the extension author.
///
/// A definition without a parent is a child of the universal root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorTypeDefinition {
    /// The type name, unique within the extension namespace.
    pub error_type: String,
    /// The declared parent.
    pub parent: Option<ErrorTypeRef>,
}

impl ErrorTypeDefinition {
    /// Creates a definition parented under the universal root.
    #[must_use]
    pub fn new(error_type: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            parent: None,
        }
    }

    /// Sets the parent of this definition.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ErrorTypeRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets a declared type as the parent of this definition.
    #[must_use]
    pub fn with_declared_parent(self, parent: impl Into<String>) -> Self {
        self.with_parent(ErrorTypeRef::Declared(parent.into()))
    }

    /// Returns the effective parent reference.
    #[must_use]
    pub fn effective_parent(&self) -> ErrorTypeRef {
        self.parent
            .clone()
            .unwrap_or(ErrorTypeRef::Builtin(BuiltinErrorType::Any))
    }

    /// Returns the graph vertex this definition stands for.
    #[must_use]
    pub fn vertex(&self) -> ErrorTypeRef {
        ErrorTypeRef::Declared(self.error_type.clone())
    }

    /// Reads a definition from a marker payload.
    ///
    /// Accepts either a bare string (`"TIMEOUT"`) or a map with a `type` field
    /// and an optional `parent` field (`"CONNECTIVITY"`, `"MULE:SECURITY"`).
    pub fn from_value(marker: &str, value: &Value) -> Result<Self> {
        if let Some(name) = value.as_str() {
            return Ok(Self::new(name));
        }
        let name = value.get_str("type").ok_or_else(|| {
            Error::invalid_marker_payload(
                marker,
                format!("expected a type name or a map with 'type', got {}", value.type_name()),
            )
        })?;
        let definition = Self::new(name);
        match value.get("parent") {
            None | Some(Value::Nil) => Ok(definition),
            Some(parent) => {
                let parent = parent.as_str().ok_or_else(|| {
                    Error::invalid_marker_payload(marker, format!("parent of '{name}' must be a string"))
                })?;
                Ok(definition.with_parent(ErrorTypeRef::parse(parent)?))
            }
        }
    }
}
