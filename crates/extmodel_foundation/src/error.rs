//! Error types for the extension model.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every kind except [`ErrorKind::Internal`] is a structural violation: the
//! model being built is wrong and the partially enriched tree must be
//! discarded.

use std::fmt;

use thiserror::Error;

/// The main error type for extension model operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating the context if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a generic illegal model error.
    #[must_use]
    pub fn illegal_model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalModel(message.into()))
    }

    /// Creates a duplicate error type error.
    #[must_use]
    pub fn duplicate_error_type(namespace: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateErrorType {
            namespace: namespace.into(),
            error_type: error_type.into(),
        })
    }

    /// Creates a cyclic error type hierarchy error.
    #[must_use]
    pub fn cyclic_error_types(cycle: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicErrorTypes(cycle))
    }

    /// Creates an error for a parent reference that names no known type.
    #[must_use]
    pub fn unknown_error_type(error_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownErrorType(error_type.into()))
    }

    /// Creates an error for a component raising a type the extension never declared.
    #[must_use]
    pub fn undeclared_error_type(component: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndeclaredErrorType {
            component: component.into(),
            error_type: error_type.into(),
        })
    }

    /// Creates an error for a marker found on more members than allowed.
    #[must_use]
    pub fn marker_conflict(component: impl Into<String>, marker: impl Into<String>, count: usize) -> Self {
        Self::new(ErrorKind::MarkerConflict {
            component: component.into(),
            marker: marker.into(),
            count,
        })
    }

    /// Creates an error for a marker whose payload has the wrong shape.
    #[must_use]
    pub fn invalid_marker_payload(marker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMarkerPayload {
            marker: marker.into(),
            message: message.into(),
        })
    }

    /// Creates a resource load error.
    #[must_use]
    pub fn resource_load(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceLoad {
            locator: locator.into(),
            message: message.into(),
        })
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn node_not_found(index: u32) -> Self {
        Self::new(ErrorKind::NodeNotFound(index))
    }

    /// Creates a wrong node kind error.
    #[must_use]
    pub fn wrong_node_kind(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongNodeKind {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error means the model itself is invalid.
    #[must_use]
    pub fn is_structural_violation(&self) -> bool {
        !matches!(self.kind, ErrorKind::Internal(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The model violates a structural rule.
    #[error("illegal model definition: {0}")]
    IllegalModel(String),

    /// Two distinct error type definitions resolve to the same identifier.
    #[error("duplicate error type: {namespace}:{error_type}")]
    DuplicateErrorType {
        /// Namespace of the clashing identifier.
        namespace: String,
        /// Type name of the clashing identifier.
        error_type: String,
    },

    /// The error type hierarchy contains a cycle.
    #[error("cyclic error type hierarchy: {}", .0.join(" -> "))]
    CyclicErrorTypes(Vec<String>),

    /// A parent reference names a type that is neither declared nor built in.
    #[error("unknown error type: {0}")]
    UnknownErrorType(String),

    /// A component raises an error type the extension never declared.
    #[error("component '{component}' raises undeclared error type '{error_type}'")]
    UndeclaredErrorType {
        /// Name of the offending component.
        component: String,
        /// The undeclared error type.
        error_type: String,
    },

    /// An at-most-one marker was found on several members.
    #[error("marker '{marker}' found on {count} members of '{component}', at most one allowed")]
    MarkerConflict {
        /// Name of the offending component.
        component: String,
        /// The marker identifier.
        marker: String,
        /// How many members carry it.
        count: usize,
    },

    /// A marker payload could not be interpreted.
    #[error("invalid payload for marker '{marker}': {message}")]
    InvalidMarkerPayload {
        /// The marker identifier.
        marker: String,
        /// Description of the problem.
        message: String,
    },

    /// A referenced resource could not be loaded.
    #[error("could not load resource '{locator}': {message}")]
    ResourceLoad {
        /// Locator of the resource.
        locator: String,
        /// Description of the failure.
        message: String,
    },

    /// A node handle does not resolve to a node of the tree.
    #[error("node not found: #{0}")]
    NodeNotFound(u32),

    /// A node handle resolved to a node of another kind.
    #[error("wrong node kind: expected {expected}, got {actual}")]
    WrongNodeKind {
        /// The expected node kind.
        expected: String,
        /// The actual node kind.
        actual: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Extension or component the error relates to.
    pub source: Option<String>,
    /// Enricher and phase frames, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            stack: Vec::new(),
        }
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
