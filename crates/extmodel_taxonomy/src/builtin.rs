//! Error kinds reserved by the runtime namespace.

use std::fmt;

/// An error kind owned by the reserved namespace.
///
/// Built-in kinds always resolve into [`RESERVED_NAMESPACE`], whichever
/// extension references them.
///
/// [`RESERVED_NAMESPACE`]: extmodel_foundation::RESERVED_NAMESPACE
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinErrorType {
    /// Universal root of every error hierarchy.
    Any,
    /// Unhandleable errors; a root of its own.
    Critical,
    /// Connection could not be established or was lost.
    Connectivity,
    /// Reconnection attempts were exhausted.
    RetryExhausted,
    /// A value could not be transformed.
    Transformation,
    /// An expression failed to evaluate.
    Expression,
    /// A message could not be routed.
    Routing,
    /// Generic security failure.
    Security,
    /// Security failure on the client side.
    ClientSecurity,
    /// Security failure on the server side.
    ServerSecurity,
    /// A validation failed.
    Validation,
    /// An operation timed out.
    Timeout,
}

impl BuiltinErrorType {
    /// Every built-in kind.
    pub const ALL: [BuiltinErrorType; 12] = [
        Self::Any,
        Self::Critical,
        Self::Connectivity,
        Self::RetryExhausted,
        Self::Transformation,
        Self::Expression,
        Self::Routing,
        Self::Security,
        Self::ClientSecurity,
        Self::ServerSecurity,
        Self::Validation,
        Self::Timeout,
    ];

    /// Returns the type name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Critical => "CRITICAL",
            Self::Connectivity => "CONNECTIVITY",
            Self::RetryExhausted => "RETRY_EXHAUSTED",
            Self::Transformation => "TRANSFORMATION",
            Self::Expression => "EXPRESSION",
            Self::Routing => "ROUTING",
            Self::Security => "SECURITY",
            Self::ClientSecurity => "CLIENT_SECURITY",
            Self::ServerSecurity => "SERVER_SECURITY",
            Self::Validation => "VALIDATION",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the parent kind, or `None` for the two roots.
    #[must_use]
    pub const fn parent(self) -> Option<BuiltinErrorType> {
        match self {
            Self::Any | Self::Critical => None,
            Self::ClientSecurity | Self::ServerSecurity => Some(Self::Security),
            _ => Some(Self::Any),
        }
    }

    /// Returns true for the kinds that never get a parent edge.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.parent().is_none()
    }

    /// Looks up a built-in kind by type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<BuiltinErrorType> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for BuiltinErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
