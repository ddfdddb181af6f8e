//! Semantic types and the display hints of parameters.

use std::fmt;

/// The semantic type of a parameter or output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Unconstrained value.
    Any,
    /// Text.
    String,
    /// Number.
    Number,
    /// Boolean.
    Boolean,
    /// Raw bytes or a stream.
    Binary,
    /// A named structured type.
    Object(String),
    /// A list of another type.
    Array(Box<SemanticType>),
    /// A type loaded from an XML or JSON schema.
    Custom {
        /// Schema format (`xml`, `json`).
        format: String,
        /// Name of the type inside the schema.
        name: String,
    },
}

impl SemanticType {
    /// Creates an array type.
    #[must_use]
    pub fn array_of(item: SemanticType) -> Self {
        Self::Array(Box::new(item))
    }

    /// Returns true for the text type.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Binary => write!(f, "binary"),
            Self::Object(name) => write!(f, "{name}"),
            Self::Array(item) => write!(f, "array<{item}>"),
            Self::Custom { format, name } => write!(f, "{format}:{name}"),
        }
    }
}

/// Whether a parameter accepts expressions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpressionSupport {
    /// Literal or expression.
    #[default]
    Supported,
    /// Literal only.
    NotSupported,
    /// Expression only.
    Required,
}

/// What a parameter contributes to its component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    /// Tunes behaviour.
    #[default]
    Behaviour,
    /// Carries content.
    Content,
    /// Carries the main content.
    PrimaryContent,
}

/// Placement hints for a parameter or group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutModel {
    /// Position inside its group.
    pub order: Option<u32>,
    /// Tab the parameter is shown in.
    pub tab: Option<String>,
    /// Masked input.
    pub password: bool,
    /// Multi-line input.
    pub text: bool,
}

/// Human-facing hints for a parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayModel {
    /// Label shown instead of the name.
    pub display_name: Option<String>,
    /// One-line help.
    pub summary: Option<String>,
    /// Example value.
    pub example: Option<String>,
}

impl DisplayModel {
    /// Returns true if no hint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.summary.is_none() && self.example.is_none()
    }
}
