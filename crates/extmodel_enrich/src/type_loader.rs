//! Loading of parameter types from XML and JSON schemas.

use std::collections::HashMap;
use std::fmt;

use extmodel_declaration::SemanticType;
use extmodel_foundation::{Error, Result};

/// Schema format of a custom type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeFormat {
    /// XML schema.
    Xml,
    /// JSON schema.
    Json,
}

impl TypeFormat {
    /// Returns the lowercase format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for TypeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves schema locators into semantic types.
pub trait TypeLoader {
    /// Loads the type `locator` points to.
    ///
    /// A locator that cannot be loaded is a resource-load error.
    fn load_type(&self, format: TypeFormat, locator: &str) -> Result<SemanticType>;
}

/// A loader that fails every request.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTypeLoader;

impl TypeLoader for NoTypeLoader {
    fn load_type(&self, format: TypeFormat, locator: &str) -> Result<SemanticType> {
        Err(Error::resource_load(
            locator,
            format!("no {format} type loader configured"),
        ))
    }
}

/// A loader serving a fixed set of types.
#[derive(Clone, Debug, Default)]
pub struct StaticTypeLoader {
    types: HashMap<(TypeFormat, String), SemanticType>,
}

impl StaticTypeLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to serve `ty` for `locator`.
    #[must_use]
    pub fn with_type(mut self, format: TypeFormat, locator: impl Into<String>, ty: SemanticType) -> Self {
        self.types.insert((format, locator.into()), ty);
        self
    }
}

impl TypeLoader for StaticTypeLoader {
    fn load_type(&self, format: TypeFormat, locator: &str) -> Result<SemanticType> {
        self.types
            .get(&(format, locator.to_string()))
            .cloned()
            .ok_or_else(|| Error::resource_load(locator, format!("unknown {format} type")))
    }
}
