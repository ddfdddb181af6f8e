//! Error type definitions and the error taxonomy resolver.
//!
//! This crate provides:
//! - [`ErrorTypeDefinition`] - Author-declared error types before resolution
//! - [`BuiltinErrorType`] - Error kinds reserved by the runtime namespace
//! - [`ErrorModel`] - Resolved, namespace-qualified, parent-linked error nodes
//! - [`ErrorTaxonomy`] - Validates the definitions and materializes the models

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod definition;
pub mod model;
pub mod resolver;

pub use builtin::BuiltinErrorType;
pub use definition::{ErrorTypeDefinition, ErrorTypeRef};
pub use model::ErrorModel;
pub use resolver::ErrorTaxonomy;
