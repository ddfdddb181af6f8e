//! Errors and marker payload values for the extension model.
//!
//! This crate provides:
//! - [`Error`] - Rich error type with context, shared by every layer
//! - [`Value`] - Payload of a declarative marker read through introspection

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use value::Value;

/// Result type alias using the extension model [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace reserved for built-in error types and stereotypes.
pub const RESERVED_NAMESPACE: &str = "MULE";
