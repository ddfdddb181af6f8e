//! Integration tests for Layer 2: Declaration
//!
//! Tests for the declaration tree, model properties, and the walker.

mod properties;
mod tree;
mod walker;
