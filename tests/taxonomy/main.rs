//! Integration tests for Layer 1: Taxonomy
//!
//! Tests for error type resolution, lookup, and hierarchy properties.

mod properties;
mod resolution;
