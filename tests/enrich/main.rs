//! Integration tests for Layer 3: Enrich
//!
//! Tests for the pipeline, the standard enrichers run together, and
//! re-running enrichment on an enriched tree.

mod connector;
mod pipeline;
