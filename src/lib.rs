//! Extmodel - Phase-ordered enrichment of extension models
//!
//! This crate re-exports all layers of the Extmodel system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: extmodel_enrich       Pipeline, context, standard enrichers
//! Layer 2: extmodel_declaration  Declaration tree, properties, walker
//! Layer 1: extmodel_taxonomy     Error type resolution
//! Layer 0: extmodel_foundation   Core types (Value, Error)
//! ```

pub use extmodel_declaration as declaration;
pub use extmodel_enrich as enrich;
pub use extmodel_foundation as foundation;
pub use extmodel_taxonomy as taxonomy;
