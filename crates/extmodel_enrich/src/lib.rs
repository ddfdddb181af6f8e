//! Phase-ordered enrichment of declaration trees.
//!
//! This crate provides:
//! - [`EnrichmentPipeline`] - Runs [`DeclarationEnricher`]s phase by phase
//! - [`EnrichmentContext`] - The tree, its [`Introspector`], a [`TypeLoader`] and run-scoped caches
//! - [`EnrichmentConfig`] - Infrastructure parameter names and validation policies
//! - [`enricher`] - The standard enrichers
//!
//! ```
//! use extmodel_declaration::{DeclarationTree, ExtensionDeclaration};
//! use extmodel_enrich::{EnrichmentContext, EnrichmentPipeline, StaticIntrospector};
//!
//! let mut tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
//! let introspector = StaticIntrospector::new();
//! let mut ctx = EnrichmentContext::new(&mut tree, &introspector);
//! EnrichmentPipeline::with_default_enrichers().run(&mut ctx).unwrap();
//! assert!(!tree.extension().error_models.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod context;
pub mod enricher;
pub mod introspection;
pub mod phase;
pub mod pipeline;
pub mod properties;
pub mod type_loader;

pub use config::{CategoryMismatchPolicy, EnrichmentConfig};
pub use context::{EnrichmentContext, StereotypeCache};
pub use introspection::{
    BackingMember, Introspector, MemberKind, StaticIntrospector, StaticMember, markers,
};
pub use phase::Phase;
pub use pipeline::{DeclarationEnricher, EnrichmentPipeline, PipelineState};
pub use properties::{
    ActingParameter, AllowedStereotypesProperty, BackPressureMode, BackPressureStrategyProperty,
    ClusterSupport, ClusterSupportProperty, ConnectivityProperty, CustomTypeProperty,
    DefaultEncodingProperty, ErrorTaxonomyProperty, InfrastructureParameterProperty,
    MetadataResolverProperty, NotificationEmitterProperty, RequiredForMetadataProperty,
    TypeStereotypesProperty, ValueProviderProperty,
};
pub use type_loader::{NoTypeLoader, StaticTypeLoader, TypeFormat, TypeLoader};
