//! The enrichment pipeline.
//!
//! Enrichers are grouped by [`Phase`]; phases run in order and enrichers of
//! one phase run in registration order. The first failing enricher aborts the
//! run.

use std::fmt;

use extmodel_foundation::Result;
use tracing::{debug, info};

use crate::context::EnrichmentContext;
use crate::enricher;
use crate::phase::Phase;

/// One independent transformation pass over a declaration tree.
///
/// Enrichers must tolerate running on a tree they already enriched and add
/// nothing the second time.
pub trait DeclarationEnricher: Send + Sync {
    /// Stable name, used in logs and error context.
    fn name(&self) -> &str;

    /// Phase the enricher runs in.
    fn phase(&self) -> Phase {
        Phase::Structure
    }

    /// Enriches the tree held by `ctx`.
    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()>;
}

/// Progress of a pipeline run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// No run started yet.
    #[default]
    NotStarted,
    /// Running the enrichers of a phase.
    Running(Phase),
    /// Every enricher of a phase succeeded.
    PhaseDone(Phase),
    /// Every phase succeeded.
    Completed,
    /// An enricher of the phase failed.
    Failed(Phase),
}

/// Ordered set of enrichers.
#[derive(Default)]
pub struct EnrichmentPipeline {
    enrichers: Vec<Box<dyn DeclarationEnricher>>,
    state: PipelineState,
}

impl EnrichmentPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline holding the standard enrichers.
    #[must_use]
    pub fn with_default_enrichers() -> Self {
        let mut pipeline = Self::new();
        for enricher in enricher::standard() {
            pipeline.enrichers.push(enricher);
        }
        pipeline
    }

    /// Registers an enricher after the ones already registered.
    pub fn register(&mut self, enricher: impl DeclarationEnricher + 'static) -> &mut Self {
        self.enrichers.push(Box::new(enricher));
        self
    }

    /// Builder method to register an enricher.
    #[must_use]
    pub fn with(mut self, enricher: impl DeclarationEnricher + 'static) -> Self {
        self.register(enricher);
        self
    }

    /// Returns the number of registered enrichers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enrichers.len()
    }

    /// Returns true if no enricher is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }

    /// Returns the state of the last run.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the enricher names in the order a run would invoke them.
    #[must_use]
    pub fn execution_plan(&self) -> Vec<&str> {
        Phase::ALL
            .into_iter()
            .flat_map(|phase| self.in_phase(phase))
            .map(|enricher| enricher.name())
            .collect()
    }

    /// Runs every enricher against `ctx`.
    ///
    /// Stops at the first error, which carries a frame naming the failing
    /// enricher and its phase.
    pub fn run(&mut self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        self.state = PipelineState::NotStarted;
        let extension = ctx.tree().extension().base.name.clone();
        info!(%extension, enrichers = self.enrichers.len(), "enrichment started");

        for phase in Phase::ALL {
            self.state = PipelineState::Running(phase);
            debug!(%phase, "entering phase");

            let failure = self.in_phase(phase).find_map(|enricher| {
                debug!(enricher = enricher.name(), %phase, "running enricher");
                enricher.enrich(ctx).err().map(|err| {
                    err.with_frame(format!(
                        "in enricher '{}' during phase {phase}",
                        enricher.name()
                    ))
                })
            });
            if let Some(err) = failure {
                self.state = PipelineState::Failed(phase);
                return Err(err);
            }

            self.state = PipelineState::PhaseDone(phase);
        }

        self.state = PipelineState::Completed;
        info!(%extension, "enrichment completed");
        Ok(())
    }

    fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &dyn DeclarationEnricher> + '_ {
        self.enrichers
            .iter()
            .map(|enricher| &**enricher)
            .filter(move |enricher| enricher.phase() == phase)
    }
}

impl fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("plan", &self.execution_plan())
            .field("state", &self.state)
            .finish()
    }
}
