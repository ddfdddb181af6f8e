//! Integration tests for the enrichment pipeline

use std::sync::{Arc, Mutex};

use extmodel_declaration::{DeclarationTree, ExtensionDeclaration};
use extmodel_enrich::{
    DeclarationEnricher, EnrichmentContext, EnrichmentPipeline, Phase, PipelineState,
    StaticIntrospector,
};
use extmodel_foundation::{Error, ErrorKind, Result};
use proptest::prelude::*;

type Log = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: String,
    phase: Phase,
    fails: bool,
    log: Log,
}

impl Recorder {
    fn new(name: impl Into<String>, phase: Phase, log: &Log) -> Self {
        Self {
            name: name.into(),
            phase,
            fails: false,
            log: Arc::clone(log),
        }
    }

    fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

impl DeclarationEnricher for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn enrich(&self, _: &mut EnrichmentContext<'_>) -> Result<()> {
        self.log.lock().unwrap().push(self.name.clone());
        if self.fails {
            return Err(Error::illegal_model(format!("{} rejected the model", self.name)));
        }
        Ok(())
    }
}

fn run(pipeline: &mut EnrichmentPipeline) -> Result<()> {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("http"));
    let introspector = StaticIntrospector::new();
    let mut ctx = EnrichmentContext::new(&mut tree, &introspector);
    pipeline.run(&mut ctx)
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn phases_run_in_order_regardless_of_registration() {
    let log = Log::default();
    let mut pipeline = EnrichmentPipeline::new()
        .with(Recorder::new("E1", Phase::PostStructure, &log))
        .with(Recorder::new("E2", Phase::Initialize, &log))
        .with(Recorder::new("E3", Phase::Structure, &log));

    run(&mut pipeline).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["E2", "E3", "E1"]);
}

#[test]
fn registration_order_kept_within_phase() {
    let log = Log::default();
    let mut pipeline = EnrichmentPipeline::new();
    pipeline
        .register(Recorder::new("b", Phase::Wiring, &log))
        .register(Recorder::new("a", Phase::Wiring, &log))
        .register(Recorder::new("c", Phase::Wiring, &log));

    run(&mut pipeline).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["b", "a", "c"]);
}

#[test]
fn empty_pipeline_completes() {
    let mut pipeline = EnrichmentPipeline::new();
    assert!(pipeline.is_empty());
    run(&mut pipeline).unwrap();
    assert_eq!(pipeline.state(), PipelineState::Completed);
}

// =============================================================================
// Failure
// =============================================================================

#[test]
fn failing_enricher_aborts_later_phases() {
    let log = Log::default();
    let mut pipeline = EnrichmentPipeline::new()
        .with(Recorder::new("validate", Phase::PostStructure, &log).failing())
        .with(Recorder::new("structure", Phase::Structure, &log))
        .with(Recorder::new("wire", Phase::Wiring, &log));

    let err = run(&mut pipeline).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalModel(_)));
    assert!(err.is_structural_violation());
    assert_eq!(*log.lock().unwrap(), vec!["structure", "validate"]);
    assert_eq!(pipeline.state(), PipelineState::Failed(Phase::PostStructure));

    let frames = err.context.map(|c| c.stack).unwrap_or_default();
    assert_eq!(frames, vec!["in enricher 'validate' during phase POST_STRUCTURE"]);
}

// =============================================================================
// Properties
// =============================================================================

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop::sample::select(Phase::ALL.to_vec())
}

proptest! {
    /// The run order is the registration order stably partitioned by phase.
    #[test]
    fn plan_is_stable_partition(phases in prop::collection::vec(phase_strategy(), 0..16)) {
        let log = Log::default();
        let mut pipeline = EnrichmentPipeline::new();
        for (i, phase) in phases.iter().enumerate() {
            pipeline.register(Recorder::new(format!("e{i}"), *phase, &log));
        }

        let mut expected: Vec<(Phase, usize)> = phases.iter().copied().zip(0..).collect();
        expected.sort_by_key(|(phase, _)| *phase);
        let expected: Vec<String> = expected.into_iter().map(|(_, i)| format!("e{i}")).collect();

        prop_assert_eq!(pipeline.execution_plan(), expected.clone());
        run(&mut pipeline).unwrap();
        prop_assert_eq!(log.lock().unwrap().clone(), expected);
    }
}
