//! Benchmarks for declaration tree traversal.
//!
//! Run with: `cargo bench --package extmodel_declaration`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use extmodel_declaration::{
    BaseDeclaration, ConfigurationDeclaration, DeclarationTree, DeclarationVisitor,
    DeclarationWalker, ExtensionDeclaration, NodeId, OperationDeclaration, Owner,
    ParameterDeclaration, ParameterGroupDeclaration, SemanticType, Walk,
};
use extmodel_foundation::Result;

/// Counts parameter callbacks.
struct ParameterCounter(usize);

impl DeclarationVisitor for ParameterCounter {
    fn on_parameter(
        &mut self,
        _: &mut DeclarationTree,
        _: Owner,
        _: NodeId,
        _: NodeId,
    ) -> Result<Walk> {
        self.0 += 1;
        Ok(Walk::Continue)
    }
}

/// `operations` operations with `params` parameters each, every operation
/// also sharing one common group.
fn build_tree(operations: usize, params: usize) -> DeclarationTree {
    let mut tree = DeclarationTree::new(ExtensionDeclaration::new("bench"));
    let config = tree
        .add_configuration(ConfigurationDeclaration::default())
        .unwrap();
    let shared = tree
        .add_parameter_group(config, ParameterGroupDeclaration::new("shared"))
        .unwrap();
    tree.add_parameter(shared, ParameterDeclaration::new("timeout", SemanticType::Number))
        .unwrap();

    for i in 0..operations {
        let op = tree
            .add_operation(
                Owner::Component(config),
                OperationDeclaration {
                    base: BaseDeclaration::new(format!("op{i}")),
                    ..OperationDeclaration::default()
                },
            )
            .unwrap();
        let group = tree.default_group(op).unwrap();
        for p in 0..params {
            tree.add_parameter(group, ParameterDeclaration::new(format!("p{p}"), SemanticType::String))
                .unwrap();
        }
        tree.share_group(op, shared).unwrap();
    }
    tree
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walker/walk");
    for operations in [10, 100, 1000] {
        let mut tree = build_tree(operations, 8);
        group.throughput(Throughput::Elements(tree.len() as u64));

        group.bench_with_input(BenchmarkId::new("plain", operations), &operations, |b, _| {
            let mut walker = DeclarationWalker::new();
            b.iter(|| {
                let mut counter = ParameterCounter(0);
                walker.walk(&mut tree, &mut counter).unwrap();
                black_box(counter.0)
            });
        });
    }
    for operations in [10, 100, 1000] {
        let mut tree = build_tree(operations, 8);
        group.throughput(Throughput::Elements(tree.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("idempotent", operations),
            &operations,
            |b, _| {
                let mut walker = DeclarationWalker::idempotent();
                b.iter(|| {
                    let mut counter = ParameterCounter(0);
                    walker.walk(&mut tree, &mut counter).unwrap();
                    black_box(counter.0)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
