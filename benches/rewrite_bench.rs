//! 计划重写性能测试

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use relrewrite::core::types::{DataType, Expression, RowType};
use relrewrite::core::{Row, Value};
use relrewrite::query::executor::PlanEvaluator;
use relrewrite::query::planner::plan::{FilterNode, NodeId, PlanArena, ProjectNode, ScanNode};
use relrewrite::query::planner::rewrite::PlanRewriter;

fn row_type() -> RowType {
    RowType::of(&[("a", DataType::Int), ("b", DataType::Int), ("c", DataType::Int)])
}

/// 交替叠加 `depth` 层过滤和投影节点
fn stacked_plan(depth: usize) -> (PlanArena, NodeId) {
    let mut arena = PlanArena::new();
    let mut root = arena.add(ScanNode::new("t", row_type()));
    for level in 0..depth {
        if level % 2 == 0 {
            let condition = Expression::gt(
                Expression::input_ref(level % 3),
                Expression::literal(level as i64),
            );
            let node = FilterNode::new(&arena, root, condition).expect("过滤节点创建失败");
            root = arena.add(node);
        } else {
            let exprs = vec![
                Expression::add(Expression::input_ref(0), Expression::input_ref(1)),
                Expression::input_ref(1),
                Expression::input_ref(2),
            ];
            let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
            let node = ProjectNode::new(&arena, root, exprs, names).expect("投影节点创建失败");
            root = arena.add(node);
        }
    }
    (arena, root)
}

fn test_rows(count: usize) -> Vec<Row> {
    (0..count as i64)
        .map(|i| vec![Value::Int(i % 97), Value::Int(i % 13), Value::Int(i % 7)])
        .collect()
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");
    let rewriter = PlanRewriter::default();

    for depth in [2usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("stacked", depth), &depth, |b, &depth| {
            b.iter_batched(
                || stacked_plan(depth),
                |(mut arena, root)| {
                    black_box(rewriter.rewrite(&mut arena, root).expect("重写失败"));
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let evaluator = PlanEvaluator::new().with_table("t", test_rows(10_000));

    let (arena, root) = stacked_plan(8);
    group.bench_function("stacked", |b| {
        b.iter(|| black_box(evaluator.evaluate(&arena, root).expect("求值失败")))
    });

    let (mut arena, root) = stacked_plan(8);
    let (root, _) = PlanRewriter::default()
        .rewrite(&mut arena, root)
        .expect("重写失败");
    group.bench_function("merged_calc", |b| {
        b.iter(|| black_box(evaluator.evaluate(&arena, root).expect("求值失败")))
    });

    group.finish();
}

criterion_group!(benches, bench_rewrite, bench_evaluate);
criterion_main!(benches);
