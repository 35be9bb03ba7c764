use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use order_sight::core::generate_orders;
use order_sight::grid::flatten_visible_rows;
use order_sight::{
    ChangeTracker, ColumnKey, ColumnLayout, GridConfig, GridRowModel, OrderNode, SortDirection,
    SortSpec, SyntheticConfig, TreeGridConfig,
};

const TOTAL_ORDERS: usize = 20_000;

fn hierarchical_snapshot() -> Vec<OrderNode> {
    generate_orders(&SyntheticConfig {
        total_orders: TOTAL_ORDERS,
        root_orders: 4_000,
        stream_updates: false,
        ..Default::default()
    })
}

fn index_by_id(snapshot: &[OrderNode]) -> HashMap<String, usize> {
    snapshot
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.clone(), i))
        .collect()
}

fn all_parents_expanded(snapshot: &[OrderNode]) -> HashSet<String> {
    snapshot
        .iter()
        .filter(|o| !o.child_ids.is_empty())
        .map(|o| o.id.clone())
        .collect()
}

fn benchmark_flatten(c: &mut Criterion) {
    let orders = hierarchical_snapshot();
    let index = index_by_id(&orders);
    let expanded = all_parents_expanded(&orders);
    let collapsed = HashSet::new();
    let tree = TreeGridConfig {
        tree_column: ColumnKey::Id,
    };
    let sort = SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Descending,
    };

    let mut group = c.benchmark_group("flatten_visible_rows");
    group.throughput(Throughput::Elements(orders.len() as u64));

    group.bench_function("collapsed_unsorted", |b| {
        b.iter(|| flatten_visible_rows(black_box(&orders), &index, Some(&tree), None, &collapsed));
    });

    group.bench_function("expanded_unsorted", |b| {
        b.iter(|| flatten_visible_rows(black_box(&orders), &index, Some(&tree), None, &expanded));
    });

    group.bench_function("expanded_sorted", |b| {
        b.iter(|| {
            flatten_visible_rows(black_box(&orders), &index, Some(&tree), Some(sort), &expanded)
        });
    });

    group.finish();
}

fn benchmark_diff(c: &mut Criterion) {
    let orders = hierarchical_snapshot();
    let columns = ColumnLayout::default_order_layout().keys();

    // 约5%的节点数量字段发生变化
    let mut updated = orders.clone();
    for node in updated.iter_mut().step_by(20) {
        node.order_quantity += 1;
    }

    let mut group = c.benchmark_group("change_tracker_diff");
    group.throughput(Throughput::Elements(orders.len() as u64));

    group.bench_function("five_percent_changed", |b| {
        b.iter_batched(
            || {
                let mut tracker = ChangeTracker::new(Duration::from_millis(2000));
                tracker.diff(&orders, &columns, Instant::now());
                tracker
            },
            |mut tracker| tracker.diff(black_box(&updated), &columns, Instant::now()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn benchmark_full_refresh(c: &mut Criterion) {
    let orders = hierarchical_snapshot();

    // 刷新周期的完整路径：diff + 可见行重建
    let mut updated = orders.clone();
    for node in updated.iter_mut().step_by(20) {
        node.order_quantity += 1;
    }

    let mut group = c.benchmark_group("refresh_pipeline");
    group.throughput(Throughput::Elements(orders.len() as u64));

    group.bench_function("diff_then_flatten", |b| {
        b.iter_batched(
            || {
                let mut model = GridRowModel::new(
                    GridConfig::default(),
                    ColumnLayout::default_order_layout(),
                )
                .with_default_sort(ColumnKey::Created, SortDirection::Descending);
                model.apply_snapshot(orders.clone(), Instant::now());
                (model, updated.clone())
            },
            |(mut model, snapshot)| model.apply_snapshot(black_box(snapshot), Instant::now()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_flatten,
    benchmark_diff,
    benchmark_full_refresh
);
criterion_main!(benches);
