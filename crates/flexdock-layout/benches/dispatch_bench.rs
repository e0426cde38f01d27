//! Benchmarks for dispatch, drop resolution and JSON round trips.
//!
//! Run with: cargo bench -p flexdock-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use flexdock_layout::{Action, BorderLocation, DockLocation, Model, NodeId, Rect};
use serde_json::json;
use std::hint::black_box;

/// Build a main window with `tabsets` tabsets of four tabs each, split
/// alternately to the right and below, plus a tiled left border.
fn make_model(tabsets: usize) -> Model {
    let mut model = Model::new();
    let _ = model.dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1920.0, 1080.0)));
    let mut target: NodeId = model.tabsets_in_window("main")[0].clone();
    for set in 0..tabsets {
        for tab in 0..4 {
            let location = if tab == 0 && set > 0 {
                if set % 2 == 0 {
                    DockLocation::Right
                } else {
                    DockLocation::Bottom
                }
            } else {
                DockLocation::Center
            };
            let id = format!("t{set}_{tab}");
            let _ = model.dispatch(Action::add_node(
                json!({ "id": id, "name": id }),
                target.clone(),
                location,
                None,
                None,
            ));
            if let Some(parent) = model.node(&id).and_then(|node| node.parent()) {
                target = parent.clone();
            }
        }
    }
    let left = model.border_set().get(BorderLocation::Left).clone();
    for tab in ["files", "search", "outline"] {
        let _ = model.dispatch(Action::add_node(
            json!({ "id": tab, "name": tab }),
            left.clone(),
            DockLocation::Center,
            None,
            Some(true),
        ));
    }
    let _ = model.dispatch(Action::set_visible_tabs(left, vec![0, 1]));
    model
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/dispatch");

    for n in [1, 4, 16, 64] {
        let model = make_model(n);
        group.bench_with_input(BenchmarkId::new("select_tab", n), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |mut model| black_box(model.dispatch(Action::select_tab("t0_1"))),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("move_node_edge", n), &model, |b, model| {
            let target = model
                .node("t0_0")
                .and_then(|node| node.parent())
                .cloned()
                .unwrap_or_else(|| NodeId::new("missing"));
            b.iter_batched(
                || model.clone(),
                |mut model| {
                    black_box(model.dispatch(Action::move_node(
                        "t0_3",
                        target.clone(),
                        DockLocation::Left,
                        None,
                        None,
                    )))
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("ignored", n), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |mut model| black_box(model.dispatch(Action::delete_tab("ghost"))),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_drop_targets(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/drop_target");

    for n in [1, 4, 16, 64] {
        let model = make_model(n);
        let points: Vec<(f64, f64)> = (0..32_u32)
            .map(|i| (f64::from(i) * 59.0 % 1920.0, f64::from(i) * 31.0 % 1080.0))
            .collect();
        group.bench_with_input(BenchmarkId::new("sweep", n), &model, |b, model| {
            b.iter(|| {
                for (x, y) in &points {
                    black_box(model.find_drop_target("t0_1", "main", *x, *y));
                }
            })
        });
    }

    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/json");

    for n in [1, 16, 64] {
        let model = make_model(n);
        let saved = model.to_json();
        group.bench_with_input(BenchmarkId::new("to_json", n), &model, |b, model| {
            b.iter(|| black_box(model.to_json()))
        });
        group.bench_with_input(BenchmarkId::new("from_json", n), &saved, |b, saved| {
            b.iter(|| black_box(Model::from_json(saved)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_drop_targets, bench_json);

criterion_main!(benches);
