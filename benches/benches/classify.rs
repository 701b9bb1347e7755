// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::time::Duration;

use canopy_imaging::ClipOp;
use canopy_precise_hit::{HitParams, classify};
use canopy_responder::{PointerInput, dispatcher};
use canopy_scene::shapes::{BorderPosition, RectStroke, RectStyle};
use canopy_scene::{Rect, SceneNode, Vector, clip, shapes, translate};
use kurbo::Shape;
use peniko::Color;

/// A `side x side` grid of stroked buttons, each under its own translate.
fn grid(side: u32, clipped_every: u32) -> SceneNode {
    let style = RectStyle {
        stroke: Some(RectStroke {
            color: Color::BLACK,
            width: 2.0,
            border_position: BorderPosition::Outside,
        }),
        fill: Some(Color::WHITE),
        round: Some(4.0),
    };
    (0..side * side)
        .map(|i| {
            let (col, row) = (f64::from(i % side), f64::from(i / side));
            let leaf = shapes::rect(Rect::xywh(0.0, 0.0, 40.0, 20.0), style)
                .on_click(|_| {});
            let node = translate(col * 50.0, row * 30.0, leaf);
            if clipped_every != 0 && i % clipped_every == 0 {
                let window = kurbo::Rect::new(0.0, 0.0, 25.0, 25.0).to_path(0.1);
                clip(window, ClipOp::Intersect, node)
            } else {
                node
            }
        })
        .collect::<SceneNode>()
        .normalize()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify/grid");
    let params = HitParams::default();
    for side in [8_u32, 32, 64] {
        let tree = grid(side, 0);
        let point = Vector::new(f64::from(side) * 25.0, f64::from(side) * 15.0);
        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::new("unclipped", side), &tree, |b, tree| {
            b.iter(|| black_box(classify(tree, black_box(point), &params).inner.len()));
        });

        let clipped = grid(side, 7);
        group.bench_with_input(BenchmarkId::new("clipped_1_in_7", side), &clipped, |b, tree| {
            b.iter(|| black_box(classify(tree, black_box(point), &params).outer.len()));
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/click");
    let params = HitParams::default();
    for side in [8_u32, 32] {
        let tree = grid(side, 0);
        let input = PointerInput::at(Vector::new(20.0, 10.0));
        group.bench_with_input(BenchmarkId::from_parameter(side), &tree, |b, tree| {
            b.iter(|| black_box(dispatcher::dispatch_click(tree, &input, &params)));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(3));
    targets = bench_classify, bench_dispatch
}
criterion_main!(benches);
