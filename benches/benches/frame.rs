// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::{Duration, Instant};

use canopy_arena::ResourceArena;
use canopy_engine::{DrawContext, ImageRegistry, draw_tree};
use canopy_imaging::FontDesc;
use canopy_imaging_ref::RefBackend;
use canopy_scene::shapes::{RectStyle, TextStyle};
use canopy_scene::{Rect, SceneNode, TextAlign, TextBaseline, shapes, translate};
use peniko::Color;

fn list(rows: u32) -> SceneNode {
    let label = TextStyle {
        font: FontDesc::new("sans-serif", 12.0),
        color: Color::BLACK,
        align: TextAlign::Left,
        baseline: TextBaseline::Middle,
    };
    let background = RectStyle {
        fill: Some(Color::WHITE),
        ..RectStyle::default()
    };
    (0..rows)
        .map(|i| {
            let row = SceneNode::Many(vec![
                shapes::rect(Rect::xywh(0.0, 0.0, 200.0, 22.0), background).into(),
                shapes::text(format!("row {i}"), 4.0, 11.0, label.clone()).into(),
            ]);
            translate(0.0, f64::from(i) * 24.0, row)
        })
        .collect::<SceneNode>()
        .normalize()
}

fn bench_draw_and_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/draw_and_release");
    for rows in [16_u32, 256] {
        let tree = list(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &tree, |b, tree| {
            let mut backend = RefBackend::new();
            let mut arena = ResourceArena::new();
            let mut images = ImageRegistry::new();
            b.iter(|| {
                arena.release_all(&mut backend);
                backend.clear_events();
                let mut cx =
                    DrawContext::new(arena.frame(&mut backend), &mut images, None, Instant::now());
                black_box(draw_tree(tree, &mut cx));
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(3));
    targets = bench_draw_and_release
}
criterion_main!(benches);
