//! # Path Planner Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point2;

use sketch_lib::path_planner::{plan, replay, MapParams, Scale};

fn plan_benchmark(c: &mut Criterion) {
    // ---- Build a long zig-zag route ----

    let scale = Scale::from_map(&MapParams {
        width_px: 700.0,
        height_px: 800.0,
        width_m: 4.27,
        height_m: 4.88,
    })
    .unwrap();

    let points: Vec<Point2<f64>> = (0..10_000)
        .map(|i| {
            let x = (i % 700) as f64;
            let y = if i % 2 == 0 { 100.0 } else { 700.0 };
            Point2::new(x, y)
        })
        .collect();

    c.bench_function("plan", |b| b.iter(|| plan(black_box(&points), &scale).unwrap()));

    let moves = plan(&points, &scale).unwrap();

    c.bench_function("replay", |b| {
        b.iter(|| replay(black_box(&moves), Point2::origin()))
    });
}

criterion_group!(benches, plan_benchmark);
criterion_main!(benches);
