//! Criterion benchmarks for full controller ticks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use timeloop_actors::TickInput;
use timeloop_bench::{arena_profile, input_stream};

fn bench_record_tick_100(c: &mut Criterion) {
    let mut world = arena_profile(100, 42).unwrap();
    // Fill every history to the window so eviction is in the loop.
    for _ in 0..300 {
        world.step(TickInput::idle());
    }

    c.bench_function("record_tick_100_enemies", |b| {
        b.iter(|| black_box(world.step(TickInput::moving(0.5))));
    });
}

fn bench_rewind_tick_100(c: &mut Criterion) {
    let mut world = arena_profile(100, 42).unwrap();

    c.bench_function("rewind_tick_100_enemies", |b| {
        b.iter(|| {
            world.step(TickInput::idle());
            black_box(world.step(TickInput::rewind()))
        });
    });
}

fn bench_mixed_1000_ticks(c: &mut Criterion) {
    let inputs = input_stream(7, 1000, 0.25);
    c.bench_function("mixed_1000_ticks_20_enemies", |b| {
        b.iter(|| {
            let mut world = arena_profile(20, 7).unwrap();
            for &input in &inputs {
                black_box(world.step(input));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_record_tick_100,
    bench_rewind_tick_100,
    bench_mixed_1000_ticks
);
criterion_main!(benches);
