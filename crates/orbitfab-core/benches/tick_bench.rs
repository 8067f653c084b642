//! Criterion benchmarks for the tick integrator.
//!
//! Benchmark groups:
//! - `tick`: one tick of a well-stocked integrating factory, and a year of
//!   daily ticks from the default state.
//! - `replay`: encoding and verifying a recorded session.

use criterion::{Criterion, criterion_group, criterion_main};
use orbitfab_core::bottleneck::summarize_bottlenecks;
use orbitfab_core::replay::{ReplayCommand, ReplayLog, apply_replay_command, replay_and_verify};
use orbitfab_core::state::create_default_state;
use orbitfab_core::test_utils::*;
use orbitfab_core::tick::{ThroughputTarget, tick};
use std::hint::black_box;

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(100);

    let state = integrating_factory(4);
    let target = ThroughputTarget::new(10.0);

    group.bench_function("single_tick_integrating", |b| {
        b.iter(|| tick(black_box(&state), black_box(1.0), target));
    });

    group.bench_function("year_of_daily_ticks", |b| {
        b.iter(|| {
            let mut current = create_default_state();
            for _ in 0..365 {
                current = tick(&current, 1.0, target).next_state;
            }
            current
        });
    });

    group.bench_function("summarize_bottlenecks", |b| {
        b.iter(|| summarize_bottlenecks(black_box(&state), target));
    });

    group.finish();
}

/// A log of `steps` daily ticks with a hash after each.
fn build_log(steps: usize) -> ReplayLog {
    let mut state = integrating_factory(2);
    let mut log = ReplayLog::new(&state);
    for _ in 0..steps {
        let cmd = ReplayCommand::Tick {
            elapsed_days: 1.0,
            target: ThroughputTarget::new(5.0),
        };
        state = apply_replay_command(&state, &cmd).expect("ticks never fail");
        log.record_with_hash(cmd, state.state_hash());
    }
    log
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(30);

    let log = build_log(1_000);
    let bytes = log.serialize().expect("serialize");

    group.bench_function("serialize_1000_steps", |b| {
        b.iter(|| black_box(&log).serialize());
    });

    group.bench_function("deserialize_1000_steps", |b| {
        b.iter(|| ReplayLog::deserialize(black_box(&bytes)));
    });

    group.bench_function("verify_1000_steps", |b| {
        b.iter(|| replay_and_verify(black_box(&log)));
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_replay);
criterion_main!(benches);
