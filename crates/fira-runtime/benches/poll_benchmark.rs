//! Benchmarks for the main-loop step and heartbeat check.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fira_fault_inject::{Safe, VictimCell};
use fira_hal::sim::SimBoard;
use fira_runtime::prelude::*;
use fira_watchdog::ResetLatch;

fn bench_observe(c: &mut Criterion) {
    c.bench_function("heartbeat_observe", |b| {
        let mut monitor = HeartbeatMonitor::new(0);
        let mut counter = 0_u32;
        b.iter(|| {
            counter = counter.wrapping_add(1);
            black_box(monitor.observe(black_box(counter), false))
        });
    });
}

fn bench_poll(c: &mut Criterion) {
    let board = SimBoard::new();
    let victim = VictimCell::new(0);
    let cpu = board.boot();
    let vectors = Vectors::<_, Safe>::new(&cpu);
    cpu.attach(&vectors);
    let Ok(mut runtime) =
        Runtime::boot(&cpu, &vectors, &victim, &ResetLatch::new(), RuntimeConfig::DEFAULT)
    else {
        return;
    };
    c.bench_function("runtime_poll", |b| {
        b.iter(|| black_box(runtime.poll()));
    });
}

criterion_group!(benches, bench_observe, bench_poll);
criterion_main!(benches);
