//! Checked-call micro-benchmark.
//!
//! Measures the per-call cost of the protocol:
//! - success path of `check` (the common case in an RT cycle)
//! - failure path (slot write + report)
//! - a three-step bring-up sequence that fails on the last step
//! - `check_forced` with the site not forced (must match `check`)

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use errcheck::{Checked, Diagnostics, error_codes};

error_codes! {
    /// Bench codes.
    pub struct BenchError {
        /// Power regulator.
        const POWER = 1;
        /// Sensor bring-up.
        const SENSOR = 2;
        /// Radio module.
        const RADIO = 3;
    }
}

fn bring_up(diag: &Diagnostics<BenchError>, radio_ok: bool) -> Checked {
    diag.check(black_box(true), BenchError::POWER)?;
    diag.check(black_box(1u8), BenchError::SENSOR)?;
    diag.check(black_box(radio_ok), BenchError::RADIO)?;
    Ok(())
}

fn bench_check_success(c: &mut Criterion) {
    let diag = Diagnostics::new();
    c.bench_function("check_success", |b| {
        b.iter(|| black_box(diag.check(black_box(42u32), BenchError::SENSOR)))
    });
}

fn bench_check_failure(c: &mut Criterion) {
    let diag = Diagnostics::new();
    c.bench_function("check_failure", |b| {
        b.iter(|| black_box(diag.check(black_box(0u32), BenchError::SENSOR)))
    });
}

fn bench_sequence(c: &mut Criterion) {
    let diag = Diagnostics::new();
    c.bench_function("bring_up_all_ok", |b| {
        b.iter(|| black_box(bring_up(&diag, true)))
    });
    c.bench_function("bring_up_last_fails", |b| {
        b.iter(|| black_box(bring_up(&diag, false)))
    });
}

fn bench_check_unforced(c: &mut Criterion) {
    let diag = Diagnostics::new();
    c.bench_function("check_forced_off", |b| {
        b.iter(|| {
            black_box(diag.check_forced::<false, _>(|| black_box(true), BenchError::RADIO))
        })
    });
}

criterion_group!(
    benches,
    bench_check_success,
    bench_check_failure,
    bench_sequence,
    bench_check_unforced
);
criterion_main!(benches);
