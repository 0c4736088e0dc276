use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use step_calculus::calculus::discontinuities::{ScanConfig, scan};
use step_calculus::calculus::epsilon_delta::{DeltaSearchConfig, epsilon_delta};
use step_calculus::calculus::plot_sampler::sample;
use step_calculus::calculus::types::LimitPoint;
use step_calculus::symbolic::symbolic_traits::NativeEngine;

fn bench_plot_sampling(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let mut group = c.benchmark_group("plot sampling");
    for expr in ["pow(x,2)", "sin(x)/x", "exp(-pow(x,2))*cos(3*x)+ln(abs(x)+1)"] {
        group.bench_function(expr, |b| {
            b.iter(|| sample(&engine, black_box(expr), "x", -10.0, 10.0, 1000))
        });
    }
    group.finish();
}

fn bench_delta_search(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let config = DeltaSearchConfig::default();
    // accepted at the first candidate
    c.bench_function("delta search, x^2 at 2", |b| {
        b.iter(|| epsilon_delta(&engine, "pow(x,2)", "x", LimitPoint::Finite(2.0), 0.1, &config))
    });
    // runs all 1000 candidates and falls back to the floor
    c.bench_function("delta search, sign(x) at 0", |b| {
        b.iter(|| epsilon_delta(&engine, "sign(x)", "x", LimitPoint::Finite(0.0), 0.5, &config))
    });
}

fn bench_scan(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let config = ScanConfig::default();
    c.bench_function("discontinuity scan", |b| {
        b.iter(|| scan(&engine, black_box("1/(x-1)+ln(x+2)/(x*x-4)"), "x", &config))
    });
}

criterion_group!(benches, bench_plot_sampling, bench_delta_search, bench_scan);
criterion_main!(benches);
