//! Encoding and serialization benchmarks on generated models.
//!
//! Run with:
//! ```bash
//! cargo bench --bench encode
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ising_wmc::condensed::two_d_condense_cnf;
use ising_wmc::generators::{nearest_neighbor_2d, random_graph, two_d_grid};
use ising_wmc::model::IsingModel;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Benchmark: Standard encoding of square grids
// ============================================================================

fn bench_encode_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode/grid");

    for n in [8, 16, 32] {
        let model = two_d_grid(n, n, nearest_neighbor_2d(1.0), 0.44).unwrap();
        group.throughput(Throughput::Elements(model.num_binary_funcs() as u64));
        group.bench_with_input(BenchmarkId::new("to_wmc", n), &model, |b, model| {
            b.iter(|| model.to_wmc().unwrap());
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Condensed encoding of square grids
// ============================================================================

fn bench_condense(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode/condensed");

    for n in [8, 16, 32, 64] {
        group.bench_with_input(BenchmarkId::new("two_d_condense", n), &n, |b, &n| {
            b.iter(|| two_d_condense_cnf(n));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Sparse random graphs (encoding cost follows edge count)
// ============================================================================

fn random_model(n: usize, seed: u64) -> IsingModel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_graph(n, 4.0, 1.0, -1.0, 1.0, &mut rng).unwrap()
}

fn bench_encode_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode/random");

    for n in [100, 400, 1600] {
        let model = random_model(n, 42);
        group.bench_with_input(BenchmarkId::new("deg=4", n), &model, |b, model| {
            b.iter(|| model.to_wmc().unwrap());
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: UAI08 round-trip
// ============================================================================

fn bench_uai08(c: &mut Criterion) {
    let mut group = c.benchmark_group("uai08");

    for n in [100, 400] {
        let model = random_model(n, 7);
        let text = model.to_uai08_string();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("write", n), &model, |b, model| {
            b.iter(|| model.to_uai08_string());
        });
        group.bench_with_input(BenchmarkId::new("read", n), &text, |b, text| {
            b.iter(|| IsingModel::from_uai08_str(text).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_grid,
    bench_condense,
    bench_encode_random,
    bench_uai08,
);

criterion_main!(benches);
