use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdconv::convolve::convolve_preserving_kernel;
use simdconv::flip::{flip_slice, flip_with};
use simdconv::simd::{self, ScalarLanes};
use simdconv::{ConvolveStrategy, Matrix};

/// Square input sizes, from cache-resident to well past L2.
const INPUT_SIZES: &[usize] = &[64, 256, 1024];

/// Square kernel sizes. 3 is narrower than a lane group, 17 spans two.
const KERNEL_SIZES: &[usize] = &[3, 8, 17];

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |_, _| rng.random_range(-100..=100))
}

/// `lanes` runs on the detected backend and `fallback lanes` forces the scalar
/// emulation; on an AVX2 host the former should be the faster of the two.
fn flip_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Flip ({})", simd::active_backend()));
    let mut rng = StdRng::seed_from_u64(42);

    for &size in INPUT_SIZES {
        let len = size * size;
        group.throughput(Throughput::Bytes((len * std::mem::size_of::<i32>()) as u64));
        let data: Vec<i32> = (0..len).map(|_| rng.random::<i32>()).collect();

        group.bench_with_input(BenchmarkId::new("lanes", len), &data, |b, v| {
            let mut v = v.clone();
            b.iter(|| flip_slice(black_box(&mut v)))
        });

        group.bench_with_input(BenchmarkId::new("fallback lanes", len), &data, |b, v| {
            let mut v = v.clone();
            b.iter(|| flip_with::<ScalarLanes>(black_box(&mut v)))
        });

        group.bench_with_input(BenchmarkId::new("slice::reverse", len), &data, |b, v| {
            let mut v = v.clone();
            b.iter(|| black_box(&mut v).reverse())
        });
    }
    group.finish();
}

fn convolve_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);

    for &k in KERNEL_SIZES {
        let mut group = c.benchmark_group(format!("Convolve {k}x{k}"));
        let kernel = random_matrix(&mut rng, k, k);

        for &size in INPUT_SIZES {
            let input = random_matrix(&mut rng, size, size);
            let out = size - k + 1;
            group.throughput(Throughput::Elements((out * out * k * k) as u64));

            for strategy in [ConvolveStrategy::Naive, ConvolveStrategy::Simd] {
                group.bench_with_input(
                    BenchmarkId::new(strategy.to_string(), size),
                    &input,
                    |b, a| b.iter(|| black_box(convolve_preserving_kernel(a, &kernel, strategy))),
                );
            }
        }
        group.finish();
    }
}

criterion_group!(benches, flip_benchmarks, convolve_benchmarks);
criterion_main!(benches);
