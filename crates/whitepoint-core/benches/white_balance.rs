//! Benchmarks for whitepoint-core pixel passes
//!
//! Run with: cargo bench -p whitepoint-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use whitepoint_core::adaptation::{AdaptationMethod, ChromaticAdaptation};
use whitepoint_core::color::StandardIlluminant;
use whitepoint_core::estimators::{estimate_gains, EstimatorConfig, WbAlgorithm};
use whitepoint_core::gains::{apply_gains, WhiteBalanceGains};
use whitepoint_core::image::{ChannelOrder, LinearImage};

/// Synthetic warm-cast scene with a bright corner
fn generate_test_image(width: u32, height: u32) -> LinearImage {
    let pixel_count = (width * height) as usize;
    let mut data = Vec::with_capacity(pixel_count * 3);

    for i in 0..pixel_count {
        let x = (i % width as usize) as f32 / width as f32;
        let y = (i / width as usize) as f32 / height as f32;
        let base = 0.1 + 0.85 * x * y;

        data.push(base * 1.2);
        data.push(base);
        data.push(base * 0.75);
    }

    LinearImage {
        width,
        height,
        data,
        order: ChannelOrder::Rgb,
    }
}

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimators");
    let config = EstimatorConfig::default();

    for size in [256, 1024].iter() {
        let image = generate_test_image(*size, *size);
        group.throughput(Throughput::Elements((*size * *size) as u64));

        for algorithm in WbAlgorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.as_str(), format!("{}x{}", size, size)),
                &image,
                |b, image| {
                    b.iter(|| estimate_gains(black_box(image), algorithm, &config));
                },
            );
        }
    }

    group.finish();
}

fn bench_apply_gains(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_gains");
    let gains = WhiteBalanceGains::new(0.83, 1.0, 1.33);

    for size in [256, 1024, 2048].iter() {
        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(
            BenchmarkId::new("apply_gains", format!("{}x{}", size, size)),
            size,
            |b, &s| {
                let mut image = generate_test_image(s, s);
                b.iter(|| apply_gains(black_box(&mut image), black_box(&gains)));
            },
        );
    }

    group.finish();
}

fn bench_adaptation(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptation");
    let cat = ChromaticAdaptation::between_xy(
        StandardIlluminant::A.xy(),
        StandardIlluminant::D65.xy(),
        AdaptationMethod::Bradford,
    )
    .expect("tungsten to D65 is well defined");

    for size in [256, 1024].iter() {
        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(
            BenchmarkId::new("bradford_a_to_d65", format!("{}x{}", size, size)),
            size,
            |b, &s| {
                let mut image = generate_test_image(s, s);
                b.iter(|| cat.apply_to_image(black_box(&mut image)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_estimators, bench_apply_gains, bench_adaptation);

criterion_main!(benches);
