//! Benchmark manifest construction and serialization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use streamcat::catalog::BucketSpec;
use streamcat::config::default_buckets;
use streamcat::server::manifest::build_manifest;

fn bench_manifest(c: &mut Criterion) {
    let defaults = default_buckets();

    // A larger lineup to see how rendering scales with bucket count.
    let many: Vec<BucketSpec> = (0..24)
        .map(|i| {
            let key = format!("b{i:02}");
            BucketSpec::new(&key, &format!("Bucket {i}"), &["nfx", "dnp"], "US")
        })
        .collect();

    let mut group = c.benchmark_group("manifest");

    group.bench_function("build_default", |b| {
        b.iter(|| build_manifest(black_box(&defaults)));
    });

    group.bench_function("render_default", |b| {
        b.iter(|| serde_json::to_vec(&build_manifest(black_box(&defaults))).unwrap());
    });

    group.bench_function("render_24_buckets", |b| {
        b.iter(|| serde_json::to_vec(&build_manifest(black_box(&many))).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_manifest);
criterion_main!(benches);
