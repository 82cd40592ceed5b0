//! # Signed Telemetry Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Canonical encode of claims | < 5µs |
//! | Token issue (sign) | < 1ms |
//! | Token verify | < 1ms |
//! | Batch verify (rayon) | scales with cores |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use telemetry_tests::fixtures::{Fleet, T};
use telemetry_token::{Claims, TokenCodec, TokenVerificationApi, TokenVerificationService};

// ============================================================================
// Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = TokenCodec::default();
    let claims = Claims::new("temp=65;hum=40;batt=3.7", "dev-0", "6f1c2b", T);
    let fleet = Fleet::provision(1);
    let wire = fleet.token(0, &claims.message, &claims.nonce, T);

    group.bench_function("encode_claims", |b| {
        b.iter(|| black_box(codec.encode_claims(black_box(&claims))))
    });

    group.bench_function("decode_token", |b| {
        b.iter(|| black_box(codec.decode_token(black_box(&wire)).is_ok()))
    });

    group.finish();
}

// ============================================================================
// Sign / Verify
// ============================================================================

fn bench_issue_and_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("token");
    group.measurement_time(Duration::from_secs(10));

    let fleet = Fleet::provision(1);
    let claims = Claims::new("temp=65", "dev-0", "n1", T);
    let wire = fleet.token(0, "temp=65", "n1", T);
    let verifier = fleet.verifier_at(T);

    group.bench_function("issue", |b| {
        b.iter(|| black_box(fleet.signers[0].issue_wire(black_box(&claims))))
    });

    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verifier.verify(black_box(&wire)).is_verified()))
    });

    // Rejected before any curve arithmetic
    let stale = fleet.token(0, "temp=65", "n1", T - 3600);
    group.bench_function("verify_stale", |b| {
        b.iter(|| black_box(verifier.verify(black_box(&stale)).is_verified()))
    });

    group.finish();
}

fn bench_batch_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.measurement_time(Duration::from_secs(10));

    let fleet = Fleet::provision(16);
    let service = TokenVerificationService::from_verifier(fleet.verifier_at(T));

    for size in [16usize, 128, 1024] {
        let wires: Vec<String> = (0..size)
            .map(|i| fleet.token(i % 16, &format!("m{i}"), &format!("n{i}"), T))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("verify_batch", size), &wires, |b, wires| {
            b.iter(|| black_box(service.verify_batch(wires).verified_count))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_issue_and_verify, bench_batch_verify);
criterion_main!(benches);
