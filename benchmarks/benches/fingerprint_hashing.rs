use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fpvote::crypto::{FingerprintHasher, IdentityHasher};
use std::hint::black_box;
use std::time::Duration;
use zeroize::Zeroizing;

/// Digest cost per algorithm across identifier lengths
fn bench_fingerprint_digests(c: &mut Criterion) {
    let hashers = [
        FingerprintHasher::Blake3,
        FingerprintHasher::KeyedBlake3(Zeroizing::new([7u8; 32])),
        FingerprintHasher::Sha256,
    ];

    let mut group = c.benchmark_group("fingerprint");
    group.warm_up_time(Duration::from_millis(100));

    for hasher in &hashers {
        for input_len in [8, 64, 512] {
            let raw = "x".repeat(input_len);
            group.bench_with_input(
                BenchmarkId::new(hasher.name(), input_len),
                &raw,
                |b, raw| b.iter(|| hasher.fingerprint(black_box(raw))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_fingerprint_digests);
criterion_main!(benches);
