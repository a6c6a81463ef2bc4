//! Cost of hashing and verifying at different scrypt work factors.
//!
//! Useful for picking an `iteration_count` that keeps interactive logins
//! within budget on the target hardware.

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keyward_hasher::{CostConfig, HasherPool, PoolConfig, ScryptPasswordHasher};

fn config(iteration_count: u32) -> CostConfig {
    CostConfig {
        iteration_count,
        ..CostConfig::default()
    }
}

fn hash_password(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_password");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    for n in [4096, 16384, 32768] {
        let hasher = ScryptPasswordHasher::new(config(n)).unwrap();
        group.bench_with_input(BenchmarkId::new("iteration_count", n), &n, |b, _| {
            b.iter(|| hasher.hash_password("P@ssw0rd!").unwrap());
        });
    }
    group.finish();
}

fn verify_hashed_password(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_hashed_password");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let hasher = ScryptPasswordHasher::new(CostConfig::default()).unwrap();
    let blob = hasher.hash_password("P@ssw0rd!").unwrap();

    group.bench_function("match", |b| {
        b.iter(|| hasher.verify_hashed_password(&blob, "P@ssw0rd!").unwrap());
    });
    group.bench_function("no_match", |b| {
        b.iter(|| hasher.verify_hashed_password(&blob, "wrong").unwrap());
    });
    group.finish();
}

/// Throughput of a batch of concurrent verifications through the bounded pool.
fn pooled_verification(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("pooled_verification");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(15));

    let hasher = ScryptPasswordHasher::new(CostConfig::default()).unwrap();
    let blob = hasher.hash_password("P@ssw0rd!").unwrap();

    for max_concurrent in [1, 4] {
        let pool = HasherPool::fixed(CostConfig::default(), &PoolConfig { max_concurrent });
        group.bench_with_input(
            BenchmarkId::new("max_concurrent", max_concurrent),
            &max_concurrent,
            |b, _| {
                b.to_async(&rt).iter(|| {
                    let pool = pool.clone();
                    let blob = blob.clone();
                    async move {
                        let tasks: Vec<_> = (0..8)
                            .map(|_| {
                                let pool = pool.clone();
                                let blob = blob.clone();
                                tokio::spawn(async move {
                                    pool.verify_hashed_password(&blob, "P@ssw0rd!").await
                                })
                            })
                            .collect();
                        for task in tasks {
                            task.await.unwrap().unwrap();
                        }
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    hash_password,
    verify_hashed_password,
    pooled_verification
);
criterion_main!(benches);
