//! Benchmark for TwoThreeTree vs standard BTreeMap.
//!
//! Compares insert, lookup, traversal and deletion throughput, plus the
//! handle-based operations that have no BTreeMap counterpart.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use twothree::{Location, TwoThreeTree};

const SIZES: [i32; 3] = [100, 1000, 10000];

/// Keys in a scrambled but deterministic order.
fn scrambled(size: i32) -> Vec<i32> {
    (0..size).map(|index| index.wrapping_mul(7919) % size).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        let keys = scrambled(size);

        group.bench_with_input(BenchmarkId::new("TwoThreeTree", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut tree = TwoThreeTree::new();
                for &key in keys {
                    tree.insert(black_box(key), black_box(key * 2));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let tree: TwoThreeTree<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();
        let map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("TwoThreeTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = tree.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// iterate Benchmark
// =============================================================================

fn benchmark_iterate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iterate");

    for size in SIZES {
        let tree: TwoThreeTree<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TwoThreeTree", size), &tree, |bencher, tree| {
            bencher.iter(|| black_box(tree.values().map(|&value| i64::from(value)).sum::<i64>()));
        });

        group.bench_with_input(
            BenchmarkId::new("TwoThreeTree/locations", size),
            &tree,
            |bencher, tree| {
                bencher.iter(|| {
                    let mut sum = 0_i64;
                    let mut location = tree.begin_location();
                    while let Ok((_, &value)) = tree.dereference(location) {
                        sum += i64::from(value);
                        location = tree.advance(location).unwrap_or(Location::AfterLast);
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &map, |bencher, map| {
            bencher.iter(|| black_box(map.values().map(|&value| i64::from(value)).sum::<i64>()));
        });
    }

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");

    for size in SIZES {
        let keys = scrambled(size);
        let tree: TwoThreeTree<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TwoThreeTree", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for key in keys {
                        black_box(tree.remove(key));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(
            BenchmarkId::new("TwoThreeTree/handles", size),
            &keys,
            |bencher, keys| {
                bencher.iter_batched(
                    || {
                        let mut tree = TwoThreeTree::new();
                        let handles: Vec<_> = keys.iter().map(|&key| tree.insert(key, key).0).collect();
                        (tree, handles)
                    },
                    |(mut tree, handles)| {
                        for handle in handles {
                            black_box(tree.delete(handle));
                        }
                        tree
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || map.clone(),
                |mut map| {
                    for key in keys {
                        black_box(map.remove(key));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_iterate,
    benchmark_delete
);

criterion_main!(benches);
