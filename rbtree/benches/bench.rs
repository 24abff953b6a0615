use core::hint::black_box;
use core::time::Duration;
use std::collections::BTreeMap;

use criterion::measurement::Measurement;
use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rbtree::{BinarySearchTree, RedBlackTree};

pub fn gen_random_ints(count: usize, key_max: i32) -> Vec<i32> {
    let mut vec = Vec::with_capacity(count);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..count {
        vec.push(rng.gen_range(0..key_max))
    }
    assert_eq!(vec.len(), count);
    vec
}

pub fn gen_ascending_ints(count: usize, _key_max: i32) -> Vec<i32> {
    (0..count as i32).collect()
}

macro_rules! select_measurement {
    (refcycles) => {
        pub const MEASUREMENT_KIND: &str = "refcycles";

        pub fn create_measurement() -> impl ::criterion::measurement::Measurement {
            ::criterion_perf_events::Perf::new(
                ::perfcnt::linux::PerfCounterBuilderLinux::from_hardware_event(
                    ::perfcnt::linux::HardwareEventType::RefCPUCycles,
                ),
            )
        }
    };
    (instructions) => {
        pub const MEASUREMENT_KIND: &str = "instructions";

        pub fn create_measurement() -> impl ::criterion::measurement::Measurement {
            ::criterion_perf_events::Perf::new(
                ::perfcnt::linux::PerfCounterBuilderLinux::from_hardware_event(
                    ::perfcnt::linux::HardwareEventType::Instructions,
                ),
            )
        }
    };
    (walltime) => {
        pub const MEASUREMENT_KIND: &str = "walltime";

        pub fn create_measurement() -> impl ::criterion::measurement::Measurement {
            ::criterion::measurement::WallTime
        }
    };
}

// cargo bench --features perf-refcycles
#[cfg(feature = "perf-refcycles")]
select_measurement!(refcycles);
#[cfg(all(feature = "perf-instructions", not(feature = "perf-refcycles")))]
select_measurement!(instructions);
#[cfg(not(any(feature = "perf-refcycles", feature = "perf-instructions")))]
select_measurement!(walltime);

fn insert_group<M: Measurement>(
    c: &mut Criterion<M>,
    name: &str,
    gen_func: fn(usize, i32) -> Vec<i32>,
) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    let mut g = c.benchmark_group(format!("insert_{}_{}", name, MEASUREMENT_KIND));
    g.plot_config(plot_config);

    for count in [100, 1_000, 10_000] {
        let keys = gen_func(count, i32::MAX);

        g.bench_with_input(BenchmarkId::new("RedBlackTree", count), &keys, |b, keys| {
            b.iter(|| keys.iter().copied().collect::<RedBlackTree<_>>())
        });
        // an unbalanced tree degenerates into a list on sorted input
        if count <= 1_000 {
            g.bench_with_input(
                BenchmarkId::new("BinarySearchTree", count),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        let mut tree = BinarySearchTree::new();
                        for k in keys {
                            tree.insert(*k);
                        }
                        tree
                    })
                },
            );
        }
        g.bench_with_input(BenchmarkId::new("std_btree", count), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for k in keys {
                    *map.entry(*k).or_insert(0usize) += 1;
                }
                map
            })
        });
    }
    g.finish();
}

fn range<M: Measurement>(c: &mut Criterion<M>) {
    let mut g = c.benchmark_group(format!("range_{}", MEASUREMENT_KIND));

    for count in [1_000, 100_000] {
        let keys = gen_random_ints(count, count as i32);
        let tree: RedBlackTree<i32> = keys.iter().copied().collect();
        let map: BTreeMap<i32, i32> = keys.iter().map(|k| (*k, *k)).collect();
        let (lower, upper) = (count as i32 / 4, count as i32 / 2);

        g.bench_with_input(BenchmarkId::new("RedBlackTree", count), &count, |b, _i| {
            b.iter(|| {
                tree.range(Some(black_box(lower)), Some(black_box(upper)))
                    .fold(0i64, |acc, v| acc + *v as i64)
            })
        });
        g.bench_with_input(BenchmarkId::new("std_btree", count), &count, |b, _i| {
            b.iter(|| {
                map.range(black_box(lower)..=black_box(upper))
                    .fold(0i64, |acc, (k, _)| acc + *k as i64)
            })
        });
    }
    g.finish();
}

fn bench<M: Measurement>(c: &mut Criterion<M>) {
    insert_group(c, "random", gen_random_ints);
    insert_group(c, "ascending", gen_ascending_ints);
    range(c);
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(1))
        .warm_up_time(Duration::from_millis(100))
        .with_measurement(create_measurement())
        ;
    targets = bench
);
criterion_main!(benches);
