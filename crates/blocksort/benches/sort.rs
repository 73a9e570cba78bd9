use std::hint::black_box;
use std::time::Duration;

use bench::{ALL_PATTERNS, apply_runtime_config, dataset, pattern_name};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const BENCH_SIZES: [usize; 4] = [1 << 12, 1 << 14, 1 << 16, 1 << 20];

type SortFn = fn(&mut [u64]);

fn std_stable(data: &mut [u64]) {
    data.sort();
}

fn std_unstable(data: &mut [u64]) {
    data.sort_unstable();
}

fn block_merge(data: &mut [u64]) {
    blocksort::sort(data);
}

fn bench_sort(c: &mut Criterion) {
    let impls: [(&str, SortFn); 3] = [
        ("blocksort", block_merge),
        ("std_stable", std_stable),
        ("std_unstable", std_unstable),
    ];

    for &pattern in &ALL_PATTERNS {
        let mut group = c.benchmark_group(format!("sort/{}", pattern_name(pattern)));

        for &size in &BENCH_SIZES {
            apply_runtime_config(&mut group, size);

            for (salt, &(name, func)) in impls.iter().enumerate() {
                let base = dataset(pattern, size, salt as u64);
                group.bench_function(BenchmarkId::new(name, size), |bencher| {
                    bencher.iter_custom(|iters| {
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let mut data = base.clone();
                            let start = std::time::Instant::now();
                            func(&mut data);
                            total += start.elapsed();
                            black_box(&data);
                        }
                        total
                    });
                });
            }
        }

        group.finish();
    }
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
