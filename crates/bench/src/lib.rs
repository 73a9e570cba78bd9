use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RNG_SEED: u64 = 0x5EED_2026;

const SAMPLE_SIZE: usize = 10;
const WARM_UP_MS: u64 = 100;
const MEASURE_MS_SMALL: u64 = 200;
const MEASURE_MS_MEDIUM: u64 = 400;
const MEASURE_MS_LARGE: u64 = 800;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    RandomUniform,
    FewDistinct,
    Descending,
    AscendingJitter,
}

pub const ALL_PATTERNS: [Pattern; 4] = [
    Pattern::RandomUniform,
    Pattern::FewDistinct,
    Pattern::Descending,
    Pattern::AscendingJitter,
];

pub fn pattern_name(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::RandomUniform => "random_uniform",
        Pattern::FewDistinct => "few_distinct",
        Pattern::Descending => "descending",
        Pattern::AscendingJitter => "ascending_jitter",
    }
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

// `salt` decouples the streams of benchmarks that share a size.
pub fn dataset(pattern: Pattern, len: usize, salt: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(mix_seed(RNG_SEED ^ (len as u64) ^ salt));
    match pattern {
        Pattern::RandomUniform => (0..len).map(|_| rng.random()).collect(),
        Pattern::FewDistinct => (0..len).map(|_| rng.random_range(0..100)).collect(),
        Pattern::Descending => (0..len as u64).rev().collect(),
        Pattern::AscendingJitter => (0..len as u64)
            .map(|i| (i + 2).wrapping_add_signed(rng.random_range(-2..=2)))
            .collect(),
    }
}

pub fn apply_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, len: usize) {
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(WARM_UP_MS));
    let measure_ms = if len <= 1 << 14 {
        MEASURE_MS_SMALL
    } else if len <= 1 << 17 {
        MEASURE_MS_MEDIUM
    } else {
        MEASURE_MS_LARGE
    };
    group.measurement_time(Duration::from_millis(measure_ms));
}

#[inline]
fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
