//! Benchmarks for puzzle shuffling.
//!
//! Measures the full shuffle (batch swaps, solvability check, corrective
//! swap) across board sizes with fixed seeds for reproducibility.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench shuffle
//! ```

use std::hint;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use tileslide_game::Puzzle;

const SEED: u64 = 0x5eed_7175;

fn bench_shuffle(c: &mut Criterion) {
    for (width, height) in [(4, 4), (10, 10), (16, 16)] {
        c.bench_with_input(
            BenchmarkId::new("shuffle", format!("{width}x{height}")),
            &(width, height),
            |b, &(width, height)| {
                let mut rng = Pcg64Mcg::seed_from_u64(SEED);
                b.iter_batched(
                    || hint::black_box(Puzzle::new(width, height).expect("valid dimensions")),
                    |mut puzzle| {
                        puzzle.shuffle_with(&mut rng);
                        puzzle
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

criterion_group!(benches, bench_shuffle);
criterion_main!(benches);
