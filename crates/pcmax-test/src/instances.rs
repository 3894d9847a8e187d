//! Seeded random instances.

use pcmax_core::{Input, Time};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `n` durations drawn uniformly from `1..=max`.
pub fn random_durations(n: usize, max: Time, seed: u64) -> Vec<Time> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(1..=max)).collect()
}

/// Instance of `n` random durations on `machines` machines.
///
/// # Panics
///
/// Panics unless `2 <= machines < n` and `max >= 1`.
pub fn random_input(n: usize, machines: usize, max: Time, seed: u64) -> Input {
    Input::new(random_durations(n, max, seed), machines).expect("valid random instance")
}
