//! Approximate re-optimization of large neighborhoods.
//!
//! A tuple of six or more machines is too large for branch and bound.
//! Instead, a batch of independent attempts each starts from a random
//! assignment of the tuple's jobs and runs the pairwise search followed
//! by a 4-machine tuple-wise search. The attempts run on a rayon pool and
//! the best one is chosen by `(makespan, balance score, attempt index)`.

use pcmax_config::ThreadCount;
use pcmax_core::{balance_score, Assignment, Input, MachinePool, Time};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{trace, warn};

use super::{Outcome, Run, TuplewiseSearch, DEFAULT_K};
use crate::pairwise;
use crate::stats::SearchStats;

/// Worker pool for the attempts, or `None` to run them sequentially.
pub(super) fn build_workers(
    thread_count: ThreadCount,
    attempts: usize,
) -> Option<rayon::ThreadPool> {
    if thread_count == ThreadCount::None {
        return None;
    }
    let threads = thread_count.resolve(attempts);
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pcmax-attempt-{i}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(event = "worker_pool_unavailable", threads = threads, error = %err);
            None
        }
    }
}

/// Outcome of one randomized attempt.
#[derive(Debug, Clone)]
struct Attempt {
    makespan: Time,
    score: i128,
    index: usize,
    assignment: Assignment,
    stats: SearchStats,
}

impl Attempt {
    fn key(&self) -> (Time, i128, usize) {
        (self.makespan, self.score, self.index)
    }
}

fn run_attempt(search: &TuplewiseSearch, sub: &Input, index: usize, seed: u64) -> Attempt {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start = Assignment::random(sub.job_count(), sub.machine_count(), &mut rng);
    let mut stats = SearchStats::default();
    let mut pool = MachinePool::new(sub.durations(), sub.machine_count(), &start);

    pairwise::descend(sub.durations(), &mut pool, &mut stats);
    TuplewiseSearch::new(DEFAULT_K)
        .with_order(search.order)
        .with_anchor_heaviest(search.anchor_heaviest)
        .with_seed(seed)
        .descend_pool(sub, &mut pool, &mut stats);

    Attempt {
        makespan: pool.makespan(),
        score: pool.balance_score(sub.lower_bound()),
        index,
        assignment: pool.to_assignment(sub.job_count()),
        stats,
    }
}

/// Whether two assignments put the same groups of jobs together,
/// regardless of machine labels.
fn same_partition(a: &Assignment, b: &Assignment, machines: usize) -> bool {
    let normalize = |assignment: &Assignment| {
        let mut groups = assignment.groups(machines);
        groups.sort();
        groups
    };
    normalize(a) == normalize(b)
}

impl Run<'_> {
    /// Best attempt for the neighborhood `ids`, if it should be adopted.
    ///
    /// `current` is the tuple's present local assignment. Strictly better
    /// `(makespan, score)` pairs are improvements; equal pairs with a
    /// different grouping of jobs are sideways moves.
    pub(super) fn approximate(
        &mut self,
        pool: &MachinePool,
        ids: &[usize],
        sub: &Input,
        current: &Assignment,
        worst: Time,
    ) -> Option<(Assignment, Outcome)> {
        let base_seed: u64 = self.rng.random();
        let attempts = self.search.attempts;
        let search = self.search;
        let attempt = |index: usize| {
            run_attempt(search, sub, index, base_seed.wrapping_add(index as u64))
        };
        let results: Vec<Attempt> = match &self.workers {
            Some(workers) => {
                workers.install(|| (0..attempts).into_par_iter().map(attempt).collect())
            }
            None => (0..attempts).map(attempt).collect(),
        };

        for result in &results {
            self.stats.merge(&result.stats);
        }
        let best = results.into_iter().min_by_key(Attempt::key)?;

        let current_key = (
            worst,
            balance_score(ids.iter().map(|&id| pool.machine(id).load()), sub.lower_bound()),
        );
        let best_key = (best.makespan, best.score);
        trace!(
            event = "approximation",
            attempts = attempts,
            best_attempt = best.index,
            makespan = best.makespan,
            current = worst,
        );
        if best_key < current_key {
            Some((best.assignment, Outcome::Improved))
        } else if best_key == current_key
            && !same_partition(current, &best.assignment, ids.len())
        {
            Some((best.assignment, Outcome::Sideways))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_partition_ignores_labels() {
        let a = Assignment::new(vec![0, 0, 1, 2]);
        let b = Assignment::new(vec![2, 2, 0, 1]);
        let c = Assignment::new(vec![0, 1, 0, 2]);
        assert!(same_partition(&a, &b, 3));
        assert!(!same_partition(&a, &c, 3));
    }

    #[test]
    fn test_attempts_are_deterministic_per_seed() {
        let sub = Input::new(vec![9, 8, 7, 7, 6, 5, 5, 4, 3, 3, 2, 2, 1, 1], 6).unwrap();
        let search = TuplewiseSearch::new(6);
        let first = run_attempt(&search, &sub, 0, 42);
        let second = run_attempt(&search, &sub, 0, 42);
        assert_eq!(first.assignment, second.assignment);
        assert_eq!(first.makespan, first.assignment.makespan(sub.durations()));
        assert!(first.makespan >= sub.lower_bound());
    }

    #[test]
    fn test_sequential_workers_for_none() {
        assert!(build_workers(ThreadCount::None, 8).is_none());
        let pool = build_workers(ThreadCount::Count(2), 8).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
