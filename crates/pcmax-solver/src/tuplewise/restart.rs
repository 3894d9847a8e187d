//! Perturbation used between tuple-wise restarts.

use std::cmp::Reverse;

use pcmax_core::{MachinePool, Time};
use rand::Rng;

/// Redistributes at random the jobs of the `k` machines whose loads
/// deviate most from `lower_bound`. Returns the machine ids touched.
pub(crate) fn perturb<R: Rng + ?Sized>(
    pool: &mut MachinePool,
    durations: &[Time],
    lower_bound: Time,
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut ids: Vec<usize> = (0..pool.len()).collect();
    ids.sort_by_key(|&id| (Reverse((pool.machine(id).load() - lower_bound).abs()), id));
    ids.truncate(k.min(pool.len()));

    let jobs: Vec<usize> = ids
        .iter()
        .flat_map(|&id| pool.machine(id).jobs().to_vec())
        .collect();
    let mut groups = vec![Vec::new(); ids.len()];
    for job in jobs {
        groups[rng.random_range(0..ids.len())].push(job);
    }
    for (&id, group) in ids.iter().zip(groups) {
        pool.replace_jobs(id, group, durations);
    }
    pool.resort();
    ids
}
