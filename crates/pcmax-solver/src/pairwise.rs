//! Pairwise local search.
//!
//! The heaviest machine is paired with every lighter machine in turn and
//! their combined jobs are re-partitioned optimally. Any strict decrease
//! of the heavier load is applied and the scan restarts from the heaviest
//! machine. The search ends once no pair of machines can be improved.

use std::time::Instant;

use pcmax_core::{Assignment, Input, JobSet32, MachinePool, Schedule, Time};
use tracing::{debug, info, trace, warn};

use crate::exact2::{partition_below, TWO_MACHINE_CAPACITY};
use crate::stats::SearchStats;

/// Local optimum of the pairwise neighborhood reached from `initial`
/// (round-robin when `None`).
///
/// # Panics
///
/// Panics if `initial` does not assign every job of `input` to one of its
/// machines.
///
/// # Example
///
/// ```
/// use pcmax_core::Input;
/// use pcmax_solver::optimize_pairwise;
///
/// let input = Input::new(vec![8, 7, 6, 5, 4, 3, 2, 1], 2).unwrap();
/// let schedule = optimize_pairwise(&input, None);
/// assert_eq!(schedule.makespan, 18);
/// ```
pub fn optimize_pairwise(input: &Input, initial: Option<&Assignment>) -> Schedule {
    let initial = initial
        .cloned()
        .unwrap_or_else(|| Assignment::round_robin(input.job_count(), input.machine_count()));
    optimize_pairwise_with_stats(input, &initial, &mut SearchStats::default())
}

/// Pairwise local optimum reached from `assignment`, or `None` if no pair
/// of machines can be improved.
///
/// # Panics
///
/// Same preconditions as [`optimize_pairwise`].
pub fn improve_pairwise(input: &Input, assignment: &Assignment) -> Option<Schedule> {
    let schedule = optimize_pairwise_with_stats(input, assignment, &mut SearchStats::default());
    (schedule.assignment != *assignment).then_some(schedule)
}

/// [`optimize_pairwise`] accumulating counters into `stats`.
pub fn optimize_pairwise_with_stats(
    input: &Input,
    initial: &Assignment,
    stats: &mut SearchStats,
) -> Schedule {
    if let Err(err) = initial.validate(input) {
        panic!("pairwise search needs a valid assignment: {err}");
    }
    let phase_start = Instant::now();
    info!(
        event = "phase_start",
        phase = "Pairwise",
        jobs = input.job_count(),
        machines = input.machine_count(),
        makespan = initial.makespan(input.durations()),
    );

    let mut pool = MachinePool::new(input.durations(), input.machine_count(), initial);
    let moves_before = stats.moves_accepted;
    descend(input.durations(), &mut pool, stats);

    let schedule = pool.to_schedule(input.job_count());
    info!(
        event = "phase_end",
        phase = "Pairwise",
        duration_ms = phase_start.elapsed().as_millis() as u64,
        moves = stats.moves_accepted - moves_before,
        makespan = schedule.makespan,
    );
    schedule
}

/// Runs the pairwise search on `pool` until no pair improves. Returns the
/// number of moves applied.
pub(crate) fn descend(durations: &[Time], pool: &mut MachinePool, stats: &mut SearchStats) -> u64 {
    let mut moves = 0;
    let mut heavy_rank = pool.len().saturating_sub(1);
    'scan: while heavy_rank > 0 {
        let heavy = pool.id_at_rank(heavy_rank);
        for light_rank in 0..heavy_rank {
            let light = pool.id_at_rank(light_rank);
            if improve_pair(durations, pool, heavy, light, stats) {
                moves += 1;
                heavy_rank = pool.len() - 1;
                continue 'scan;
            }
        }
        heavy_rank -= 1;
    }
    moves
}

/// Re-partitions machines `heavy` and `light` if that lowers the load of
/// `heavy`. Returns whether the pool changed.
fn improve_pair(
    durations: &[Time],
    pool: &mut MachinePool,
    heavy: usize,
    light: usize,
    stats: &mut SearchStats,
) -> bool {
    let bound = pool.machine(heavy).load();
    let jobs: Vec<usize> = pool
        .machine(heavy)
        .jobs()
        .iter()
        .chain(pool.machine(light).jobs())
        .copied()
        .collect();
    if jobs.len() > TWO_MACHINE_CAPACITY {
        stats.record_skip();
        warn!(
            event = "neighborhood_skipped",
            machines = ?[heavy, light],
            jobs = jobs.len(),
            capacity = TWO_MACHINE_CAPACITY,
        );
        return false;
    }

    stats.record_evaluation();
    let local: Vec<Time> = jobs.iter().map(|&job| durations[job]).collect();
    let Some(partition) = partition_below::<u32>(&local, bound) else {
        trace!(event = "pair_unchanged", heavy = heavy, light = light, load = bound);
        return false;
    };

    let (first, second) = split(&jobs, partition.set);
    pool.replace_jobs(heavy, first, durations);
    pool.replace_jobs(light, second, durations);
    pool.resort();
    stats.record_move(true);
    debug!(
        event = "move",
        neighborhood = "pair",
        heavy = heavy,
        light = light,
        from = bound,
        to = partition.makespan,
        makespan = pool.makespan(),
    );
    true
}

fn split(jobs: &[usize], set: JobSet32) -> (Vec<usize>, Vec<usize>) {
    let (mut inside, mut outside) = (Vec::new(), Vec::new());
    for (local, &job) in jobs.iter().enumerate() {
        if set.contains(local) {
            inside.push(job);
        } else {
            outside.push(job);
        }
    }
    (inside, outside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcmax_test::{assert_valid_schedule, brute_force_makespan, random_input};

    #[test]
    fn test_two_machines_is_exact() {
        for seed in 0..15 {
            let input = random_input(10, 2, 40, seed);
            let schedule = optimize_pairwise(&input, None);
            assert_valid_schedule(&input, &schedule);
            assert_eq!(schedule.makespan, brute_force_makespan(input.durations(), 2));
        }
    }

    #[test]
    fn test_never_worse_than_start() {
        for seed in 0..15 {
            let input = random_input(20, 4, 100, seed);
            let start = Assignment::round_robin(20, 4);
            let schedule = optimize_pairwise(&input, Some(&start));
            assert_valid_schedule(&input, &schedule);
            assert!(schedule.makespan <= start.makespan(input.durations()));
        }
    }

    #[test]
    fn test_balanced_schedule_is_not_improved() {
        let input = Input::new(vec![5, 5, 5, 5], 2).unwrap();
        let balanced = Assignment::new(vec![0, 1, 0, 1]);
        assert!(improve_pairwise(&input, &balanced).is_none());
    }

    #[test]
    fn test_local_optimum_is_idempotent() {
        let input = random_input(16, 3, 50, 4);
        let first = optimize_pairwise(&input, None);
        assert!(improve_pairwise(&input, &first.assignment).is_none());
    }

    #[test]
    fn test_improves_lopsided_start() {
        let input = Input::new(vec![4, 4, 3, 3, 2, 2], 3).unwrap();
        let lopsided = Assignment::new(vec![0; 6]);
        let schedule = improve_pairwise(&input, &lopsided).unwrap();
        assert_valid_schedule(&input, &schedule);
        assert_eq!(schedule.makespan, 6);
    }

    #[test]
    fn test_oversized_pair_is_skipped() {
        let input = Input::new(vec![1; 40], 2).unwrap();
        let all_on_one = Assignment::new(vec![0; 40]);
        let mut stats = SearchStats::default();
        let schedule = optimize_pairwise_with_stats(&input, &all_on_one, &mut stats);
        assert_eq!(schedule.makespan, 40);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.moves_accepted, 0);
    }

    #[test]
    #[should_panic(expected = "valid assignment")]
    fn test_rejects_short_assignment() {
        let input = Input::new(vec![1, 2, 3], 2).unwrap();
        optimize_pairwise(&input, Some(&Assignment::new(vec![0, 1])));
    }
}
