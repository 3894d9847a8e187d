//! Exact two-machine partitioning by meet in the middle.
//!
//! The last job is pinned to machine 1, which removes mirror-image
//! solutions. The remaining jobs are split in two halves; the subset sums
//! of the first half are walked ascending and those of the second half
//! descending, keeping a shrinking window around `total / 2`.

use pcmax_core::{Assignment, JobBits, JobSet, Schedule, Time};

use crate::enumerator::subset_sums;

/// Largest job count accepted by [`solve_two_machine`].
pub const TWO_MACHINE_CAPACITY: usize = 32;

/// Jobs on machine 0 and the resulting makespan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoWayPartition<B: JobBits> {
    pub set: JobSet<B>,
    pub makespan: Time,
}

impl<B: JobBits> TwoWayPartition<B> {
    pub fn into_schedule(self, jobs: usize) -> Schedule {
        Schedule {
            assignment: Assignment::new(self.set.to_two_way(jobs)),
            makespan: self.makespan,
        }
    }
}

/// Best partition of `durations` onto two machines whose makespan is
/// strictly below `bound`, or `None` if no such partition exists.
///
/// Job indices must fit into `B`; durations are not validated.
pub fn partition_below<B: JobBits>(durations: &[Time], bound: Time) -> Option<TwoWayPartition<B>> {
    let n = durations.len();
    debug_assert!(n <= B::CAPACITY);
    let total: Time = durations.iter().sum();
    let perfect0 = total / 2;
    let perfect1 = total - perfect0;
    if bound <= perfect1 {
        return None;
    }

    let mid = n / 2;
    let free = n.saturating_sub(1);
    let ascending = sorted_sums::<B>(durations, 0..mid, bound, false);
    let descending = sorted_sums::<B>(durations, mid..free, bound, true);

    let mut best = None;
    let mut upper = bound;
    let mut lower = total - bound;
    let (mut i, mut j) = (0, 0);
    while i < ascending.len() && j < descending.len() {
        let (set_a, sum_a) = ascending[i];
        let (set_b, sum_b) = descending[j];
        let x = sum_a + sum_b;
        if x <= lower {
            i += 1;
        } else if x < perfect0 {
            upper = total - x;
            lower = x;
            best = Some(set_a.union(set_b));
            i += 1;
        } else if x <= perfect1 {
            upper = perfect1;
            best = Some(set_a.union(set_b));
            break;
        } else if x < upper {
            upper = x;
            lower = total - x;
            best = Some(set_a.union(set_b));
            j += 1;
        } else {
            j += 1;
        }
    }
    best.map(|set| TwoWayPartition {
        set,
        makespan: upper,
    })
}

fn sorted_sums<B: JobBits>(
    durations: &[Time],
    range: std::ops::Range<usize>,
    bound: Time,
    descending: bool,
) -> Vec<(JobSet<B>, Time)> {
    let mut sums = subset_sums::<B>(durations, range, Some(bound));
    if descending {
        sums.sort_by_key(|&(_, sum)| std::cmp::Reverse(sum));
    } else {
        sums.sort_by_key(|&(_, sum)| sum);
    }
    sums
}

fn check_preconditions(durations: &[Time]) {
    assert!(
        (1..=TWO_MACHINE_CAPACITY).contains(&durations.len()),
        "two-machine solver takes 1 to {TWO_MACHINE_CAPACITY} jobs, got {}",
        durations.len()
    );
    assert!(
        durations.iter().all(|&d| d > 0),
        "two-machine solver requires positive durations"
    );
}

/// Optimal two-machine schedule of `durations`.
///
/// # Panics
///
/// Panics if there are no jobs, more than 32 jobs or a non-positive
/// duration.
///
/// # Example
///
/// ```
/// use pcmax_solver::solve_two_machine;
///
/// let schedule = solve_two_machine(&[5, 5, 5, 5]);
/// assert_eq!(schedule.makespan, 10);
/// assert_eq!(schedule.assignment.machine(3), 1);
/// ```
pub fn solve_two_machine(durations: &[Time]) -> Schedule {
    check_preconditions(durations);
    let total: Time = durations.iter().sum();
    // Everything on machine 1 is feasible, so the bounded search only
    // comes back empty if nothing beats it.
    partition_below::<u32>(durations, total + 1)
        .unwrap_or(TwoWayPartition {
            set: JobSet::empty(),
            makespan: total,
        })
        .into_schedule(durations.len())
}

/// Optimal two-machine schedule of `durations` if its makespan is strictly
/// below `bound`.
///
/// # Panics
///
/// Same preconditions as [`solve_two_machine`].
pub fn solve_two_machine_below(durations: &[Time], bound: Time) -> Option<Schedule> {
    check_preconditions(durations);
    partition_below::<u32>(durations, bound).map(|p| p.into_schedule(durations.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcmax_test::{brute_force_makespan, random_durations};

    #[test]
    fn test_equal_jobs_split_evenly() {
        let schedule = solve_two_machine(&[5, 5, 5, 5]);
        assert_eq!(schedule.makespan, 10);
        assert!(schedule.is_consistent(&[5, 5, 5, 5]));
    }

    #[test]
    fn test_last_job_on_machine_one() {
        for seed in 0..10 {
            let durations = random_durations(9, 40, seed);
            let schedule = solve_two_machine(&durations);
            assert_eq!(schedule.assignment.machine(8), 1);
        }
    }

    #[test]
    fn test_single_job() {
        let schedule = solve_two_machine(&[7]);
        assert_eq!(schedule.makespan, 7);
        assert_eq!(schedule.assignment.as_slice(), &[1]);
        assert!(solve_two_machine_below(&[7], 7).is_none());
    }

    #[test]
    fn test_odd_total_perfect_split() {
        let durations = [3, 3, 2, 1, 2];
        let schedule = solve_two_machine(&durations);
        assert_eq!(schedule.makespan, 6);
        assert!(schedule.is_consistent(&durations));
    }

    #[test]
    fn test_matches_brute_force() {
        for seed in 0..40 {
            let n = 2 + (seed as usize % 15);
            let durations = random_durations(n, 60, seed);
            let schedule = solve_two_machine(&durations);
            assert!(schedule.is_consistent(&durations), "seed {seed}");
            assert_eq!(
                schedule.makespan,
                brute_force_makespan(&durations, 2),
                "seed {seed}: {durations:?}"
            );
        }
    }

    #[test]
    fn test_bound_is_strict() {
        let durations = [8, 7, 6, 5, 4];
        let optimum = solve_two_machine(&durations).makespan;
        assert_eq!(optimum, 15);
        assert!(solve_two_machine_below(&durations, optimum).is_none());
        let schedule = solve_two_machine_below(&durations, optimum + 1).unwrap();
        assert_eq!(schedule.makespan, optimum);
    }

    #[test]
    fn test_skewed_instance() {
        let durations = [100, 1, 1, 1];
        let schedule = solve_two_machine(&durations);
        assert_eq!(schedule.makespan, 100);
        assert!(schedule.is_consistent(&durations));
    }

    #[test]
    fn test_wide_partition_uses_64_bits() {
        let durations = random_durations(40, 1000, 7);
        let total: Time = durations.iter().sum();
        let partition = partition_below::<u64>(&durations, total + 1).unwrap();
        let side: Time = partition.set.iter().map(|j| durations[j]).sum();
        assert_eq!(partition.makespan, side.max(total - side));
        assert!(partition.makespan - (total + 1) / 2 <= 1);
    }

    #[test]
    #[should_panic(expected = "two-machine solver takes")]
    fn test_rejects_too_many_jobs() {
        solve_two_machine(&[1; 33]);
    }
}
