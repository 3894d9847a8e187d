//! Exact branch and bound for three to five machines.
//!
//! Machines are filled one at a time. The first job always goes to the
//! machine being filled; the rest of its load is drawn from two
//! [`SubsetSumEnumerator`]s, one ascending and one descending, so only
//! subsets whose sum lies in the feasible window
//! `[total - (m-1)(upper-1), upper)` are ever visited. The remaining jobs
//! are solved recursively with one machine less; two machines are handled
//! by [`partition_below`].
//!
//! Every recursion level knows the largest load already fixed by its
//! ancestors (the weakest link). Once the best makespan found reaches it,
//! nothing below can improve the overall schedule and the level stops.

use std::collections::VecDeque;

use pcmax_core::{Assignment, Input, JobOrder, JobSet64, Schedule, Time};
use tracing::{debug, trace};

use crate::enumerator::{SubsetSumEnumerator, SumOrder};
use crate::exact2::{partition_below, TWO_MACHINE_CAPACITY};
use crate::stats::ExactStats;

/// Largest job count accepted by [`BranchAndBound`].
pub const EXACT_JOB_CAPACITY: usize = 64;

/// Largest machine count accepted by [`BranchAndBound`].
pub const MAX_EXACT_MACHINES: usize = 5;

/// Largest job count for which [`BranchAndBound`] is practical on
/// `machines` machines.
///
/// Two-machine instances enumerate every subset sum of both job halves,
/// so memory and time double with every two extra jobs; they are limited
/// to [`TWO_MACHINE_CAPACITY`].
pub fn practical_job_capacity(machines: usize) -> usize {
    if machines == 2 {
        TWO_MACHINE_CAPACITY
    } else {
        EXACT_JOB_CAPACITY
    }
}

/// Branch-and-bound solver for up to 64 jobs on 2 to 5 machines.
///
/// Jobs are reordered according to `order` before the search, which has a
/// large effect on pruning, and the result is mapped back to input order.
///
/// # Example
///
/// ```
/// use pcmax_core::Input;
/// use pcmax_solver::BranchAndBound;
///
/// let input = Input::new((1..=10).rev().collect(), 3).unwrap();
/// let schedule = BranchAndBound::new().solve(&input, 25).unwrap();
/// assert_eq!(schedule.makespan, 19);
///
/// // Nothing beats the lower bound.
/// assert!(BranchAndBound::new().solve(&input, 19).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchAndBound {
    order: JobOrder,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: JobOrder) -> Self {
        Self { order }
    }

    /// Optimal schedule if its makespan is strictly below `upper`.
    ///
    /// # Panics
    ///
    /// Panics if the input has more than 64 jobs or more than 5 machines.
    ///
    /// # Cost
    ///
    /// On two machines every subset sum of each job half is materialized,
    /// about `2^(n/2)` entries per half. Beyond
    /// `practical_job_capacity(2)` jobs this exhausts memory.
    pub fn solve(&self, input: &Input, upper: Time) -> Option<Schedule> {
        self.solve_with_stats(input, upper, &mut ExactStats::default())
    }

    /// Like [`solve`](Self::solve), accumulating search counters into
    /// `stats`.
    pub fn solve_with_stats(
        &self,
        input: &Input,
        upper: Time,
        stats: &mut ExactStats,
    ) -> Option<Schedule> {
        let n = input.job_count();
        let m = input.machine_count();
        assert!(
            n <= EXACT_JOB_CAPACITY,
            "branch and bound takes at most {EXACT_JOB_CAPACITY} jobs, got {n}"
        );
        assert!(
            m <= MAX_EXACT_MACHINES,
            "branch and bound takes at most {MAX_EXACT_MACHINES} machines, got {m}"
        );
        stats.calls += 1;
        if upper <= input.lower_bound() {
            return None;
        }

        let (ordered, permutation) = input.reordered(self.order);
        let mut search = ExactSearch { stats };
        let (machines, makespan) =
            search.solve(ordered.durations(), m, upper, input.lower_bound())?;

        let mut assignment = vec![0; n];
        for (position, &job) in permutation.iter().enumerate() {
            assignment[job] = machines[position];
        }
        debug!(
            event = "exact_improved",
            jobs = n,
            machines = m,
            bound = upper,
            makespan = makespan,
            nodes = search.stats.nodes,
        );
        Some(Schedule {
            assignment: Assignment::new(assignment),
            makespan,
        })
    }
}

/// Optimal schedule of `input` if it beats `upper`, using the default job
/// order.
///
/// # Panics
///
/// Panics if the input has more than 64 jobs or more than 5 machines.
///
/// # Cost
///
/// Two-machine instances above 32 jobs take exponential memory; see
/// [`BranchAndBound::solve`].
pub fn solve_exact(input: &Input, upper: Time) -> Option<Schedule> {
    BranchAndBound::new().solve(input, upper)
}

/// Mutable state of one branch-and-bound run.
struct ExactSearch<'a> {
    stats: &'a mut ExactStats,
}

impl ExactSearch<'_> {
    /// Best assignment of `durations` onto `machines` machines with a
    /// makespan below `upper`, as machine indices per job.
    fn solve(
        &mut self,
        durations: &[Time],
        machines: usize,
        upper: Time,
        weakest: Time,
    ) -> Option<(Vec<usize>, Time)> {
        self.stats.nodes += 1;
        if machines == 2 {
            self.stats.leaves += 1;
            let partition = partition_below::<u64>(durations, upper)?;
            return Some((partition.set.to_two_way(durations.len()), partition.makespan));
        }
        let Some(&first) = durations.first() else {
            return (upper > 0).then_some((Vec::new(), 0));
        };

        let n = durations.len();
        let total: Time = durations.iter().sum();
        let others = (machines - 1) as Time;
        let initial_upper = upper;
        let mut upper = upper;
        let mut lower = total - others * (upper - 1);

        let mid = n.div_ceil(2);
        let mut ascending =
            SubsetSumEnumerator::new(durations, 1..mid, SumOrder::Ascending, Some(upper - first));
        let mut descending =
            SubsetSumEnumerator::new(durations, mid..n, SumOrder::Descending, Some(upper - first));
        let mut window: VecDeque<(JobSet64, Time)> = VecDeque::new();
        let mut best: Option<(JobSet64, Vec<usize>)> = None;

        'outer: while let Some((prefix, prefix_sum)) = ascending.pop() {
            let s0 = first + prefix_sum;
            if s0 >= upper {
                break;
            }
            while let Some(candidate) = descending.pop_if(|sum| sum >= lower - s0) {
                window.push_back(candidate);
            }
            while window.front().is_some_and(|&(_, sum)| sum >= upper - s0) {
                window.pop_front();
            }

            let current0 = prefix.with(0);
            for &(suffix, suffix_sum) in &window {
                let s = s0 + suffix_sum;
                if s >= upper {
                    continue;
                }
                if s < lower {
                    break;
                }
                let current = current0.union(suffix);
                let rest = without(durations, current);
                let Some((rest_machines, rest_makespan)) =
                    self.solve(&rest, machines - 1, upper, weakest.max(s))
                else {
                    continue;
                };
                let makespan = s.max(rest_makespan);
                if makespan < upper {
                    self.stats.improvements += 1;
                    trace!(event = "bound_tightened", machines = machines, makespan = makespan);
                    best = Some((current, rest_machines));
                    upper = makespan;
                    if upper <= weakest {
                        break 'outer;
                    }
                    lower = total - others * (upper - 1);
                }
            }
        }

        let (current, rest) = best?;
        debug_assert!(upper < initial_upper);
        Some((merge(current, &rest, n), upper))
    }
}

/// Durations of the jobs not in `set`, in order.
fn without(durations: &[Time], set: JobSet64) -> Vec<Time> {
    durations
        .iter()
        .enumerate()
        .filter(|&(job, _)| !set.contains(job))
        .map(|(_, &d)| d)
        .collect()
}

/// Puts the jobs of `current` on machine 0 and the others on
/// `1 + rest[k]`, `k` counting the jobs outside `current`.
fn merge(current: JobSet64, rest: &[usize], jobs: usize) -> Vec<usize> {
    let mut rest = rest.iter();
    (0..jobs)
        .map(|job| {
            if current.contains(job) {
                0
            } else {
                1 + rest.next().copied().unwrap_or_default()
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "exact_tests.rs"]
mod tests;
