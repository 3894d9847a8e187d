//! Tuple-wise local search.
//!
//! Generalizes the pairwise search to neighborhoods of `k` machines. Each
//! tuple of load ranks (see [`rank_tuples`]) has its jobs re-optimized
//! together: exactly by [`BranchAndBound`] for `k <= 5`, approximately by
//! a batch of parallel randomized 4-machine searches for larger `k`. The
//! scan restarts from the first tuple after every strict improvement and
//! stops once a full pass finds none.
//!
//! Optional restarts perturb the best schedule found and search again
//! from the perturbed one.

mod approximate;
mod neighborhood;
mod restart;

pub use neighborhood::{rank_tuples, Tuple};

use std::time::Instant;

use pcmax_config::{ThreadCount, TuplewiseConfig};
use pcmax_core::{Assignment, Input, JobOrder, MachinePool, Schedule, Time};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::exact::{practical_job_capacity, BranchAndBound};
use crate::pairwise;
use crate::stats::SearchStats;

/// Neighborhood size used when none is configured.
pub const DEFAULT_K: usize = 4;

/// Smallest `k` whose neighborhoods are optimized approximately.
pub const APPROXIMATION_THRESHOLD: usize = 6;

/// Configured tuple-wise search.
///
/// # Example
///
/// ```
/// use pcmax_core::Input;
/// use pcmax_solver::TuplewiseSearch;
///
/// let input = Input::new(vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 1], 4).unwrap();
/// let schedule = TuplewiseSearch::new(4).with_seed(7).optimize(&input, None);
/// assert_eq!(schedule.makespan, input.lower_bound());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuplewiseSearch {
    k: usize,
    restarts: u32,
    attempts: usize,
    thread_count: ThreadCount,
    seed: u64,
    anchor_heaviest: bool,
    order: JobOrder,
}

impl Default for TuplewiseSearch {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl TuplewiseSearch {
    /// Creates a search over neighborhoods of `k` machines.
    ///
    /// # Panics
    ///
    /// Panics if `k < 2`.
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "tuple-wise neighborhoods need at least 2 machines, got {k}");
        Self {
            k,
            restarts: 0,
            attempts: 16,
            thread_count: ThreadCount::Auto,
            seed: 0,
            anchor_heaviest: false,
            order: JobOrder::Interlaced,
        }
    }

    /// Builds the search described by `config`.
    pub fn from_config(config: &TuplewiseConfig, seed: u64) -> Self {
        Self::new(config.k)
            .with_restarts(config.restarts)
            .with_attempts(config.attempts)
            .with_thread_count(config.thread_count)
            .with_anchor_heaviest(config.anchor_heaviest)
            .with_seed(seed)
    }

    /// Unimproved restarts before the search gives up.
    pub fn with_restarts(mut self, restarts: u32) -> Self {
        self.restarts = restarts;
        self
    }

    /// Parallel attempts per approximated neighborhood.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Restricts neighborhoods to tuples containing the heaviest machine.
    pub fn with_anchor_heaviest(mut self, anchor_heaviest: bool) -> Self {
        self.anchor_heaviest = anchor_heaviest;
        self
    }

    /// Job order handed to the exact solver.
    pub fn with_order(mut self, order: JobOrder) -> Self {
        self.order = order;
        self
    }

    /// Tuple-wise local optimum reached from `initial`, or from the
    /// pairwise optimum of a round-robin start when `None`.
    ///
    /// # Panics
    ///
    /// Panics if `initial` is not a valid assignment for `input`.
    pub fn optimize(&self, input: &Input, initial: Option<&Assignment>) -> Schedule {
        self.optimize_with_stats(input, initial, &mut SearchStats::default())
    }

    /// Tuple-wise local optimum reached from `assignment`, or `None` if it
    /// is returned unchanged.
    pub fn improve(&self, input: &Input, assignment: &Assignment) -> Option<Schedule> {
        let schedule = self.optimize(input, Some(assignment));
        (schedule.assignment != *assignment).then_some(schedule)
    }

    /// [`optimize`](Self::optimize) accumulating counters into `stats`.
    pub fn optimize_with_stats(
        &self,
        input: &Input,
        initial: Option<&Assignment>,
        stats: &mut SearchStats,
    ) -> Schedule {
        let initial = match initial {
            Some(assignment) => {
                if let Err(err) = assignment.validate(input) {
                    panic!("tuple-wise search needs a valid assignment: {err}");
                }
                assignment.clone()
            }
            None => {
                let start = Assignment::round_robin(input.job_count(), input.machine_count());
                pairwise::optimize_pairwise_with_stats(input, &start, stats).assignment
            }
        };

        let durations = input.durations();
        let machines = input.machine_count();
        let k = self.k.min(machines);
        let tuples = rank_tuples(machines, k, self.anchor_heaviest);
        let phase_start = Instant::now();
        info!(
            event = "phase_start",
            phase = "Tuplewise",
            k = k,
            tuples = tuples.len(),
            restarts = self.restarts,
            makespan = initial.makespan(durations),
        );

        let moves_before = stats.moves_accepted;
        let mut run = Run::new(self, input, k, tuples, stats);
        let mut best = MachinePool::new(durations, machines, &initial);
        run.descend(&mut best);

        let mut unimproved = 0;
        while unimproved < self.restarts && best.makespan() > input.lower_bound() {
            let mut candidate = best.clone();
            restart::perturb(&mut candidate, durations, input.lower_bound(), k, &mut run.rng);
            run.stats.record_restart();
            run.descend(&mut candidate);
            if candidate.makespan() < best.makespan() {
                debug!(
                    event = "restart_improved",
                    from = best.makespan(),
                    to = candidate.makespan(),
                    restarts = run.stats.restarts,
                );
                best = candidate;
                unimproved = 0;
            } else {
                unimproved += 1;
            }
        }

        let schedule = best.to_schedule(input.job_count());
        info!(
            event = "phase_end",
            phase = "Tuplewise",
            duration_ms = phase_start.elapsed().as_millis() as u64,
            moves = run.stats.moves_accepted - moves_before,
            skipped = run.stats.skipped,
            makespan = schedule.makespan,
        );
        schedule
    }

    /// Runs the tuple-wise scan on `pool` without restarts or logging.
    pub(crate) fn descend_pool(
        &self,
        input: &Input,
        pool: &mut MachinePool,
        stats: &mut SearchStats,
    ) -> u64 {
        let k = self.k.min(input.machine_count());
        let tuples = rank_tuples(input.machine_count(), k, self.anchor_heaviest);
        Run::new(self, input, k, tuples, stats).descend(pool)
    }
}

/// Tuple-wise local optimum of `input` with neighborhoods of `k` machines,
/// starting from the pairwise optimum.
///
/// `parallelism` caps the worker threads used for `k >= 6`; `None` uses
/// every available core.
pub fn optimize_tuplewise(
    input: &Input,
    k: usize,
    restarts: u32,
    parallelism: Option<usize>,
) -> Schedule {
    let thread_count = parallelism.map_or(ThreadCount::Auto, ThreadCount::Count);
    TuplewiseSearch::new(k)
        .with_restarts(restarts)
        .with_thread_count(thread_count)
        .optimize(input, None)
}

/// Tuple-wise local optimum reached from `assignment`, or `None` if no
/// neighborhood of `k` machines improves it.
pub fn improve_tuplewise(input: &Input, assignment: &Assignment, k: usize) -> Option<Schedule> {
    TuplewiseSearch::new(k).improve(input, assignment)
}

/// Result of re-optimizing one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Improved,
    Sideways,
    Unchanged,
}

/// State of one tuple-wise scan.
struct Run<'a> {
    search: &'a TuplewiseSearch,
    durations: &'a [Time],
    lower_bound: Time,
    tuples: Vec<Tuple>,
    exact: BranchAndBound,
    rng: ChaCha8Rng,
    workers: Option<rayon::ThreadPool>,
    stats: &'a mut SearchStats,
}

impl<'a> Run<'a> {
    fn new(
        search: &'a TuplewiseSearch,
        input: &'a Input,
        k: usize,
        tuples: Vec<Tuple>,
        stats: &'a mut SearchStats,
    ) -> Self {
        let workers = if k >= APPROXIMATION_THRESHOLD {
            approximate::build_workers(search.thread_count, search.attempts)
        } else {
            None
        };
        Self {
            search,
            durations: input.durations(),
            lower_bound: input.lower_bound(),
            tuples,
            exact: BranchAndBound::with_order(search.order),
            rng: ChaCha8Rng::seed_from_u64(search.seed),
            workers,
            stats,
        }
    }

    /// Scans the tuples until a full pass finds no strict improvement.
    /// Returns the number of moves applied.
    fn descend(&mut self, pool: &mut MachinePool) -> u64 {
        let mut moves = 0;
        'scan: while pool.makespan() > self.lower_bound {
            for index in 0..self.tuples.len() {
                match self.reoptimize(pool, index) {
                    Outcome::Improved => {
                        moves += 1;
                        continue 'scan;
                    }
                    Outcome::Sideways => moves += 1,
                    Outcome::Unchanged => {}
                }
            }
            break;
        }
        moves
    }

    fn reoptimize(&mut self, pool: &mut MachinePool, index: usize) -> Outcome {
        let ids: SmallVec<[usize; 8]> = self.tuples[index]
            .iter()
            .map(|&rank| pool.id_at_rank(rank))
            .collect();
        let worst = ids
            .iter()
            .map(|&id| pool.machine(id).load())
            .max()
            .unwrap_or(0);
        let mut jobs = Vec::new();
        let mut local_machines = Vec::new();
        for (slot, &id) in ids.iter().enumerate() {
            for &job in pool.machine(id).jobs() {
                jobs.push(job);
                local_machines.push(slot);
            }
        }
        trace!(
            event = "tuple",
            machines = ?ids.as_slice(),
            jobs = jobs.len(),
            worst = worst,
        );

        if jobs.len() <= ids.len() {
            return self.spread(pool, &ids, &jobs, worst);
        }
        let exact = ids.len() < APPROXIMATION_THRESHOLD;
        let capacity = practical_job_capacity(ids.len());
        if exact && jobs.len() > capacity {
            self.stats.record_skip();
            warn!(
                event = "neighborhood_skipped",
                machines = ?ids.as_slice(),
                jobs = jobs.len(),
                capacity = capacity,
            );
            return Outcome::Unchanged;
        }

        let local: Vec<Time> = jobs.iter().map(|&job| self.durations[job]).collect();
        let Ok(sub) = Input::new(local, ids.len()) else {
            return Outcome::Unchanged;
        };
        self.stats.record_evaluation();

        let (assignment, outcome) = if exact {
            match self.exact.solve_with_stats(&sub, worst, &mut self.stats.exact) {
                Some(schedule) => (schedule.assignment, Outcome::Improved),
                None => return Outcome::Unchanged,
            }
        } else {
            let current = Assignment::new(local_machines);
            match self.approximate(pool, &ids, &sub, &current, worst) {
                Some(found) => found,
                None => return Outcome::Unchanged,
            }
        };

        apply(pool, &ids, &jobs, &assignment, self.durations);
        self.stats.record_move(outcome == Outcome::Improved);
        debug!(
            event = "move",
            neighborhood = "tuple",
            machines = ?ids.as_slice(),
            from = worst,
            improving = outcome == Outcome::Improved,
            makespan = pool.makespan(),
        );
        outcome
    }

    /// Handles a tuple with at most one job per machine: the optimum puts
    /// every job on its own machine.
    fn spread(
        &mut self,
        pool: &mut MachinePool,
        ids: &[usize],
        jobs: &[usize],
        worst: Time,
    ) -> Outcome {
        let longest = jobs
            .iter()
            .map(|&job| self.durations[job])
            .max()
            .unwrap_or(0);
        if longest >= worst {
            return Outcome::Unchanged;
        }
        let one_each = Assignment::new((0..jobs.len()).collect());
        apply(pool, ids, jobs, &one_each, self.durations);
        self.stats.record_move(true);
        Outcome::Improved
    }
}

/// Writes the local `assignment` of `jobs` back onto the machines `ids`.
fn apply(
    pool: &mut MachinePool,
    ids: &[usize],
    jobs: &[usize],
    assignment: &Assignment,
    durations: &[Time],
) {
    let mut groups = vec![Vec::new(); ids.len()];
    for (local, &job) in jobs.iter().enumerate() {
        groups[assignment.machine(local)].push(job);
    }
    for (&id, group) in ids.iter().zip(groups) {
        pool.replace_jobs(id, group, durations);
    }
    pool.resort();
}

#[cfg(test)]
mod tests;
