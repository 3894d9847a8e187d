//! The configured solve pipeline.
//!
//! Every instance first goes through the pairwise search. Instances small
//! enough for branch and bound are then solved to optimality with the
//! pairwise makespan as the initial bound; larger ones are refined with
//! the tuple-wise search.

use std::time::Instant;

use pcmax_config::{EnvironmentMode, InitialAssignment, SolverConfig};
use pcmax_core::{Assignment, Input, Schedule};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::exact::{practical_job_capacity, BranchAndBound, MAX_EXACT_MACHINES};
use crate::pairwise;
use crate::stats::SearchStats;
use crate::tuplewise::TuplewiseSearch;

/// Result of [`Solver::solve`].
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub schedule: Schedule,
    /// Whether no schedule with a smaller makespan exists.
    pub proved_optimal: bool,
    pub stats: SearchStats,
}

/// Runs the phases selected by a [`SolverConfig`].
///
/// # Example
///
/// ```
/// use pcmax_config::SolverConfig;
/// use pcmax_core::Input;
/// use pcmax_solver::Solver;
///
/// let input = Input::new((1..=10).rev().collect(), 3).unwrap();
/// let result = Solver::new(SolverConfig::default()).solve(&input);
///
/// assert_eq!(result.schedule.makespan, 19);
/// assert!(result.proved_optimal);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, input: &Input) -> SolveResult {
        let seed = self.config.effective_seed().unwrap_or_else(rand::random);
        info!(
            event = "solve_start",
            jobs = input.job_count(),
            machines = input.machine_count(),
            lower_bound = input.lower_bound(),
            seed = seed,
        );

        let mut stats = SearchStats::default();
        stats.start();

        let initial = match self.config.pairwise.initial {
            InitialAssignment::RoundRobin => {
                Assignment::round_robin(input.job_count(), input.machine_count())
            }
            InitialAssignment::Random => Assignment::random(
                input.job_count(),
                input.machine_count(),
                &mut ChaCha8Rng::seed_from_u64(seed),
            ),
        };
        let mut schedule = pairwise::optimize_pairwise_with_stats(input, &initial, &mut stats);
        self.check(input, &schedule, "Pairwise");

        let mut proved_optimal = schedule.makespan == input.lower_bound();
        if !proved_optimal {
            if self.config.exact.enabled && exact_fits(input) {
                let exact = BranchAndBound::with_order(self.config.exact.job_order);
                let phase_start = Instant::now();
                info!(event = "phase_start", phase = "Exact", bound = schedule.makespan);
                if let Some(better) =
                    exact.solve_with_stats(input, schedule.makespan, &mut stats.exact)
                {
                    schedule = better;
                }
                self.check(input, &schedule, "Exact");
                info!(
                    event = "phase_end",
                    phase = "Exact",
                    duration_ms = phase_start.elapsed().as_millis() as u64,
                    nodes = stats.exact.nodes,
                    makespan = schedule.makespan,
                );
                proved_optimal = true;
            } else if self.config.tuplewise.enabled {
                let search = TuplewiseSearch::from_config(&self.config.tuplewise, seed)
                    .with_order(self.config.exact.job_order);
                schedule = search.optimize_with_stats(input, Some(&schedule.assignment), &mut stats);
                self.check(input, &schedule, "Tuplewise");
                proved_optimal = schedule.makespan == input.lower_bound();
            }
        }

        info!(
            event = "solve_end",
            makespan = schedule.makespan,
            lower_bound = input.lower_bound(),
            proved_optimal = proved_optimal,
            duration_ms = stats.elapsed().as_millis() as u64,
            moves = stats.moves_accepted,
        );
        SolveResult {
            schedule,
            proved_optimal,
            stats,
        }
    }

    fn check(&self, input: &Input, schedule: &Schedule, phase: &str) {
        if self.config.environment_mode != EnvironmentMode::FullAssert {
            return;
        }
        if let Err(err) = schedule.assignment.validate(input) {
            panic!("{phase} produced an invalid assignment: {err}");
        }
        assert!(
            schedule.is_consistent(input.durations()),
            "{phase} reported makespan {} but the assignment has {}",
            schedule.makespan,
            schedule.assignment.makespan(input.durations()),
        );
        assert!(
            schedule.makespan >= input.lower_bound(),
            "{phase} reported makespan {} below the lower bound {}",
            schedule.makespan,
            input.lower_bound(),
        );
    }
}

/// Whether branch and bound is run on `input` by the pipeline.
fn exact_fits(input: &Input) -> bool {
    input.machine_count() <= MAX_EXACT_MACHINES
        && input.job_count() <= practical_job_capacity(input.machine_count())
}

/// Solves `input` with the default configuration.
pub fn solve(input: &Input) -> Schedule {
    Solver::default().solve(input).schedule
}
