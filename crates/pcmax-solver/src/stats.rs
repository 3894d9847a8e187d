//! Search statistics.
//!
//! Plain counters threaded by `&mut` through the search loops and reported
//! in phase-end log events.

use std::time::{Duration, Instant};

/// Counters of the branch-and-bound solver.
///
/// # Example
///
/// ```
/// use pcmax_core::Input;
/// use pcmax_solver::{stats::ExactStats, BranchAndBound};
///
/// let input = Input::new(vec![3, 3, 2, 2, 2], 2).unwrap();
/// let mut stats = ExactStats::default();
/// BranchAndBound::new().solve_with_stats(&input, 12, &mut stats);
///
/// assert_eq!(stats.calls, 1);
/// assert_eq!(stats.leaves, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactStats {
    /// Top-level solver invocations.
    pub calls: u64,
    /// Recursion nodes visited, leaves included.
    pub nodes: u64,
    /// Two-machine base cases solved.
    pub leaves: u64,
    /// Times a better complete schedule tightened the bound.
    pub improvements: u64,
}

impl ExactStats {
    pub fn merge(&mut self, other: &ExactStats) {
        self.calls += other.calls;
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.improvements += other.improvements;
    }
}

/// Counters of the local search loops.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    start_time: Option<Instant>,
    /// Neighborhoods (machine pairs or tuples) re-optimized.
    pub neighborhoods_evaluated: u64,
    /// Strictly improving moves applied.
    pub moves_accepted: u64,
    /// Equal-quality moves applied by the approximate neighborhoods.
    pub sideways_moves: u64,
    /// Neighborhoods skipped because they exceed solver capacity.
    pub skipped: u64,
    /// Perturbation restarts performed.
    pub restarts: u64,
    /// Exact solver counters.
    pub exact: ExactStats,
}

impl SearchStats {
    /// Marks the start of the search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_evaluation(&mut self) {
        self.neighborhoods_evaluated += 1;
    }

    /// Records an applied move; `improving` is false for sideways moves.
    pub fn record_move(&mut self, improving: bool) {
        if improving {
            self.moves_accepted += 1;
        } else {
            self.sideways_moves += 1;
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_restart(&mut self) {
        self.restarts += 1;
    }

    /// Adds the counters of `other`, keeping this start time.
    pub fn merge(&mut self, other: &SearchStats) {
        self.neighborhoods_evaluated += other.neighborhoods_evaluated;
        self.moves_accepted += other.moves_accepted;
        self.sideways_moves += other.sideways_moves;
        self.skipped += other.skipped;
        self.restarts += other.restarts;
        self.exact.merge(&other.exact);
    }
}
