//! Solver engine for pcmax.
//!
//! This crate provides:
//! - [`SubsetSumEnumerator`]: ordered subset-sum streams for the exact solvers
//! - [`solve_two_machine`]: exact meet-in-the-middle partitioning on 2 machines
//! - [`BranchAndBound`]: exact search for up to 5 machines and 64 jobs
//! - [`optimize_pairwise`] and [`TuplewiseSearch`]: local search that
//!   re-optimizes groups of machines with the exact solvers
//! - [`Solver`]: the configured pipeline tying the phases together
//!
//! # Example
//!
//! ```
//! use pcmax_core::Input;
//! use pcmax_solver::solve;
//!
//! let input = Input::new(vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1], 3).unwrap();
//! let schedule = solve(&input);
//! assert_eq!(schedule.makespan, 19);
//! ```

pub mod enumerator;
pub mod exact;
pub mod exact2;
pub mod pairwise;
pub mod solver;
pub mod stats;
pub mod tuplewise;

pub use enumerator::{SubsetSumEnumerator, SumOrder};
pub use exact::{
    practical_job_capacity, solve_exact, BranchAndBound, EXACT_JOB_CAPACITY, MAX_EXACT_MACHINES,
};
pub use exact2::{
    partition_below, solve_two_machine, solve_two_machine_below, TwoWayPartition,
    TWO_MACHINE_CAPACITY,
};
pub use pairwise::{improve_pairwise, optimize_pairwise, optimize_pairwise_with_stats};
pub use solver::{solve, SolveResult, Solver};
pub use stats::{ExactStats, SearchStats};
pub use tuplewise::{improve_tuplewise, optimize_tuplewise, TuplewiseSearch};
