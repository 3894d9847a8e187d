//! pcmax - makespan scheduling on identical parallel machines
//!
//! Loads an instance, runs the configured pipeline and prints the schedule.
//!
//! # Example
//!
//! ```rust
//! use pcmax::prelude::*;
//!
//! let input = pcmax::io::parse_input("2\n5\n5\n5\n5\n").unwrap();
//! let schedule = solve(&input);
//!
//! assert_eq!(schedule.makespan, 10);
//! assert!(pcmax::summary::render(&input, &schedule).starts_with("makespan = 10 (valid)"));
//! ```

// Data model
pub use pcmax_core::{
    Assignment, Input, JobOrder, JobSet, JobSet32, JobSet64, Machine, MachinePool, PcmaxError,
    Schedule, Time,
};

// Configuration
pub use pcmax_config::{
    ConfigError, EnvironmentMode, ExactConfig, InitialAssignment, PairwiseConfig, SolverConfig,
    ThreadCount, TuplewiseConfig,
};

// Solvers
pub use pcmax_solver::{
    improve_pairwise, improve_tuplewise, optimize_pairwise, optimize_tuplewise, solve,
    solve_exact, solve_two_machine, BranchAndBound, SearchStats, SolveResult, Solver,
    SubsetSumEnumerator, SumOrder, TuplewiseSearch,
};

#[cfg(feature = "console")]
pub mod console;
pub mod io;
mod run;
pub mod summary;

pub use io::{load_input, parse_input, LoadError};
pub use run::{run, run_file};

pub mod prelude {
    pub use super::{
        improve_pairwise, improve_tuplewise, optimize_pairwise, optimize_tuplewise, solve,
        solve_exact, solve_two_machine,
    };
    pub use super::{Assignment, Input, Schedule, SolveResult, Solver, SolverConfig, Time};
}
