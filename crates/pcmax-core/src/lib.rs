//! pcmax Core - data model for the P||Cmax makespan solver
//!
//! This crate provides the types shared by all solvers:
//! - [`Input`]: job durations and machine count with their lower bound
//! - [`Assignment`] and [`Schedule`]: solver results
//! - [`JobSet`]: fixed-width job subsets used by the exact solvers
//! - [`MachinePool`]: mutable machine state for local search
//! - [`JobOrder`]: job orderings that speed up the exact solvers

pub mod error;
pub mod input;
pub mod job_set;
pub mod machine;
pub mod order;
pub mod schedule;

pub use error::{PcmaxError, Result};
pub use input::Input;
pub use job_set::{JobBits, JobSet, JobSet32, JobSet64};
pub use machine::{balance_score, Machine, MachinePool};
pub use order::JobOrder;
pub use schedule::{Assignment, Schedule};

/// Job durations, machine loads and makespans.
pub type Time = i64;
