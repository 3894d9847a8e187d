//! Shared test fixtures for pcmax crates.
//!
//! - [`instances`] - seeded random instances
//! - [`brute_force`] - exhaustive reference makespans
//! - [`assertions`] - schedule checks
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! pcmax-test = { workspace = true }
//! ```

pub mod assertions;
pub mod brute_force;
pub mod instances;

pub use assertions::assert_valid_schedule;
pub use brute_force::brute_force_makespan;
pub use instances::{random_durations, random_input};
