//! Error types for pcmax

use thiserror::Error;

use crate::Time;

/// Main error type for pcmax operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcmaxError {
    /// A job was given a duration that is zero or negative
    #[error("job {job} has non-positive duration {duration}")]
    NonPositiveDuration { job: usize, duration: Time },

    /// Machine count outside `2..n`
    #[error("machine count {machines} must satisfy 2 <= m < n (n = {jobs})")]
    DegenerateMachineCount { machines: usize, jobs: usize },

    /// Assignment does not cover the jobs of an input
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
}

/// Result type alias for pcmax operations
pub type Result<T> = std::result::Result<T, PcmaxError>;
