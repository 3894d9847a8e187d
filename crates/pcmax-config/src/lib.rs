//! Configuration system for pcmax.
//!
//! Load solver configuration from TOML or YAML files to control the
//! refinement pipeline without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use pcmax_config::{SolverConfig, ThreadCount};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [tuplewise]
//!     k = 6
//!     restarts = 10
//!     thread_count = { count = 4 }
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.tuplewise.k, 6);
//! assert_eq!(config.tuplewise.thread_count, ThreadCount::Count(4));
//! assert!(config.exact.enabled);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use pcmax_config::SolverConfig;
//!
//! let config = SolverConfig::load("pcmax.toml").unwrap_or_default();
//! assert_eq!(config.tuplewise.k, 4);
//! ```

use std::path::Path;

use pcmax_core::JobOrder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Pairwise phase configuration.
    #[serde(default)]
    pub pairwise: PairwiseConfig,

    /// Exact branch-and-bound phase configuration.
    #[serde(default)]
    pub exact: ExactConfig,

    /// Tuple-wise phase configuration.
    #[serde(default)]
    pub tuplewise: TuplewiseConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Replaces the tuple-wise configuration.
    pub fn with_tuplewise(mut self, tuplewise: TuplewiseConfig) -> Self {
        self.tuplewise = tuplewise;
        self
    }

    /// Replaces the exact phase configuration.
    pub fn with_exact(mut self, exact: ExactConfig) -> Self {
        self.exact = exact;
        self
    }

    /// Seed to use for random decisions.
    ///
    /// Reproducible modes without an explicit seed use `0`.
    /// `None` means the caller should draw a fresh seed.
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(0),
        }
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tuplewise.k < 2 {
            return Err(ConfigError::Invalid(format!(
                "tuplewise.k must be at least 2, got {}",
                self.tuplewise.k
            )));
        }
        if self.tuplewise.attempts == 0 {
            return Err(ConfigError::Invalid(
                "tuplewise.attempts must be at least 1".to_string(),
            ));
        }
        if self.tuplewise.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "tuplewise.thread_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Reproducible, and every phase result is checked for consistency.
    FullAssert,
}

/// Pairwise phase configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PairwiseConfig {
    /// Starting assignment of the pairwise phase.
    #[serde(default)]
    pub initial: InitialAssignment,
}

/// How the starting assignment is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialAssignment {
    /// Job `i` on machine `i % m`.
    #[default]
    RoundRobin,

    /// Uniformly random machine per job.
    Random,
}

/// Exact branch-and-bound phase configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExactConfig {
    /// Whether bounded instances are certified with branch and bound.
    pub enabled: bool,

    /// Job order handed to the solver.
    pub job_order: JobOrder,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            job_order: JobOrder::Auto,
        }
    }
}

/// Tuple-wise phase configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TuplewiseConfig {
    /// Whether the phase runs on instances too large for the exact solver.
    pub enabled: bool,

    /// Machines per neighborhood.
    pub k: usize,

    /// Unimproved restarts before giving up.
    pub restarts: u32,

    /// Parallel attempts per neighborhood when `k >= 6`.
    pub attempts: usize,

    /// Only consider neighborhoods containing the heaviest machine.
    pub anchor_heaviest: bool,

    /// Worker threads for the approximate neighborhoods.
    pub thread_count: ThreadCount,
}

impl Default for TuplewiseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            k: 4,
            restarts: 0,
            attempts: 16,
            anchor_heaviest: false,
            thread_count: ThreadCount::Auto,
        }
    }
}

/// Thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Use the available CPU cores.
    #[default]
    Auto,

    /// Run attempts sequentially.
    None,

    /// Specific number of threads.
    Count(usize),
}

impl ThreadCount {
    /// Resolves to an actual number of threads for `tasks` tasks.
    pub fn resolve(&self, tasks: usize) -> usize {
        let wanted = match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            ThreadCount::None => 1,
            ThreadCount::Count(n) => *n,
        };
        wanted.min(tasks).max(1)
    }
}

impl std::fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadCount::Auto => write!(f, "Auto"),
            ThreadCount::None => write!(f, "None"),
            ThreadCount::Count(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests;
