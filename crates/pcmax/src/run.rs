//! Entry points that hide the solver wiring.

use std::path::Path;

use pcmax_config::SolverConfig;
use pcmax_core::Input;
use pcmax_solver::{SolveResult, Solver};
use tracing::debug;

use crate::io::{load_input, LoadError};

/// Solves `input` with the configuration in `solver.toml`, falling back to
/// the defaults when that file is missing or invalid.
///
/// With the `console` feature, console output is initialized first.
pub fn run(input: &Input) -> SolveResult {
    #[cfg(feature = "console")]
    crate::console::init();

    let config = match SolverConfig::load("solver.toml") {
        Ok(config) => config,
        Err(err) => {
            debug!(event = "default_config", reason = %err);
            SolverConfig::default()
        }
    };
    Solver::new(config).solve(input)
}

/// Loads the instance at `path` and solves it with [`run`].
pub fn run_file(path: impl AsRef<Path>) -> Result<(Input, SolveResult), LoadError> {
    let input = load_input(path)?;
    let result = run(&input);
    Ok((input, result))
}
