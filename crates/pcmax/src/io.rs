//! Plain-text instance files.
//!
//! The first line holds the machine count, every following line one job
//! duration. Blank lines are ignored.

use std::path::Path;

use pcmax_core::{Input, PcmaxError, Time};
use thiserror::Error;

/// Error raised while reading an instance.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected an integer, found {content:?}")]
    Parse { line: usize, content: String },

    #[error("instance is empty")]
    Empty,

    #[error("invalid instance: {0}")]
    Input(#[from] PcmaxError),
}

/// Reads an instance from `path`.
pub fn load_input(path: impl AsRef<Path>) -> Result<Input, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    parse_input(&contents)
}

/// Parses an instance from its text form.
///
/// # Example
///
/// ```
/// let input = pcmax::parse_input("3\n4\n2\n7\n1\n").unwrap();
/// assert_eq!(input.machine_count(), 3);
/// assert_eq!(input.durations(), &[4, 2, 7, 1]);
/// ```
pub fn parse_input(contents: &str) -> Result<Input, LoadError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line, first) = lines.next().ok_or(LoadError::Empty)?;
    let machines: usize = parse_field(line, first)?;
    let durations = lines
        .map(|(line, content)| parse_field::<Time>(line, content))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Input::new(durations, machines)?)
}

fn parse_field<T: std::str::FromStr>(line: usize, content: &str) -> Result<T, LoadError> {
    content.parse().map_err(|_| LoadError::Parse {
        line,
        content: content.to_string(),
    })
}
