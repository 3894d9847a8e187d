//! Problem instances.

use crate::error::{PcmaxError, Result};
use crate::order::JobOrder;
use crate::Time;

/// An immutable P||Cmax instance: job durations and a machine count.
///
/// Construction enforces that every duration is positive and that
/// `2 <= m < n`. Instances with fewer jobs than machines are trivial and
/// rejected.
///
/// # Example
///
/// ```
/// use pcmax_core::Input;
///
/// let input = Input::new(vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1], 3).unwrap();
/// assert_eq!(input.total(), 55);
/// assert_eq!(input.lower_bound(), 19);
///
/// assert!(Input::new(vec![1], 2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "InputRepr", into = "InputRepr")
)]
pub struct Input {
    durations: Vec<Time>,
    machines: usize,
    total: Time,
    lower_bound: Time,
}

impl Input {
    /// Creates a new instance, validating durations and machine count.
    pub fn new(durations: Vec<Time>, machines: usize) -> Result<Self> {
        if let Some((job, &duration)) = durations.iter().enumerate().find(|(_, &d)| d <= 0) {
            return Err(PcmaxError::NonPositiveDuration { job, duration });
        }
        if machines < 2 || machines >= durations.len() {
            return Err(PcmaxError::DegenerateMachineCount {
                machines,
                jobs: durations.len(),
            });
        }
        Ok(Self::new_unchecked(durations, machines))
    }

    fn new_unchecked(durations: Vec<Time>, machines: usize) -> Self {
        let total: Time = durations.iter().sum();
        let m = machines as Time;
        Self {
            durations,
            machines,
            total,
            lower_bound: (total + m - 1) / m,
        }
    }

    /// Returns all job durations in job order.
    pub fn durations(&self) -> &[Time] {
        &self.durations
    }

    /// Number of jobs (`n`).
    pub fn job_count(&self) -> usize {
        self.durations.len()
    }

    /// Number of machines (`m`).
    pub fn machine_count(&self) -> usize {
        self.machines
    }

    /// Sum of all durations.
    pub fn total(&self) -> Time {
        self.total
    }

    /// `ceil(total / m)`; no schedule can have a smaller makespan.
    pub fn lower_bound(&self) -> Time {
        self.lower_bound
    }

    /// Returns this instance with its jobs permuted by `order`.
    ///
    /// The second value maps each job of the returned instance to its index
    /// in `self`.
    pub fn reordered(&self, order: JobOrder) -> (Input, Vec<usize>) {
        let permutation = order.permutation(&self.durations, self.machines);
        let durations = permutation.iter().map(|&i| self.durations[i]).collect();
        (Self::new_unchecked(durations, self.machines), permutation)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct InputRepr {
    durations: Vec<Time>,
    machines: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<InputRepr> for Input {
    type Error = PcmaxError;

    fn try_from(repr: InputRepr) -> Result<Self> {
        Input::new(repr.durations, repr.machines)
    }
}

#[cfg(feature = "serde")]
impl From<Input> for InputRepr {
    fn from(input: Input) -> Self {
        InputRepr {
            durations: input.durations,
            machines: input.machines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_bound_rounds_up() {
        let input = Input::new(vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1], 3).unwrap();
        assert_eq!(input.lower_bound(), 19);

        let input = Input::new(vec![5, 5, 5, 5], 2).unwrap();
        assert_eq!(input.lower_bound(), 10);
    }

    #[test]
    fn test_rejects_single_job() {
        for m in 1..4 {
            assert!(matches!(
                Input::new(vec![1], m),
                Err(PcmaxError::DegenerateMachineCount { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_machine_count_not_below_job_count() {
        assert!(Input::new(vec![1, 2, 3], 3).is_err());
        assert!(Input::new(vec![1, 2, 3], 1).is_err());
        assert!(Input::new(vec![1, 2, 3], 2).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = Input::new(vec![4, 0, 2], 2).unwrap_err();
        assert_eq!(
            err,
            PcmaxError::NonPositiveDuration {
                job: 1,
                duration: 0
            }
        );
        assert!(Input::new(vec![4, -3, 2], 2).is_err());
    }

    #[test]
    fn test_reordered_keeps_bounds() {
        let input = Input::new(vec![1, 5, 3, 4], 2).unwrap();
        let (sorted, perm) = input.reordered(JobOrder::Descending);

        assert_eq!(sorted.durations(), &[5, 4, 3, 1]);
        assert_eq!(perm, vec![1, 3, 2, 0]);
        assert_eq!(sorted.lower_bound(), input.lower_bound());
    }
}
