//! Assignments of jobs to machines and the schedules built from them.

use std::ops::Index;

use rand::Rng;

use crate::error::{PcmaxError, Result};
use crate::{Input, Time};

/// Maps every job index to a machine index in `0..m`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Assignment(Vec<usize>);

impl Assignment {
    pub fn new(machines: Vec<usize>) -> Self {
        Self(machines)
    }

    /// Job `i` goes to machine `i % m`.
    pub fn round_robin(jobs: usize, machines: usize) -> Self {
        Self((0..jobs).map(|i| i % machines).collect())
    }

    /// Every job goes to a uniformly random machine.
    pub fn random<R: Rng + ?Sized>(jobs: usize, machines: usize, rng: &mut R) -> Self {
        Self((0..jobs).map(|_| rng.random_range(0..machines)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Machine of `job`.
    pub fn machine(&self, job: usize) -> usize {
        self.0[job]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// Number of machines referenced (highest index + 1).
    pub fn machine_span(&self) -> usize {
        self.0.iter().max().map_or(0, |&m| m + 1)
    }

    /// Load of each machine `0..machines`.
    ///
    /// # Panics
    ///
    /// Panics if a job references a machine `>= machines`, or if
    /// `durations` is shorter than the assignment.
    pub fn loads(&self, durations: &[Time], machines: usize) -> Vec<Time> {
        let mut loads = vec![0; machines];
        for (job, &machine) in self.0.iter().enumerate() {
            loads[machine] += durations[job];
        }
        loads
    }

    /// Maximum machine load under `durations`.
    pub fn makespan(&self, durations: &[Time]) -> Time {
        self.loads(durations, self.machine_span())
            .into_iter()
            .max()
            .unwrap_or(0)
    }

    /// Jobs of each machine `0..machines`, in ascending job order.
    pub fn groups(&self, machines: usize) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); machines];
        for (job, &machine) in self.0.iter().enumerate() {
            groups[machine].push(job);
        }
        groups
    }

    /// Checks that this assignment covers exactly the jobs of `input` and
    /// only uses its machines.
    pub fn validate(&self, input: &Input) -> Result<()> {
        if self.0.len() != input.job_count() {
            return Err(PcmaxError::InvalidAssignment(format!(
                "covers {} jobs, input has {}",
                self.0.len(),
                input.job_count()
            )));
        }
        if let Some((job, &machine)) = self
            .0
            .iter()
            .enumerate()
            .find(|(_, &m)| m >= input.machine_count())
        {
            return Err(PcmaxError::InvalidAssignment(format!(
                "job {job} assigned to machine {machine}, input has {}",
                input.machine_count()
            )));
        }
        Ok(())
    }
}

impl Index<usize> for Assignment {
    type Output = usize;

    fn index(&self, job: usize) -> &usize {
        &self.0[job]
    }
}

impl From<Vec<usize>> for Assignment {
    fn from(machines: Vec<usize>) -> Self {
        Self(machines)
    }
}

/// An assignment paired with its makespan.
///
/// Schedules compare by makespan only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    pub assignment: Assignment,
    pub makespan: Time,
}

impl Schedule {
    /// Builds a schedule, computing the makespan from `durations`.
    pub fn evaluate(durations: &[Time], assignment: Assignment) -> Self {
        let makespan = assignment.makespan(durations);
        Self {
            assignment,
            makespan,
        }
    }

    /// Whether the stored makespan equals the recomputed one.
    pub fn is_consistent(&self, durations: &[Time]) -> bool {
        self.assignment.len() == durations.len()
            && self.assignment.makespan(durations) == self.makespan
    }

    /// Makespan minus the lower bound of `input`.
    pub fn overtime(&self, input: &Input) -> Time {
        self.makespan - input.lower_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_round_robin() {
        let a = Assignment::round_robin(5, 2);
        assert_eq!(a.as_slice(), &[0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_random_is_seedable() {
        let a = Assignment::random(50, 4, &mut ChaCha8Rng::seed_from_u64(7));
        let b = Assignment::random(50, 4, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|&m| m < 4));
    }

    #[test]
    fn test_loads_and_makespan() {
        let durations = [3, 1, 4, 1, 5];
        let a = Assignment::new(vec![0, 1, 1, 0, 2]);
        assert_eq!(a.loads(&durations, 3), vec![4, 5, 5]);
        assert_eq!(a.makespan(&durations), 5);
        assert_eq!(a.groups(3), vec![vec![0, 3], vec![1, 2], vec![4]]);
    }

    #[test]
    fn test_validate() {
        let input = Input::new(vec![1, 2, 3], 2).unwrap();
        assert!(Assignment::new(vec![0, 1, 1]).validate(&input).is_ok());
        assert!(Assignment::new(vec![0, 1]).validate(&input).is_err());
        assert!(Assignment::new(vec![0, 2, 1]).validate(&input).is_err());
    }

    #[test]
    fn test_schedule_consistency() {
        let durations = [5, 5, 5, 5];
        let s = Schedule::evaluate(&durations, Assignment::new(vec![0, 1, 0, 1]));
        assert_eq!(s.makespan, 10);
        assert!(s.is_consistent(&durations));

        let broken = Schedule {
            makespan: 9,
            ..s
        };
        assert!(!broken.is_consistent(&durations));
    }

    #[test]
    fn test_overtime_over_lower_bound() {
        let input = Input::new(vec![4, 3, 3, 2], 2).unwrap();
        let schedule = Schedule::evaluate(input.durations(), Assignment::new(vec![0, 0, 1, 1]));
        assert_eq!(schedule.makespan, 7);
        assert_eq!(schedule.overtime(&input), 1);
    }
}
