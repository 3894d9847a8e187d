//! Mutable machine state for the local search engine.
//!
//! A [`Machine`] caches the load of its job list; every mutation goes
//! through methods that keep `load == sum of durations`. A
//! [`MachinePool`] additionally tracks the machines ordered by load.

use crate::{Assignment, Schedule, Time};

/// One machine: its stable id, job list and cached load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    id: usize,
    jobs: Vec<usize>,
    load: Time,
}

impl Machine {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            jobs: Vec::new(),
            load: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn jobs(&self) -> &[usize] {
        &self.jobs
    }

    pub fn load(&self) -> Time {
        self.load
    }

    pub fn push(&mut self, job: usize, durations: &[Time]) {
        self.jobs.push(job);
        self.load += durations[job];
    }

    /// Replaces the job list and recomputes the load.
    pub fn set_jobs(&mut self, jobs: Vec<usize>, durations: &[Time]) {
        self.load = jobs.iter().map(|&j| durations[j]).sum();
        self.jobs = jobs;
    }

}

/// All machines of a schedule plus their load ranking.
///
/// Rank 0 is the lightest machine, rank `m - 1` the heaviest. Ties are
/// broken by machine id so the ranking is deterministic.
#[derive(Debug, Clone)]
pub struct MachinePool {
    machines: Vec<Machine>,
    ranks: Vec<usize>,
}

impl MachinePool {
    /// Builds the pool for `assignment` over `machines` machines.
    pub fn new(durations: &[Time], machines: usize, assignment: &Assignment) -> Self {
        let mut pool: Vec<Machine> = (0..machines).map(Machine::new).collect();
        for (job, &machine) in assignment.as_slice().iter().enumerate() {
            pool[machine].push(job, durations);
        }
        let mut pool = Self {
            machines: pool,
            ranks: (0..machines).collect(),
        };
        pool.resort();
        pool
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Machine by id.
    pub fn machine(&self, id: usize) -> &Machine {
        &self.machines[id]
    }

    /// Machine id at load rank `rank`.
    pub fn id_at_rank(&self, rank: usize) -> usize {
        self.ranks[rank]
    }

    /// Machine at load rank `rank`.
    pub fn by_rank(&self, rank: usize) -> &Machine {
        &self.machines[self.ranks[rank]]
    }

    pub fn makespan(&self) -> Time {
        self.machines.iter().map(Machine::load).max().unwrap_or(0)
    }

    /// Loads indexed by machine id.
    pub fn loads(&self) -> Vec<Time> {
        self.machines.iter().map(Machine::load).collect()
    }

    /// Sum of squared deviations of the loads from `target`.
    pub fn balance_score(&self, target: Time) -> i128 {
        balance_score(self.machines.iter().map(Machine::load), target)
    }

    /// Replaces the jobs of machine `id`. Call [`resort`](Self::resort)
    /// once all changes of a move are applied.
    pub fn replace_jobs(&mut self, id: usize, jobs: Vec<usize>, durations: &[Time]) {
        self.machines[id].set_jobs(jobs, durations);
    }

    /// Re-establishes the load ranking.
    pub fn resort(&mut self) {
        let machines = &self.machines;
        self.ranks.sort_by_key(|&id| (machines[id].load, id));
    }

    /// Machine id of every job in `0..jobs`.
    pub fn to_assignment(&self, jobs: usize) -> Assignment {
        let mut assignment = vec![0; jobs];
        for machine in &self.machines {
            for &job in &machine.jobs {
                assignment[job] = machine.id;
            }
        }
        Assignment::new(assignment)
    }

    pub fn to_schedule(&self, jobs: usize) -> Schedule {
        Schedule {
            assignment: self.to_assignment(jobs),
            makespan: self.makespan(),
        }
    }
}

/// Sum of squared deviations of `loads` from `target`.
pub fn balance_score(loads: impl IntoIterator<Item = Time>, target: Time) -> i128 {
    loads
        .into_iter()
        .map(|load| {
            let d = i128::from(load - target);
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_ranks_by_load() {
        let durations = [4, 1, 3, 2];
        let pool = MachinePool::new(&durations, 3, &Assignment::new(vec![0, 1, 2, 1]));

        assert_eq!(pool.loads(), vec![4, 3, 3]);
        assert_eq!(pool.id_at_rank(0), 1);
        assert_eq!(pool.id_at_rank(1), 2);
        assert_eq!(pool.id_at_rank(2), 0);
        assert_eq!(pool.makespan(), 4);
    }

    #[test]
    fn test_replace_keeps_load_consistent() {
        let durations = [4, 1, 3, 2];
        let mut pool = MachinePool::new(&durations, 2, &Assignment::new(vec![0, 0, 1, 1]));
        pool.replace_jobs(0, vec![0], &durations);
        pool.replace_jobs(1, vec![1, 2, 3], &durations);
        pool.resort();

        assert_eq!(pool.machine(0).load(), 4);
        assert_eq!(pool.machine(1).load(), 6);
        assert_eq!(pool.id_at_rank(1), 1);
        assert_eq!(pool.to_assignment(4).as_slice(), &[0, 1, 1, 1]);
    }

    #[test]
    fn test_unchanged_pool_round_trips_assignment() {
        let durations = [1, 2, 3, 4, 5];
        let assignment = Assignment::new(vec![2, 0, 1, 1, 0]);
        let pool = MachinePool::new(&durations, 3, &assignment);
        assert_eq!(pool.to_assignment(5), assignment);
    }

    #[test]
    fn test_balance_score() {
        assert_eq!(balance_score([5, 7, 3], 5), 8);
        assert_eq!(balance_score(Vec::new(), 5), 0);
    }
}
