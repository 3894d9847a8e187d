//! Fixed-width job subsets for the exact solvers.
//!
//! Bit `i` set means job `i` belongs to the distinguished set (machine 0
//! in the two-machine case, the machine being filled in branch and bound).

use std::fmt::{self, Debug};

use num_traits::PrimInt;

/// Unsigned integer usable as backing storage of a [`JobSet`].
pub trait JobBits: PrimInt + Send + Sync + Debug + 'static {
    /// Number of jobs representable.
    const CAPACITY: usize;
}

impl JobBits for u32 {
    const CAPACITY: usize = 32;
}

impl JobBits for u64 {
    const CAPACITY: usize = 64;
}

/// A set of job indices below `B::CAPACITY`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JobSet<B: JobBits>(B);

/// Subsets for the two-machine solver.
pub type JobSet32 = JobSet<u32>;

/// Subsets for the branch-and-bound solver.
pub type JobSet64 = JobSet<u64>;

impl<B: JobBits> JobSet<B> {
    pub fn empty() -> Self {
        Self(B::zero())
    }

    /// Returns this set with `job` added.
    pub fn with(self, job: usize) -> Self {
        debug_assert!(job < B::CAPACITY, "job {job} out of range");
        Self(self.0 | (B::one() << job))
    }

    pub fn contains(self, job: usize) -> bool {
        job < B::CAPACITY && (self.0 >> job) & B::one() == B::one()
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0.is_zero()
    }

    /// Iterates member indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest.is_zero() {
                return None;
            }
            let job = rest.trailing_zeros() as usize;
            rest = rest & (rest - B::one());
            Some(job)
        })
    }

    /// Two-way assignment of `jobs` jobs: members to machine 0, the rest
    /// to machine 1.
    pub fn to_two_way(self, jobs: usize) -> Vec<usize> {
        (0..jobs).map(|i| usize::from(!self.contains(i))).collect()
    }
}

impl<B: JobBits> FromIterator<usize> for JobSet<B> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<B: JobBits> Debug for JobSet<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
