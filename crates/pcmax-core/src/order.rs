//! Job orderings for the exact solvers.
//!
//! The branch-and-bound solver prunes best when large jobs come first.
//! For four or more machines an interlaced descending order works better
//! than a plain descending one.

use std::cmp::Reverse;

use crate::Time;

/// Order in which jobs are presented to an exact solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum JobOrder {
    /// Descending for up to three machines, interlaced otherwise.
    #[default]
    Auto,

    /// Keep the caller's order.
    AsGiven,

    /// Longest job first.
    Descending,

    /// Descending, then every even rank followed by every odd rank.
    Interlaced,
}

impl JobOrder {
    /// Resolves `Auto` for the given machine count.
    pub fn resolve(self, machines: usize) -> JobOrder {
        match self {
            JobOrder::Auto if machines > 3 => JobOrder::Interlaced,
            JobOrder::Auto => JobOrder::Descending,
            other => other,
        }
    }

    /// Returns the job indices of `durations` in this order.
    pub fn permutation(self, durations: &[Time], machines: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..durations.len()).collect();
        match self.resolve(machines) {
            JobOrder::AsGiven => indices,
            JobOrder::Descending => {
                indices.sort_by_key(|&i| Reverse(durations[i]));
                indices
            }
            JobOrder::Interlaced => {
                indices.sort_by_key(|&i| Reverse(durations[i]));
                interlaced(&indices)
            }
            JobOrder::Auto => unreachable!("resolved above"),
        }
    }
}

impl std::fmt::Display for JobOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobOrder::Auto => write!(f, "Auto"),
            JobOrder::AsGiven => write!(f, "AsGiven"),
            JobOrder::Descending => write!(f, "Descending"),
            JobOrder::Interlaced => write!(f, "Interlaced"),
        }
    }
}

/// Takes the elements at even positions, then those at odd positions.
///
/// ```
/// use pcmax_core::order::interlaced;
///
/// assert_eq!(interlaced(&[6, 5, 4, 3, 2, 1]), vec![6, 4, 2, 5, 3, 1]);
/// assert_eq!(interlaced(&[3, 2, 1]), vec![3, 1, 2]);
/// ```
pub fn interlaced<T: Clone>(items: &[T]) -> Vec<T> {
    let half = items.len().div_ceil(2);
    (0..items.len())
        .map(|i| {
            if i < half {
                items[2 * i].clone()
            } else {
                items[2 * (i - half) + 1].clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolution() {
        assert_eq!(JobOrder::Auto.resolve(2), JobOrder::Descending);
        assert_eq!(JobOrder::Auto.resolve(3), JobOrder::Descending);
        assert_eq!(JobOrder::Auto.resolve(4), JobOrder::Interlaced);
        assert_eq!(JobOrder::AsGiven.resolve(5), JobOrder::AsGiven);
    }

    #[test]
    fn test_descending_is_stable() {
        let perm = JobOrder::Descending.permutation(&[2, 7, 2, 9], 2);
        assert_eq!(perm, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_interlaced_permutation() {
        let durations = [1, 2, 3, 4, 5];
        let perm = JobOrder::Interlaced.permutation(&durations, 4);
        let ordered: Vec<Time> = perm.iter().map(|&i| durations[i]).collect();
        assert_eq!(ordered, vec![5, 3, 1, 4, 2]);
    }

    #[test]
    fn test_interlaced_empty_and_single() {
        assert!(interlaced::<u8>(&[]).is_empty());
        assert_eq!(interlaced(&[7]), vec![7]);
    }
}
