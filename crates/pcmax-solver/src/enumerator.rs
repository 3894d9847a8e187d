//! Lazy subset-sum enumeration.
//!
//! [`SubsetSumEnumerator`] yields every subset of a job range ordered by
//! sum without materializing all `2^n` subsets. The range is split into two
//! halves whose subset sums are generated and sorted up front; a binary heap
//! over `half0[i] + half1[j]` then produces the combined sums one at a time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Range;

use pcmax_core::{JobBits, JobSet, JobSet64, Time};

/// Direction in which sums are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumOrder {
    Ascending,
    Descending,
}

impl SumOrder {
    fn sort<B: JobBits>(self, subsets: &mut [(JobSet<B>, Time)]) {
        match self {
            SumOrder::Ascending => subsets.sort_by_key(|&(_, sum)| sum),
            SumOrder::Descending => subsets.sort_by_key(|&(_, sum)| std::cmp::Reverse(sum)),
        }
    }
}

/// All subsets of `durations[range]` with their sums, the empty subset
/// first.
///
/// With a `bound`, non-empty subsets whose sum reaches it are not
/// generated. Bit positions are global job indices.
pub(crate) fn subset_sums<B: JobBits>(
    durations: &[Time],
    range: Range<usize>,
    bound: Option<Time>,
) -> Vec<(JobSet<B>, Time)> {
    debug_assert!(range.end <= B::CAPACITY);
    let mut subsets = Vec::with_capacity(1 << range.len().min(16));
    subsets.push((JobSet::empty(), 0));
    for job in range {
        let d = durations[job];
        for k in 0..subsets.len() {
            let (set, sum) = subsets[k];
            let extended = sum + d;
            if bound.map_or(true, |b| extended < b) {
                subsets.push((set.with(job), extended));
            }
        }
    }
    subsets
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    key: Time,
    sum: Time,
    i0: usize,
    i1: usize,
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| other.i0.cmp(&self.i0))
            .then_with(|| other.i1.cmp(&self.i1))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered stream of the subset sums of a job range.
///
/// # Example
///
/// ```
/// use pcmax_solver::{SubsetSumEnumerator, SumOrder};
///
/// let durations = [3, 1, 2];
/// let sums: Vec<i64> = SubsetSumEnumerator::new(&durations, 0..3, SumOrder::Ascending, None)
///     .map(|(_, sum)| sum)
///     .collect();
/// assert_eq!(sums, vec![0, 1, 2, 3, 3, 4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct SubsetSumEnumerator {
    half0: Vec<(JobSet64, Time)>,
    half1: Vec<(JobSet64, Time)>,
    heap: BinaryHeap<Cursor>,
    order: SumOrder,
}

impl SubsetSumEnumerator {
    /// Creates an enumerator over the subsets of `durations[range]`.
    ///
    /// With a `bound`, subsets summing to `bound` or more are skipped where
    /// that is cheap: half subsets reaching it are never generated, and a
    /// descending enumerator drops leading sums that reach it. An
    /// ascending enumerator may still yield such sums at its tail.
    ///
    /// # Panics
    ///
    /// Panics if `range` reaches beyond 64 jobs.
    pub fn new(durations: &[Time], range: Range<usize>, order: SumOrder, bound: Option<Time>) -> Self {
        assert!(
            range.end <= u64::CAPACITY,
            "subset enumeration is limited to 64 jobs, got range {range:?}"
        );
        let mid = range.start + range.len() / 2;
        let mut half0 = subset_sums(durations, range.start..mid, bound);
        let mut half1 = subset_sums(durations, mid..range.end, bound);
        order.sort(&mut half0);
        order.sort(&mut half1);

        let mut enumerator = Self {
            heap: BinaryHeap::with_capacity(half0.len()),
            half0,
            half1,
            order,
        };
        for i0 in 0..enumerator.half0.len() {
            enumerator.push(i0, 0);
        }
        if let (SumOrder::Descending, Some(bound)) = (order, bound) {
            while enumerator.pop_if(|sum| sum >= bound).is_some() {}
        }
        enumerator
    }

    fn push(&mut self, i0: usize, i1: usize) {
        if i1 >= self.half1.len() {
            return;
        }
        let sum = self.half0[i0].1 + self.half1[i1].1;
        let key = match self.order {
            SumOrder::Ascending => -sum,
            SumOrder::Descending => sum,
        };
        self.heap.push(Cursor { key, sum, i0, i1 });
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of the next subset, if any.
    pub fn peek_sum(&self) -> Option<Time> {
        self.heap.peek().map(|cursor| cursor.sum)
    }

    /// Removes and returns the next subset with its sum.
    pub fn pop(&mut self) -> Option<(JobSet64, Time)> {
        let cursor = self.heap.pop()?;
        self.push(cursor.i0, cursor.i1 + 1);
        let set = self.half0[cursor.i0].0.union(self.half1[cursor.i1].0);
        Some((set, cursor.sum))
    }

    /// Pops the next subset only if its sum satisfies `accept`.
    pub fn pop_if(&mut self, accept: impl FnOnce(Time) -> bool) -> Option<(JobSet64, Time)> {
        match self.peek_sum() {
            Some(sum) if accept(sum) => self.pop(),
            _ => None,
        }
    }
}

impl Iterator for SubsetSumEnumerator {
    type Item = (JobSet64, Time);

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(enumerator: SubsetSumEnumerator) -> Vec<Time> {
        enumerator.map(|(_, sum)| sum).collect()
    }

    #[test]
    fn test_ascending_yields_every_subset_in_order() {
        let durations = [4, 7, 1, 9, 2];
        let got = sums(SubsetSumEnumerator::new(&durations, 0..5, SumOrder::Ascending, None));

        let mut expected: Vec<Time> = (0u32..32)
            .map(|mask| (0..5).filter(|&i| mask >> i & 1 == 1).map(|i| durations[i]).sum())
            .collect();
        expected.sort_unstable();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_descending_order() {
        let durations = [5, 3, 8];
        let got = sums(SubsetSumEnumerator::new(&durations, 0..3, SumOrder::Descending, None));
        assert_eq!(got, vec![16, 13, 11, 8, 8, 5, 3, 0]);
    }

    #[test]
    fn test_sets_match_sums_with_global_indices() {
        let durations = [100, 100, 6, 1, 3];
        let enumerator = SubsetSumEnumerator::new(&durations, 2..5, SumOrder::Ascending, None);
        for (set, sum) in enumerator {
            assert!(set.iter().all(|job| (2..5).contains(&job)));
            assert_eq!(set.iter().map(|job| durations[job]).sum::<Time>(), sum);
        }
    }

    #[test]
    fn test_descending_bound_drops_leading_sums() {
        let durations = [5, 3, 8];
        let mut enumerator =
            SubsetSumEnumerator::new(&durations, 0..3, SumOrder::Descending, Some(9));
        assert_eq!(enumerator.peek_sum(), Some(8));
        assert!(sums(enumerator.clone()).iter().all(|&sum| sum < 9));
        assert!(enumerator.pop_if(|sum| sum > 8).is_none());
        assert_eq!(enumerator.pop().map(|(_, sum)| sum), Some(8));
    }

    #[test]
    fn test_empty_range_yields_empty_subset() {
        let mut enumerator = SubsetSumEnumerator::new(&[1, 2], 1..1, SumOrder::Ascending, None);
        assert!(!enumerator.is_empty());
        let (set, sum) = enumerator.pop().unwrap();
        assert!(set.is_empty());
        assert_eq!(sum, 0);
        assert!(enumerator.is_empty());
        assert_eq!(enumerator.peek_sum(), None);
    }
}
