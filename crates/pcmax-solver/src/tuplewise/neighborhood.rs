//! Machine tuples visited by the tuple-wise search.

use smallvec::SmallVec;

/// Load ranks of the machines of one neighborhood, ascending.
pub type Tuple = SmallVec<[usize; 8]>;

/// All `k`-combinations of the ranks `0..machines`, extreme loads first.
///
/// Tuples are ordered by descending `sum |2 * rank - machines|`; the sort
/// is stable, so equally skewed tuples keep lexicographic order. With
/// `anchor_heaviest` only tuples containing the heaviest rank are kept.
pub fn rank_tuples(machines: usize, k: usize, anchor_heaviest: bool) -> Vec<Tuple> {
    let k = k.min(machines);
    let mut tuples = if anchor_heaviest && k > 0 {
        let heaviest = machines - 1;
        combinations(heaviest, k - 1)
            .into_iter()
            .map(|mut tuple| {
                tuple.push(heaviest);
                tuple
            })
            .collect()
    } else {
        combinations(machines, k)
    };
    tuples.sort_by_key(|tuple| std::cmp::Reverse(skew(tuple, machines)));
    tuples
}

fn skew(tuple: &Tuple, machines: usize) -> usize {
    tuple.iter().map(|&rank| (2 * rank).abs_diff(machines)).sum()
}

/// `k`-combinations of `0..n` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Tuple> {
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut current: Tuple = (0..k).collect();
    loop {
        result.push(current.clone());
        // Rightmost position that can still move.
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return result;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_count() {
        assert_eq!(combinations(5, 2).len(), 10);
        assert_eq!(combinations(6, 4).len(), 15);
        assert_eq!(combinations(3, 3).len(), 1);
        assert_eq!(combinations(4, 0).len(), 1);
        assert!(combinations(2, 3).is_empty());
    }

    #[test]
    fn test_extreme_ranks_first() {
        let tuples = rank_tuples(6, 2, false);
        assert_eq!(tuples.len(), 15);
        assert_eq!(tuples[0].as_slice(), &[0, 1]);
        assert_eq!(tuples[1].as_slice(), &[0, 5]);
        let last = tuples.last().unwrap();
        assert_eq!(skew(last, 6), 2);
    }

    #[test]
    fn test_anchored_tuples_contain_heaviest() {
        let tuples = rank_tuples(7, 3, true);
        assert_eq!(tuples.len(), 15);
        assert!(tuples.iter().all(|t| t.contains(&6)));
        assert!(tuples.iter().all(|t| t.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn test_k_capped_by_machines() {
        let tuples = rank_tuples(3, 4, false);
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0].as_slice(), &[0, 1, 2]);
    }
}
