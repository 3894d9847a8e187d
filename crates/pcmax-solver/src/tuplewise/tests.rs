//! Tests for the tuple-wise search.

use super::*;
use pcmax_test::{assert_valid_schedule, brute_force_makespan, random_input};

#[test]
fn test_whole_instance_tuple_is_exact() {
    for seed in 0..10 {
        let input = random_input(11, 4, 40, seed);
        let schedule = TuplewiseSearch::new(4).optimize(&input, None);
        assert_valid_schedule(&input, &schedule);
        assert_eq!(
            schedule.makespan,
            brute_force_makespan(input.durations(), 4),
            "seed {seed}"
        );
    }
}

#[test]
fn test_never_worse_than_pairwise() {
    for seed in 0..8 {
        let input = random_input(40, 8, 200, seed);
        let pairwise = pairwise::optimize_pairwise(&input, None);
        let tuplewise = optimize_tuplewise(&input, 3, 0, Some(1));
        assert_valid_schedule(&input, &tuplewise);
        assert!(tuplewise.makespan <= pairwise.makespan, "seed {seed}");
    }
}

#[test]
fn test_balanced_schedule_is_not_improved() {
    let input = Input::new(vec![5, 5, 5, 5], 2).unwrap();
    let balanced = Assignment::new(vec![0, 1, 0, 1]);
    assert!(improve_tuplewise(&input, &balanced, 4).is_none());
}

#[test]
fn test_local_optimum_is_idempotent() {
    let input = random_input(24, 6, 60, 3);
    let search = TuplewiseSearch::new(3);
    let first = search.optimize(&input, None);
    assert!(search.improve(&input, &first.assignment).is_none());
}

#[test]
fn test_improves_lopsided_start() {
    let input = Input::new(vec![6, 5, 4, 3, 3, 2, 1], 3).unwrap();
    let lopsided = Assignment::new(vec![0, 0, 0, 0, 0, 0, 1]);
    let schedule = improve_tuplewise(&input, &lopsided, 3).unwrap();
    assert_valid_schedule(&input, &schedule);
    assert_eq!(schedule.makespan, 8);
}

#[test]
fn test_sparse_tuple_spreads_jobs() {
    // Two jobs on machine 0, machines 1 and 2 empty.
    let input = Input::new(vec![4, 3, 2, 2], 3).unwrap();
    let start = Assignment::new(vec![0, 0, 1, 1]);
    let mut stats = SearchStats::default();
    let schedule = TuplewiseSearch::new(2).optimize_with_stats(&input, Some(&start), &mut stats);
    assert_valid_schedule(&input, &schedule);
    assert_eq!(schedule.makespan, 4);
    assert!(stats.moves_accepted >= 1);
}

#[test]
fn test_restarts_keep_best() {
    let input = random_input(30, 5, 100, 9);
    let plain = TuplewiseSearch::new(2).with_seed(1).optimize(&input, None);
    let restarted = TuplewiseSearch::new(2)
        .with_seed(1)
        .with_restarts(5)
        .optimize(&input, None);
    assert_valid_schedule(&input, &restarted);
    assert!(restarted.makespan <= plain.makespan);
}

#[test]
fn test_same_seed_same_schedule() {
    let input = random_input(30, 5, 100, 21);
    let search = TuplewiseSearch::new(3).with_seed(5).with_restarts(3);
    assert_eq!(search.optimize(&input, None), search.optimize(&input, None));
}

#[test]
fn test_approximate_neighborhoods_for_large_k() {
    let input = random_input(24, 6, 50, 17);
    let start = Assignment::round_robin(24, 6);
    let mut stats = SearchStats::default();
    let schedule = TuplewiseSearch::new(6)
        .with_attempts(4)
        .with_thread_count(ThreadCount::Count(2))
        .with_seed(11)
        .optimize_with_stats(&input, Some(&start), &mut stats);
    assert_valid_schedule(&input, &schedule);
    assert!(schedule.makespan <= start.makespan(input.durations()));
    if schedule.makespan > input.lower_bound() {
        assert!(stats.neighborhoods_evaluated >= 1);
    }
}

#[test]
fn test_approximation_is_reproducible_across_thread_counts() {
    let input = random_input(24, 6, 40, 5);
    let search = TuplewiseSearch::new(6).with_attempts(3).with_seed(2);
    let sequential = search
        .clone()
        .with_thread_count(ThreadCount::None)
        .optimize(&input, None);
    let parallel = search
        .with_thread_count(ThreadCount::Count(3))
        .optimize(&input, None);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_anchored_search_is_valid() {
    let input = random_input(40, 7, 90, 2);
    let schedule = TuplewiseSearch::new(3)
        .with_anchor_heaviest(true)
        .optimize(&input, None);
    assert_valid_schedule(&input, &schedule);
}

#[test]
fn test_oversized_tuple_is_skipped() {
    let mut durations = vec![1; 70];
    durations.push(100);
    let input = Input::new(durations, 2).unwrap();
    let mut machines = vec![0; 70];
    machines.push(1);
    let start = Assignment::new(machines);
    let mut stats = SearchStats::default();
    let schedule = TuplewiseSearch::new(2).optimize_with_stats(&input, Some(&start), &mut stats);
    assert_eq!(schedule.makespan, 100);
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_two_machine_tuple_above_pair_capacity_is_skipped() {
    // Machine 0 holds 40 unit jobs; machines 1 to 3 one long job each.
    let mut durations = vec![1; 40];
    durations.extend([30, 30, 30]);
    let input = Input::new(durations, 4).unwrap();
    let mut machines = vec![0; 40];
    machines.extend([1, 2, 3]);
    let start = Assignment::new(machines);
    let mut stats = SearchStats::default();
    let schedule = TuplewiseSearch::new(2).optimize_with_stats(&input, Some(&start), &mut stats);

    // Every pair with machine 0 has 41 jobs and is left alone.
    assert_eq!(schedule.assignment, start);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.exact.calls, 0);
}

#[test]
#[should_panic(expected = "at least 2 machines")]
fn test_rejects_k_below_two() {
    TuplewiseSearch::new(1);
}
