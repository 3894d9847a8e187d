//! Schedule assertions shared by solver tests.

use pcmax_core::{Input, Schedule};

/// Asserts that `schedule` assigns every job of `input` to one of its
/// machines, that its makespan matches the assignment and that it does not
/// beat the lower bound.
pub fn assert_valid_schedule(input: &Input, schedule: &Schedule) {
    if let Err(err) = schedule.assignment.validate(input) {
        panic!("invalid assignment: {err}");
    }
    assert_eq!(
        schedule.makespan,
        schedule.assignment.makespan(input.durations()),
        "stored makespan differs from the assignment's"
    );
    assert!(
        schedule.makespan >= input.lower_bound(),
        "makespan {} below lower bound {}",
        schedule.makespan,
        input.lower_bound()
    );
}
