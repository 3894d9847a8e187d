//! Exhaustive reference solver for small instances.

use pcmax_core::Time;

/// Optimal makespan of `durations` on `machines` machines by depth-first
/// search.
///
/// Jobs are placed longest first. A job is never put on a machine whose
/// load equals that of an earlier machine, which removes permutations of
/// identical machines.
pub fn brute_force_makespan(durations: &[Time], machines: usize) -> Time {
    let mut sorted = durations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let mut loads = vec![0; machines.max(1)];
    let mut best: Time = sorted.iter().sum();
    place(&sorted, 0, &mut loads, 0, &mut best);
    best
}

fn place(jobs: &[Time], next: usize, loads: &mut [Time], current: Time, best: &mut Time) {
    if current >= *best {
        return;
    }
    let Some(&d) = jobs.get(next) else {
        *best = current;
        return;
    };
    for machine in 0..loads.len() {
        if loads[..machine].contains(&loads[machine]) {
            continue;
        }
        loads[machine] += d;
        place(jobs, next + 1, loads, current.max(loads[machine]), best);
        loads[machine] -= d;
    }
}
