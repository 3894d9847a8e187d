//! Human-readable schedule reports.

use std::fmt::Write;

use pcmax_core::{Input, Schedule, Time};

/// Renders `schedule` for `input`.
///
/// The report states the makespan and whether it matches the assignment,
/// the overtime over the lower bound with its relative gap, and one line
/// per machine (lightest first) with its overtime and 1-based job numbers.
///
/// ```text
/// makespan = 19 (valid)
/// overtime = 0 (0.0%)
///
/// machine  overtime  jobs
///       1        -2  [5, 6, 8, 9, 10]
///       2         0  [1, 2]
///       3         0  [3, 4, 7]
/// ```
///
/// # Panics
///
/// Panics if the assignment holds more jobs than `input`.
pub fn render(input: &Input, schedule: &Schedule) -> String {
    let durations = input.durations();
    let lower_bound = input.lower_bound();
    let mut out = String::new();

    let delta = schedule.assignment.makespan(durations) - schedule.makespan;
    if delta == 0 {
        let _ = writeln!(out, "makespan = {} (valid)", schedule.makespan);
    } else {
        let _ = writeln!(out, "makespan = {} (invalid! Δ = {delta})", schedule.makespan);
    }

    let overtime = schedule.overtime(input);
    let gap = 100.0 * overtime as f64 / lower_bound as f64;
    let _ = writeln!(out, "overtime = {overtime} ({}%)\n", significant(gap, 3));

    let machines = input.machine_count().max(schedule.assignment.machine_span());
    let mut rows: Vec<(Time, Vec<usize>)> = schedule
        .assignment
        .groups(machines)
        .into_iter()
        .map(|jobs| (jobs.iter().map(|&job| durations[job]).sum(), jobs))
        .collect();
    rows.sort_by_key(|(load, jobs)| (*load, jobs.first().copied().unwrap_or(usize::MAX)));

    let width = rows
        .iter()
        .map(|(load, _)| (load - lower_bound).to_string().len())
        .max()
        .unwrap_or(0)
        .max("overtime".len());
    let _ = writeln!(out, "machine  {:>width$}  jobs", "overtime");
    for (rank, (load, jobs)) in rows.iter().enumerate() {
        let numbers: Vec<String> = jobs.iter().map(|job| (job + 1).to_string()).collect();
        let _ = writeln!(
            out,
            "{:>7}  {:>width$}  [{}]",
            rank + 1,
            load - lower_bound,
            numbers.join(", ")
        );
    }
    out
}

/// Formats `value` with at most `digits` significant digits.
///
/// Values that already fit keep their shortest decimal form with at least
/// one fractional digit (`5.0`, `12.5`); longer ones are rounded and
/// printed without trailing padding (`33.3`, `150`).
fn significant(value: f64, digits: i32) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let mut plain = format!("{value}");
    if !plain.contains('.') {
        plain.push_str(".0");
    }
    let significant_digits = plain
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|&c| c == '0')
        .count()
        .max(1);
    if significant_digits <= digits as usize {
        return plain;
    }

    let mut magnitude = value.abs().log10().floor() as i32;
    loop {
        let decimals = digits - 1 - magnitude;
        let rounded = if decimals >= 0 {
            format!("{:.*}", decimals as usize, value)
        } else {
            let scale = 10f64.powi(-decimals);
            format!("{:.0}", (value / scale).round() * scale)
        };
        // Rounding may carry into a new leading digit (99.96 -> 100.0).
        let carried = rounded
            .parse::<f64>()
            .map_or(false, |r| r.abs() >= 10f64.powi(magnitude + 1));
        if !carried {
            return rounded;
        }
        magnitude += 1;
    }
}
