//! Colored console output for solver events.
//!
//! Installs a `tracing` subscriber whose layer turns the lifecycle events
//! of `pcmax_solver` (solve and phase start/end, skipped neighborhoods)
//! into one colored line each. Set `RUST_LOG` to change the filter; the
//! default is `pcmax_solver=info`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const DEFAULT_DIRECTIVE: &str = "pcmax_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(
                DEFAULT_DIRECTIVE
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            )
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    SOLVE_START_NANOS.store(epoch.elapsed().as_nanos() as u64, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now = epoch.elapsed().as_nanos() as u64;
    now.saturating_sub(start) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("pcmax_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    machines_list: Option<String>,
    jobs: Option<u64>,
    machines: Option<u64>,
    tuples: Option<u64>,
    k: Option<u64>,
    capacity: Option<u64>,
    moves: Option<u64>,
    skipped: Option<u64>,
    nodes: Option<u64>,
    duration_ms: Option<u64>,
    seed: Option<u64>,
    makespan: Option<i64>,
    bound: Option<i64>,
    lower_bound: Option<i64>,
    proved_optimal: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "phase" => self.phase = Some(s.trim_matches('"').to_string()),
            "machines" => self.machines_list = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "jobs" => self.jobs = Some(value),
            "machines" => self.machines = Some(value),
            "tuples" => self.tuples = Some(value),
            "k" => self.k = Some(value),
            "capacity" => self.capacity = Some(value),
            "moves" => self.moves = Some(value),
            "skipped" => self.skipped = Some(value),
            "nodes" => self.nodes = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "seed" => self.seed = Some(value),
            _ => self.record_i64(field, value as i64),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "makespan" => self.makespan = Some(value),
            "bound" => self.bound = Some(value),
            "lower_bound" => self.lower_bound = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "proved_optimal" {
            self.proved_optimal = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => {
            mark_solve_start();
            format_solve_start(v)
        }
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "neighborhood_skipped" => format_skipped(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn time(value: Option<i64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |t| t.to_formatted_string(&Locale::en))
}

fn format_solve_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Solving │ {} jobs │ {} machines │ lower bound {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.jobs).bright_yellow(),
        count(v.machines).bright_yellow(),
        time(v.lower_bound).bright_magenta(),
    );
    if let Some(seed) = v.seed {
        output.push_str(&format!(" │ seed {}", seed.bright_black()));
    }
    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = if v.proved_optimal.unwrap_or(false) {
        "OPTIMAL".bright_green().bold().to_string()
    } else {
        "BEST FOUND".bright_yellow().bold().to_string()
    };
    let gap = match (v.makespan, v.lower_bound) {
        (Some(makespan), Some(lower_bound)) => makespan - lower_bound,
        _ => 0,
    };
    format!(
        "{} {} Solving complete │ makespan {} │ +{} over lower bound │ {} moves │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        time(v.makespan).white().bold(),
        gap.to_formatted_string(&Locale::en).yellow(),
        count(v.moves).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        status,
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let mut output = format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    );
    if let (Some(k), Some(tuples)) = (v.k, v.tuples) {
        output.push_str(&format!(
            " │ k = {} │ {} tuples",
            k.bright_yellow(),
            count(Some(tuples)).bright_yellow()
        ));
    }
    if let Some(makespan) = v.makespan.or(v.bound) {
        output.push_str(&format!(" │ makespan {}", time(Some(makespan)).white()));
    }
    output
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let mut output = format!(
        "{} {} {} ended │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    );
    if v.moves.is_some() {
        output.push_str(&format!(" │ {} moves", count(v.moves).white()));
    }
    if v.nodes.is_some() {
        output.push_str(&format!(
            " │ {} nodes",
            count(v.nodes).bright_magenta().bold()
        ));
    }
    if let Some(skipped) = v.skipped.filter(|&s| s > 0) {
        output.push_str(&format!(" │ {} skipped", count(Some(skipped)).bright_red()));
    }
    output.push_str(&format!(" │ makespan {}", time(v.makespan).bright_green()));
    output
}

fn format_skipped(v: &EventVisitor) -> String {
    format!(
        "{} {} Skipped machines {} │ {} jobs exceed capacity {}",
        format_elapsed(),
        "!".bright_red().bold(),
        v.machines_list.as_deref().unwrap_or("?"),
        count(v.jobs).bright_red(),
        count(v.capacity),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert!(INIT.get().is_some());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_phase_end_line() {
        let v = EventVisitor {
            phase: Some("Pairwise".to_string()),
            duration_ms: Some(12),
            moves: Some(1234),
            makespan: Some(19),
            ..visitor("phase_end")
        };
        let line = format_event(&v);
        assert!(line.contains("Pairwise"));
        assert!(line.contains("12ms"));
        assert!(line.contains("1,234"));
        assert!(line.contains("19"));
        assert!(!line.contains("nodes"));
    }

    #[test]
    fn test_solve_end_reports_optimality() {
        let v = EventVisitor {
            makespan: Some(20),
            lower_bound: Some(19),
            proved_optimal: Some(true),
            ..visitor("solve_end")
        };
        let line = format_event(&v);
        assert!(line.contains("OPTIMAL"));
        assert!(line.contains("over lower bound"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        assert!(format_event(&visitor("move")).is_empty());
        assert!(format_event(&EventVisitor::default()).is_empty());
    }
}
