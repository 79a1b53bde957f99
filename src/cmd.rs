//! Command implementations for the CLI interface.
//!
//! Each handler loads what it needs from the snapshot, runs the engine, and
//! prints or writes the result. Errors bubble up to `main`, which reports them
//! and exits non-zero.

use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use task_rollup::config::EngineConfig;
use task_rollup::db::Snapshot;
use task_rollup::error::{Error, Result};
use task_rollup::fields::{format_delay, format_status, format_variance_state};
use task_rollup::guard::{apply_reparenting, depth_violations, DepthViolation};
use task_rollup::report::{
    build_annotated_forest, filter_projects, flatten_for_export, format_hours, format_percent,
    rows_to_csv, ReportSummary,
};
use task_rollup::task::ProjectId;
use task_rollup::tree::TaskNode;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the task tree with rolled-up hours, variance and delay.
    Report {
        /// Restrict to these project IDs. May be repeated.
        #[arg(long = "project")]
        projects: Vec<ProjectId>,
        /// Reference date for delay: YYYY-MM-DD, "today", "yesterday" or "tomorrow".
        #[arg(long)]
        today: Option<String>,
    },

    /// Export the variance report to CSV.
    Export {
        /// Output file path (default: variance.csv)
        #[arg(long, short)]
        output: Option<String>,
        /// Restrict to these project IDs. May be repeated.
        #[arg(long = "project")]
        projects: Vec<ProjectId>,
    },

    /// Move a task under a new parent, or make it a root.
    Reparent {
        /// Task ID or name to move
        task: String,
        /// New parent task ID or name.
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        parent: Option<String>,
        /// Make the task a root.
        #[arg(long)]
        clear: bool,
    },

    /// Audit stored depths and parent chains.
    Check,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Print the annotated forest as an indented table followed by totals.
pub fn cmd_report(
    snapshot: &Snapshot,
    config: &EngineConfig,
    projects: Vec<ProjectId>,
    today: Option<String>,
) -> Result<()> {
    let today = match today {
        Some(s) => parse_date_input(&s)
            .ok_or_else(|| Error::Config(format!("Unrecognised date '{s}'. Use YYYY-MM-DD, 'today', 'yesterday' or 'tomorrow'.")))?,
        None => Local::now().date_naive(),
    };
    let tasks = filter_projects(&snapshot.tasks, &projects);
    let forest = build_annotated_forest(&tasks, &snapshot.time_logs, config, today);
    if forest.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!(
        "{:<5} {:<12} {:>9} {:>9} {:>9} {:>9} {:<15} {:<9} {}",
        "ID", "Status", "Est", "Actual", "Var", "Var %", "Budget", "Delay", "Task"
    );
    for root in &forest {
        print_node(root, 0);
    }

    let summary = ReportSummary::from_forest(&forest, &snapshot.time_logs);
    println!();
    println!(
        "Total: est {}h, actual {}h, variance {}h ({})",
        format_hours(summary.total_estimated_hours),
        format_hours(summary.total_actual_hours),
        format_hours(summary.total_variance),
        format_percent(summary.variance_percent),
    );
    println!(
        "Tasks: {} over budget, {} under budget, {} on track, {} with no time logged",
        summary.over_budget, summary.under_budget, summary.on_track, summary.no_time_logged
    );
    if summary.unattributed_hours > 0.0 {
        println!("Unattributed: {}h not tied to any listed task", format_hours(summary.unattributed_hours));
    }
    Ok(())
}

fn print_node(node: &TaskNode, level: usize) {
    let subtasks = if node.is_leaf() {
        String::new()
    } else {
        format!(" ({})", node.subtask_count())
    };
    println!(
        "{:<5} {:<12} {:>9} {:>9} {:>9} {:>9} {:<15} {:<9} {}{}{}",
        node.task.id,
        format_status(node.task.status),
        format_hours(node.rollup.estimated_hours_rollup),
        format_hours(node.rollup.actual_hours),
        format_hours(node.rollup.variance),
        format_percent(node.rollup.variance_percent),
        format_variance_state(node.variance_state),
        format_delay(node.delay),
        "  ".repeat(level),
        node.task.name,
        subtasks,
    );
    for child in &node.children {
        print_node(child, level + 1);
    }
}

/// Write the pre-order export rows as CSV.
pub fn cmd_export(
    snapshot: &Snapshot,
    config: &EngineConfig,
    output: Option<String>,
    projects: Vec<ProjectId>,
) -> Result<()> {
    let output_path = output.unwrap_or_else(|| "variance.csv".to_string());
    let tasks = filter_projects(&snapshot.tasks, &projects);
    let forest = build_annotated_forest(&tasks, &snapshot.time_logs, config, Local::now().date_naive());
    let rows = flatten_for_export(&forest, &snapshot.projects);
    std::fs::write(&output_path, rows_to_csv(&rows))
        .map_err(|source| Error::Io { path: output_path.clone().into(), source })?;
    println!("Exported {} row(s) to {}", rows.len(), output_path);
    Ok(())
}

/// Validate a parent change through the guard, apply it and save.
pub fn cmd_reparent(
    snapshot: &mut Snapshot,
    db_path: &Path,
    config: &EngineConfig,
    task: String,
    parent: Option<String>,
    clear: bool,
) -> Result<()> {
    let task_id = snapshot.resolve_task(&task).map_err(Error::Config)?;
    let parent_id = match parent {
        Some(p) if !clear => Some(snapshot.resolve_task(&p).map_err(Error::Config)?),
        _ => None,
    };

    let moved = apply_reparenting(&mut snapshot.tasks, task_id, parent_id, config.max_task_depth)?;
    snapshot.save(db_path)?;
    match parent_id {
        Some(pid) => println!("Moved task {task_id} under {pid} ({} task(s) re-levelled)", moved.len()),
        None => println!("Task {task_id} is now a root ({} task(s) re-levelled)", moved.len()),
    }
    Ok(())
}

/// Print structural violations. Exits 1 when any are found.
pub fn cmd_check(snapshot: &Snapshot, config: &EngineConfig) {
    let violations = depth_violations(&snapshot.tasks, config.max_task_depth);
    if violations.is_empty() {
        println!("OK: {} task(s), no depth or cycle violations.", snapshot.tasks.len());
        return;
    }
    for v in &violations {
        match v {
            DepthViolation::DepthMismatch { task, stored, expected } => {
                println!("Task {task}: stored depth {stored}, parent chain says {expected}")
            }
            DepthViolation::OverMaxDepth { task, depth, max } => {
                println!("Task {task}: depth {depth} exceeds maximum {max}")
            }
            DepthViolation::InCycle { task } => println!("Task {task}: parent chain loops"),
        }
    }
    eprintln!("{} violation(s) found.", violations.len());
    std::process::exit(1);
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Parse a reference date: "today", "yesterday", "tomorrow" or YYYY-MM-DD.
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();
    match s.as_str() {
        "today" => Some(today),
        "yesterday" => Some(today - Duration::days(1)),
        "tomorrow" => Some(today + Duration::days(1)),
        _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok(),
    }
}
