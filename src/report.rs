//! Composed report pass and the flat export shape.
//!
//! `build_annotated_forest` is the one call a report view makes per render:
//! build, attach own hours, roll up, classify. `flatten_for_export` turns the
//! result into pre-order rows, which is the CSV contract.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::classify::classify_forest;
use crate::config::EngineConfig;
use crate::fields::{format_status, VarianceState};
use crate::rollup::{compute_forest_rollup, variance_percent};
use crate::task::{Project, ProjectId, Task, TimeLogEntry};
use crate::time::{attach_own_hours, forest_task_ids, hours_by_task, unattributed_hours};
use crate::tree::{build_forest, TaskNode};

pub const CSV_HEADER: &str = "Task,Project,Status,Estimated Hours,Actual Hours,Variance,Variance %";

/// Build the forest, roll it up and classify every node against `today`.
pub fn build_annotated_forest(
    tasks: &[Task],
    entries: &[TimeLogEntry],
    config: &EngineConfig,
    today: NaiveDate,
) -> Vec<TaskNode> {
    let forest = build_forest(tasks, None, config.orphan_policy);
    let forest = attach_own_hours(forest, &hours_by_task(entries));
    let forest = compute_forest_rollup(forest);
    classify_forest(forest, today)
}

/// Keep only tasks belonging to `project_ids`. Parents in other projects drop
/// out, so their children become orphans.
pub fn filter_projects(tasks: &[Task], project_ids: &[ProjectId]) -> Vec<Task> {
    if project_ids.is_empty() {
        return tasks.to_vec();
    }
    let wanted: HashSet<ProjectId> = project_ids.iter().copied().collect();
    tasks.iter().filter(|t| wanted.contains(&t.project_id)).cloned().collect()
}

/// One line of the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub indented_name: String,
    pub project_name: String,
    pub status: String,
    pub estimated_hours_rollup: f64,
    pub actual_hours: f64,
    pub variance: f64,
    pub variance_percent_formatted: String,
}

/// Pre-order rows, two spaces of indent per level below the forest roots.
pub fn flatten_for_export(forest: &[TaskNode], projects: &[Project]) -> Vec<ExportRow> {
    let names: HashMap<ProjectId, &str> = projects.iter().map(|p| (p.id, p.name.as_str())).collect();
    let mut rows = Vec::new();
    for root in forest {
        push_rows(root, 0, &names, &mut rows);
    }
    rows
}

fn push_rows(node: &TaskNode, level: usize, names: &HashMap<ProjectId, &str>, out: &mut Vec<ExportRow>) {
    let project_name = names
        .get(&node.task.project_id)
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("#{}", node.task.project_id));
    out.push(ExportRow {
        indented_name: format!("{}{}", "  ".repeat(level), node.task.name),
        project_name,
        status: format_status(node.task.status).to_string(),
        estimated_hours_rollup: node.rollup.estimated_hours_rollup,
        actual_hours: node.rollup.actual_hours,
        variance: node.rollup.variance,
        variance_percent_formatted: format_percent(node.rollup.variance_percent),
    });
    for child in &node.children {
        push_rows(child, level + 1, names, out);
    }
}

pub fn format_hours(h: f64) -> String {
    format!("{h:.2}")
}

pub fn format_percent(p: f64) -> String {
    format!("{p:.2}%")
}

/// Quote a field when it holds a comma, quote or newline; inner quotes doubled.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render rows as CSV text, header included.
pub fn rows_to_csv(rows: &[ExportRow]) -> String {
    let mut csv = String::new();
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_csv(&row.indented_name),
            escape_csv(&row.project_name),
            escape_csv(&row.status),
            format_hours(row.estimated_hours_rollup),
            format_hours(row.actual_hours),
            format_hours(row.variance),
            row.variance_percent_formatted,
        ));
    }
    csv
}

/// Totals over the forest roots plus per-state node counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_estimated_hours: f64,
    pub total_actual_hours: f64,
    pub total_variance: f64,
    pub variance_percent: f64,
    /// Logged hours no task in the forest can claim. Together with
    /// `total_actual_hours` this accounts for every logged hour.
    pub unattributed_hours: f64,
    pub over_budget: usize,
    pub under_budget: usize,
    pub on_track: usize,
    pub no_time_logged: usize,
}

impl ReportSummary {
    pub fn from_forest(forest: &[TaskNode], entries: &[TimeLogEntry]) -> Self {
        let mut s = ReportSummary {
            unattributed_hours: unattributed_hours(entries, &forest_task_ids(forest)),
            ..ReportSummary::default()
        };
        for root in forest {
            s.total_estimated_hours += root.rollup.estimated_hours_rollup;
            s.total_actual_hours += root.rollup.actual_hours;
            s.count(root);
        }
        s.total_variance = s.total_estimated_hours - s.total_actual_hours;
        s.variance_percent = variance_percent(s.total_variance, s.total_estimated_hours);
        s
    }

    fn count(&mut self, node: &TaskNode) {
        match node.variance_state {
            VarianceState::OverBudget => self.over_budget += 1,
            VarianceState::UnderBudget => self.under_budget += 1,
            VarianceState::OnTrack => self.on_track += 1,
            VarianceState::NoTimeLogged => self.no_time_logged += 1,
        }
        for child in &node.children {
            self.count(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{DelaySeverity, OrphanPolicy, Status};
    use crate::test_utils::*;

    fn today() -> NaiveDate {
        date(2024, 5, 1)
    }

    fn scenario() -> (Vec<Task>, Vec<TimeLogEntry>) {
        let tasks = vec![
            estimated(task(1, None, 0), 24.0),
            estimated(task(2, Some(1), 1), 16.0),
            estimated(task(3, Some(1), 1), 8.0),
        ];
        (tasks, vec![log(2, 10.0), log(2, 8.0)])
    }

    #[test]
    fn annotated_forest_carries_rollup_and_classification() {
        let (mut tasks, entries) = scenario();
        tasks[2].due_date = Some(date(2024, 4, 20));
        let forest = build_annotated_forest(&tasks, &entries, &EngineConfig::default(), today());
        let a = &forest[0];
        assert_eq!(a.rollup.actual_hours, 18.0);
        assert_eq!(a.rollup.estimated_hours_rollup, 48.0);
        assert_eq!(a.rollup.variance, 30.0);
        assert_eq!(a.variance_state, VarianceState::UnderBudget);
        assert_eq!(a.children[0].variance_state, VarianceState::OverBudget);
        assert_eq!(a.children[1].variance_state, VarianceState::NoTimeLogged);
        assert_eq!(a.children[1].delay, DelaySeverity::Severe);
    }

    #[test]
    fn export_rows_are_preorder_and_indented() {
        let tasks = vec![
            task(1, None, 0),
            task(2, Some(1), 1),
            task(3, Some(2), 2),
            task(4, Some(1), 1),
            task(5, None, 0),
        ];
        let forest = build_annotated_forest(&tasks, &[], &EngineConfig::default(), today());
        let projects = vec![Project { id: 1, name: "Apollo".into() }];
        let rows = flatten_for_export(&forest, &projects);
        let names: Vec<&str> = rows.iter().map(|r| r.indented_name.as_str()).collect();
        assert_eq!(names, vec!["Task 1", "  Task 2", "    Task 3", "  Task 4", "Task 5"]);
        assert!(rows.iter().all(|r| r.project_name == "Apollo"));
        assert_eq!(rows[0].variance_percent_formatted, "0.00%");
    }

    #[test]
    fn unknown_project_renders_id() {
        let forest = build_annotated_forest(&[task(1, None, 0)], &[], &EngineConfig::default(), today());
        let rows = flatten_for_export(&forest, &[]);
        assert_eq!(rows[0].project_name, "#1");
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let mut t = task(1, None, 0);
        t.name = "Design, \"v2\"".into();
        t.status = Status::InProgress;
        let t = estimated(t, 8.0);
        let forest = build_annotated_forest(&[t], &[log(1, 3.0)], &EngineConfig::default(), today());
        let csv = rows_to_csv(&flatten_for_export(&forest, &[]));
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("\"Design, \"\"v2\"\"\",#1,In Progress,8.00,3.00,5.00,62.50%"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn summary_totals_roots_and_counts_every_node() {
        let (tasks, mut entries) = scenario();
        entries.push(TimeLogEntry::new(None, 1.5));
        let forest = build_annotated_forest(&tasks, &entries, &EngineConfig::default(), today());
        let s = ReportSummary::from_forest(&forest, &entries);
        assert_eq!(s.total_estimated_hours, 48.0);
        assert_eq!(s.total_actual_hours, 18.0);
        assert_eq!(s.total_variance, 30.0);
        assert_eq!(s.variance_percent, 62.5);
        assert_eq!(s.unattributed_hours, 1.5);
        assert_eq!((s.over_budget, s.under_budget, s.on_track, s.no_time_logged), (1, 1, 0, 1));
    }

    #[test]
    fn hours_on_excluded_tasks_count_as_unattributed() {
        let tasks = vec![task(1, None, 0), task(2, Some(99), 1), task(3, Some(2), 2)];
        let entries = vec![log(1, 1.0), log(2, 5.0), log(3, 0.5)];
        let exclude = EngineConfig { orphan_policy: OrphanPolicy::Exclude, ..EngineConfig::default() };
        let forest = build_annotated_forest(&tasks, &entries, &exclude, today());
        let s = ReportSummary::from_forest(&forest, &entries);
        assert_eq!(s.total_actual_hours, 1.0);
        assert_eq!(s.unattributed_hours, 5.5);
        let logged = entries.iter().fold(0.0, |acc, e| acc + e.hours);
        assert_eq!(s.total_actual_hours + s.unattributed_hours, logged);

        let promote = build_annotated_forest(&tasks, &entries, &EngineConfig::default(), today());
        let s = ReportSummary::from_forest(&promote, &entries);
        assert_eq!(s.total_actual_hours, 6.5);
        assert_eq!(s.unattributed_hours, 0.0);
    }

    #[test]
    fn hours_on_cycle_trapped_tasks_count_as_unattributed() {
        let tasks = vec![task(1, None, 0), task(2, Some(3), 1), task(3, Some(2), 1)];
        let entries = vec![log(1, 2.0), log(2, 4.0)];
        let forest = build_annotated_forest(&tasks, &entries, &EngineConfig::default(), today());
        let s = ReportSummary::from_forest(&forest, &entries);
        assert_eq!(s.total_actual_hours, 2.0);
        assert_eq!(s.unattributed_hours, 4.0);
    }

    #[test]
    fn project_filter_orphans_follow_policy() {
        let mut tasks = vec![task(1, None, 0), task(2, Some(1), 1), task(3, Some(2), 2)];
        tasks[0].project_id = 7;
        let kept = filter_projects(&tasks, &[1]);
        assert_eq!(kept.len(), 2);

        let promote = build_annotated_forest(&kept, &[], &EngineConfig::default(), today());
        assert_eq!(promote.len(), 1);
        assert_eq!(promote[0].task.id, 2);

        let exclude = EngineConfig { orphan_policy: OrphanPolicy::Exclude, ..EngineConfig::default() };
        assert!(build_annotated_forest(&kept, &[], &exclude, today()).is_empty());
        assert_eq!(filter_projects(&tasks, &[]).len(), 3);
    }
}
