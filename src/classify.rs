//! Budget and schedule classification.
//!
//! The two scales are independent: a node can be under budget on hours and
//! severely late on its due date at the same time.

use chrono::NaiveDate;

use crate::fields::{DelaySeverity, Status, VarianceState};
use crate::rollup::Rollup;
use crate::tree::TaskNode;

/// Last day of delay still rated mild.
pub const MILD_MAX_DAYS: i64 = 3;
/// Last day of delay still rated moderate.
pub const MODERATE_MAX_DAYS: i64 = 6;

/// Budget state from rolled-up figures. Comparisons are exact.
pub fn classify_rollup(rollup: &Rollup) -> VarianceState {
    if rollup.actual_hours == 0.0 {
        VarianceState::NoTimeLogged
    } else if rollup.variance < 0.0 {
        VarianceState::OverBudget
    } else if rollup.variance > 0.0 {
        VarianceState::UnderBudget
    } else {
        VarianceState::OnTrack
    }
}

pub fn classify(node: &TaskNode) -> VarianceState {
    classify_rollup(&node.rollup)
}

/// Whole days past due; zero or negative when not yet due.
pub fn days_delayed(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days()
}

/// Delay severity for a task. Closed tasks and tasks without a due date are
/// always on time.
pub fn delay_severity(due: Option<NaiveDate>, today: NaiveDate, status: Status) -> DelaySeverity {
    if status.is_closed() {
        return DelaySeverity::OnTime;
    }
    let Some(due) = due else {
        return DelaySeverity::OnTime;
    };
    match days_delayed(due, today) {
        d if d <= 0 => DelaySeverity::OnTime,
        d if d <= MILD_MAX_DAYS => DelaySeverity::Mild,
        d if d <= MODERATE_MAX_DAYS => DelaySeverity::Moderate,
        _ => DelaySeverity::Severe,
    }
}

/// Stamp both classifications onto every node of an already rolled-up forest.
pub fn classify_forest(forest: Vec<TaskNode>, today: NaiveDate) -> Vec<TaskNode> {
    forest
        .into_iter()
        .map(|mut node| {
            node.variance_state = classify(&node);
            node.delay = delay_severity(node.task.due_date, today, node.task.status);
            node.children = classify_forest(std::mem::take(&mut node.children), today);
            node
        })
        .collect()
}
