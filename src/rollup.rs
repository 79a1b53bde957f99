//! Bottom-up rollup of estimated and actual hours.

use serde::{Deserialize, Serialize};

use crate::tree::TaskNode;

/// Hour figures for one node. `own_actual_hours` is an input (set from the time
/// log); the rest are derived from it, the task's estimate, and the children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub own_actual_hours: f64,
    /// Own plus every descendant's logged hours.
    pub actual_hours: f64,
    /// Own plus every descendant's estimate, missing estimates counting as zero.
    pub estimated_hours_rollup: f64,
    /// `estimated_hours_rollup - actual_hours`. Negative means over budget.
    pub variance: f64,
    pub variance_percent: f64,
}

/// `variance / estimate * 100`, or 0 when there is no positive estimate.
pub fn variance_percent(variance: f64, estimated: f64) -> f64 {
    if estimated > 0.0 {
        variance / estimated * 100.0
    } else {
        0.0
    }
}

/// Post-order rollup: every child subtree is finished before its parent's totals
/// are taken. Consumes the node and returns a new one; nothing is shared between
/// calls.
pub fn compute_rollup(node: TaskNode) -> TaskNode {
    let TaskNode { task, children, rollup, variance_state, delay } = node;
    let children: Vec<TaskNode> = children.into_iter().map(compute_rollup).collect();

    let own_actual = rollup.own_actual_hours;
    let actual_hours = children.iter().fold(own_actual, |acc, c| acc + c.rollup.actual_hours);
    let estimated_hours_rollup = children
        .iter()
        .fold(task.estimated_hours.unwrap_or(0.0), |acc, c| acc + c.rollup.estimated_hours_rollup);
    let variance = estimated_hours_rollup - actual_hours;

    TaskNode {
        task,
        children,
        rollup: Rollup {
            own_actual_hours: own_actual,
            actual_hours,
            estimated_hours_rollup,
            variance,
            variance_percent: variance_percent(variance, estimated_hours_rollup),
        },
        variance_state,
        delay,
    }
}

/// Roll up every tree of a forest.
pub fn compute_forest_rollup(forest: Vec<TaskNode>) -> Vec<TaskNode> {
    forest.into_iter().map(compute_rollup).collect()
}
