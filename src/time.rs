//! Per-task hour totals from raw time-log entries.
//!
//! Sums are plain `f64` accumulation in entry order with no rounding. Entries
//! without a task id count towards no task.

use std::collections::{HashMap, HashSet};

use crate::task::{TaskId, TimeLogEntry};
use crate::tree::TaskNode;

/// Hours logged directly against `task_id`.
pub fn own_actual_hours(task_id: TaskId, entries: &[TimeLogEntry]) -> f64 {
    entries
        .iter()
        .filter(|e| e.task_id == Some(task_id))
        .fold(0.0, |acc, e| acc + e.hours)
}

/// Own hours for every task that has entries, in one pass.
///
/// Each task's total accumulates in entry order, so it matches
/// `own_actual_hours` bit for bit.
pub fn hours_by_task(entries: &[TimeLogEntry]) -> HashMap<TaskId, f64> {
    let mut totals: HashMap<TaskId, f64> = HashMap::new();
    for e in entries {
        if let Some(id) = e.task_id {
            *totals.entry(id).or_insert(0.0) += e.hours;
        }
    }
    totals
}

/// Hours that none of `placed` can claim: entries with no task id, or with an
/// id outside the set. Pass the ids that actually made it into the forest so
/// hours on excluded orphans or cycle-trapped tasks are still accounted for.
pub fn unattributed_hours(entries: &[TimeLogEntry], placed: &HashSet<TaskId>) -> f64 {
    entries
        .iter()
        .filter(|e| e.task_id.map_or(true, |id| !placed.contains(&id)))
        .fold(0.0, |acc, e| acc + e.hours)
}

/// Ids of every node in a forest.
pub fn forest_task_ids(forest: &[TaskNode]) -> HashSet<TaskId> {
    fn collect(node: &TaskNode, out: &mut HashSet<TaskId>) {
        out.insert(node.task.id);
        node.children.iter().for_each(|c| collect(c, out));
    }
    let mut ids = HashSet::new();
    forest.iter().for_each(|n| collect(n, &mut ids));
    ids
}

/// Stamp each node's own logged hours from the per-task totals.
pub fn attach_own_hours(forest: Vec<TaskNode>, totals: &HashMap<TaskId, f64>) -> Vec<TaskNode> {
    forest
        .into_iter()
        .map(|mut node| {
            node.rollup.own_actual_hours = totals.get(&node.task.id).copied().unwrap_or(0.0);
            node.children = attach_own_hours(std::mem::take(&mut node.children), totals);
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn sums_only_matching_entries() {
        let entries = vec![log(1, 2.5), log(2, 4.0), log(1, 1.25), TimeLogEntry::new(None, 8.0)];
        assert_eq!(own_actual_hours(1, &entries), 3.75);
        assert_eq!(own_actual_hours(2, &entries), 4.0);
        assert_eq!(own_actual_hours(3, &entries), 0.0);
    }

    #[test]
    fn batch_totals_match_single_lookups() {
        let entries = vec![log(1, 0.1), log(1, 0.2), log(2, 0.3), log(1, 0.7)];
        let totals = hours_by_task(&entries);
        assert_eq!(totals[&1], own_actual_hours(1, &entries));
        assert_eq!(totals[&2], own_actual_hours(2, &entries));
        assert!(!totals.contains_key(&3));
    }

    #[test]
    fn keeps_full_precision() {
        let entries = vec![log(1, 0.1), log(1, 0.2)];
        assert_eq!(own_actual_hours(1, &entries), 0.1 + 0.2);
    }

    #[test]
    fn unattributed_counts_null_and_unplaced_tasks() {
        let placed = HashSet::from([1]);
        let entries = vec![log(1, 1.0), log(7, 2.0), TimeLogEntry::new(None, 3.0)];
        assert_eq!(unattributed_hours(&entries, &placed), 5.0);
    }

    #[test]
    fn forest_ids_cover_nested_nodes() {
        let tasks = vec![task(1, None, 0), task(2, Some(1), 1), task(3, Some(42), 1)];
        let forest = crate::tree::build_forest(&tasks, None, crate::fields::OrphanPolicy::Exclude);
        assert_eq!(forest_task_ids(&forest), HashSet::from([1, 2]));
    }
}
