//! Depth and cycle validation for parent assignments.
//!
//! Every new parent edge goes through `validate_reparenting` (moving an existing
//! task) or `validate_new_child` (creating a task under a parent). Both reject the
//! assignment outright; nothing here repairs bad input.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::GuardError;
use crate::task::{Task, TaskId};
use crate::tree::{index_by_id, ChildIndex};

/// True when a child placed under `task` would still be within `max_depth`.
pub fn can_have_children(task: &Task, max_depth: u32) -> bool {
    task.depth < max_depth
}

/// True when making `candidate_parent_id` the parent of `moving_task_id` would
/// close a loop: the two are the same task, or the moving task already sits on
/// the candidate's ancestor chain.
///
/// The walk stops at the first task it has already visited, so it ends on any
/// input. A chain that loops without passing the moving task is corrupt and is
/// reported as circular. How long the chain is plays no part here; stored data
/// deeper than the current limit is left to the depth check.
pub fn would_create_circular_reference(
    candidate_parent_id: TaskId,
    moving_task_id: TaskId,
    all_tasks: &[Task],
) -> bool {
    let index = index_by_id(all_tasks);
    would_create_cycle_indexed(candidate_parent_id, moving_task_id, all_tasks, &index)
}

fn would_create_cycle_indexed(
    candidate_parent_id: TaskId,
    moving_task_id: TaskId,
    all_tasks: &[Task],
    index: &HashMap<TaskId, usize>,
) -> bool {
    let mut seen = HashSet::new();
    let mut cur = Some(candidate_parent_id);
    while let Some(id) = cur {
        if id == moving_task_id {
            return true;
        }
        if !seen.insert(id) {
            tracing::warn!(candidate_parent_id, moving_task_id, "ancestor chain loops, treating as circular");
            return true;
        }
        cur = index.get(&id).and_then(|&i| all_tasks[i].parent_task_id);
    }
    false
}

/// Creation-time check: may a new task be attached under `parent`?
pub fn validate_new_child(parent: &Task, max_depth: u32) -> Result<(), GuardError> {
    if can_have_children(parent, max_depth) {
        Ok(())
    } else {
        Err(GuardError::DepthExceeded { depth: parent.depth + 1, max: max_depth })
    }
}

/// Check that `task_id` may take `candidate_parent_id` as its parent
/// (`None` makes it a root, which is always allowed).
///
/// The whole moving subtree must fit: the task's new depth plus the height of
/// everything below it may not exceed `max_depth`.
pub fn validate_reparenting(
    task_id: TaskId,
    candidate_parent_id: Option<TaskId>,
    all_tasks: &[Task],
    max_depth: u32,
) -> Result<(), GuardError> {
    let index = index_by_id(all_tasks);
    if !index.contains_key(&task_id) {
        return Err(GuardError::TaskNotFound(task_id));
    }
    let Some(parent_id) = candidate_parent_id else {
        return Ok(());
    };
    let Some(&parent_idx) = index.get(&parent_id) else {
        return Err(GuardError::ParentNotFound(parent_id));
    };

    // Cycle first: it is the more specific failure.
    if would_create_cycle_indexed(parent_id, task_id, all_tasks, &index) {
        return Err(GuardError::CircularReference { task: task_id, parent: parent_id });
    }

    let new_depth = all_tasks[parent_idx].depth + 1;
    let height = ChildIndex::build(all_tasks).subtree_height(all_tasks, task_id);
    if new_depth + height > max_depth {
        return Err(GuardError::DepthExceeded { depth: new_depth + height, max: max_depth });
    }
    Ok(())
}

/// Validate and apply a parent change, updating the depth of the moved task and
/// every task below it. Returns the ids whose depth was rewritten.
pub fn apply_reparenting(
    tasks: &mut [Task],
    task_id: TaskId,
    candidate_parent_id: Option<TaskId>,
    max_depth: u32,
) -> Result<Vec<TaskId>, GuardError> {
    validate_reparenting(task_id, candidate_parent_id, tasks, max_depth)?;

    let index = index_by_id(tasks);
    let base = match candidate_parent_id {
        Some(pid) => tasks[index[&pid]].depth + 1,
        None => 0,
    };

    // Depths below the moved task are relative to it; compute before mutating.
    let children = ChildIndex::build(tasks);
    let mut new_depths = vec![(task_id, base)];
    let mut stack = vec![(task_id, base)];
    let mut seen = HashSet::from([task_id]);
    while let Some((id, depth)) = stack.pop() {
        for &c in children.children_of(id) {
            if !seen.insert(tasks[c].id) {
                continue;
            }
            let entry = (tasks[c].id, depth + 1);
            new_depths.push(entry);
            stack.push(entry);
        }
    }

    let moving = index[&task_id];
    tasks[moving].parent_task_id = candidate_parent_id;
    for &(id, depth) in &new_depths {
        tasks[index[&id]].depth = depth;
    }
    tracing::debug!(task_id, parent = ?candidate_parent_id, moved = new_depths.len(), "task reparented");
    Ok(new_depths.into_iter().map(|(id, _)| id).collect())
}

/// Depth derived from the parent chain, or `None` when the task is missing or
/// its chain loops. A parent outside the collection ends the chain.
pub fn resolved_depth(task_id: TaskId, all_tasks: &[Task]) -> Option<u32> {
    let index = index_by_id(all_tasks);
    resolved_depth_indexed(task_id, all_tasks, &index)
}

fn resolved_depth_indexed(task_id: TaskId, all_tasks: &[Task], index: &HashMap<TaskId, usize>) -> Option<u32> {
    let mut seen = HashSet::new();
    let mut depth = 0u32;
    let mut cur = all_tasks[*index.get(&task_id)?].parent_task_id;
    seen.insert(task_id);
    while let Some(pid) = cur {
        let Some(&i) = index.get(&pid) else { break };
        if !seen.insert(pid) {
            return None;
        }
        depth += 1;
        cur = all_tasks[i].parent_task_id;
    }
    Some(depth)
}

/// A stored task that breaks the forest's structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DepthViolation {
    /// Stored depth disagrees with the parent chain.
    DepthMismatch { task: TaskId, stored: u32, expected: u32 },
    OverMaxDepth { task: TaskId, depth: u32, max: u32 },
    /// The task's ancestor chain loops back on itself.
    InCycle { task: TaskId },
}

/// Audit a snapshot: every task's stored depth must be 0 for roots and
/// `parent.depth + 1` otherwise, no depth may exceed `max_depth`, and no chain
/// may loop. Orphans are checked against their own stored depth only.
pub fn depth_violations(all_tasks: &[Task], max_depth: u32) -> Vec<DepthViolation> {
    let index = index_by_id(all_tasks);
    let mut out = Vec::new();
    for t in all_tasks {
        if resolved_depth_indexed(t.id, all_tasks, &index).is_none() {
            out.push(DepthViolation::InCycle { task: t.id });
            continue;
        }
        let expected = match t.parent_task_id {
            None => Some(0),
            Some(pid) => index.get(&pid).map(|&i| all_tasks[i].depth + 1),
        };
        if let Some(expected) = expected {
            if t.depth != expected {
                out.push(DepthViolation::DepthMismatch { task: t.id, stored: t.depth, expected });
            }
        }
        if t.depth > max_depth {
            out.push(DepthViolation::OverMaxDepth { task: t.id, depth: t.depth, max: max_depth });
        }
    }
    out
}
