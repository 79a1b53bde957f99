//! Forest construction from the flat task collection.
//!
//! Tasks only know their parent. Each pass builds a `ChildIndex` (parent id to
//! positions in the input slice) and wraps tasks into owned `TaskNode` values,
//! so no node ever holds a reference back to its parent.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::fields::{DelaySeverity, OrphanPolicy, VarianceState};
use crate::rollup::Rollup;
use crate::task::{Task, TaskId};

/// A task with its children and the figures derived for it in this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskNode {
    pub task: Task,
    pub children: Vec<TaskNode>,
    pub rollup: Rollup,
    pub variance_state: VarianceState,
    pub delay: DelaySeverity,
}

impl TaskNode {
    /// Fresh node with zeroed figures.
    pub fn new(task: Task, children: Vec<TaskNode>) -> Self {
        TaskNode {
            task,
            children,
            rollup: Rollup::default(),
            variance_state: VarianceState::NoTimeLogged,
            delay: DelaySeverity::OnTime,
        }
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    pub fn subtask_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_count()).sum()
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: TaskId) -> Option<&TaskNode> {
        if self.task.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Find a node anywhere in a forest.
pub fn find_in_forest(forest: &[TaskNode], id: TaskId) -> Option<&TaskNode> {
    forest.iter().find_map(|n| n.find(id))
}

/// Map task ids to their positions in the slice.
pub fn index_by_id(tasks: &[Task]) -> HashMap<TaskId, usize> {
    let mut m = HashMap::with_capacity(tasks.len());
    for (i, t) in tasks.iter().enumerate() {
        m.insert(t.id, i);
    }
    m
}

/// Adjacency for one pass over a task slice. Child lists keep input order.
#[derive(Debug, Default)]
pub struct ChildIndex {
    children: HashMap<TaskId, Vec<usize>>,
    roots: Vec<usize>,
    orphans: Vec<usize>,
}

impl ChildIndex {
    pub fn build(tasks: &[Task]) -> Self {
        let ids = index_by_id(tasks);
        let mut index = ChildIndex::default();
        for (i, t) in tasks.iter().enumerate() {
            match t.parent_task_id {
                None => index.roots.push(i),
                Some(p) if ids.contains_key(&p) => index.children.entry(p).or_default().push(i),
                Some(_) => index.orphans.push(i),
            }
        }
        index
    }

    pub fn children_of(&self, id: TaskId) -> &[usize] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks without a parent reference.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Tasks whose parent is not in the slice.
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }

    /// Height of the subtree under `id` (0 for a leaf). Each task is visited once,
    /// so corrupt parent cycles cannot recurse forever.
    pub fn subtree_height(&self, tasks: &[Task], id: TaskId) -> u32 {
        let mut seen = HashSet::new();
        seen.insert(id);
        self.height_from(tasks, id, &mut seen)
    }

    fn height_from(&self, tasks: &[Task], id: TaskId, seen: &mut HashSet<TaskId>) -> u32 {
        let mut height = 0;
        for &i in self.children_of(id) {
            let child = tasks[i].id;
            if seen.insert(child) {
                height = height.max(1 + self.height_from(tasks, child, seen));
            }
        }
        height
    }

    /// Ids of every task under `id`, pre-order.
    pub fn descendants(&self, tasks: &[Task], id: TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);
        self.collect_descendants(tasks, id, &mut seen, &mut out);
        out
    }

    fn collect_descendants(
        &self,
        tasks: &[Task],
        id: TaskId,
        seen: &mut HashSet<TaskId>,
        out: &mut Vec<TaskId>,
    ) {
        for &i in self.children_of(id) {
            let child = tasks[i].id;
            if seen.insert(child) {
                out.push(child);
                self.collect_descendants(tasks, child, seen, out);
            }
        }
    }
}

/// Build the nodes whose parent is `parent_id`, each with its subtree.
///
/// With `parent_id == None` this is the whole forest: root tasks in input order,
/// followed by orphans when the policy promotes them. Tasks caught in a parent
/// cycle are unreachable from any root and never appear.
pub fn build_forest(tasks: &[Task], parent_id: Option<TaskId>, policy: OrphanPolicy) -> Vec<TaskNode> {
    let index = ChildIndex::build(tasks);
    let mut seen = HashSet::new();

    let start: Vec<usize> = match parent_id {
        Some(pid) => {
            seen.insert(pid);
            index.children_of(pid).to_vec()
        }
        None => {
            if !index.orphans().is_empty() {
                let ids: Vec<TaskId> = index.orphans().iter().map(|&i| tasks[i].id).collect();
                tracing::warn!(count = ids.len(), orphans = ?ids, policy = ?policy, "tasks reference a parent outside the collection");
            }
            let mut start = index.roots().to_vec();
            if policy == OrphanPolicy::Promote {
                start.extend_from_slice(index.orphans());
            }
            start
        }
    };

    let forest: Vec<TaskNode> = start
        .into_iter()
        .filter_map(|i| build_node(tasks, &index, i, &mut seen))
        .collect();

    if parent_id.is_none() {
        let trapped = trapped_tasks(tasks, &index, &seen, policy);
        if !trapped.is_empty() {
            tracing::warn!(count = trapped.len(), tasks = ?trapped, "tasks caught in a parent cycle were left out");
        }
        tracing::debug!(tasks = tasks.len(), roots = forest.len(), "forest built");
    }

    forest
}

fn build_node(tasks: &[Task], index: &ChildIndex, i: usize, seen: &mut HashSet<TaskId>) -> Option<TaskNode> {
    let task = &tasks[i];
    if !seen.insert(task.id) {
        return None;
    }
    let children = index
        .children_of(task.id)
        .iter()
        .filter_map(|&c| build_node(tasks, index, c, seen))
        .collect();
    Some(TaskNode::new(task.clone(), children))
}

/// Tasks the walk never reached that no excluded orphan accounts for.
fn trapped_tasks(tasks: &[Task], index: &ChildIndex, seen: &HashSet<TaskId>, policy: OrphanPolicy) -> Vec<TaskId> {
    let mut excluded = HashSet::new();
    if policy == OrphanPolicy::Exclude {
        for &o in index.orphans() {
            let id = tasks[o].id;
            excluded.insert(id);
            excluded.extend(index.descendants(tasks, id));
        }
    }
    tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| !seen.contains(id) && !excluded.contains(id))
        .collect()
}
