//! Task and time-log data structures.
//!
//! This module defines the flat records the engine reads: `Task` (one work item
//! with an optional parent reference), `TimeLogEntry` (hours booked against a
//! task), and `Project` (only used to label export rows).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Status;

pub type TaskId = u64;
pub type ProjectId = u64;

/// A work item as held by the task store.
///
/// `depth` is 0 for root tasks and `parent.depth + 1` otherwise. The engine never
/// edits `estimated_hours`; own actual hours come from the time log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,
    #[serde(default)]
    pub depth: u32,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub primary_assignee_id: Option<u64>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// A root task with no estimate, status `new`.
    pub fn new(id: TaskId, project_id: ProjectId, name: impl Into<String>) -> Self {
        Task {
            id,
            project_id,
            parent_task_id: None,
            depth: 0,
            name: name.into(),
            category: None,
            status: Status::default(),
            primary_assignee_id: None,
            estimated_hours: None,
            due_date: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_task_id.is_none()
    }
}

/// Hours logged by someone, optionally against a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLogEntry {
    #[serde(default)]
    pub task_id: Option<TaskId>,
    pub hours: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimeLogEntry {
    pub fn new(task_id: Option<TaskId>, hours: f64) -> Self {
        TimeLogEntry { task_id, hours, date: None, user_id: None, description: None }
    }
}

/// Project label used by the export rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}
