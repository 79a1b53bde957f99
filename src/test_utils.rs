//! Builders shared by the unit tests.

use chrono::NaiveDate;

use crate::fields::Status;
use crate::task::{Task, TaskId, TimeLogEntry};

pub fn task(id: TaskId, parent: Option<TaskId>, depth: u32) -> Task {
    let mut t = Task::new(id, 1, format!("Task {id}"));
    t.parent_task_id = parent;
    t.depth = depth;
    t
}

pub fn estimated(mut t: Task, hours: f64) -> Task {
    t.estimated_hours = Some(hours);
    t
}

pub fn with_status(mut t: Task, status: Status) -> Task {
    t.status = status;
    t
}

pub fn log(task_id: TaskId, hours: f64) -> TimeLogEntry {
    TimeLogEntry::new(Some(task_id), hours)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}
