#![allow(dead_code)]

use chrono::NaiveDate;
use task_rollup::task::{Task, TaskId, TimeLogEntry};

pub fn task(id: TaskId, parent: Option<TaskId>, depth: u32, estimate: Option<f64>) -> Task {
    let mut t = Task::new(id, 1, format!("T{id}"));
    t.parent_task_id = parent;
    t.depth = depth;
    t.estimated_hours = estimate;
    t
}

pub fn log(task_id: TaskId, hours: f64) -> TimeLogEntry {
    TimeLogEntry::new(Some(task_id), hours)
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}
