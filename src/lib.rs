//! # task_rollup
//!
//! Hierarchical task and time-rollup engine. It takes a flat task collection
//! (each task pointing at an optional parent) plus raw time-log entries, and
//! produces a forest of `TaskNode`s carrying rolled-up hours, variance and
//! qualitative budget and schedule states.
//!
//! ## Pipeline
//!
//! 1. [`guard`]: depth and cycle checks; the only way a new parent edge is accepted
//! 2. [`tree`]: flat list to forest, via a per-pass child index
//! 3. [`time`]: own logged hours per task
//! 4. [`rollup`]: post-order sums of actual and estimated hours
//! 5. [`classify`]: over/under budget and due-date delay severity
//! 6. [`report`]: the composed pass, export rows, CSV and summary totals
//!
//! Everything in the pipeline is a pure function of its inputs. Nodes are built
//! fresh on every call and never cached; callers rebuild whenever tasks or time
//! logs change.
//!
//! ```
//! use chrono::NaiveDate;
//! use task_rollup::config::EngineConfig;
//! use task_rollup::report::build_annotated_forest;
//! use task_rollup::task::{Task, TimeLogEntry};
//!
//! let mut root = Task::new(1, 1, "Release");
//! root.estimated_hours = Some(10.0);
//! let mut child = Task::new(2, 1, "Docs");
//! child.parent_task_id = Some(1);
//! child.depth = 1;
//!
//! let logs = vec![TimeLogEntry::new(Some(2), 4.0)];
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let forest = build_annotated_forest(&[root, child], &logs, &EngineConfig::default(), today);
//! assert_eq!(forest[0].rollup.actual_hours, 4.0);
//! assert_eq!(forest[0].rollup.variance, 6.0);
//! ```

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod guard;
pub mod logging;
pub mod report;
pub mod rollup;
pub mod task;
pub mod time;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{EngineConfig, MAX_TASK_DEPTH};
pub use error::{Error, GuardError, Result};
pub use guard::{can_have_children, validate_reparenting, would_create_circular_reference};
pub use report::{build_annotated_forest, flatten_for_export, ExportRow};
pub use task::{Task, TaskId, TimeLogEntry};
pub use tree::{build_forest, TaskNode};
