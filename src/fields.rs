//! Enumerations and field types for the rollup engine.
//!
//! This module defines the workflow status values carried by tasks, the orphan
//! handling policy used by the tree builder, and the two qualitative scales the
//! classifier maps rollups and due dates onto.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[serde(alias = "New")]
    New,
    #[serde(alias = "Backlog")]
    Backlog,
    #[serde(alias = "Todo")]
    Todo,
    Planned,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "InReview")]
    InReview,
    Testing,
    Blocked,
    #[serde(alias = "OnHold")]
    OnHold,
    Reopened,
    Resolved,
    #[serde(alias = "Done")]
    Done,
    Completed,
    Closed,
    Cancelled,
}

impl Status {
    /// Terminal states. Delay tracking is suppressed for these.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            Status::Resolved | Status::Done | Status::Completed | Status::Closed | Status::Cancelled
        )
    }
}

/// What the tree builder does with a task whose parent is not in the collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Place orphans at root level.
    #[default]
    Promote,
    /// Leave orphans (and their subtrees) out of the forest.
    Exclude,
}

/// Qualitative budget state of a rolled-up node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceState {
    OverBudget,
    UnderBudget,
    OnTrack,
    NoTimeLogged,
}

/// Schedule slip of a task against its due date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DelaySeverity {
    OnTime,
    Mild,
    Moderate,
    Severe,
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::New => "New",
        Status::Backlog => "Backlog",
        Status::Todo => "Todo",
        Status::Planned => "Planned",
        Status::InProgress => "In Progress",
        Status::InReview => "In Review",
        Status::Testing => "Testing",
        Status::Blocked => "Blocked",
        Status::OnHold => "On Hold",
        Status::Reopened => "Reopened",
        Status::Resolved => "Resolved",
        Status::Done => "Done",
        Status::Completed => "Completed",
        Status::Closed => "Closed",
        Status::Cancelled => "Cancelled",
    }
}

/// Format a variance state for display.
pub fn format_variance_state(v: VarianceState) -> &'static str {
    match v {
        VarianceState::OverBudget => "Over Budget",
        VarianceState::UnderBudget => "Under Budget",
        VarianceState::OnTrack => "On Track",
        VarianceState::NoTimeLogged => "No Time Logged",
    }
}

/// Format a delay severity for display.
pub fn format_delay(d: DelaySeverity) -> &'static str {
    match d {
        DelaySeverity::OnTime => "On Time",
        DelaySeverity::Mild => "Mild",
        DelaySeverity::Moderate => "Moderate",
        DelaySeverity::Severe => "Severe",
    }
}
