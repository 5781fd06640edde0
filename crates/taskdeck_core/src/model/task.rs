//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted by the store.
//! - Provide the status mutators that own the completion invariant.
//!
//! # Invariants
//! - `title` is never empty.
//! - `completed_at` is `Some` exactly when `status == Completed`; only
//!   `mark_completed`/`mark_pending` may change either field.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::entity::{now, EntityMeta};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A single TODO item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identity and audit timestamps shared with every stored entity.
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Non-empty display string.
    pub title: String,
    pub status: TaskStatus,
    /// Free-form grouping label; no project entity exists to reference.
    pub project_name: Option<String>,
    /// Free-form priority label, e.g. "urgent" / "not urgent".
    pub priority: Option<String>,
    pub duedatetime: Option<NaiveDateTime>,
    /// Set when the task transitions to completed, cleared on reopen.
    pub completed_at: Option<NaiveDateTime>,
}

/// Invariant violations detected by `Task::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    /// `completed_at` presence disagrees with `status`.
    CompletionMismatch,
    UpdatedBeforeCreated,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::CompletionMismatch => {
                write!(f, "completed_at must be set exactly when status is completed")
            }
            Self::UpdatedBeforeCreated => {
                write!(f, "updated_at cannot be earlier than created_at")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a new pending task with fresh identity metadata.
    ///
    /// The caller is responsible for registering the task with a store;
    /// construction has no side effects.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(),
            title: title.into(),
            status: TaskStatus::Pending,
            project_name: None,
            priority: None,
            duedatetime: None,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Marks the task completed, stamping `completed_at` and `updated_at`.
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now());
        self.meta.touch();
    }

    /// Returns the task to pending, clearing `completed_at`.
    pub fn mark_pending(&mut self) {
        self.status = TaskStatus::Pending;
        self.completed_at = None;
        self.meta.touch();
    }

    /// Checks task invariants.
    ///
    /// Applied on every write path and on rehydrated records, so a storage
    /// file with a drifted completion state is reported instead of silently
    /// propagated.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.completed_at.is_some() != self.is_completed() {
            return Err(TaskValidationError::CompletionMismatch);
        }
        if self.meta.updated_at < self.meta.created_at {
            return Err(TaskValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }
}
