//! Task use-case service.
//!
//! # Responsibility
//! - Provide the add/list/complete/reopen/remove/edit entry points used by
//!   the CLI.
//! - Own the write discipline: every successful mutation is followed by one
//!   store flush.
//!
//! # Invariants
//! - Unknown ids surface as `ServiceError::NotFound`, never a panic.
//! - An already-completed task is reported as such without touching its
//!   timestamps.

use chrono::NaiveDateTime;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::model::entity::{composite_key, Entity, EntityId, EntityKind};
use crate::model::task::Task;
use crate::store::{FileStore, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Task use-case errors.
#[derive(Debug)]
pub enum ServiceError {
    /// No task is stored under the given id (including unparseable ids).
    NotFound(String),
    EmptyTitle,
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::EmptyTitle => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Request model for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub project_name: Option<String>,
    pub priority: Option<String>,
    pub duedatetime: Option<NaiveDateTime>,
}

/// Partial update applied by the edit flow. `None` fields are left as-is.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub priority: Option<String>,
}

/// Result of a complete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    Completed(Task),
    /// The task was already completed; nothing was mutated or flushed.
    AlreadyCompleted(Task),
}

/// Result of a reopen request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReopenOutcome {
    Reopened(Task),
    AlreadyPending(Task),
}

/// Use-case wrapper over the file store. The single writer in the process.
pub struct TaskService<'store> {
    store: &'store mut FileStore,
}

impl<'store> TaskService<'store> {
    pub fn new(store: &'store mut FileStore) -> Self {
        Self { store }
    }

    /// Creates a task, registers it and flushes the store.
    pub fn add(&mut self, request: NewTask) -> ServiceResult<Task> {
        if request.title.trim().is_empty() {
            return Err(ServiceError::EmptyTitle);
        }

        let mut task = Task::new(request.title);
        task.project_name = request.project_name;
        task.priority = request.priority;
        task.duedatetime = request.duedatetime;

        let created = task.clone();
        self.store.register(Entity::Task(task));
        self.store.flush()?;
        info!(
            "event=task_added module=service status=ok id={}",
            created.meta.id
        );
        Ok(created)
    }

    /// Lists tasks ordered by creation time, optionally completed-only.
    pub fn list(&self, completed_only: bool) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .store
            .all()
            .values()
            .filter_map(Entity::as_task)
            .filter(|task| !completed_only || task.is_completed())
            .collect();
        tasks.sort_by_key(|task| task.meta.created_at);
        tasks
    }

    /// Looks up `Task.<id>`.
    pub fn find(&self, id: &str) -> ServiceResult<&Task> {
        let parsed = parse_id(id)?;
        self.store
            .get_task(parsed)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Marks a task completed. Idempotent: completing an already-completed
    /// task reports `AlreadyCompleted` and leaves every field untouched.
    pub fn complete(&mut self, id: &str) -> ServiceResult<CompleteOutcome> {
        let parsed = parse_id(id)?;
        let task = self
            .store
            .get_task_mut(parsed)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if task.is_completed() {
            return Ok(CompleteOutcome::AlreadyCompleted(task.clone()));
        }

        task.mark_completed();
        let completed = task.clone();
        self.store.flush()?;
        info!("event=task_completed module=service status=ok id={parsed}");
        Ok(CompleteOutcome::Completed(completed))
    }

    /// Returns a completed task to pending, clearing `completed_at`.
    pub fn reopen(&mut self, id: &str) -> ServiceResult<ReopenOutcome> {
        let parsed = parse_id(id)?;
        let task = self
            .store
            .get_task_mut(parsed)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if !task.is_completed() {
            return Ok(ReopenOutcome::AlreadyPending(task.clone()));
        }

        task.mark_pending();
        let reopened = task.clone();
        self.store.flush()?;
        info!("event=task_reopened module=service status=ok id={parsed}");
        Ok(ReopenOutcome::Reopened(reopened))
    }

    /// Deletes a task from the store and flushes.
    pub fn remove(&mut self, id: &str) -> ServiceResult<Task> {
        let parsed = parse_id(id)?;
        let removed = self
            .store
            .get_task(parsed)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        self.store.delete(&composite_key(EntityKind::Task, parsed));
        self.store.flush()?;
        info!("event=task_removed module=service status=ok id={parsed}");
        Ok(removed)
    }

    /// Applies a partial edit, refreshes `updated_at` and flushes.
    pub fn edit(&mut self, id: &str, edit: TaskEdit) -> ServiceResult<Task> {
        if edit.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ServiceError::EmptyTitle);
        }

        let parsed = parse_id(id)?;
        let task = self
            .store
            .get_task_mut(parsed)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if let Some(title) = edit.title {
            task.title = title;
        }
        if let Some(priority) = edit.priority {
            task.priority = Some(priority);
        }
        task.meta.touch();

        let edited = task.clone();
        self.store.flush()?;
        info!("event=task_edited module=service status=ok id={parsed}");
        Ok(edited)
    }
}

/// Parses a user-supplied id. Anything that is not a UUID cannot name a
/// stored task, so it maps to `NotFound` rather than a separate error.
fn parse_id(id: &str) -> ServiceResult<EntityId> {
    Uuid::parse_str(id.trim()).map_err(|_| ServiceError::NotFound(id.to_string()))
}
