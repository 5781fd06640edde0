//! Entity identity, kind registry and record conversion.
//!
//! # Responsibility
//! - Provide the id + timestamp metadata every stored entity carries.
//! - Map entities to/from their plain serializable record form.
//! - Define the closed set of entity kinds the store can rehydrate.
//!
//! # Invariants
//! - `id` is generated once at construction and never reassigned.
//! - `updated_at >= created_at` holds from construction onward.
//! - Rehydration (`from_record`) never allocates a new id or timestamps and
//!   never touches the store.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::task::{Task, TaskValidationError};

/// Stable identifier for every stored entity.
pub type EntityId = Uuid;

/// Current local wall-clock time at second-or-finer precision.
///
/// Timestamps are naive local datetimes; the storage format renders them as
/// ISO-8601 strings without a timezone offset.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Closed registry of entity kinds the store knows how to rehydrate.
///
/// The kind doubles as the composite-key prefix and the `__class__`
/// discriminator in the storage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
}

impl EntityKind {
    /// Discriminator string used in composite keys and `__class__`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
        }
    }

    /// Parses a discriminator back into a kind.
    ///
    /// Returns `None` for any kind this build does not register, which the
    /// store reports as an explicit unknown-kind load error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Task" => Some(Self::Task),
            _ => None,
        }
    }
}

/// Builds the composite storage key `"<Kind>.<id>"`.
pub fn composite_key(kind: EntityKind, id: EntityId) -> String {
    format!("{}.{}", kind.as_str(), id)
}

/// Identity and timestamp metadata shared by all stored entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Unique id assigned at construction, immutable thereafter.
    pub id: EntityId,
    /// Set once at construction.
    pub created_at: NaiveDateTime,
    /// Refreshed by `touch()` on every mutation worth persisting.
    pub updated_at: NaiveDateTime,
}

impl EntityMeta {
    /// Allocates fresh identity metadata.
    ///
    /// Both timestamps come from a single clock read, so
    /// `updated_at >= created_at` holds by construction.
    pub fn new() -> Self {
        let created = now();
        Self {
            id: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
        }
    }

    /// Refreshes `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed union of every entity kind the store persists.
///
/// Serializes internally tagged under `__class__`, which produces exactly
/// the record shape in the storage file: all entity fields verbatim plus the
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Task(Task),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Task(_) => EntityKind::Task,
        }
    }

    pub fn meta(&self) -> &EntityMeta {
        match self {
            Self::Task(task) => &task.meta,
        }
    }

    pub fn id(&self) -> EntityId {
        self.meta().id
    }

    /// Composite key this entity is stored under.
    pub fn storage_key(&self) -> String {
        composite_key(self.kind(), self.id())
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
        }
    }

    /// Checks the concrete entity's invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        match self {
            Self::Task(task) => task.validate(),
        }
    }

    /// Plain serializable record: every field verbatim, timestamps as
    /// ISO-8601 strings, plus the `__class__` discriminator.
    pub fn to_record(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Rehydrates an entity from a record produced by `to_record`.
    ///
    /// Pure reconstruction: no new id, no new timestamps, no store side
    /// effect. Used by the store reload path and by tests.
    pub fn from_record(record: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(record)
    }
}

impl From<Task> for Entity {
    fn from(task: Task) -> Self {
        Self::Task(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{composite_key, EntityKind, EntityMeta};
    use uuid::Uuid;

    #[test]
    fn kind_discriminator_round_trips() {
        assert_eq!(EntityKind::parse("Task"), Some(EntityKind::Task));
        assert_eq!(EntityKind::Task.as_str(), "Task");
        assert_eq!(EntityKind::parse("Project"), None);
    }

    #[test]
    fn composite_key_uses_kind_dot_id() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(
            composite_key(EntityKind::Task, id),
            "Task.11111111-2222-4333-8444-555555555555"
        );
    }

    #[test]
    fn meta_touch_never_moves_updated_at_backwards() {
        let mut meta = EntityMeta::new();
        assert_eq!(meta.created_at, meta.updated_at);

        meta.touch();
        assert!(meta.updated_at >= meta.created_at);
    }
}
