//! Domain model for stored entities.
//!
//! # Responsibility
//! - Define the identity/timestamp metadata shared by every stored entity.
//! - Define the concrete `Task` entity and its lifecycle mutators.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId` assigned once.
//! - `completed_at` is `Some` exactly when a task's status is `Completed`.

pub mod entity;
pub mod task;
