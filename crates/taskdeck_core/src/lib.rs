//! Core domain logic for taskdeck, a single-user TODO list manager.
//! This crate is the single source of truth for business invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use model::entity::{composite_key, Entity, EntityId, EntityKind, EntityMeta};
pub use model::task::{Task, TaskStatus, TaskValidationError};
pub use service::task_service::{
    CompleteOutcome, NewTask, ReopenOutcome, ServiceError, ServiceResult, TaskEdit, TaskService,
};
pub use store::{FileStore, StoreError, StoreResult, DEFAULT_STORAGE_FILE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
