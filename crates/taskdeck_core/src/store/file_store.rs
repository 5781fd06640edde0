//! JSON snapshot store implementation.
//!
//! # Responsibility
//! - CRUD over the in-memory composite-key mapping.
//! - Wholesale flush/reload of that mapping against one JSON file.
//!
//! # Invariants
//! - `flush()` rewrites the complete file; there are no partial writes.
//! - Reload validates entity kinds and invariants before inserting.
//! - Two processes sharing one file are not coordinated: the last flush
//!   wins. Single-user workloads only.

use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::entity::{composite_key, Entity, EntityId, EntityKind};
use crate::model::task::Task;
use crate::store::{StoreError, StoreResult};

/// Default storage file, relative to the working directory.
pub const DEFAULT_STORAGE_FILE: &str = "file.json";

/// In-memory entity registry backed by a single JSON file.
///
/// Constructed explicitly by the process entry point and passed by reference
/// to every operation that needs it; there is no global instance.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // BTreeMap keeps snapshot output deterministic across runs.
    objects: BTreeMap<String, Entity>,
}

impl FileStore {
    /// Opens the store at `path`, loading the snapshot if one exists.
    ///
    /// # Errors
    /// - `MalformedStorage` when the file exists but is not valid JSON or an
    ///   entry cannot be rehydrated.
    /// - `UnknownEntityKind` when a composite key names an unregistered kind.
    /// - `InvalidEntity` when a rehydrated entity fails validation.
    /// - `Io` for any other read failure. A missing file is not an error.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self {
            path: path.into(),
            objects: BTreeMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read access to the live mapping. Not a snapshot: later store calls
    /// mutate it in place.
    pub fn all(&self) -> &BTreeMap<String, Entity> {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Inserts the entity under its composite key, replacing any existing
    /// entry. Always succeeds.
    pub fn register(&mut self, entity: Entity) {
        let key = entity.storage_key();
        debug!("event=entity_registered module=store key={key}");
        self.objects.insert(key, entity);
    }

    /// Removes the entry for `key` if present.
    ///
    /// Returns whether an entry was removed; removing an absent key is a
    /// silent no-op.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.objects.remove(key).is_some();
        if removed {
            debug!("event=entity_deleted module=store key={key}");
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    /// Looks up `Task.<id>`.
    pub fn get_task(&self, id: EntityId) -> Option<&Task> {
        self.objects
            .get(&composite_key(EntityKind::Task, id))
            .and_then(Entity::as_task)
    }

    pub fn get_task_mut(&mut self, id: EntityId) -> Option<&mut Task> {
        match self.objects.get_mut(&composite_key(EntityKind::Task, id)) {
            Some(Entity::Task(task)) => Some(task),
            None => None,
        }
    }

    /// Serializes every entity in record form and rewrites the storage file
    /// in full. O(total entity count) per call; not atomic.
    pub fn flush(&self) -> StoreResult<()> {
        let snapshot =
            serde_json::to_string_pretty(&self.objects).map_err(|source| {
                StoreError::MalformedStorage {
                    path: self.path.clone(),
                    source,
                }
            })?;
        fs::write(&self.path, snapshot).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "event=store_flushed module=store status=ok entries={} path={}",
            self.objects.len(),
            self.path.display()
        );
        Ok(())
    }

    fn reload(&mut self) -> StoreResult<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_loaded module=store status=ok entries=0 path={} first_run=true",
                    self.path.display()
                );
                return Ok(());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&text).map_err(|source| StoreError::MalformedStorage {
                path: self.path.clone(),
                source,
            })?;

        for (key, record) in raw {
            let kind_name = key.split_once('.').map_or(key.as_str(), |(kind, _)| kind);
            if EntityKind::parse(kind_name).is_none() {
                return Err(StoreError::UnknownEntityKind { key });
            }
            let entity =
                Entity::from_record(record).map_err(|source| StoreError::MalformedStorage {
                    path: self.path.clone(),
                    source,
                })?;
            entity
                .validate()
                .map_err(|source| StoreError::InvalidEntity {
                    key: key.clone(),
                    source,
                })?;
            self.objects.insert(key, entity);
        }

        info!(
            "event=store_loaded module=store status=ok entries={} path={}",
            self.objects.len(),
            self.path.display()
        );
        Ok(())
    }
}
