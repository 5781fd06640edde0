use std::path::PathBuf;
use taskdeck_core::{composite_key, Entity, EntityKind, FileStore, StoreError, Task};
use tempfile::TempDir;

fn storage_path(dir: &TempDir) -> PathBuf {
    dir.path().join("file.json")
}

#[test]
fn missing_file_opens_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(storage_path(&dir)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn flush_then_reopen_reproduces_mapping() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);

    let mut first = Task::new("one");
    first.priority = Some("urgent".to_string());
    let mut second = Task::new("two");
    second.project_name = Some("home".to_string());
    second.mark_completed();

    let mut store = FileStore::open(&path).unwrap();
    store.register(Entity::Task(first.clone()));
    store.register(Entity::Task(second.clone()));
    store.flush().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(
        reopened.all().keys().collect::<Vec<_>>(),
        store.all().keys().collect::<Vec<_>>()
    );
    assert_eq!(reopened.get_task(first.meta.id), Some(&first));
    assert_eq!(reopened.get_task(second.meta.id), Some(&second));
}

#[test]
fn register_overwrites_existing_key() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(storage_path(&dir)).unwrap();

    let task = Task::new("draft title");
    store.register(Entity::Task(task.clone()));

    let mut replacement = task.clone();
    replacement.title = "final title".to_string();
    store.register(Entity::Task(replacement));

    assert_eq!(store.len(), 1);
    assert_eq!(store.get_task(task.meta.id).unwrap().title, "final title");
}

#[test]
fn deleting_absent_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(storage_path(&dir)).unwrap();
    store.register(Entity::Task(Task::new("keep me")));

    let removed = store.delete("Task.00000000-0000-4000-8000-000000000000");
    assert!(!removed);
    assert_eq!(store.len(), 1);
}

#[test]
fn flush_rewrites_the_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);

    let keep = Task::new("keep");
    let discard = Task::new("drop");
    let mut store = FileStore::open(&path).unwrap();
    store.register(Entity::Task(keep.clone()));
    store.register(Entity::Task(discard.clone()));
    store.flush().unwrap();

    store.delete(&composite_key(EntityKind::Task, discard.meta.id));
    store.flush().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get_task(keep.meta.id).is_some());
    assert!(reopened.get_task(discard.meta.id).is_none());
}

#[test]
fn snapshot_uses_composite_keys_and_class_discriminator() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);

    let task = Task::new("snapshot shape");
    let mut store = FileStore::open(&path).unwrap();
    store.register(Entity::Task(task.clone()));
    store.flush().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let key = format!("Task.{}", task.meta.id);
    assert_eq!(value[key.as_str()]["__class__"], "Task");
    assert_eq!(value[key.as_str()]["title"], "snapshot shape");
}

#[test]
fn malformed_json_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);
    std::fs::write(&path, "not a snapshot {").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::MalformedStorage { .. }));
}

#[test]
fn unknown_entity_kind_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);

    let record = Entity::Task(Task::new("smuggled")).to_record().unwrap();
    let snapshot = serde_json::json!({ "Project.123": record });
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::UnknownEntityKind { key } if key == "Project.123"));
}

#[test]
fn invariant_violating_entry_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = storage_path(&dir);

    let task = Task::new("drifted on disk");
    let key = composite_key(EntityKind::Task, task.meta.id);
    let mut record = Entity::Task(task).to_record().unwrap();
    // completed status with a null completed_at violates the invariant
    record["status"] = serde_json::json!("completed");
    let mut snapshot = serde_json::Map::new();
    snapshot.insert(key.clone(), record);
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::InvalidEntity { key: bad, .. } if bad == key));
}
