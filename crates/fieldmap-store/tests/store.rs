use fieldmap_model::{
    FieldMapping, MappingConfig, MappingUpdate, NewHistory, NewMapping, SourceFormat,
};
use fieldmap_store::{JsonFileStore, MappingStore, MemoryStore, StoreError};
use tempfile::tempdir;

fn orders_mapping() -> NewMapping {
    let config = MappingConfig {
        field_mappings: vec![FieldMapping::direct("order.id", "invoice.number")],
        ..MappingConfig::default()
    };
    NewMapping::new("orders", SourceFormat::Csv, config).with_description("orders to invoices")
}

fn exercise_history(store: &dyn MappingStore) {
    let mapping = store.create_mapping(orders_mapping()).expect("create mapping");
    let other = store.create_mapping(orders_mapping()).expect("create mapping");

    for (mapping_id, success) in [(mapping.id, true), (other.id, true), (mapping.id, false)] {
        store
            .create_history(NewHistory {
                mapping_id: Some(mapping_id),
                source_file_name: Some("orders.csv".into()),
                target_file_name: Some("invoices.json".into()),
                success,
                error_message: (!success).then(|| "invalid CSV content".to_string()),
            })
            .expect("create history");
    }

    let entries = store.history_for_mapping(mapping.id).expect("history");
    assert_eq!(entries.iter().map(|entry| entry.id).collect::<Vec<_>>(), vec![1, 3]);
    assert!(!entries[1].success);
    assert_eq!(
        store.get_history(2).expect("history").and_then(|entry| entry.mapping_id),
        Some(other.id)
    );
    assert!(store.get_history(42).expect("history").is_none());
}

#[test]
fn memory_store_tracks_history() {
    exercise_history(&MemoryStore::new());
}

#[test]
fn file_store_tracks_history() {
    let dir = tempdir().expect("temp dir");
    exercise_history(&JsonFileStore::open(dir.path().join("store.json")).expect("open store"));
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("store.json");

    let created = {
        let store = JsonFileStore::open(&path).expect("open store");
        let created = store.create_mapping(orders_mapping()).expect("create mapping");
        store
            .update_mapping(
                created.id,
                MappingUpdate {
                    target_format: Some("XML".into()),
                    ..MappingUpdate::default()
                },
            )
            .expect("update mapping");
        created
    };
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    let mappings = reopened.list_mappings().expect("list mappings");
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].id, created.id);
    assert_eq!(mappings[0].target_format, "XML");
    assert_eq!(mappings[0].mapping_config, created.mapping_config);
    assert_eq!(mappings[0].created_at, created.created_at);

    let next = reopened.create_mapping(orders_mapping()).expect("create mapping");
    assert_eq!(next.id, 2);
}

#[test]
fn delete_is_persisted() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("store.json");
    let store = JsonFileStore::open(&path).expect("open store");
    let mapping = store.create_mapping(orders_mapping()).expect("create mapping");

    assert!(store.delete_mapping(mapping.id).expect("delete"));
    assert!(!store.delete_mapping(mapping.id).expect("delete"));

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    assert!(reopened.get_mapping(mapping.id).expect("get").is_none());
}

#[test]
fn misses_do_not_create_the_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("store.json");
    let store = JsonFileStore::open(&path).expect("open store");

    assert!(!store.delete_mapping(42).expect("delete"));
    let update = MappingUpdate {
        name: Some("renamed".into()),
        ..MappingUpdate::default()
    };
    assert!(store.update_mapping(42, update).expect("update").is_none());
    assert!(!path.exists());
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn empty_file_opens_as_empty_store() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "  \n").expect("write file");
    let store = JsonFileStore::open(&path).expect("open store");
    assert!(store.list_mappings().expect("list").is_empty());
}

#[test]
fn corrupt_file_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").expect("write file");
    let error = JsonFileStore::open(&path).expect_err("corrupt store");
    assert!(matches!(error, StoreError::Deserialization { .. }));
}

#[test]
fn failed_write_leaves_state_unchanged() {
    let dir = tempdir().expect("temp dir");
    // A directory in place of the temp file makes the write fail.
    let path = dir.path().join("store.json");
    std::fs::create_dir(path.with_extension("json.tmp")).expect("block temp path");
    let store = JsonFileStore::open(&path).expect("open store");

    assert!(store.create_mapping(orders_mapping()).is_err());
    assert!(store.list_mappings().expect("list").is_empty());
}
