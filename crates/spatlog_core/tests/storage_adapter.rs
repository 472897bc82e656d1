use chrono::{TimeZone, Timelike, Utc};
use rusqlite::Connection;
use spatlog_core::db::migrations::latest_version;
use spatlog_core::db::{open_db, DbError};
use spatlog_core::storage::{load, save};
use spatlog_core::{
    default_categories, default_rewards, Argument, ArgumentStatus, Category, KeyValueStorage,
    MemoryStorage, Reward, RewardRecord, Severity, SqliteStorage, StorageError, StorageKey,
};

fn sample_arguments() -> Vec<Argument> {
    let first_date = Utc
        .with_ymd_and_hms(2024, 2, 14, 19, 0, 0)
        .unwrap()
        .with_nanosecond(250_000_000)
        .unwrap();
    let mut first = Argument::with_id("a-1", first_date, "finance", Severity::Severe);
    first.status = ArgumentStatus::Resolved;
    first.resolution = Some("set a monthly budget".to_string());
    first.reflection = Some("both of us were tired".to_string());

    let second = Argument::new(
        Utc.with_ymd_and_hms(2024, 2, 20, 8, 5, 0).unwrap(),
        "housework",
        Severity::Minor,
    );
    vec![first, second]
}

#[test]
fn load_of_unwritten_key_is_none() {
    let storage = MemoryStorage::new();
    let loaded = load::<Argument, _>(&storage, StorageKey::Arguments).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn save_then_load_roundtrips_every_collection() {
    let storage = MemoryStorage::new();
    let arguments = sample_arguments();
    let categories = default_categories();
    let rewards = default_rewards();
    let records = vec![RewardRecord::snapshot(
        &rewards[0],
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    )];

    save(&storage, StorageKey::Arguments, &arguments).unwrap();
    save(&storage, StorageKey::Categories, &categories).unwrap();
    save(&storage, StorageKey::Rewards, &rewards).unwrap();
    save(&storage, StorageKey::RewardRecords, &records).unwrap();

    assert_eq!(
        load::<Argument, _>(&storage, StorageKey::Arguments).unwrap(),
        Some(arguments)
    );
    assert_eq!(
        load::<Category, _>(&storage, StorageKey::Categories).unwrap(),
        Some(categories)
    );
    assert_eq!(
        load::<Reward, _>(&storage, StorageKey::Rewards).unwrap(),
        Some(rewards)
    );
    assert_eq!(
        load::<RewardRecord, _>(&storage, StorageKey::RewardRecords).unwrap(),
        Some(records)
    );
    assert_eq!(
        storage.keys(),
        ["arguments", "categories", "rewardRecords", "rewards"]
    );
}

#[test]
fn empty_collection_is_stored_not_absent() {
    let storage = MemoryStorage::new();
    save::<Argument, _>(&storage, StorageKey::Arguments, &[]).unwrap();
    assert_eq!(
        storage.get_item("arguments").unwrap().as_deref(),
        Some("[]")
    );
    assert_eq!(
        load::<Argument, _>(&storage, StorageKey::Arguments).unwrap(),
        Some(Vec::new())
    );
}

#[test]
fn malformed_text_is_reported_as_corrupt() {
    let storage = MemoryStorage::new();
    storage.set_item("categories", "{not json").unwrap();

    let err = load::<Category, _>(&storage, StorageKey::Categories).unwrap_err();
    assert!(err.is_corrupt());
    match err {
        StorageError::Corrupt { key, .. } => assert_eq!(key, "categories"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_shaped_json_is_reported_as_corrupt() {
    let storage = MemoryStorage::new();
    storage.set_item("rewards", r#"{"rewards": []}"#).unwrap();

    let err = load::<Reward, _>(&storage, StorageKey::Rewards).unwrap_err();
    assert!(err.is_corrupt());
}

#[test]
fn quota_failure_surfaces_and_keeps_previous_text() {
    let storage = MemoryStorage::with_quota(64);
    save::<Argument, _>(&storage, StorageKey::Arguments, &[]).unwrap();

    let err = save(&storage, StorageKey::Arguments, &sample_arguments()).unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    assert_eq!(
        storage.get_item("arguments").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn sqlite_storage_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spatlog.sqlite3");
    let arguments = sample_arguments();

    {
        let storage = SqliteStorage::open(&path).unwrap();
        save(&storage, StorageKey::Arguments, &arguments).unwrap();
        save(&storage, StorageKey::Arguments, &arguments[..1]).unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    let loaded = load::<Argument, _>(&storage, StorageKey::Arguments).unwrap();
    assert_eq!(loaded, Some(arguments[..1].to_vec()));

    let rows: i64 = storage
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_storage_applies_migrations_on_open() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let version: u32 = storage
        .connection()
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(storage.get_item("arguments").unwrap().is_none());
}

#[test]
fn opening_database_with_newer_table_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_database_in_missing_directory_returns_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("spatlog.sqlite3");

    let err = SqliteStorage::open(&path).err().unwrap();
    assert!(matches!(err, DbError::Open { .. } | DbError::Sqlite(_)));
}
