use chrono::{TimeZone, Utc};
use spatlog_core::{
    Argument, CoreConfig, CoreContext, KeyValueStorage, NewReward, RewardKind, Severity,
    SqliteStorage, StorageLocation, StoreError,
};

#[test]
fn fresh_session_seeds_all_four_keys() {
    let context = CoreContext::in_memory().unwrap();

    assert_eq!(context.arguments().categories().len(), 6);
    assert_eq!(context.rewards().rewards().len(), 3);
    assert_eq!(
        context.storage().keys(),
        ["arguments", "categories", "rewardRecords", "rewards"]
    );
    assert_eq!(
        context.storage().get_item("rewardRecords").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn stores_share_storage_without_touching_each_others_keys() {
    let mut context = CoreContext::in_memory().unwrap();
    let categories_before = context.storage().get_item("categories").unwrap();

    context.rewards_mut().add_reward_record("2").unwrap();

    assert_eq!(
        context.storage().get_item("categories").unwrap(),
        categories_before
    );
    assert_eq!(context.rewards().records().len(), 1);
}

#[test]
fn sqlite_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        storage: StorageLocation::Sqlite(dir.path().join("spatlog.sqlite3")),
        ..CoreConfig::default()
    };
    let date = Utc.with_ymd_and_hms(2024, 7, 4, 22, 30, 0).unwrap();

    let reward_id = {
        let mut context = CoreContext::open(&config).unwrap();
        context
            .arguments_mut()
            .add_argument(Argument::with_id("a-1", date, "entertainment", Severity::Moderate))
            .unwrap();
        context
            .arguments_mut()
            .resolve_argument("a-1", Some("alternate who picks the movie".to_string()))
            .unwrap();
        let reward = context
            .rewards_mut()
            .add_reward(NewReward::new("Breakfast in bed", "", RewardKind::Reward))
            .unwrap();
        context.rewards_mut().add_reward_record(&reward.id).unwrap();
        reward.id
    };

    let context = CoreContext::open(&config).unwrap();
    let argument = context.arguments().argument("a-1").unwrap();
    assert_eq!(argument.date, date);
    assert!(argument.is_resolved());
    assert_eq!(context.arguments().resolution_rate(), 100.0);
    assert_eq!(context.rewards().rewards().len(), 4);
    assert_eq!(context.rewards().records_for(&reward_id).len(), 1);
    assert_eq!(context.arguments().categories().len(), 6);
}

#[test]
fn corrupt_stored_collection_fails_session_open() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.set_item("rewards", "not json at all").unwrap();

    let err = CoreContext::new(storage).err().unwrap();
    assert!(matches!(err, StoreError::CorruptState { ref key, .. } if key == "rewards"));
}

#[test]
fn memory_config_opens_empty_session() {
    let context = CoreContext::open(&CoreConfig::default()).unwrap();
    assert!(context.arguments().arguments().is_empty());
    assert_eq!(context.arguments().resolution_rate(), 0.0);
    assert!(context.rewards().records().is_empty());
}
