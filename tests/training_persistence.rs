use inkmark::{
    config::{self, EngineConfig},
    storage::{FileKeyValueStore, KeyValueStore},
    training::{TRAINING_STORAGE_KEY, TrainingStore},
};

#[test]
fn file_backed_pool_round_trips() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let storage = FileKeyValueStore::new(dir.path());
    let mut store = TrainingStore::open(Box::new(storage.clone()));

    store.add("あ", false, Some("data:image/png;base64,AAAA".into())).unwrap();
    store.add("あ", false, None).unwrap();

    let reopened = TrainingStore::open(Box::new(storage));
    let entries = reopened.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].char, "あ");
    assert_eq!(entries[0].count, 2);
    assert_eq!(entries[0].samples.len(), 1);
    assert_eq!(reopened.updated_at(), store.updated_at());
}

#[test]
fn legacy_file_is_upgraded_on_first_write() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let mut storage = FileKeyValueStore::new(dir.path());
    storage
        .set(
            TRAINING_STORAGE_KEY,
            r#"{"samples":[{"char":"か","count":5},{"char":"あ","count":1}],"updatedAt":null}"#
                .as_bytes(),
        )
        .unwrap();

    let mut store = TrainingStore::open(Box::new(storage.clone()));
    let order: Vec<_> = store.list().into_iter().map(|e| e.char).collect();
    assert_eq!(order, vec!["か", "あ"]);

    store.remove_entry("あ", false).unwrap();

    let text = std::fs::read_to_string(dir.path().join("analysis-training-data.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(1));
    assert!(value["updatedAt"].is_string());
}

#[test]
fn garbage_file_opens_empty_and_is_replaced() {
    let dir = tempfile::tempdir().expect("create tempdir");
    std::fs::write(dir.path().join("analysis-training-data.json"), b"\x00\x01nope").unwrap();

    let mut store = TrainingStore::open(Box::new(FileKeyValueStore::new(dir.path())));
    assert!(store.is_empty());

    store.add("い", false, None).unwrap();
    let reopened = TrainingStore::open(Box::new(FileKeyValueStore::new(dir.path())));
    assert_eq!(reopened.total_samples(), 1);
}

#[test]
fn config_file_round_trips_with_clamping() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("nested").join(config::CONFIG_FILE_NAME);
    let mut config = EngineConfig::default();
    config.detection.overlap_fraction = 0.75;
    config.session.rng_seed = 99;

    config::save_to_path(&config, &path).unwrap();
    let loaded = config::load_from_path(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::write(&path, "[detection]\noverlap_fraction = 4.0\n").unwrap();
    let clamped = config::load_from_path(&path).unwrap();
    assert!(clamped.detection.overlap_fraction <= 1.0);
    assert_eq!(clamped.session, EngineConfig::default().session);
}
