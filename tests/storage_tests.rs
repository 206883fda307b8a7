use chrono::NaiveDate;
use pawtrack::models::{Frequency, Snapshot, Weekday};
use pawtrack::seed::sample_snapshot;
use pawtrack::storage::{JsonFileStore, MemoryStore, Persistence};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_missing_file_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_file_store_saves_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("state.json"));
    let snapshot = sample_snapshot(date(2025, 6, 3));

    store.save(&snapshot).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load().unwrap(), Some(snapshot));

    store.delete().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonFileStore::new(&path);
    let err = store.load().unwrap_err();
    assert!(!err.is_warning());
    // The broken file is left alone
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_reads_browser_storage_layout() {
    let json = r#"{
        "profile": { "ownerName": "Jordan", "dogName": "Luna", "dogBreed": "Golden Retriever", "dogAge": "3", "avatarUrl": "" },
        "tasks": [{
            "id": "task-3", "title": "Training", "category": "Training",
            "timeOfDay": "Afternoon", "frequency": "Weekdays",
            "weekdays": ["Mon", "Wed", "Fri"], "notes": "Focus on recall.",
            "priority": "Medium", "reminderTime": "15:00", "isActive": true
        }],
        "logs": [{
            "dateISO": "2025-06-02",
            "items": [{ "taskId": "task-3", "completed": true, "completedAtISO": "2025-06-02T15:04:05.000Z", "note": "good boy" }]
        }]
    }"#;
    let snapshot: Snapshot = serde_json::from_str(json).unwrap();

    assert_eq!(snapshot.profile.pet_name, "Luna");
    assert_eq!(snapshot.profile.breed, "Golden Retriever");
    let task = &snapshot.tasks[0];
    assert_eq!(task.frequency, Frequency::Weekdays);
    assert_eq!(task.weekdays, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    assert!(task.subtasks.is_empty());
    let log = &snapshot.logs[0];
    assert_eq!(log.date, date(2025, 6, 2));
    assert!(log.items[0].completed_at.is_some());
    assert_eq!(log.items[0].note.as_deref(), Some("good boy"));

    let out = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(out["logs"][0]["dateISO"], "2025-06-02");
    assert_eq!(out["logs"][0]["items"][0]["taskId"], "task-3");
    assert!(out["logs"][0]["items"][0].get("completedAtISO").is_some());
    assert_eq!(out["tasks"][0]["isActive"], true);
    assert_eq!(out["profile"]["dogName"], "Luna");
}

#[test]
fn test_memory_store_failing_saves() {
    let store = MemoryStore::new();
    store.save(&Snapshot::default()).unwrap();
    assert_eq!(store.save_count(), 1);

    store.set_fail_saves(true);
    assert!(store.save(&Snapshot::default()).is_err());
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.load().unwrap(), Some(Snapshot::default()));
}
