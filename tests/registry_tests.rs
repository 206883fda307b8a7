use pawtrack::models::{Frequency, Task, TaskPatch, TimeOfDay, Weekday};
use pawtrack::registry::TaskRegistry;

#[test]
fn test_add_inserts_at_front() {
    let mut reg = TaskRegistry::new();
    reg.add(Task::new("first", "First"));
    reg.add(Task::new("second", "Second"));

    let ids: Vec<&str> = reg.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["second", "first"]);
    assert_eq!(reg.len(), 2);
}

#[test]
fn test_update_merges_fields() {
    let mut reg = TaskRegistry::new();
    reg.add(Task::new("walk", "Walk"));

    let found = reg.update(
        "walk",
        TaskPatch {
            title: Some("Long walk".into()),
            time_of_day: Some(TimeOfDay::Evening),
            reminder_time: Some(Some("19:00".into())),
            ..TaskPatch::default()
        },
    );
    assert!(found);

    let task = reg.get("walk").unwrap();
    assert_eq!(task.title, "Long walk");
    assert_eq!(task.time_of_day, TimeOfDay::Evening);
    assert_eq!(task.reminder_time.as_deref(), Some("19:00"));
    assert!(task.is_active);
}

#[test]
fn test_update_unknown_id_is_noop() {
    let mut reg = TaskRegistry::new();
    reg.add(Task::new("walk", "Walk"));
    let before = reg.clone();

    let found = reg.update(
        "ghost",
        TaskPatch {
            title: Some("Nope".into()),
            ..TaskPatch::default()
        },
    );
    assert!(!found);
    assert_eq!(reg, before);
}

#[test]
fn test_remove_returns_task() {
    let mut reg = TaskRegistry::new();
    reg.add(Task::new("walk", "Walk"));
    reg.add(Task::new("meal", "Meal"));

    let removed = reg.remove("walk").unwrap();
    assert_eq!(removed.id, "walk");
    assert!(!reg.contains("walk"));
    assert!(reg.remove("walk").is_none());
}

#[test]
fn test_daily_forces_full_week() {
    let mut reg = TaskRegistry::new();
    let mut task = Task::new("train", "Training");
    task.set_weekdays([Weekday::Mon, Weekday::Wed]);
    assert_eq!(task.frequency, Frequency::Weekdays);
    reg.add(task);

    reg.update(
        "train",
        TaskPatch {
            frequency: Some(Frequency::Daily),
            ..TaskPatch::default()
        },
    );

    let task = reg.get("train").unwrap();
    assert_eq!(task.frequency, Frequency::Daily);
    assert_eq!(task.weekdays, Weekday::ALL.to_vec());
    reg.check_invariants().unwrap();
}

#[test]
fn test_weekday_patch_derives_frequency() {
    let mut reg = TaskRegistry::new();
    reg.add(Task::new("walk", "Walk"));

    reg.update(
        "walk",
        TaskPatch {
            weekdays: Some(vec![Weekday::Sat, Weekday::Sun, Weekday::Sat]),
            ..TaskPatch::default()
        },
    );
    let task = reg.get("walk").unwrap();
    assert_eq!(task.frequency, Frequency::Weekdays);
    assert_eq!(task.weekdays, vec![Weekday::Sat, Weekday::Sun]);

    reg.update(
        "walk",
        TaskPatch {
            weekdays: Some(Weekday::ALL.iter().rev().copied().collect()),
            ..TaskPatch::default()
        },
    );
    assert_eq!(reg.get("walk").unwrap().frequency, Frequency::Daily);
    reg.check_invariants().unwrap();
}

#[test]
fn test_weekdays_frequency_on_full_week_stays_daily() {
    let mut task = Task::new("walk", "Walk");
    task.set_frequency(Frequency::Weekdays);
    assert_eq!(task.frequency, Frequency::Daily);
    task.check_invariants().unwrap();
}

#[test]
fn test_add_normalizes_inconsistent_task() {
    let mut task = Task::new("odd", "Odd");
    task.frequency = Frequency::Daily;
    task.weekdays = vec![Weekday::Mon];
    assert!(task.check_invariants().is_err());

    let mut reg = TaskRegistry::new();
    reg.add(task);
    assert_eq!(reg.get("odd").unwrap().weekdays.len(), 7);
    reg.check_invariants().unwrap();
}

#[test]
fn test_clear_optional_fields() {
    let mut task = Task::new("walk", "Walk");
    task.notes = Some("bring water".into());
    task.apply(TaskPatch {
        notes: Some(None),
        ..TaskPatch::default()
    });
    assert!(task.notes.is_none());
    assert!(TaskPatch::default().is_empty());
}

#[test]
fn test_parse_enums() {
    assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Mon);
    assert_eq!("Thu".parse::<Weekday>().unwrap(), Weekday::Thu);
    assert!("xx".parse::<Weekday>().is_err());
    assert_eq!(" Wednesday ".parse::<Weekday>().unwrap(), Weekday::Wed);
    for word in ["month", "sunshine", "thursdayz", "tues"] {
        assert!(word.parse::<Weekday>().is_err(), "{word} parsed as a weekday");
    }
    assert_eq!("evening".parse::<TimeOfDay>().unwrap(), TimeOfDay::Evening);
    assert_eq!("DAILY".parse::<Frequency>().unwrap(), Frequency::Daily);
    assert!("hourly".parse::<Frequency>().is_err());
}
