use chrono::NaiveDate;
use pawtrack::clock::FixedClock;
use pawtrack::commands::*;
use pawtrack::models::{Frequency, Priority, TaskPatch, TimeOfDay, Weekday};
use pawtrack::storage::{JsonFileStore, MemoryStore, Persistence};
use pawtrack::tracker::Tracker;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn with_tracker<F>(f: F)
where
    F: FnOnce(&mut Tracker<&MemoryStore, FixedClock>, &MemoryStore),
{
    let store = MemoryStore::new();
    // Tuesday
    let mut t = Tracker::open(&store, FixedClock::at(date(2025, 6, 3))).unwrap();
    f(&mut t, &store);
}

#[test]
fn test_parse_date() {
    let today = date(2025, 6, 3);
    assert_eq!(parse_date(None, today).unwrap(), today);
    assert_eq!(parse_date(Some("2025-01-31"), today).unwrap(), date(2025, 1, 31));
    let err = parse_date(Some("31/01/2025"), today).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_add_and_list() {
    with_tracker(|t, store| {
        let fields = TaskPatch {
            category: Some("Exercise".into()),
            time_of_day: Some(TimeOfDay::Evening),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        let id = cmd_task_add(t, "Evening walk".into(), fields, true).unwrap();

        assert_eq!(t.tasks().len(), 1);
        let task = t.task(&id).unwrap();
        assert_eq!(task.title, "Evening walk");
        assert_eq!(task.category, "Exercise");
        assert_eq!(task.frequency, Frequency::Daily);
        assert!(task.is_active);

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.tasks[0].id, id);
    });
}

#[test]
fn test_add_rejects_empty_title() {
    with_tracker(|t, _| {
        let err = cmd_task_add(t, "  ".into(), TaskPatch::default(), true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(t.tasks().is_empty());
    });
}

#[test]
fn test_toggle_today() {
    with_tracker(|t, _| {
        let id = cmd_task_add(t, "Breakfast".into(), TaskPatch::default(), true).unwrap();
        cmd_toggle(t, id.clone(), None, Some("half portion".into()), true).unwrap();

        let item = t.stored_log(date(2025, 6, 3)).unwrap().item(&id).unwrap();
        assert!(item.completed);
        assert_eq!(item.note.as_deref(), Some("half portion"));
    });
}

#[test]
fn test_toggle_bad_date() {
    with_tracker(|t, _| {
        let id = cmd_task_add(t, "Breakfast".into(), TaskPatch::default(), true).unwrap();
        let err = cmd_toggle(t, id, Some("tomorrow".into()), None, true).unwrap_err();
        assert!(matches!(err, pawtrack::error::Error::InvalidDate(_)));
        assert!(t.logs().is_empty());
    });
}

#[test]
fn test_done_all_and_reset() {
    with_tracker(|t, _| {
        cmd_task_add(t, "Walk".into(), TaskPatch::default(), true).unwrap();
        cmd_task_add(t, "Meal".into(), TaskPatch::default(), true).unwrap();

        cmd_done_all(t, Some("2025-06-02".into()), true).unwrap();
        assert!(t.stored_log(date(2025, 6, 2)).unwrap().all_completed());

        cmd_reset_day(t, Some("2025-06-02".into()), true, true).unwrap();
        let log = t.stored_log(date(2025, 6, 2)).unwrap();
        assert_eq!(log.completed_count(), 0);
        assert_eq!(log.items.len(), 2);
    });
}

#[test]
fn test_notes() {
    with_tracker(|t, _| {
        let walk = cmd_task_add(t, "Walk".into(), TaskPatch::default(), true).unwrap();
        let meal = cmd_task_add(t, "Meal".into(), TaskPatch::default(), true).unwrap();

        cmd_note(t, walk.clone(), "rainy".into(), None, true).unwrap();
        let today = t.today();
        assert_eq!(
            t.stored_log(today).unwrap().item(&walk).unwrap().note.as_deref(),
            Some("rainy")
        );
        assert!(t.stored_log(today).unwrap().item(&meal).unwrap().note.is_none());

        cmd_note_all(t, "fed early".into(), None, true, true).unwrap();
        let log = t.stored_log(today).unwrap();
        assert!(log.items.iter().all(|i| i.note.as_deref() == Some("fed early")));
    });
}

#[test]
fn test_edit_and_deactivate() {
    with_tracker(|t, _| {
        let id = cmd_task_add(t, "Training".into(), TaskPatch::default(), true).unwrap();

        let fields = TaskPatch {
            weekdays: Some(vec![Weekday::Mon, Weekday::Fri]),
            ..TaskPatch::default()
        };
        cmd_task_edit(t, id.clone(), fields, true).unwrap();
        let task = t.task(&id).unwrap();
        assert_eq!(task.frequency, Frequency::Weekdays);
        assert_eq!(task.weekdays, vec![Weekday::Mon, Weekday::Fri]);

        cmd_task_set_active(t, id.clone(), false, true).unwrap();
        assert!(!t.task(&id).unwrap().is_active);
        assert_eq!(t.active_task_count(), 0);

        // Unknown ids are reported but not an error
        cmd_task_edit(
            t,
            "ghost".into(),
            TaskPatch {
                title: Some("x".into()),
                ..TaskPatch::default()
            },
            true,
        )
        .unwrap();
    });
}

#[test]
fn test_edit_rejects_empty_weekdays() {
    with_tracker(|t, _| {
        let id = cmd_task_add(t, "Training".into(), TaskPatch::default(), true).unwrap();
        let fields = TaskPatch {
            weekdays: Some(vec![]),
            ..TaskPatch::default()
        };
        assert!(cmd_task_edit(t, id.clone(), fields, true).is_err());
        assert_eq!(t.task(&id).unwrap().weekdays.len(), 7);
    });
}

#[test]
fn test_remove_cascades() {
    with_tracker(|t, _| {
        let walk = cmd_task_add(t, "Walk".into(), TaskPatch::default(), true).unwrap();
        cmd_task_add(t, "Meal".into(), TaskPatch::default(), true).unwrap();
        cmd_done_all(t, None, true).unwrap();
        cmd_done_all(t, Some("2025-06-01".into()), true).unwrap();

        cmd_task_remove(t, walk.clone(), true).unwrap();
        assert!(t.task(&walk).is_none());
        assert!(t.logs().iter().all(|l| l.item(&walk).is_none()));
        t.check_invariants().unwrap();
    });
}

#[test]
fn test_profile_set_keeps_other_fields() {
    with_tracker(|t, _| {
        cmd_profile_set(t, Some("Jordan".into()), Some("Luna".into()), None, None, None, true).unwrap();
        cmd_profile_set(t, None, None, Some("Golden Retriever".into()), None, Some("".into()), true)
            .unwrap();

        let p = t.profile();
        assert_eq!(p.owner_name, "Jordan");
        assert_eq!(p.pet_name, "Luna");
        assert_eq!(p.breed, "Golden Retriever");
        assert!(p.avatar_url.is_none());
    });
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let clock = FixedClock::at(date(2025, 6, 3));

    let id = {
        let mut t = Tracker::open(JsonFileStore::new(&path), &clock).unwrap();
        let id = cmd_task_add(&mut t, "Walk".into(), TaskPatch::default(), true).unwrap();
        cmd_toggle(&mut t, id.clone(), None, None, true).unwrap();
        id
    };

    let t = Tracker::open(JsonFileStore::new(&path), &clock).unwrap();
    assert_eq!(t.tasks().len(), 1);
    assert!(t.stored_log(date(2025, 6, 3)).unwrap().item(&id).unwrap().completed);
}

#[test]
fn test_confirm_refusal_is_quiet_when_silent() {
    let mut out = Vec::new();
    let yes = confirm_with("Clear?", false, true, "n\n".as_bytes(), &mut out).unwrap();
    assert!(!yes);
    assert!(!String::from_utf8(out).unwrap().contains("Aborted."));

    let mut out = Vec::new();
    let yes = confirm_with("Clear?", false, false, "\n".as_bytes(), &mut out).unwrap();
    assert!(!yes);
    assert!(String::from_utf8(out).unwrap().ends_with("Aborted.\n"));
}

#[test]
fn test_confirm_accepts_y_and_force() {
    let mut out = Vec::new();
    assert!(confirm_with("Clear?", false, false, " Y \n".as_bytes(), &mut out).unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "Clear? [y/N] ");

    // Forced: nothing asked, nothing read
    let mut out = Vec::new();
    assert!(confirm_with("Clear?", true, false, "".as_bytes(), &mut out).unwrap());
    assert!(out.is_empty());
}
