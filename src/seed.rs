use chrono::NaiveDate;

use crate::models::{DailyLog, LogItem, OwnerProfile, Priority, Snapshot, Task, TimeOfDay, Weekday};

#[allow(clippy::too_many_arguments)]
fn sample_task(
    id: &str,
    title: &str,
    category: &str,
    time_of_day: TimeOfDay,
    weekdays: &[Weekday],
    notes: &str,
    priority: Priority,
    reminder: &str,
) -> Task {
    let mut task = Task::new(id, title);
    task.category = category.to_string();
    task.time_of_day = time_of_day;
    task.set_weekdays(weekdays.iter().copied());
    task.notes = Some(notes.to_string());
    task.priority = priority;
    task.reminder_time = Some(reminder.to_string());
    task
}

/// The routine a first run starts with.
pub fn sample_tasks() -> Vec<Task> {
    use Weekday::*;
    vec![
        sample_task(
            "task-1",
            "Morning walk",
            "Exercise",
            TimeOfDay::Morning,
            &Weekday::ALL,
            "15-20 minutes around the park.",
            Priority::High,
            "07:30",
        ),
        sample_task(
            "task-2",
            "Breakfast",
            "Meals",
            TimeOfDay::Morning,
            &Weekday::ALL,
            "1 cup kibble + water.",
            Priority::Medium,
            "08:00",
        ),
        sample_task(
            "task-3",
            "Training",
            "Training",
            TimeOfDay::Afternoon,
            &[Mon, Wed, Fri],
            "Focus on recall and sit-stay.",
            Priority::Medium,
            "15:00",
        ),
        sample_task(
            "task-4",
            "Brush coat",
            "Grooming",
            TimeOfDay::Evening,
            &[Tue, Thu, Sun],
            "Use detangling spray.",
            Priority::Low,
            "19:00",
        ),
        sample_task(
            "task-5",
            "Evening walk",
            "Exercise",
            TimeOfDay::Evening,
            &Weekday::ALL,
            "Slow-paced for cooldown.",
            Priority::High,
            "20:00",
        ),
    ]
}

pub fn sample_profile() -> OwnerProfile {
    OwnerProfile {
        owner_name: "Jordan".into(),
        pet_name: "Luna".into(),
        breed: "Golden Retriever".into(),
        age: "3".into(),
        avatar_url: None,
    }
}

/// Sample profile and tasks, plus a log for `today` listing every sample
/// task regardless of weekday.
pub fn sample_snapshot(today: NaiveDate) -> Snapshot {
    let tasks = sample_tasks();
    let today_log = DailyLog {
        date: today,
        items: tasks.iter().map(|t| LogItem::pending(t.id.clone())).collect(),
    };
    Snapshot {
        profile: sample_profile(),
        tasks,
        logs: vec![today_log],
    }
}
