use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A day of the week, serialized as its three-letter English name ("Mon").
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// The full week, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Returns the weekday a calendar date falls on.
    pub fn of(date: NaiveDate) -> Weekday {
        date.weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    fn full_name(&self) -> &'static str {
        match self {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = Error;

    /// Accepts the three-letter or the full English name, case-insensitive
    /// ("mon", "Monday").
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| lower == day.as_str().to_lowercase() || lower == day.full_name())
            .ok_or_else(|| Error::InvalidArgument(format!("unknown weekday '{}'", s)))
    }
}

/// How often a task recurs.
///
/// `Daily` is shorthand for "all seven weekdays"; `Weekdays` means an
/// explicit subset of the week.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekdays,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// The part of the day a task belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Any,
}

impl TimeOfDay {
    /// Checklist display order.
    pub const ORDER: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Any,
    ];
}

macro_rules! display_and_parse {
    ($ty:ident, $what:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str(stringify!($variant)),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                $(
                    if s.trim().eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(Error::InvalidArgument(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

display_and_parse!(Frequency, "frequency", [Daily, Weekdays]);
display_and_parse!(Priority, "priority", [Low, Medium, High]);
display_and_parse!(TimeOfDay, "time of day", [Morning, Afternoon, Evening, Any]);

/// A recurring care-routine definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, assigned once at creation.
    pub id: String,
    /// Short title shown on the checklist.
    pub title: String,
    /// Free-form grouping label (e.g. "Exercise", "Meals").
    #[serde(default)]
    pub category: String,
    /// Part of the day the task is grouped under.
    pub time_of_day: TimeOfDay,
    /// Recurrence rule. Kept consistent with `weekdays` by the setters.
    pub frequency: Frequency,
    /// Days of the week the task applies to.
    pub weekdays: Vec<Weekday>,
    /// Ordered subtask labels; duplicates are allowed.
    #[serde(default)]
    pub subtasks: Vec<String>,
    /// Free-text notes about the task itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Wall-clock reminder such as "07:30". Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    /// Inactive tasks never appear in newly materialized logs.
    pub is_active: bool,
}

impl Task {
    /// Creates an active daily task with default metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            time_of_day: TimeOfDay::default(),
            frequency: Frequency::Daily,
            weekdays: Weekday::ALL.to_vec(),
            subtasks: Vec::new(),
            notes: None,
            priority: Priority::default(),
            reminder_time: None,
            is_active: true,
        }
    }

    /// Whether the task's weekday set contains `day`.
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.weekdays.contains(&day)
    }

    /// Whether a fresh log for `date` should include this task.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.runs_on(Weekday::of(date))
    }

    /// Sets the frequency. `Daily` forces the full week; `Weekdays` only
    /// sticks while the weekday set is a strict subset of the week.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        match frequency {
            Frequency::Daily => {
                self.frequency = Frequency::Daily;
                self.weekdays = Weekday::ALL.to_vec();
            }
            Frequency::Weekdays => {
                self.frequency = if is_full_week(&self.weekdays) {
                    Frequency::Daily
                } else {
                    Frequency::Weekdays
                };
            }
        }
    }

    /// Replaces the weekday set and derives the frequency from it.
    pub fn set_weekdays(&mut self, days: impl IntoIterator<Item = Weekday>) {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort();
        days.dedup();
        self.frequency = if days.len() == Weekday::ALL.len() {
            Frequency::Daily
        } else {
            Frequency::Weekdays
        };
        self.weekdays = days;
    }

    /// Re-derives frequency and weekdays so they agree. A `Daily` task gets
    /// the full week; a weekday list covering the full week becomes `Daily`.
    pub fn normalize(&mut self) {
        let frequency = self.frequency;
        let days = std::mem::take(&mut self.weekdays);
        self.set_weekdays(days);
        self.set_frequency(frequency);
    }

    /// Merges a partial update into the task. The id is never changed.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(time_of_day) = patch.time_of_day {
            self.time_of_day = time_of_day;
        }
        if let Some(weekdays) = patch.weekdays {
            self.set_weekdays(weekdays);
        }
        // after weekdays so that "Daily" wins when both are given
        if let Some(frequency) = patch.frequency {
            self.set_frequency(frequency);
        }
        if let Some(subtasks) = patch.subtasks {
            self.subtasks = subtasks;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(reminder_time) = patch.reminder_time {
            self.reminder_time = reminder_time;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }

    /// Checks that `frequency == Daily` exactly when the weekday set is the
    /// full week.
    pub fn check_invariants(&self) -> Result<()> {
        let full = is_full_week(&self.weekdays);
        match (self.frequency, full) {
            (Frequency::Daily, false) => Err(Error::Invariant(format!(
                "task {} is Daily but runs on {:?}",
                self.id, self.weekdays
            ))),
            (Frequency::Weekdays, true) => Err(Error::Invariant(format!(
                "task {} is Weekdays but runs every day",
                self.id
            ))),
            _ => Ok(()),
        }
    }
}

fn is_full_week(days: &[Weekday]) -> bool {
    let set: HashSet<&Weekday> = days.iter().collect();
    set.len() == Weekday::ALL.len()
}

/// Returns a fresh random task id.
pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A field-level partial update for a [`Task`]. `None` leaves a field alone.
///
/// The optional fields of a task take a nested option so that they can be
/// cleared: `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
    pub frequency: Option<Frequency>,
    pub weekdays: Option<Vec<Weekday>>,
    pub subtasks: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub reminder_time: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

/// One task's completion record within a day's log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogItem {
    /// Id of the task this record belongs to.
    pub task_id: String,
    pub completed: bool,
    /// Set when `completed` flips to true, cleared when it flips back.
    #[serde(
        rename = "completedAtISO",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// Per-day note. Independent of the completion state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LogItem {
    /// A not-yet-completed item without a note.
    pub fn pending(task_id: impl Into<String>) -> LogItem {
        LogItem {
            task_id: task_id.into(),
            completed: false,
            completed_at: None,
            note: None,
        }
    }
}

/// The checklist for one calendar date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyLog {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LogItem>,
}

impl DailyLog {
    pub fn item(&self, task_id: &str) -> Option<&LogItem> {
        self.items.iter().find(|i| i.task_id == task_id)
    }

    pub fn item_mut(&mut self, task_id: &str) -> Option<&mut LogItem> {
        self.items.iter_mut().find(|i| i.task_id == task_id)
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|i| i.completed).count()
    }

    /// True when every item is completed (vacuously true for an empty log).
    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|i| i.completed)
    }

    /// Checks item uniqueness and the completion timestamp rule.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.task_id.as_str()) {
                return Err(Error::Invariant(format!(
                    "log {} lists task {} twice",
                    self.date, item.task_id
                )));
            }
            if item.completed != item.completed_at.is_some() {
                return Err(Error::Invariant(format!(
                    "log {} item {}: completed={} but completedAt={:?}",
                    self.date, item.task_id, item.completed, item.completed_at
                )));
            }
        }
        Ok(())
    }
}

/// The owner and pet the routine belongs to. Overwritten wholesale on save.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    #[serde(default)]
    pub owner_name: String,
    #[serde(default, rename = "dogName", alias = "petName")]
    pub pet_name: String,
    #[serde(default, rename = "dogBreed", alias = "breed")]
    pub breed: String,
    #[serde(default, rename = "dogAge", alias = "age")]
    pub age: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Everything that gets persisted, in one document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub profile: OwnerProfile,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub logs: Vec<DailyLog>,
}
