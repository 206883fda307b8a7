//! Read-only projections over the registry and the stored logs.
//!
//! Nothing here materializes a log: a date without a stored log simply
//! counts as nothing completed.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::log_store::LogStore;
use crate::models::{DailyLog, LogItem, Task, TimeOfDay, Weekday};
use crate::registry::TaskRegistry;

/// Number of days in the weekly series, today included.
pub const WEEK_DAYS: i64 = 7;
/// How far back a streak is looked for, today included.
pub const STREAK_WINDOW_DAYS: i64 = 30;

/// One point of the weekly completion series.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCompletion {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub completed: usize,
    /// Completed items as a rounded percentage of the whole registry.
    pub percent: u32,
}

/// `completed / total_tasks` as a rounded percentage. An empty registry
/// counts as one task.
pub fn completion_percent(completed: usize, total_tasks: usize) -> u32 {
    let total = total_tasks.max(1);
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

fn completed_on(logs: &LogStore, date: NaiveDate) -> usize {
    logs.get(date).map(DailyLog::completed_count).unwrap_or(0)
}

/// Completion for the seven days ending `today`, oldest first.
pub fn weekly_series(tasks: &TaskRegistry, logs: &LogStore, today: NaiveDate) -> Vec<DayCompletion> {
    (0..WEEK_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let completed = completed_on(logs, date);
            DayCompletion {
                date,
                weekday: Weekday::of(date),
                completed,
                percent: completion_percent(completed, tasks.len()),
            }
        })
        .collect()
}

/// Rounded mean of the series percentages; 0 for an empty series.
pub fn weekly_average(series: &[DayCompletion]) -> u32 {
    if series.is_empty() {
        return 0;
    }
    let sum: u32 = series.iter().map(|d| d.percent).sum();
    (sum as f64 / series.len() as f64).round() as u32
}

/// Consecutive fully completed days ending today.
///
/// A day qualifies when a log is stored for it, all its items are completed
/// and the completed count equals the registry size (an empty registry
/// counts as one task). The walk stops at the first day that does not
/// qualify, and never looks further back than [`STREAK_WINDOW_DAYS`].
pub fn streak(tasks: &TaskRegistry, logs: &LogStore, today: NaiveDate) -> u32 {
    let total = tasks.len().max(1);
    let mut count = 0;
    for back in 0..STREAK_WINDOW_DAYS {
        let date = today - Duration::days(back);
        let Some(log) = logs.get(date) else {
            break;
        };
        if log.all_completed() && log.completed_count() == total {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// Completed/total counts for one date of the history index.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub date: NaiveDate,
    pub completed: usize,
    /// Size of the current registry, not of that day's log.
    pub total: usize,
    pub has_log: bool,
}

/// One line of a day's history detail.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// A stored day as shown when browsing history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDay {
    pub summary: HistorySummary,
    /// Items of the stored log whose task still exists, in log order.
    pub items: Vec<HistoryItem>,
}

pub fn history_summary(tasks: &TaskRegistry, logs: &LogStore, date: NaiveDate) -> HistorySummary {
    HistorySummary {
        date,
        completed: completed_on(logs, date),
        total: tasks.len(),
        has_log: logs.get(date).is_some(),
    }
}

/// Detail for one date, from whatever is stored. Never materializes.
pub fn history(tasks: &TaskRegistry, logs: &LogStore, date: NaiveDate) -> HistoryDay {
    let items = logs
        .get(date)
        .map(|log| {
            log.items
                .iter()
                .filter_map(|item| {
                    let task = tasks.get(&item.task_id)?;
                    Some(HistoryItem {
                        task_id: item.task_id.clone(),
                        title: task.title.clone(),
                        completed: item.completed,
                        completed_at: item.completed_at,
                        note: item.note.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    HistoryDay {
        summary: history_summary(tasks, logs, date),
        items,
    }
}

/// Summaries for the `days` dates ending today, today first.
pub fn history_index(
    tasks: &TaskRegistry,
    logs: &LogStore,
    today: NaiveDate,
    days: u32,
) -> Vec<HistorySummary> {
    (0..i64::from(days))
        .map(|back| history_summary(tasks, logs, today - Duration::days(back)))
        .collect()
}

/// A task paired with its item in the day's log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistEntry {
    pub task: Task,
    pub item: LogItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistGroup {
    pub time_of_day: TimeOfDay,
    pub entries: Vec<ChecklistEntry>,
}

/// A day's log arranged for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    pub date: NaiveDate,
    /// Non-empty groups in Morning, Afternoon, Evening, Any order.
    pub groups: Vec<ChecklistGroup>,
    pub completed: usize,
    pub total: usize,
}

/// Groups the day's active tasks by time of day. Only tasks with an item in
/// `log` are listed, in registry order inside a group. The counts cover
/// every item of the log.
pub fn checklist(tasks: &TaskRegistry, log: &DailyLog) -> Checklist {
    let groups = TimeOfDay::ORDER
        .iter()
        .filter_map(|&time_of_day| {
            let entries: Vec<ChecklistEntry> = tasks
                .tasks()
                .iter()
                .filter(|t| t.is_active && t.time_of_day == time_of_day)
                .filter_map(|t| {
                    log.item(&t.id).map(|item| ChecklistEntry {
                        task: t.clone(),
                        item: item.clone(),
                    })
                })
                .collect();
            if entries.is_empty() {
                None
            } else {
                Some(ChecklistGroup {
                    time_of_day,
                    entries,
                })
            }
        })
        .collect();
    Checklist {
        date: log.date,
        groups,
        completed: log.completed_count(),
        total: log.items.len(),
    }
}
