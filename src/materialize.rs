use chrono::NaiveDate;
use tracing::debug;

use crate::models::{DailyLog, LogItem, Task, Weekday};

/// Builds the log a date would have if nothing had been stored for it yet.
///
/// Every active task whose weekday set contains the date's weekday gets a
/// pending item, in registry order. Pure: same inputs, same log.
pub fn materialize(date: NaiveDate, tasks: &[Task]) -> DailyLog {
    let day = Weekday::of(date);
    let items: Vec<LogItem> = tasks
        .iter()
        .filter(|t| t.is_active && t.runs_on(day))
        .map(|t| LogItem::pending(t.id.clone()))
        .collect();
    debug!(%date, weekday = %day, items = items.len(), "materialized log");
    DailyLog { date, items }
}
