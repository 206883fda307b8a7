//! Per-date logs and the mutations applied to them.
//!
//! Access goes through [`LogStore::resolve`], which returns a [`LogHandle`]
//! for the date and stores a freshly materialized log first if none exists.
//! Mutating through the handle moves the log to the front of the store so
//! the list stays ordered most recently touched first.

use std::collections::HashSet;
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::materialize::materialize;
use crate::models::{DailyLog, LogItem, Task};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStore {
    logs: Vec<DailyLog>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_logs(logs: Vec<DailyLog>) -> Self {
        Self { logs }
    }

    /// Stored logs, most recently touched first.
    pub fn logs(&self) -> &[DailyLog] {
        &self.logs
    }

    pub fn into_logs(self) -> Vec<DailyLog> {
        self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// The stored log for `date`, if any. Never materializes.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.logs.iter().find(|l| l.date == date)
    }

    /// Returns a handle on the log for `date`, materializing and storing one
    /// from `tasks` when the date has no log yet.
    pub fn resolve(&mut self, date: NaiveDate, tasks: &[Task]) -> LogHandle<'_> {
        let (idx, created) = match self.logs.iter().position(|l| l.date == date) {
            Some(idx) => (idx, false),
            None => {
                self.logs.insert(0, materialize(date, tasks));
                (0, true)
            }
        };
        debug!(%date, created, "resolved log");
        LogHandle {
            logs: &mut self.logs,
            idx,
            created,
        }
    }

    /// Adds a pending item for a newly created task to every stored log the
    /// task applies to. Returns the number of logs changed.
    pub fn add_task_items(&mut self, task: &Task) -> usize {
        let mut changed = 0;
        for log in self.logs.iter_mut() {
            if task.applies_on(log.date) && log.item(&task.id).is_none() {
                log.items.insert(0, LogItem::pending(task.id.clone()));
                changed += 1;
            }
        }
        changed
    }

    /// Drops every item referring to `task_id` from every stored log.
    /// Returns the number of items removed.
    pub fn purge_task(&mut self, task_id: &str) -> usize {
        let mut removed = 0;
        for log in self.logs.iter_mut() {
            let before = log.items.len();
            log.items.retain(|i| i.task_id != task_id);
            removed += before - log.items.len();
        }
        if removed > 0 {
            info!(%task_id, removed, "purged task from logs");
        }
        removed
    }

    /// Checks that dates are unique and every log is well formed.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for log in &self.logs {
            if !seen.insert(log.date) {
                return Err(Error::Invariant(format!("two logs stored for {}", log.date)));
            }
            log.check_invariants()?;
        }
        Ok(())
    }
}

/// A resolved log. Reads go through `Deref`; every mutator first moves the
/// log to the front of the store.
#[derive(Debug)]
pub struct LogHandle<'a> {
    logs: &'a mut Vec<DailyLog>,
    idx: usize,
    created: bool,
}

impl<'a> LogHandle<'a> {
    /// Whether resolving this handle stored a new log.
    pub fn created(&self) -> bool {
        self.created
    }

    fn touch(&mut self) -> &mut DailyLog {
        if self.idx != 0 {
            let log = self.logs.remove(self.idx);
            self.logs.insert(0, log);
            self.idx = 0;
        }
        &mut self.logs[0]
    }

    /// Flips one item's completion. A supplied note overwrites the item's
    /// note in the same step. Returns `false` if the task is not in the log.
    pub fn toggle(&mut self, task_id: &str, note: Option<String>, now: DateTime<Utc>) -> bool {
        let log = self.touch();
        let date = log.date;
        let Some(item) = log.item_mut(task_id) else {
            debug!(%date, %task_id, "toggle ignored, task not in log");
            return false;
        };
        item.completed = !item.completed;
        item.completed_at = if item.completed { Some(now) } else { None };
        if let Some(note) = note {
            item.note = Some(note);
        }
        info!(%date, %task_id, completed = item.completed, "toggled");
        true
    }

    /// Completes every item. Items that already carry a completion time keep
    /// it. Returns the number of items newly stamped.
    pub fn mark_all_done(&mut self, now: DateTime<Utc>) -> usize {
        let log = self.touch();
        let mut stamped = 0;
        for item in log.items.iter_mut() {
            item.completed = true;
            if item.completed_at.is_none() {
                item.completed_at = Some(now);
                stamped += 1;
            }
        }
        info!(date = %log.date, stamped, "marked all done");
        stamped
    }

    /// Clears completion on every item, leaving notes alone.
    pub fn reset(&mut self) {
        let log = self.touch();
        for item in log.items.iter_mut() {
            item.completed = false;
            item.completed_at = None;
        }
        info!(date = %log.date, "day reset");
    }

    /// Overwrites one item's note. Returns `false` if the task is not in the log.
    pub fn set_note(&mut self, task_id: &str, note: impl Into<String>) -> bool {
        let log = self.touch();
        match log.item_mut(task_id) {
            Some(item) => {
                item.note = Some(note.into());
                true
            }
            None => false,
        }
    }

    /// Overwrites the note of every item with the same text.
    pub fn set_all_notes(&mut self, note: &str) {
        let log = self.touch();
        for item in log.items.iter_mut() {
            item.note = Some(note.to_string());
        }
        info!(date = %log.date, items = log.items.len(), "note applied to all items");
    }
}

impl Deref for LogHandle<'_> {
    type Target = DailyLog;

    fn deref(&self) -> &DailyLog {
        &self.logs[self.idx]
    }
}
