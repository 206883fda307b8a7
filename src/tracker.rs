//! The single state container behind every command.
//!
//! A [`Tracker`] owns the owner profile, the task registry and the log
//! store. It is created by loading from a [`Persistence`] collaborator and
//! saves the whole state after each mutation. The in-memory state is
//! authoritative: a failed save is reported as [`Error::Unsaved`] but the
//! change stays applied and the next successful save persists it.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::log_store::LogStore;
use crate::metrics::{self, Checklist, DayCompletion, HistoryDay, HistorySummary};
use crate::models::{DailyLog, OwnerProfile, Snapshot, Task, TaskPatch};
use crate::registry::TaskRegistry;
use crate::seed;
use crate::storage::Persistence;

pub struct Tracker<S: Persistence, C: Clock> {
    store: S,
    clock: C,
    profile: OwnerProfile,
    registry: TaskRegistry,
    logs: LogStore,
    unsaved: bool,
}

impl<S: Persistence, C: Clock> Tracker<S, C> {
    /// Wraps an already loaded snapshot. Nothing is saved until the first
    /// mutation.
    pub fn from_snapshot(store: S, clock: C, snapshot: Snapshot) -> Self {
        Self {
            store,
            clock,
            profile: snapshot.profile,
            registry: TaskRegistry::from_tasks(snapshot.tasks),
            logs: LogStore::from_logs(snapshot.logs),
            unsaved: false,
        }
    }

    /// Loads the saved state, starting empty if nothing was saved yet.
    pub fn open(store: S, clock: C) -> Result<Self> {
        let snapshot = store.load()?.unwrap_or_default();
        Ok(Self::from_snapshot(store, clock, snapshot))
    }

    /// Loads the saved state, starting from the sample routine (and saving
    /// it) if nothing was saved yet.
    pub fn open_or_seed(store: S, clock: C) -> Result<Self> {
        match store.load()? {
            Some(snapshot) => Ok(Self::from_snapshot(store, clock, snapshot)),
            None => {
                let snapshot = seed::sample_snapshot(clock.today());
                let mut tracker = Self::from_snapshot(store, clock, snapshot);
                info!("first run, starting from the sample routine");
                if let Err(e) = tracker.flush() {
                    warn!(error = %e, "sample routine not saved");
                }
                Ok(tracker)
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn profile(&self) -> &OwnerProfile {
        &self.profile
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn tasks(&self) -> &[Task] {
        self.registry.tasks()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.registry.get(id)
    }

    pub fn log_store(&self) -> &LogStore {
        &self.logs
    }

    /// Stored logs, most recently touched first.
    pub fn logs(&self) -> &[DailyLog] {
        self.logs.logs()
    }

    /// The stored log for `date` without materializing one.
    pub fn stored_log(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.logs.get(date)
    }

    /// True when the last save failed and the store is behind memory.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// The full state as it would be saved.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            profile: self.profile.clone(),
            tasks: self.registry.tasks().to_vec(),
            logs: self.logs.logs().to_vec(),
        }
    }

    /// Saves the whole state.
    pub fn flush(&mut self) -> Result<()> {
        match self.store.save(&self.snapshot()) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                warn!(error = %e, "save failed, change kept in memory");
                Err(Error::unsaved(e))
            }
        }
    }

    fn commit(&mut self) -> Result<()> {
        debug_assert!(
            self.logs.check_invariants().is_ok(),
            "log store invariant broken: {:?}",
            self.logs.check_invariants()
        );
        self.flush()
    }

    // =========================================================================
    // Profile and tasks
    // =========================================================================

    pub fn set_profile(&mut self, profile: OwnerProfile) -> Result<()> {
        self.profile = profile;
        info!("profile saved");
        self.commit()
    }

    /// Adds a task at the front of the registry. Stored logs for dates the
    /// task applies to get a pending item for it.
    pub fn add_task(&mut self, mut task: Task) -> Result<()> {
        task.normalize();
        let changed = self.logs.add_task_items(&task);
        if changed > 0 {
            info!(task_id = %task.id, logs = changed, "task added to stored logs");
        }
        self.registry.add(task);
        self.commit()
    }

    /// Applies a partial update. `Ok(false)` means no such task; nothing is
    /// saved in that case. Stored logs are not changed.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<bool> {
        if !self.registry.update(id, patch) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Deletes a task and removes its items from every stored log.
    /// `Ok(false)` means neither the registry nor any log referred to it.
    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let removed = self.registry.remove(id).is_some();
        let purged = self.logs.purge_task(id);
        if !removed && purged == 0 {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    // =========================================================================
    // Daily logs
    // =========================================================================

    /// Returns the log for `date`, materializing and saving one if the date
    /// has none yet. Never fails: a failed save is logged and retried with
    /// the next mutation.
    pub fn get_log(&mut self, date: NaiveDate) -> DailyLog {
        let handle = self.logs.resolve(date, self.registry.tasks());
        let created = handle.created();
        let log = (*handle).clone();
        // A failed save is already flagged by `has_unsaved_changes`.
        if created {
            if let Err(e) = self.commit() {
                debug!(%date, error = %e, "new log kept in memory only");
            }
        }
        log
    }

    /// Flips completion of one task on `date`. `Ok(false)` means the task is
    /// not part of that day's log.
    pub fn toggle_completion(
        &mut self,
        date: NaiveDate,
        task_id: &str,
        note: Option<String>,
    ) -> Result<bool> {
        let now = self.clock.now();
        let found = self
            .logs
            .resolve(date, self.registry.tasks())
            .toggle(task_id, note, now);
        self.commit()?;
        Ok(found)
    }

    /// Completes every item of the day, keeping earlier completion times.
    pub fn mark_all_done(&mut self, date: NaiveDate) -> Result<()> {
        let now = self.clock.now();
        self.logs
            .resolve(date, self.registry.tasks())
            .mark_all_done(now);
        self.commit()
    }

    /// Clears completion on every item of the day. Notes stay.
    pub fn reset_day(&mut self, date: NaiveDate) -> Result<()> {
        self.logs.resolve(date, self.registry.tasks()).reset();
        self.commit()
    }

    /// Overwrites one item's note. `Ok(false)` means the task is not part of
    /// that day's log.
    pub fn set_note(&mut self, date: NaiveDate, task_id: &str, note: &str) -> Result<bool> {
        let found = self
            .logs
            .resolve(date, self.registry.tasks())
            .set_note(task_id, note);
        self.commit()?;
        Ok(found)
    }

    /// Overwrites every item's note of the day with `note`.
    pub fn set_all_notes(&mut self, date: NaiveDate, note: &str) -> Result<()> {
        self.logs
            .resolve(date, self.registry.tasks())
            .set_all_notes(note);
        self.commit()
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    pub fn active_task_count(&self) -> usize {
        self.registry.active_count()
    }

    pub fn weekly_series(&self) -> Vec<DayCompletion> {
        metrics::weekly_series(&self.registry, &self.logs, self.today())
    }

    pub fn weekly_average(&self) -> u32 {
        metrics::weekly_average(&self.weekly_series())
    }

    pub fn streak(&self) -> u32 {
        metrics::streak(&self.registry, &self.logs, self.today())
    }

    pub fn history(&self, date: NaiveDate) -> HistoryDay {
        metrics::history(&self.registry, &self.logs, date)
    }

    pub fn history_index(&self, days: u32) -> Vec<HistorySummary> {
        metrics::history_index(&self.registry, &self.logs, self.today(), days)
    }

    /// The day's checklist. Resolves the log like [`Tracker::get_log`].
    pub fn checklist(&mut self, date: NaiveDate) -> Checklist {
        let log = self.get_log(date);
        metrics::checklist(&self.registry, &log)
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Checks tasks, logs, and that no log item refers to a deleted task.
    pub fn check_invariants(&self) -> Result<()> {
        self.registry.check_invariants()?;
        self.logs.check_invariants()?;
        let ids: HashSet<&str> = self.registry.tasks().iter().map(|t| t.id.as_str()).collect();
        for log in self.logs.logs() {
            if let Some(item) = log.items.iter().find(|i| !ids.contains(i.task_id.as_str())) {
                return Err(Error::Invariant(format!(
                    "log {} refers to unknown task {}",
                    log.date, item.task_id
                )));
            }
        }
        Ok(())
    }
}
