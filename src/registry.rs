use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Task, TaskPatch};

/// The ordered set of task definitions, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from persisted tasks, keeping their order.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_active).count()
    }

    /// Inserts a task at the front, normalizing its frequency and weekdays.
    ///
    /// The caller supplies a fresh id; uniqueness is not re-checked.
    pub fn add(&mut self, mut task: Task) {
        task.normalize();
        info!(task_id = %task.id, title = %task.title, "task added");
        self.tasks.insert(0, task);
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `false` when no such task exists, which is not an error: the
    /// task may have been deleted while it was being edited.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.apply(patch);
                info!(task_id = %id, "task updated");
                true
            }
            None => {
                debug!(task_id = %id, "update ignored, task not found");
                false
            }
        }
    }

    /// Removes and returns the task with `id`.
    ///
    /// This only touches the registry. Dropping the task's log items is the
    /// log store's job, see `LogStore::purge_task`.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(idx);
        info!(task_id = %id, "task removed");
        Some(task)
    }

    /// Checks every task's frequency/weekday rule.
    pub fn check_invariants(&self) -> Result<()> {
        self.tasks.iter().try_for_each(Task::check_invariants)
    }
}
