use std::cell::{Cell, RefCell};
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::Snapshot;

/// Where the profile, tasks and logs are kept between runs.
pub trait Persistence {
    /// Loads the saved state, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;
    /// Replaces the saved state.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn load(&self) -> Result<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}

/// A single pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the state file if it exists.
    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    /// Returns `Ok(None)` when the file does not exist. A file that exists
    /// but cannot be read or parsed is an error, so it is never overwritten
    /// by an empty state.
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no state file yet");
            return Ok(None);
        }
        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        let snapshot = serde_json::from_str(&s)?;
        debug!(path = %self.path.display(), "state loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let s = serde_json::to_string_pretty(snapshot)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        debug!(path = %self.path.display(), bytes = s.len(), "state saved");
        Ok(())
    }
}

/// Keeps the serialized state in memory. Saves can be made to fail to
/// exercise the unsaved-change path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let store = Self::new();
        store.data.replace(Some(serde_json::to_string(snapshot)?));
        Ok(store)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        match self.data.borrow().as_deref() {
            Some(s) => Ok(Some(serde_json::from_str(s)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_saves.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "memory store is read-only").into());
        }
        self.data.replace(Some(serde_json::to_string(snapshot)?));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
