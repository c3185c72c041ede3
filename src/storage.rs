//! Storage layer for taskflow
//!
//! All state lives in four keyed records inside a key-value store:
//!
//! ```text
//! tf-user         {"username", "email", "password"}   (JSON object or absent)
//! tf-categories   [Category, ...]                     (JSON array)
//! tf-tasks        [Task, ...]                         (JSON array)
//! tf-theme        light | dark                        (bare string)
//! ```
//!
//! Two backends implement [`KeyValueStore`]: [`MemoryStore`], a process-local
//! map, and [`FileStore`], a directory holding one file per key. Reads never
//! fail on bad data: an unparsable record is logged and treated as absent.
//! Every save is a full-record replace.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Task;
use crate::user::User;

/// Name of the advisory lock file inside a [`FileStore`] directory
pub const LOCK_FILE: &str = ".lock";

/// The four record keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    User,
    Categories,
    Tasks,
    Theme,
}

impl RecordKey {
    pub const ALL: [RecordKey; 4] = [
        RecordKey::User,
        RecordKey::Categories,
        RecordKey::Tasks,
        RecordKey::Theme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::User => "tf-user",
            RecordKey::Categories => "tf-categories",
            RecordKey::Tasks => "tf-tasks",
            RecordKey::Theme => "tf-theme",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Anything other than `dark` reads as light.
    fn from_stored(raw: &str) -> Self {
        if raw.trim() == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(Error::InvalidArgument(format!(
                "invalid theme '{}': must be light or dark",
                s
            ))),
        }
    }
}

/// Raw string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Serialize one load-mutate-save cycle against other writers.
    ///
    /// The returned guard releases the lock on drop. Stores owned by a single
    /// process return `None`.
    fn lock(&self) -> Result<Option<FileLock>> {
        Ok(None)
    }
}

/// Process-local store, the equivalent of browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: `<dir>/<key>` per record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_lock_timeout(dir, DEFAULT_LOCK_TIMEOUT_MS)
    }

    pub fn with_lock_timeout(dir: impl Into<PathBuf>, lock_timeout_ms: u64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock_timeout_ms,
        })
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let bytes = match fs::read(self.record_path(key)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::Io(err)),
        };
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring record that is not valid UTF-8");
                Ok(None)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        lock::write_atomic(self.record_path(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn lock(&self) -> Result<Option<FileLock>> {
        FileLock::acquire(self.lock_path(), self.lock_timeout_ms).map(Some)
    }
}

/// Typed accessor over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lock(&self) -> Result<Option<FileLock>> {
        self.store.lock()
    }

    // =========================================================================
    // Generic JSON record I/O
    // =========================================================================

    /// Read and parse a JSON record. Absent keys, `null` and unparsable
    /// content all come back as `None`.
    pub fn read_json<T: DeserializeOwned>(&self, key: RecordKey) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key.as_str())? else {
            return Ok(None);
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "ignoring malformed record");
                Ok(None)
            }
        }
    }

    /// Serialize and overwrite a JSON record.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, key: RecordKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key.as_str(), &json)?;
        tracing::debug!(key = %key, bytes = json.len(), "record saved");
        Ok(())
    }

    pub fn remove(&mut self, key: RecordKey) -> Result<()> {
        self.store.remove(key.as_str())
    }

    /// Remove every record, theme included.
    pub fn clear(&mut self) -> Result<()> {
        for key in RecordKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }

    // =========================================================================
    // Typed records
    // =========================================================================

    pub fn load_user(&self) -> Result<Option<User>> {
        self.read_json(RecordKey::User)
    }

    pub fn save_user(&mut self, user: &User) -> Result<()> {
        self.write_json(RecordKey::User, user)
    }

    pub fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(self.read_json(RecordKey::Categories)?.unwrap_or_default())
    }

    pub fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.write_json(RecordKey::Categories, categories)
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read_json(RecordKey::Tasks)?.unwrap_or_default())
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.write_json(RecordKey::Tasks, tasks)
    }

    pub fn load_theme(&self) -> Result<Theme> {
        Ok(self
            .store
            .get(RecordKey::Theme.as_str())?
            .map(|raw| Theme::from_stored(&raw))
            .unwrap_or_default())
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(RecordKey::Theme.as_str(), theme.as_str())
    }
}
