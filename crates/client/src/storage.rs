//! Key/value storage areas that hold credentials
//!
//! Two areas exist side by side: a durable one that survives restarts
//! ("remember me") and a session-scoped one that lives only as long as the
//! current process. Writes are last-writer-wins; there is no locking across
//! processes.

use medportal_core::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Storage keys shared with the rest of the system; must match exactly
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";

    pub const HOSPITAL_ACCESS_TOKEN: &str = "hospital_access_token";
    pub const HOSPITAL_REFRESH_TOKEN: &str = "hospital_refresh_token";
    pub const HOSPITAL_USER: &str = "hospital_user";
    pub const HOSPITAL_DATA: &str = "hospital_data";
    pub const HOSPITAL_SUBSCRIPTION: &str = "hospital_subscription";

    /// Token keys cleared when a session cannot be recovered
    pub const SESSION_TOKENS: [&str; 2] = [ACCESS_TOKEN, REFRESH_TOKEN];
    /// Everything a patient/doctor/admin login writes
    pub const SESSION_ENTRIES: [&str; 3] = [ACCESS_TOKEN, REFRESH_TOKEN, USER];
    /// Everything the hospital portal writes
    pub const HOSPITAL_ENTRIES: [&str; 5] = [
        HOSPITAL_ACCESS_TOKEN,
        HOSPITAL_REFRESH_TOKEN,
        HOSPITAL_USER,
        HOSPITAL_DATA,
        HOSPITAL_SUBSCRIPTION,
    ];
}

/// A string key/value store with browser-storage semantics
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Which of the two areas a value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Durable,
    Session,
}

impl StorageArea {
    /// Area selected by the "remember me" flag at login
    pub const fn for_remember(remember: bool) -> Self {
        if remember { Self::Durable } else { Self::Session }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Durable => Self::Session,
            Self::Session => Self::Durable,
        }
    }
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable => f.write_str("durable"),
            Self::Session => f.write_str("session"),
        }
    }
}

/// Both storage areas, shared by the pipeline and the session store
#[derive(Clone)]
pub struct Storages {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Storages {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Two fresh in-memory areas
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn area(&self, area: StorageArea) -> &dyn KeyValueStore {
        match area {
            StorageArea::Durable => self.durable.as_ref(),
            StorageArea::Session => self.session.as_ref(),
        }
    }

    /// Read a non-empty value from one area
    pub fn get(&self, area: StorageArea, key: &str) -> Option<String> {
        self.area(area).get(key).filter(|v| !v.is_empty())
    }

    /// First area, durable before session, holding a non-empty value for `key`
    pub fn find(&self, key: &str) -> Option<(StorageArea, String)> {
        [StorageArea::Durable, StorageArea::Session]
            .into_iter()
            .find_map(|area| self.get(area, key).map(|value| (area, value)))
    }

    pub fn set(&self, area: StorageArea, key: &str, value: &str) -> CoreResult<()> {
        self.area(area).set(key, value)
    }

    /// Remove `keys` from both areas
    ///
    /// Every removal is attempted even if one fails; the first failure is
    /// returned.
    pub fn clear_everywhere(&self, keys: &[&str]) -> CoreResult<()> {
        let mut first_error = None;
        for area in [StorageArea::Durable, StorageArea::Session] {
            for key in keys {
                if let Err(err) = self.area(area).remove(key) {
                    warn!(%area, key, error = %err, "failed to clear storage key");
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Storages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storages").finish_non_exhaustive()
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Session-scoped storage: gone when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        write_lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        write_lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Durable storage backed by a single JSON object on disk
///
/// The whole map is rewritten on every mutation through a temporary file
/// followed by a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened durable store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path).map_err(|err| {
            CoreError::io_error(format!(
                "failed to replace {}: {err}",
                self.path.display()
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = write_lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = write_lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
