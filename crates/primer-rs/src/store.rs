//! Host configuration seam.
//!
//! The host owns configuration storage; the plugin reads settings through
//! [`ConfigStore::get`] and writes the serialized user-prompt list back
//! through [`ConfigStore::set`] + [`ConfigStore::save`]. `save` is optional:
//! the default implementation reports [`SaveOutcome::Unsupported`], in which
//! case mutations remain valid in memory for the process lifetime.
//!
//! Two implementations ship with the crate: [`FileConfigStore`] (a JSON
//! object on disk, saved atomically) for standalone use, and
//! [`MemoryConfigStore`] for hosts and tests that need no persistence.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of asking a [`ConfigStore`] to persist itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store wrote its contents durably.
    Saved,
    /// The store has no persistence mechanism; contents live in memory only.
    Unsupported,
    /// The store tried to persist and failed, with the underlying cause.
    Failed(String),
}

/// Get/set access to host configuration plus an optional save operation.
///
/// Keys are flat strings; values are JSON. Implementors decide where the
/// data lives. `save` failures are the caller's to log — the plugin never
/// treats them as fatal.
pub trait ConfigStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write `value` under `key`, replacing any prior value.
    fn set(&mut self, key: &str, value: Value);

    /// Persist the store's current contents.
    fn save(&mut self) -> SaveOutcome {
        SaveOutcome::Unsupported
    }
}

// ── FileConfigStore ────────────────────────────────────────────────

/// A [`ConfigStore`] backed by a single JSON object file.
///
/// Missing or malformed files degrade to an empty store with a warning;
/// `save` writes atomically (temp file + rename).
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    values: serde_json::Map<String, Value>,
}

impl FileConfigStore {
    /// Open the store at `path`, loading existing contents if present.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_values(&path);
        Self { path, values }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_values(path: &Path) -> serde_json::Map<String, Value> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return serde_json::Map::new(),
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(path = %path.display(), "config file root is not an object; starting empty");
            serde_json::Map::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config file is not valid JSON; starting empty");
            serde_json::Map::new()
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) -> SaveOutcome {
        let serialized = match serde_json::to_string_pretty(&Value::Object(self.values.clone())) {
            Ok(s) => s,
            Err(e) => return SaveOutcome::Failed(e.to_string()),
        };
        // Atomic write: temp file + rename.
        let tmp_path = self.path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp_path, &serialized) {
            return SaveOutcome::Failed(e.to_string());
        }
        match fs::rename(&tmp_path, &self.path) {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => SaveOutcome::Failed(e.to_string()),
        }
    }
}

// ── MemoryConfigStore ──────────────────────────────────────────────

/// A [`ConfigStore`] with no persistence.
///
/// `save` reports [`SaveOutcome::Unsupported`]; mutations remain visible
/// through `get` for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: serde_json::Map<String, Value>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, for host bootstrap or tests.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}
