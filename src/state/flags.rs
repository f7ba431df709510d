//! User flag persistence
//!
//! Flags are the user's own annotations on meetings ("reviewed", "important",
//! ...), independent of the feed's scoring. They live in a single JSON
//! document that is read once at startup and fully rewritten on every toggle;
//! the map is bounded by the meetings the user actually looks at, so the
//! full-document rewrite is acceptable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mapping from meeting id to flag-type name to value
///
/// Absence of an entry means "not flagged" for every flag type. Entries
/// reference meeting ids by value; nothing removes them when a meeting leaves
/// the feed.
pub type FlagMap = HashMap<String, HashMap<String, bool>>;

/// Error types for flag storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored document has a format version this build does not understand
    #[error("Unsupported flag store version: {0}")]
    UnsupportedVersion(u32),
}

/// Flip a flag, creating intermediate entries as needed
///
/// Absent values default to false before flipping, so the first toggle of any
/// flag yields true. Returns the new value.
pub fn toggle(flags: &mut FlagMap, meeting_id: &str, flag_type: &str) -> bool {
    let value = flags
        .entry(meeting_id.to_string())
        .or_default()
        .entry(flag_type.to_string())
        .or_insert(false);
    *value = !*value;
    *value
}

/// Look up a flag, defaulting to false
pub fn is_flagged(flags: &FlagMap, meeting_id: &str, flag_type: &str) -> bool {
    flags
        .get(meeting_id)
        .and_then(|per_meeting| per_meeting.get(flag_type))
        .copied()
        .unwrap_or(false)
}

/// Durable storage capability for the flag map
///
/// Abstracted so tests can swap in an in-memory fake and so the storage
/// medium can change without touching the coordinator.
pub trait FlagStore: Send + Sync {
    /// Read the stored map; a missing document yields an empty map
    fn read(&self) -> Result<FlagMap, StorageError>;

    /// Replace the stored map with the given one
    fn write(&self, flags: &FlagMap) -> Result<(), StorageError>;
}

/// Serializable envelope for the flag document
/// Versioned for future migration support
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FlagFileData {
    version: u32,
    flags: FlagMap,
}

const FLAG_FILE_VERSION: u32 = 1;

/// Flag store backed by a JSON file on disk
pub struct JsonFlagStore {
    path: PathBuf,
}

impl JsonFlagStore {
    /// Store backed by the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default path for the flag document
    /// Returns a path in the user's home directory or current directory
    pub fn default_path() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push(".meeting-tracker");
            path.push("kate_flags.json");
            path
        } else {
            PathBuf::from("kate_flags.json")
        }
    }
}

impl FlagStore for JsonFlagStore {
    fn read(&self) -> Result<FlagMap, StorageError> {
        if !self.path.exists() {
            return Ok(FlagMap::new());
        }

        let json = fs::read_to_string(&self.path)?;
        let data: FlagFileData = serde_json::from_str(&json)?;

        if data.version != FLAG_FILE_VERSION {
            return Err(StorageError::UnsupportedVersion(data.version));
        }

        Ok(data.flags)
    }

    fn write(&self, flags: &FlagMap) -> Result<(), StorageError> {
        let data = FlagFileData {
            version: FLAG_FILE_VERSION,
            flags: flags.clone(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(&self.path, json)?;

        Ok(())
    }
}

/// Flag store held entirely in memory
///
/// Fake for tests and ephemeral sessions; serializes through the same JSON
/// envelope as the file-backed store so round-trip behavior matches.
#[derive(Default)]
pub struct InMemoryFlagStore {
    document: std::sync::Mutex<Option<String>>,
}

impl InMemoryFlagStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for InMemoryFlagStore {
    fn read(&self) -> Result<FlagMap, StorageError> {
        let document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match document.as_deref() {
            None => Ok(FlagMap::new()),
            Some(json) => {
                let data: FlagFileData = serde_json::from_str(json)?;
                Ok(data.flags)
            }
        }
    }

    fn write(&self, flags: &FlagMap) -> Result<(), StorageError> {
        let json = serde_json::to_string(&FlagFileData {
            version: FLAG_FILE_VERSION,
            flags: flags.clone(),
        })?;
        let mut document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *document = Some(json);
        Ok(())
    }
}

/// Read the stored flag map, recovering failures as an empty map
///
/// A missing or unreadable document must never fail startup; the dashboard
/// renders without annotations instead.
pub fn load_or_default(store: &dyn FlagStore) -> FlagMap {
    match store.read() {
        Ok(flags) => flags,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load flags; starting with an empty map");
            FlagMap::new()
        }
    }
}
