//! Persisted user preferences.
//!
//! Preferences live in a string key-value store. Two keys are used:
//! `units` holds `"metric"` or `"imperial"`, `categories` holds a
//! JSON-encoded list of news category names.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::PreferenceError;
use crate::units::Units;

pub const UNITS_KEY: &str = "units";
pub const CATEGORIES_KEY: &str = "categories";

/// Categories used until the user picks their own.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["general", "science", "sports"];

/// Categories the headlines endpoint understands.
pub const KNOWN_CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// String key-value persistence.
///
/// `set` must not return before the value is durable, so a read issued
/// after a successful `set` always observes it.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preference store backed by a single JSON object file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<config_dir>/preferences.json`
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored value. An unreadable file, or an entry that is
    /// not a string, is skipped with a warning so the next `set` rewrites
    /// the file.
    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let raw = match serde_json::from_str::<serde_json::Map<String, Value>>(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable preferences file {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(BTreeMap::new());
            }
        };

        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(value) => Some((key, value)),
                other => {
                    tracing::warn!("Ignoring stored preference {}: {}", key, other);
                    None
                }
            })
            .collect())
    }

    /// Replace the file in one step so an interrupted write leaves the
    /// previous contents in place.
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.lock();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;

        tracing::debug!("Stored preference {} at {:?}", key, self.path);
        Ok(())
    }
}

/// In-memory preference store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// User preferences as read from a [`PreferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub units: Units,
    pub categories: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            units: Units::default(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Preferences {
    /// Read both keys once. Missing keys fall back to defaults; so do
    /// stored values that no longer parse, with a warning.
    ///
    /// # Errors
    /// Returns an error only when the store itself cannot be read.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        let mut prefs = Self::default();

        if let Some(raw) = store.get(UNITS_KEY)? {
            match raw.parse::<Units>() {
                Ok(units) => prefs.units = units,
                Err(e) => tracing::warn!("Ignoring stored units: {}", e),
            }
        }

        if let Some(raw) = store.get(CATEGORIES_KEY)? {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(categories) => prefs.categories = categories,
                Err(e) => tracing::warn!("Ignoring stored categories: {}", e),
            }
        }

        Ok(prefs)
    }

    /// # Errors
    /// Returns an error if the store write fails.
    pub fn save_units(store: &dyn PreferenceStore, units: Units) -> Result<(), PreferenceError> {
        store.set(UNITS_KEY, units.as_str())
    }

    /// # Errors
    /// Returns an error if the list cannot be encoded or the store write fails.
    pub fn save_categories(
        store: &dyn PreferenceStore,
        categories: &[String],
    ) -> Result<(), PreferenceError> {
        let json = serde_json::to_string(categories)?;
        store.set(CATEGORIES_KEY, &json)
    }
}
