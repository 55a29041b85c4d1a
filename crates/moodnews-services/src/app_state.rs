//! Shared application state: user preferences and the device location.
//!
//! Screens receive an `&AppState` instead of reaching for globals. Every
//! update is written to the preference store before memory changes, so a
//! read after a successful update is always backed by storage.

use std::sync::Arc;

use moodnews_core::{PreferenceError, PreferenceStore, Preferences, Units};
use moodnews_weather::{Location, LocationError, LocationProvider};
use parking_lot::RwLock;

const LOCATION_FALLBACK_MESSAGE: &str = "Failed to get location";

/// Where location acquisition stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Pending,
    Ready(Location),
    Failed(LocationError),
}

impl LocationState {
    /// Message to show the user when acquisition failed
    pub fn error_message(&self) -> Option<String> {
        match self {
            LocationState::Failed(e) => {
                let message = e.to_string();
                Some(if message.is_empty() {
                    LOCATION_FALLBACK_MESSAGE.to_string()
                } else {
                    message
                })
            }
            _ => None,
        }
    }
}

pub struct AppState {
    store: Arc<dyn PreferenceStore>,
    preferences: RwLock<Preferences>,
    location: RwLock<LocationState>,
}

impl AppState {
    /// Load preferences from `store` once.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Result<Self, PreferenceError> {
        let preferences = Preferences::load(store.as_ref())?;
        tracing::debug!(
            "Loaded preferences: units={}, categories={:?}",
            preferences.units,
            preferences.categories
        );
        Ok(Self {
            store,
            preferences: RwLock::new(preferences),
            location: RwLock::new(LocationState::Pending),
        })
    }

    pub fn units(&self) -> Units {
        self.preferences.read().units
    }

    pub fn categories(&self) -> Vec<String> {
        self.preferences.read().categories.clone()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences.read().clone()
    }

    /// # Errors
    /// Returns an error if the store write fails; the in-memory value is
    /// left unchanged.
    pub fn set_units(&self, units: Units) -> Result<(), PreferenceError> {
        Preferences::save_units(self.store.as_ref(), units)?;
        self.preferences.write().units = units;
        tracing::info!("Units set to {}", units);
        Ok(())
    }

    /// Replace the category list. Repeated names keep their first position.
    ///
    /// # Errors
    /// Returns an error if the store write fails; the in-memory value is
    /// left unchanged.
    pub fn set_categories<I, S>(&self, categories: I) -> Result<(), PreferenceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into();
            if !unique.contains(&category) {
                unique.push(category);
            }
        }

        Preferences::save_categories(self.store.as_ref(), &unique)?;
        tracing::info!("Categories set to {:?}", unique);
        self.preferences.write().categories = unique;
        Ok(())
    }

    /// Remove `category` if selected, append it otherwise. Returns whether
    /// it is selected afterwards.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn toggle_category(&self, category: &str) -> Result<bool, PreferenceError> {
        let mut categories = self.categories();
        let selected = if let Some(pos) = categories.iter().position(|c| c == category) {
            categories.remove(pos);
            false
        } else {
            categories.push(category.to_string());
            true
        };
        self.set_categories(categories)?;
        Ok(selected)
    }

    pub fn location_state(&self) -> LocationState {
        self.location.read().clone()
    }

    pub fn location(&self) -> Option<Location> {
        match *self.location.read() {
            LocationState::Ready(location) => Some(location),
            _ => None,
        }
    }

    /// Ask `provider` for the position once and record the outcome.
    pub async fn acquire_location(&self, provider: &dyn LocationProvider) -> LocationState {
        *self.location.write() = LocationState::Pending;

        let state = match provider.current_location().await {
            Ok(location) => {
                tracing::info!("Got location: {}, {}", location.latitude, location.longitude);
                LocationState::Ready(location)
            }
            Err(e) => {
                if e.is_terminal() {
                    tracing::warn!("Location permission denied");
                } else {
                    tracing::error!("Location acquisition failed: {}", e);
                }
                LocationState::Failed(e)
            }
        };

        *self.location.write() = state.clone();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodnews_core::{FilePreferenceStore, MemoryPreferenceStore};
    use moodnews_weather::FixedLocation;
    use tempfile::TempDir;

    fn memory_state() -> AppState {
        AppState::load(Arc::new(MemoryPreferenceStore::new())).unwrap()
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl PreferenceStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn starts_with_defaults() {
        let state = memory_state();
        assert_eq!(state.units(), Units::Metric);
        assert_eq!(state.categories(), vec!["general", "science", "sports"]);
        assert_eq!(state.location_state(), LocationState::Pending);
    }

    #[test]
    fn updates_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::in_dir(dir.path()));

        let state = AppState::load(store.clone()).unwrap();
        state.set_units(Units::Imperial).unwrap();
        state.set_categories(["technology", "health"]).unwrap();

        let reloaded = AppState::load(Arc::new(FilePreferenceStore::in_dir(dir.path()))).unwrap();
        assert_eq!(reloaded.units(), Units::Imperial);
        assert_eq!(reloaded.categories(), vec!["technology", "health"]);
    }

    #[test]
    fn corrupt_preferences_file_loads_defaults_and_heals() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::in_dir(dir.path());
        std::fs::write(store.path(), r#"{"units": 1, "categories": ["#).unwrap();

        let state = AppState::load(Arc::new(store)).unwrap();
        assert_eq!(state.preferences(), Preferences::default());

        state.set_units(Units::Imperial).unwrap();
        let reloaded = AppState::load(Arc::new(FilePreferenceStore::in_dir(dir.path()))).unwrap();
        assert_eq!(reloaded.units(), Units::Imperial);
    }

    #[test]
    fn set_categories_removes_repeats() {
        let state = memory_state();
        state
            .set_categories(["sports", "general", "sports", "health", "general"])
            .unwrap();
        assert_eq!(state.categories(), vec!["sports", "general", "health"]);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let state = memory_state();
        assert!(state.toggle_category("business").unwrap());
        assert_eq!(
            state.categories(),
            vec!["general", "science", "sports", "business"]
        );
        assert!(!state.toggle_category("science").unwrap());
        assert_eq!(state.categories(), vec!["general", "sports", "business"]);
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let state = AppState::load(Arc::new(ReadOnlyStore)).unwrap();
        assert!(state.set_units(Units::Imperial).is_err());
        assert_eq!(state.units(), Units::Metric);
        assert!(state.set_categories(["health"]).is_err());
        assert_eq!(state.categories(), vec!["general", "science", "sports"]);
    }

    #[tokio::test]
    async fn acquire_location_records_position() {
        let state = memory_state();
        let result = state
            .acquire_location(&FixedLocation::new(Location::new(35.7, 139.7)))
            .await;
        assert_eq!(result, LocationState::Ready(Location::new(35.7, 139.7)));
        assert_eq!(state.location(), Some(Location::new(35.7, 139.7)));
    }

    #[tokio::test]
    async fn acquire_location_records_denial() {
        let state = memory_state();
        state.acquire_location(&FixedLocation::denied()).await;
        assert_eq!(state.location(), None);
        assert_eq!(
            state.location_state().error_message().as_deref(),
            Some("Permission to access location was denied")
        );
    }

    #[test]
    fn empty_failure_message_uses_fallback() {
        let state = LocationState::Failed(LocationError::Unavailable(String::new()));
        assert_eq!(state.error_message().as_deref(), Some("Failed to get location"));
    }
}
