// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use queryview_app::{ConfigError, ConfigStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory [`ConfigStore`] that counts calls and can be told to fail.
///
/// Clones share data, counters, and fail flags.
///
/// ```
/// use queryview_app::{ConfigService, QueryPrefs, PREFS_KEY};
/// use queryview_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save(PREFS_KEY, &QueryPrefs::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key(PREFS_KEY));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    blobs: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `load_raw` fail until cleared.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.state().fail_on_load = fail;
    }

    /// Make `save_raw` fail until cleared.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state().fail_on_save = fail;
    }

    /// `load_raw` calls attempted, including failed ones.
    pub fn load_count(&self) -> usize {
        self.state().load_count
    }

    /// `save_raw` calls attempted, including failed ones.
    pub fn save_count(&self) -> usize {
        self.state().save_count
    }

    /// Returns `true` if a blob is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state().blobs.contains_key(key)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut state = self.state();
        state.load_count += 1;
        if state.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        state.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.save_count += 1;
        if state.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        state.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
