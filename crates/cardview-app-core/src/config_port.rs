// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared by card views (navigation prefs and the settings profile).

use serde_json::Value;
use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::NavPrefs;

/// Config key for [`NavPrefs`].
pub const NAV_PREFS_KEY: &str = "cardview-nav";
/// Config key for the settings profile.
pub const SETTINGS_KEY: &str = "cardview-settings";

/// Config-facing port for loading/saving navigation preferences (and similar blobs).
pub trait ConfigPort {
    /// Load navigation preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<NavPrefs>;
    /// Persist navigation preferences (best-effort; impl may log errors internally).
    fn save_prefs(&self, prefs: &NavPrefs);
    /// Load the stored settings overrides.
    fn load_settings(&self) -> Option<Value>;
    /// Persist the settings profile (best-effort).
    fn save_settings(&self, settings: &Value);
}

impl<S> ConfigPort for ConfigService<S>
where
    S: ConfigStore,
{
    fn load_prefs(&self) -> Option<NavPrefs> {
        self.load(NAV_PREFS_KEY).unwrap_or_else(|err| {
            warn!(%err, "failed to load navigation prefs");
            None
        })
    }

    fn save_prefs(&self, prefs: &NavPrefs) {
        if let Err(err) = self.save(NAV_PREFS_KEY, prefs) {
            warn!(%err, "failed to save navigation prefs");
        }
    }

    fn load_settings(&self) -> Option<Value> {
        self.load(SETTINGS_KEY).unwrap_or_else(|err| {
            warn!(%err, "failed to load settings");
            None
        })
    }

    fn save_settings(&self, settings: &Value) {
        if let Err(err) = self.save(SETTINGS_KEY, settings) {
            warn!(%err, "failed to save settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore(RefCell<HashMap<String, Vec<u8>>>);

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.0.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.0.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn prefs_round_trip_through_service() {
        let svc = ConfigService::new(MemStore::default());
        assert_eq!(svc.load_prefs(), None);
        let prefs = NavPrefs {
            last_page: Some(("Tag".into(), "T1".into(), None, None, None, None)),
        };
        svc.save_prefs(&prefs);
        assert_eq!(svc.load_prefs(), Some(prefs));
    }

    #[test]
    fn corrupt_blob_reads_as_missing() {
        let store = MemStore::default();
        store
            .0
            .borrow_mut()
            .insert(NAV_PREFS_KEY.to_owned(), b"{not json".to_vec());
        let svc = ConfigService::new(store);
        assert_eq!(svc.load_prefs(), None);
    }
}
