// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service, storage port, and the live settings profile.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::time::Instant;
use thiserror::Error;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Dotted key is empty or walks through a non-object value.
    #[error("invalid settings key: {0}")]
    InvalidKey(String),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// A single settings change as delivered to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct SettingChange<'a> {
    /// Dotted key that changed.
    pub key: &'a str,
    /// New value.
    pub value: &'a Value,
    /// When the change was made.
    pub at: Instant,
}

/// Subscription handle returned by [`Settings::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&SettingChange<'_>)>;

struct Subscriber {
    id: SubscriptionId,
    key: String,
    callback: Callback,
}

/// Nested key→value settings profile with per-key change subscriptions.
///
/// Keys are dotted paths (`interface.mru-size`) into a JSON object tree.
/// Subscribers run synchronously inside [`set`](Settings::set), in
/// connection order, and only when the stored value actually changes.
pub struct Settings {
    root: Value,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("root", &self.root)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Subscription key matching every setting.
pub const WILDCARD: &str = "*";

/// Maximum entries in the most-recently-used list.
pub const KEY_MRU_SIZE: &str = "interface.mru-size";
/// Debounce window for configuration-driven rebuilds, in milliseconds.
pub const KEY_REFRESH_DELAY_MS: &str = "interface.refresh-delay-ms";
/// Whether the bookmarks bar is shown on non-tag pages.
pub const KEY_SHOW_BOOKMARKS: &str = "display.show-bookmarks";
/// Whether tag chips are rendered on cards.
pub const KEY_SHOW_TAGS: &str = "display.show-tags";
/// Thumbnail size bucket name.
pub const KEY_THUMBNAIL_SIZE: &str = "media.thumbnail-size";

impl Settings {
    /// Profile with no keys.
    pub fn empty() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Profile built from an existing JSON tree (non-objects become empty).
    pub fn from_value(root: Value) -> Self {
        let root = if root.is_object() {
            root
        } else {
            Value::Object(Map::new())
        };
        Self {
            root,
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    /// Default card-view profile.
    pub fn card_view_defaults() -> Self {
        Self::from_value(serde_json::json!({
            "interface": { "mru-size": 10, "refresh-delay-ms": 3000 },
            "display": { "show-bookmarks": true, "show-tags": true },
            "media": { "thumbnail-size": "small" },
        }))
    }

    /// Layer `overrides` on top of the current values without notifying.
    pub fn merge(&mut self, overrides: &Value) {
        merge_into(&mut self.root, overrides);
    }

    /// Whole tree, for persistence.
    pub fn to_value(&self) -> Value {
        self.root.clone()
    }

    /// Look up a dotted key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.root, |node, part| node.get(part))
    }

    /// Integer value of `key`, or `default`.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get(key).and_then(Value::as_u64).unwrap_or(default)
    }

    /// Boolean value of `key`, or `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// String value of `key`, or `default`.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Every settable (leaf) key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(&self.root, String::new(), &mut out);
        out.sort();
        out
    }

    /// Store `value` under `key`, creating intermediate objects.
    ///
    /// Returns `Ok(true)` and notifies subscribers of `key` when the value changed.
    pub fn set(&mut self, key: &str, value: Value, now: Instant) -> Result<bool, ConfigError> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::InvalidKey(key.to_owned()));
        }
        let (leaf, parents) = parts
            .split_last()
            .ok_or_else(|| ConfigError::InvalidKey(key.to_owned()))?;
        let mut node = &mut self.root;
        for part in parents {
            let map = node
                .as_object_mut()
                .ok_or_else(|| ConfigError::InvalidKey(key.to_owned()))?;
            node = map
                .entry((*part).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let map = node
            .as_object_mut()
            .ok_or_else(|| ConfigError::InvalidKey(key.to_owned()))?;
        if map.get(*leaf) == Some(&value) {
            return Ok(false);
        }
        map.insert((*leaf).to_owned(), value.clone());

        let change = SettingChange {
            key,
            value: &value,
            at: now,
        };
        for sub in self
            .subscribers
            .iter_mut()
            .filter(|s| s.key == key || s.key == WILDCARD)
        {
            (sub.callback)(&change);
        }
        Ok(true)
    }

    /// Subscribe to changes of `key` (or of every key, with [`WILDCARD`]).
    pub fn connect<F>(&mut self, key: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&SettingChange<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            key: key.to_owned(),
            callback: Box::new(callback),
        });
        id
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::card_view_defaults()
    }
}

fn collect_leaves(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node.as_object() {
        Some(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                collect_leaves(child, key, out);
            }
        }
        None if !prefix.is_empty() => out.push(prefix),
        None => {}
    }
}

fn merge_into(base: &mut Value, overrides: &Value) {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_map), Some(over_map)) => {
            for (name, value) in over_map {
                match base_map.get_mut(name) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_into(existing, value);
                    }
                    _ => {
                        base_map.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        _ => *base = overrides.clone(),
    }
}
