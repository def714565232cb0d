//! Key-value persistence used by every other part of habitual.
//!
//! The contract is weak:
//!  - A missing key reads as `None`, never as an error.
//!  - Serialization and I/O failures are logged here and turn into a no-op write or a `None`
//!    read. Callers have to cope with stale or missing data, not with errors.
//!
//! [file_store::FileStore] is the main realization.

pub mod file_store;

use std::{future::Future, ops::Deref};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Keys of everything habitual persists.
pub mod keys {
    pub const HABITS: &str = "habits";
    pub const DAILY_PROGRESS: &str = "dailyProgress";
    pub const REMINDERS: &str = "reminders";
    pub const THEME: &str = "theme";
    pub const NOTIFICATIONS: &str = "notifications";
}

pub trait KeyValueStore {
    /// Raw text stored under `key`.
    fn get_raw(&self, key: &str) -> impl Future<Output = Option<String>>;

    fn set_raw(&self, key: &str, value: String) -> impl Future<Output = ()>;

    fn remove(&self, key: &str) -> impl Future<Output = ()>;

    /// Reads `key` as JSON. Malformed values are logged and read as absent.
    fn get<T: DeserializeOwned>(&self, key: &str) -> impl Future<Output = Option<T>> {
        async move {
            let raw = self.get_raw(key).await?;
            match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Value under {key} is not valid json, treating it as absent: {e}");
                    None
                }
            }
        }
    }

    /// Writes `value` as JSON under `key`. A value that can't be serialized is logged and dropped.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> impl Future<Output = ()> {
        async move {
            match serde_json::to_string(value) {
                Ok(raw) => self.set_raw(key, raw).await,
                Err(e) => warn!("Failed to serialize value for {key}, nothing written: {e}"),
            }
        }
    }
}

impl<T: Deref> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn get_raw(&self, key: &str) -> impl Future<Output = Option<String>> {
        self.deref().get_raw(key)
    }

    fn set_raw(&self, key: &str, value: String) -> impl Future<Output = ()> {
        self.deref().set_raw(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = ()> {
        self.deref().remove(key)
    }
}
