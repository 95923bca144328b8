//! Storage service - typed JSON documents over a KeyValueStore
//!
//! Two read flavours exist. `load_or` is lenient: a missing, unreadable or
//! corrupt value yields the default and the failure is logged. `try_load`
//! is strict and is used on every read-modify-write path, so a broken read
//! can never be followed by a write that drops other records.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;
use crate::services::logging::{LogEvent, LoggingService};

/// Store keys used by the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Directory of all users
    pub users: String,
    /// Current session pointer
    pub current_user: String,
    /// Mapping of user id to note collection
    pub notes: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            users: format!("{}_users", prefix),
            current_user: format!("{}_current_user", prefix),
            notes: format!("{}_notes", prefix),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix("smartstudy")
    }
}

/// Typed access to the key/value store
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    logger: Option<Arc<LoggingService>>,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            logger: None,
        }
    }

    /// Attach an event log for storage failures
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Strict read: `Ok(None)` when absent, `StorageFailure` when the value
    /// cannot be read or decoded
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = self
            .store
            .get(key)
            .map_err(|e| self.failure("storage_read_failed", key, e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| self.failure("storage_decode_failed", key, e.to_string())),
        }
    }

    /// Lenient read: any failure is logged and yields `default`
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) | Err(_) => default,
        }
    }

    /// Serialize and write `value` under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| self.failure("storage_encode_failed", key, e.to_string()))?;
        self.store
            .set(key, &raw)
            .map_err(|e| self.failure("storage_write_failed", key, e.to_string()))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.store
            .remove(key)
            .map_err(|e| self.failure("storage_remove_failed", key, e.to_string()))
    }

    /// Every key currently held by the store
    pub fn stored_keys(&self) -> Result<Vec<String>> {
        self.store
            .keys()
            .map_err(|e| self.failure("storage_read_failed", "*", e.to_string()))
    }

    /// Log a failure and turn it into a `StorageFailure`
    fn failure(&self, event: &str, key: &str, message: String) -> Error {
        eprintln!("[smartstudy] {} ({}): {}", event, key, message);
        if let Some(logger) = &self.logger {
            // The event log must never turn one failure into two
            let _ = logger.log_error(LogEvent::new(event).with_store_key(key), &message, None);
        }
        Error::storage(format!("{}: {}", key, message))
    }
}
