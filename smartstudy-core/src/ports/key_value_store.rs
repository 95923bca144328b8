//! Key/value store port - persistence abstraction

use anyhow::Result;

/// String-keyed store of serialized values
///
/// This is the only persistence the core needs: every record collection is
/// written as one JSON document under one key. Implementations (adapters)
/// decide where the documents live.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
