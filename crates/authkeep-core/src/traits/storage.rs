//! Persisted key-value storage trait.

use crate::Result;

/// Durable key-value storage that survives restarts.
///
/// The session store keeps one serialized [`SessionRecord`] under a fixed key.
/// Calls are synchronous: implementations are expected to be local and fast,
/// like a browser's local storage.
///
/// [`SessionRecord`]: crate::types::SessionRecord
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
