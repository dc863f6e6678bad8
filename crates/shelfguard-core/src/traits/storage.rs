//! Persistent client storage trait.

use crate::Result;

/// Durable key/value storage backing the session store.
///
/// Writes must be durable when they return: a value written and then read
/// by a freshly opened storage over the same location must be observed.
pub trait SessionStorage: Send + Sync {
    /// Read the value under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
