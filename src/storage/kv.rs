use crate::error::Result;

/// A key-value storage capability backing one session tier.
///
/// The session store never talks to a concrete persistence backend directly;
/// it is handed two implementations of this trait, one durable (survives
/// process restarts) and one ephemeral (process-scoped). Tests wire an
/// in-memory store for both tiers.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
