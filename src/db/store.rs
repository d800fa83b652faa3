use std::fmt::Display;

/// Fixed keys of the persisted preference layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Favorites,
    RecentlyViewed,
    DarkMode,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Favorites => "moviepick_favorites",
            StoreKey::RecentlyViewed => "moviepick_recent_viewed",
            StoreKey::DarkMode => "moviepick_dark_mode",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronous string key-value storage scoped to one local profile.
///
/// Every call is a complete read or write; implementations serialize access
/// internally so callers can share one store by reference.
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, `None` when absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key succeeds
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Drops every key, including ones this crate does not own
    fn clear(&self) -> StoreResult<()>;
}
