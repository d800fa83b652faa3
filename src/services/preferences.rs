use std::sync::Arc;

use crate::{
    db::{KeyValueStore, StoreKey, StoreResult},
    models::{Movie, MovieId},
};

/// Maximum number of recently viewed movies kept
pub const RECENTLY_VIEWED_LIMIT: usize = 20;

/// Local favorites, view history and theme preference
///
/// The only writer of the persisted collections. Reads never fail: missing or
/// undecodable data reads as an empty collection. Writes return their
/// outcome after logging it, so callers decide what a failed write means to
/// their own state.
#[derive(Clone)]
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn read_movies(&self, key: StoreKey) -> Vec<Movie> {
        let raw = match self.kv.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to read stored movies");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Discarding undecodable stored movies");
            Vec::new()
        })
    }

    fn write_movies(&self, key: StoreKey, movies: &[Movie]) -> StoreResult<()> {
        let json = serde_json::to_string(movies)?;
        self.kv.set(key.as_str(), &json).map_err(|e| {
            tracing::error!(key = %key, count = movies.len(), error = %e, "Failed to persist movies");
            e
        })
    }

    fn remove_key(&self, key: StoreKey) -> StoreResult<()> {
        self.kv.remove(key.as_str()).map_err(|e| {
            tracing::error!(key = %key, error = %e, "Failed to clear stored key");
            e
        })
    }

    /// Favorites in insertion order
    pub fn favorites(&self) -> Vec<Movie> {
        self.read_movies(StoreKey::Favorites)
    }

    /// Appends `movie` unless a favorite with the same id already exists
    pub fn add_to_favorites(&self, movie: &Movie) -> StoreResult<()> {
        let mut favorites = self.favorites();
        if favorites.iter().any(|m| m.id == movie.id) {
            return Ok(());
        }

        favorites.push(movie.clone());
        self.write_movies(StoreKey::Favorites, &favorites)?;
        tracing::debug!(movie_id = movie.id, "Added to favorites");
        Ok(())
    }

    pub fn remove_from_favorites(&self, id: MovieId) -> StoreResult<()> {
        let favorites = self.favorites();
        let before = favorites.len();
        let remaining: Vec<Movie> = favorites.into_iter().filter(|m| m.id != id).collect();
        if remaining.len() == before {
            return Ok(());
        }

        self.write_movies(StoreKey::Favorites, &remaining)?;
        tracing::debug!(movie_id = id, "Removed from favorites");
        Ok(())
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites().iter().any(|m| m.id == id)
    }

    /// View history, newest first
    pub fn recently_viewed(&self) -> Vec<Movie> {
        self.read_movies(StoreKey::RecentlyViewed)
    }

    /// Moves `movie` to the front of the history, dropping anything past
    /// [`RECENTLY_VIEWED_LIMIT`]
    pub fn add_to_recently_viewed(&self, movie: &Movie) -> StoreResult<()> {
        let mut recent: Vec<Movie> = self
            .recently_viewed()
            .into_iter()
            .filter(|m| m.id != movie.id)
            .collect();
        recent.insert(0, movie.clone());
        recent.truncate(RECENTLY_VIEWED_LIMIT);

        self.write_movies(StoreKey::RecentlyViewed, &recent)
    }

    pub fn clear_favorites(&self) -> StoreResult<()> {
        self.remove_key(StoreKey::Favorites)?;
        tracing::info!("Favorites cleared");
        Ok(())
    }

    pub fn clear_recently_viewed(&self) -> StoreResult<()> {
        self.remove_key(StoreKey::RecentlyViewed)?;
        tracing::info!("Recently viewed cleared");
        Ok(())
    }

    /// Wipes every persisted key of the profile, theme included
    pub fn clear_all(&self) -> StoreResult<()> {
        self.kv.clear().map_err(|e| {
            tracing::error!(error = %e, "Failed to clear local profile");
            e
        })?;
        tracing::info!("All local data cleared");
        Ok(())
    }

    /// Dark theme flag, `false` when unset or malformed
    pub fn dark_mode(&self) -> bool {
        match self.kv.get(StoreKey::DarkMode.as_str()) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or(false),
            Ok(None) => false,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read theme preference");
                false
            }
        }
    }

    pub fn set_dark_mode(&self, enabled: bool) -> StoreResult<()> {
        let json = serde_json::to_string(&enabled)?;
        self.kv.set(StoreKey::DarkMode.as_str(), &json).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist theme preference");
            e
        })
    }
}
