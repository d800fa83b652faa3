use parking_lot::RwLock;

use crate::{
    db::StoreResult,
    models::{Movie, MovieId},
    services::preferences::PreferenceStore,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibrarySnapshot {
    pub favorites: Vec<Movie>,
    pub recently_viewed: Vec<Movie>,
    pub dark_mode: bool,
}

/// Favorites and history page, plus the theme switch
///
/// Every mutation goes through [`PreferenceStore`] and then re-reads it, so
/// the view never shows anything the store does not hold.
pub struct LibraryView {
    prefs: PreferenceStore,
    state: RwLock<LibrarySnapshot>,
}

impl LibraryView {
    pub fn new(prefs: PreferenceStore) -> Self {
        let view = Self {
            prefs,
            state: RwLock::new(LibrarySnapshot::default()),
        };
        view.reload();
        view
    }

    pub fn reload(&self) {
        let snapshot = LibrarySnapshot {
            favorites: self.prefs.favorites(),
            recently_viewed: self.prefs.recently_viewed(),
            dark_mode: self.prefs.dark_mode(),
        };
        tracing::debug!(
            favorites = snapshot.favorites.len(),
            recently_viewed = snapshot.recently_viewed.len(),
            dark_mode = snapshot.dark_mode,
            "Library reloaded"
        );
        *self.state.write() = snapshot;
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        self.state.read().clone()
    }

    pub fn remove_favorite(&self, id: MovieId) -> StoreResult<()> {
        let result = self.prefs.remove_from_favorites(id);
        self.reload();
        result
    }

    pub fn clear_favorites(&self) -> StoreResult<()> {
        let result = self.prefs.clear_favorites();
        self.reload();
        result
    }

    pub fn clear_recently_viewed(&self) -> StoreResult<()> {
        let result = self.prefs.clear_recently_viewed();
        self.reload();
        result
    }

    /// Wipes the whole profile, theme included
    pub fn clear_all(&self) -> StoreResult<()> {
        let result = self.prefs.clear_all();
        tracing::info!(ok = result.is_ok(), "Profile cleared");
        self.reload();
        result
    }

    pub fn set_dark_mode(&self, enabled: bool) -> StoreResult<bool> {
        let result = self.prefs.set_dark_mode(enabled);
        self.reload();
        result.map(|_| enabled)
    }

    pub fn toggle_dark_mode(&self) -> StoreResult<bool> {
        let enabled = !self.state.read().dark_mode;
        self.set_dark_mode(enabled)
    }
}
