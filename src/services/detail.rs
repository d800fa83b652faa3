use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Credits, Movie, MovieDetail, MovieId, Video, Videos},
    services::{catalog::CatalogClient, preferences::PreferenceStore, status::ViewStatus},
};

/// Similar titles shown under a movie
pub const SIMILAR_DISPLAY_LIMIT: usize = 6;

#[derive(Default)]
struct DetailState {
    status: ViewStatus,
    generation: u64,
    detail: Option<MovieDetail>,
    credits: Option<Credits>,
    videos: Option<Videos>,
    similar: Vec<Movie>,
    is_favorite: bool,
}

impl DetailState {
    fn clear(&mut self) {
        self.detail = None;
        self.credits = None;
        self.videos = None;
        self.similar.clear();
        self.is_favorite = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub status: ViewStatus,
    pub detail: Option<MovieDetail>,
    pub credits: Option<Credits>,
    pub videos: Option<Videos>,
    pub similar: Vec<Movie>,
    pub is_favorite: bool,
}

impl DetailSnapshot {
    pub fn title(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.movie.title.as_str())
    }

    /// YouTube trailers first, then other YouTube clips
    pub fn trailers(&self) -> Vec<&Video> {
        self.videos.as_ref().map(Videos::playable).unwrap_or_default()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.status.error_message()
    }
}

/// Single movie page with credits, videos and similar titles
#[derive(Clone)]
pub struct DetailView {
    catalog: Arc<dyn CatalogClient>,
    prefs: PreferenceStore,
    state: Arc<RwLock<DetailState>>,
}

impl DetailView {
    pub fn new(catalog: Arc<dyn CatalogClient>, prefs: PreferenceStore) -> Self {
        Self {
            catalog,
            prefs,
            state: Arc::new(RwLock::new(DetailState::default())),
        }
    }

    /// Opens the movie named by an untrusted path segment
    ///
    /// Anything that is not a positive integer id lands in the error state
    /// without touching the catalog.
    pub async fn open(&self, raw_id: &str) -> ViewStatus {
        match parse_movie_id(raw_id) {
            Ok(id) => self.open_id(id).await,
            Err(e) => {
                tracing::warn!(raw_id = %raw_id, error = %e, "Rejecting movie id");
                let mut state = self.state.write().await;
                state.generation += 1;
                state.clear();
                state.status = ViewStatus::Error;
                state.status
            }
        }
    }

    /// Loads detail, credits, videos and similar titles together
    ///
    /// Nothing is shown unless all four arrive. A successful load records the
    /// movie as recently viewed.
    pub async fn open_id(&self, id: MovieId) -> ViewStatus {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.clear();
            state.status = ViewStatus::Loading;
            state.generation
        };

        let result = tokio::try_join!(
            self.catalog.movie_detail(id),
            self.catalog.credits(id),
            self.catalog.videos(id),
            self.catalog.similar(id, 1),
        );

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(movie_id = id, "Dropping detail for a movie no longer open");
            return state.status;
        }

        match result {
            Ok((detail, credits, videos, similar)) => {
                // View history failures never block the page
                if let Err(e) = self.prefs.add_to_recently_viewed(&detail.summary()) {
                    tracing::warn!(movie_id = id, error = %e, "Movie not recorded as viewed");
                }

                state.is_favorite = self.prefs.is_favorite(id);
                state.similar = similar
                    .results
                    .into_iter()
                    .take(SIMILAR_DISPLAY_LIMIT)
                    .collect();
                state.detail = Some(detail);
                state.credits = Some(credits);
                state.videos = Some(videos);
                state.status = ViewStatus::Loaded;

                tracing::info!(
                    movie_id = id,
                    catalog = self.catalog.name(),
                    similar = state.similar.len(),
                    is_favorite = state.is_favorite,
                    "Movie detail loaded"
                );
            }
            Err(e) => {
                tracing::error!(movie_id = id, error = %e, "Movie detail failed to load");
                state.clear();
                state.status = ViewStatus::Error;
            }
        }

        state.status
    }

    /// Brings the favorite flag to `favorite`, persisting first
    ///
    /// The local flag only changes when the store accepted the write.
    pub async fn set_favorite(&self, favorite: bool) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let detail = state
            .detail
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("No movie is open".to_string()))?;
        let id = detail.movie.id;

        if favorite {
            self.prefs.add_to_favorites(&detail.summary())?;
        } else {
            self.prefs.remove_from_favorites(id)?;
        }
        state.is_favorite = favorite;

        tracing::debug!(movie_id = id, is_favorite = favorite, "Favorite updated");
        Ok(favorite)
    }

    /// Flips the favorite flag and returns its new value
    pub async fn toggle_favorite(&self) -> AppResult<bool> {
        let target = !self.state.read().await.is_favorite;
        self.set_favorite(target).await
    }

    pub async fn snapshot(&self) -> DetailSnapshot {
        let state = self.state.read().await;
        DetailSnapshot {
            status: state.status,
            detail: state.detail.clone(),
            credits: state.credits.clone(),
            videos: state.videos.clone(),
            similar: state.similar.clone(),
            is_favorite: state.is_favorite,
        }
    }
}

fn parse_movie_id(raw: &str) -> AppResult<MovieId> {
    let id: MovieId = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {:?}", raw)))?;
    if id <= 0 {
        return Err(AppError::InvalidInput(format!("Invalid movie id: {}", id)));
    }
    Ok(id)
}
