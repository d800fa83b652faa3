use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{Genre, Movie, PagedResult},
    services::{
        catalog::{CatalogClient, SortBy},
        paged_list::{load_next, ListSnapshot, LoadOutcome, PagedList},
        status::ViewStatus,
    },
};

/// What the browse results are currently listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseDriver {
    Query(String),
    Genre(Genre),
}

struct BrowseState {
    status: ViewStatus,
    genres: Vec<Genre>,
    driver: Option<BrowseDriver>,
    results: PagedList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseSnapshot {
    pub status: ViewStatus,
    pub genres: Vec<Genre>,
    pub driver: Option<BrowseDriver>,
    pub results: ListSnapshot,
}

impl BrowseSnapshot {
    pub fn query(&self) -> Option<&str> {
        match &self.driver {
            Some(BrowseDriver::Query(q)) => Some(q),
            _ => None,
        }
    }

    pub fn selected_genre(&self) -> Option<&Genre> {
        match &self.driver {
            Some(BrowseDriver::Genre(g)) => Some(g),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading() || self.results.loading
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.status.error_message()
    }
}

/// Genre and search browsing over one result list
///
/// A text query and a selected genre are mutually exclusive drivers; picking
/// either replaces the other and restarts the results at page 1.
#[derive(Clone)]
pub struct BrowseFeed {
    catalog: Arc<dyn CatalogClient>,
    sort_by: SortBy,
    state: Arc<RwLock<BrowseState>>,
}

impl BrowseFeed {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            sort_by: SortBy::default(),
            state: Arc::new(RwLock::new(BrowseState {
                status: ViewStatus::Idle,
                genres: Vec::new(),
                driver: None,
                results: PagedList::new(),
            })),
        }
    }

    /// Genre results order, popularity by default
    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Loads the genre list, then honours a `search` parameter carried in by
    /// navigation as if the user had submitted it
    pub async fn activate(&self, search_param: Option<&str>) -> ViewStatus {
        self.load_genres().await;
        self.apply_search_param(search_param).await
    }

    /// A genre list failure is only logged; browsing by search still works
    pub async fn load_genres(&self) {
        match self.catalog.genres().await {
            Ok(genres) => {
                tracing::debug!(count = genres.len(), "Browse genres loaded");
                self.state.write().await.genres = genres;
            }
            Err(e) => tracing::error!(error = %e, "Failed to load genres"),
        }
    }

    pub async fn apply_search_param(&self, search_param: Option<&str>) -> ViewStatus {
        match search_param.map(str::trim) {
            Some(query) if !query.is_empty() => self.search(query).await,
            _ => self.state.read().await.status,
        }
    }

    /// Replaces the results with page 1 of `query`, dropping any genre
    ///
    /// A blank query returns the feed to idle.
    pub async fn search(&self, query: &str) -> ViewStatus {
        let query = query.trim();
        if query.is_empty() {
            let mut state = self.state.write().await;
            state.driver = None;
            state.results.reset();
            state.status = ViewStatus::Idle;
            return state.status;
        }

        self.start(BrowseDriver::Query(query.to_string())).await
    }

    /// Replaces the results with page 1 of `genre`, dropping any query
    pub async fn select_genre(&self, genre: Genre) -> ViewStatus {
        self.start(BrowseDriver::Genre(genre)).await
    }

    async fn start(&self, driver: BrowseDriver) -> ViewStatus {
        let ticket = {
            let mut state = self.state.write().await;
            state.driver = Some(driver.clone());
            state.status = ViewStatus::Loading;
            state.results.begin_first_page()
        };

        tracing::debug!(driver = ?driver, "Browse driver changed");
        let result = self.fetch(&driver, ticket.page()).await;

        let mut state = self.state.write().await;
        match state.results.finish(ticket, result) {
            Ok(LoadOutcome::Stale) => {}
            Ok(_) => {
                state.status = ViewStatus::Loaded;
                tracing::info!(
                    driver = ?driver,
                    results = state.results.items().len(),
                    has_more = state.results.has_more(),
                    "Browse results loaded"
                );
            }
            Err(e) => {
                tracing::error!(driver = ?driver, error = %e, "Browse fetch failed");
                state.status = ViewStatus::Error;
            }
        }
        state.status
    }

    async fn fetch(
        &self,
        driver: &BrowseDriver,
        page: u32,
    ) -> AppResult<PagedResult<Movie>> {
        match driver {
            BrowseDriver::Query(query) => self.catalog.search_movies(query, page).await,
            BrowseDriver::Genre(genre) => {
                self.catalog
                    .movies_by_genre(genre.id, page, self.sort_by)
                    .await
            }
        }
    }

    /// Appends the next page for the current driver
    ///
    /// A failure keeps the accumulated results on screen alongside the
    /// error; the next successful page clears the error.
    pub async fn load_more(&self) -> LoadOutcome {
        let driver = {
            let state = self.state.read().await;
            match &state.driver {
                Some(driver) if !state.status.is_loading() => driver.clone(),
                _ => return LoadOutcome::Skipped,
            }
        };

        let result = load_next(&*self.state, |s| &mut s.results, |page| {
            self.fetch(&driver, page)
        })
        .await;

        let mut state = self.state.write().await;
        match result {
            Ok(LoadOutcome::Loaded { page, added }) => {
                state.status = ViewStatus::Loaded;
                tracing::debug!(page = page, added = added, "Browse page appended");
                LoadOutcome::Loaded { page, added }
            }
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(driver = ?driver, error = %e, "Browse load more failed");
                state.status = ViewStatus::Error;
                LoadOutcome::Failed
            }
        }
    }

    pub async fn snapshot(&self) -> BrowseSnapshot {
        let state = self.state.read().await;
        BrowseSnapshot {
            status: state.status,
            genres: state.genres.clone(),
            driver: state.driver.clone(),
            results: state.results.snapshot(),
        }
    }
}
