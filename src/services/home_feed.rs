use std::sync::Arc;

use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tokio::sync::RwLock;

use crate::{
    models::Movie,
    services::{
        catalog::CatalogClient,
        paged_list::{load_next, swallow_failure, ListSnapshot, LoadOutcome, PagedList},
        preferences::PreferenceStore,
        status::ViewStatus,
    },
};

/// Results kept from every page of a home list
pub const HOME_PAGE_CAP: usize = 8;

/// The three independently paginated home lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeList {
    Popular,
    Trending,
    /// Titles similar to one randomly picked recently viewed movie
    RecentBased,
}

impl HomeList {
    fn label(&self) -> &'static str {
        match self {
            HomeList::Popular => "popular",
            HomeList::Trending => "trending",
            HomeList::RecentBased => "recent_based",
        }
    }
}

struct HomeState {
    status: ViewStatus,
    generation: u64,
    popular: PagedList,
    trending: PagedList,
    recent_based: PagedList,
    /// Recently viewed movie the personalized list is built from
    anchor: Option<Movie>,
}

impl HomeState {
    fn new() -> Self {
        Self {
            status: ViewStatus::Idle,
            generation: 0,
            popular: PagedList::with_page_cap(HOME_PAGE_CAP),
            trending: PagedList::with_page_cap(HOME_PAGE_CAP),
            recent_based: PagedList::with_page_cap(HOME_PAGE_CAP),
            anchor: None,
        }
    }

    fn reset_lists(&mut self) {
        self.popular.reset();
        self.trending.reset();
        self.recent_based.reset();
        self.anchor = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeSnapshot {
    pub status: ViewStatus,
    pub popular: ListSnapshot,
    pub trending: ListSnapshot,
    pub recent_based: ListSnapshot,
    pub based_on: Option<Movie>,
}

impl HomeSnapshot {
    pub fn error_message(&self) -> Option<&'static str> {
        self.status.error_message()
    }
}

/// Home screen: popular, trending and "because you watched" lists
///
/// Activation loads page 1 of every list as one all-or-nothing join. After
/// that each list pages on its own; a failed next page is logged and leaves
/// the feed as it was.
#[derive(Clone)]
pub struct HomeFeed {
    catalog: Arc<dyn CatalogClient>,
    prefs: PreferenceStore,
    rng: Arc<Mutex<StdRng>>,
    state: Arc<RwLock<HomeState>>,
}

impl HomeFeed {
    pub fn new(catalog: Arc<dyn CatalogClient>, prefs: PreferenceStore) -> Self {
        Self::with_rng(catalog, prefs, StdRng::from_entropy())
    }

    /// Feed whose personalization pick comes from `rng`
    pub fn with_rng(catalog: Arc<dyn CatalogClient>, prefs: PreferenceStore, rng: StdRng) -> Self {
        Self {
            catalog,
            prefs,
            rng: Arc::new(Mutex::new(rng)),
            state: Arc::new(RwLock::new(HomeState::new())),
        }
    }

    fn pick_anchor(&self) -> Option<Movie> {
        let recent = self.prefs.recently_viewed();
        let mut rng = self.rng.lock();
        recent.choose(&mut *rng).cloned()
    }

    /// Loads page 1 of every list, replacing whatever the feed showed
    pub async fn activate(&self) -> ViewStatus {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.status = ViewStatus::Loading;
            state.generation
        };

        let anchor = self.pick_anchor();
        let similar = async {
            match &anchor {
                Some(movie) => self.catalog.similar(movie.id, 1).await.map(Some),
                None => Ok(None),
            }
        };

        let result = tokio::try_join!(self.catalog.popular(1), self.catalog.trending(1), similar);

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(generation = generation, "Dropping superseded home feed load");
            return state.status;
        }

        match result {
            Ok((popular, trending, similar)) => {
                state.popular.load_first_page(popular);
                state.trending.load_first_page(trending);
                match similar {
                    Some(similar) => {
                        state.recent_based.load_first_page(similar);
                    }
                    None => state.recent_based.reset(),
                }
                state.anchor = anchor;
                state.status = ViewStatus::Loaded;

                tracing::info!(
                    catalog = self.catalog.name(),
                    popular = state.popular.items().len(),
                    trending = state.trending.items().len(),
                    recent_based = state.recent_based.items().len(),
                    based_on = ?state.anchor.as_ref().map(|m| m.id),
                    "Home feed loaded"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Home feed failed to load");
                state.reset_lists();
                state.status = ViewStatus::Error;
            }
        }

        state.status
    }

    /// Starts over, as on a fresh visit
    pub async fn refresh(&self) -> ViewStatus {
        self.activate().await
    }

    /// Appends the next page of `list`
    ///
    /// Skipped until the feed has loaded, while the same list is already
    /// fetching, or once it has no more pages.
    pub async fn load_more(&self, list: HomeList) -> LoadOutcome {
        let anchor_id = {
            let state = self.state.read().await;
            if state.status != ViewStatus::Loaded {
                return LoadOutcome::Skipped;
            }
            state.anchor.as_ref().map(|m| m.id)
        };

        let catalog = &self.catalog;
        let result = match list {
            HomeList::Popular => {
                load_next(&*self.state, |s| &mut s.popular, |page| catalog.popular(page)).await
            }
            HomeList::Trending => {
                load_next(&*self.state, |s| &mut s.trending, |page| catalog.trending(page)).await
            }
            HomeList::RecentBased => {
                let Some(id) = anchor_id else {
                    return LoadOutcome::Skipped;
                };
                load_next(&*self.state, |s| &mut s.recent_based, move |page| {
                    catalog.similar(id, page)
                })
                .await
            }
        };

        swallow_failure(list.label(), result)
    }

    pub async fn snapshot(&self) -> HomeSnapshot {
        let state = self.state.read().await;
        HomeSnapshot {
            status: state.status,
            popular: state.popular.snapshot(),
            trending: state.trending.snapshot(),
            recent_based: state.recent_based.snapshot(),
            based_on: state.anchor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::AppError;
    use crate::models::PagedResult;
    use crate::services::catalog::MockCatalogClient;
    use crate::services::test_support::movie;
    use mockall::predicate::eq;

    fn page(page: u32, first_id: i64, count: i64, total_pages: u32) -> PagedResult<Movie> {
        PagedResult {
            page,
            results: (first_id..first_id + count).map(movie).collect(),
            total_pages,
            total_results: total_pages * 20,
        }
    }

    fn empty_prefs() -> PreferenceStore {
        PreferenceStore::new(Arc::new(MemoryStore::new()))
    }

    fn base_mock() -> MockCatalogClient {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_popular()
            .with(eq(1))
            .returning(|_| Ok(page(1, 100, 20, 5)));
        catalog
            .expect_trending()
            .with(eq(1))
            .returning(|_| Ok(page(1, 200, 20, 3)));
        catalog.expect_name().return_const("mock");
        catalog
    }

    #[tokio::test]
    async fn test_activate_caps_lists_at_eight() {
        let feed = HomeFeed::new(Arc::new(base_mock()), empty_prefs());

        assert_eq!(feed.activate().await, ViewStatus::Loaded);
        let snapshot = feed.snapshot().await;

        assert_eq!(snapshot.popular.items.len(), 8);
        assert!(snapshot.popular.has_more);
        assert_eq!(snapshot.trending.items.len(), 8);
        assert!(snapshot.recent_based.items.is_empty());
        assert!(!snapshot.recent_based.has_more);
        assert_eq!(snapshot.based_on, None);
    }

    #[tokio::test]
    async fn test_load_more_popular_appends_capped_page() {
        let mut catalog = base_mock();
        catalog
            .expect_popular()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(page(2, 300, 20, 5)));
        let feed = HomeFeed::new(Arc::new(catalog), empty_prefs());
        feed.activate().await;

        let outcome = feed.load_more(HomeList::Popular).await;
        assert_eq!(outcome, LoadOutcome::Loaded { page: 2, added: 8 });

        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.popular.items.len(), 16);
        assert_eq!(snapshot.popular.items[8].id, 300);
        assert_eq!(snapshot.popular.page, 2);
        assert!(snapshot.popular.has_more);
        assert_eq!(snapshot.trending.page, 1);
    }

    #[tokio::test]
    async fn test_initial_failure_is_all_or_nothing() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_popular()
            .returning(|_| Ok(page(1, 100, 20, 5)));
        catalog.expect_trending().returning(|_| {
            Err(AppError::ExternalApi {
                status: 500,
                message: "boom".to_string(),
            })
        });
        let feed = HomeFeed::new(Arc::new(catalog), empty_prefs());

        assert_eq!(feed.activate().await, ViewStatus::Error);
        let snapshot = feed.snapshot().await;
        assert!(snapshot.popular.items.is_empty());
        assert!(snapshot.trending.items.is_empty());
        assert_eq!(snapshot.error_message(), Some("Please refresh the page."));
    }

    #[tokio::test]
    async fn test_load_more_failure_keeps_list() {
        let mut catalog = base_mock();
        catalog
            .expect_trending()
            .with(eq(2))
            .returning(|_| Err(AppError::Internal("timeout".to_string())));
        let feed = HomeFeed::new(Arc::new(catalog), empty_prefs());
        feed.activate().await;

        let outcome = feed.load_more(HomeList::Trending).await;
        assert_eq!(outcome, LoadOutcome::Failed);

        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.status, ViewStatus::Loaded);
        assert_eq!(snapshot.error_message(), None);
        assert_eq!(snapshot.trending.items.len(), 8);
        assert!(snapshot.trending.has_more);
        assert!(!snapshot.trending.loading);
    }

    #[tokio::test]
    async fn test_personalized_list_from_single_recent_movie() {
        let prefs = empty_prefs();
        prefs.add_to_recently_viewed(&movie(42)).unwrap();

        let mut catalog = base_mock();
        catalog
            .expect_similar()
            .with(eq(42), eq(1))
            .times(1)
            .returning(|_, _| Ok(page(1, 500, 10, 2)));
        catalog
            .expect_similar()
            .with(eq(42), eq(2))
            .times(1)
            .returning(|_, _| Ok(page(2, 600, 10, 2)));
        let feed = HomeFeed::new(Arc::new(catalog), prefs);

        feed.activate().await;
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.based_on.map(|m| m.id), Some(42));
        assert_eq!(snapshot.recent_based.items.len(), 8);
        assert!(snapshot.recent_based.has_more);

        feed.load_more(HomeList::RecentBased).await;
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.recent_based.items.len(), 16);
        assert!(!snapshot.recent_based.has_more);
        assert_eq!(
            feed.load_more(HomeList::RecentBased).await,
            LoadOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_seeded_pick_is_deterministic() {
        let prefs = empty_prefs();
        for id in 1..=10 {
            prefs.add_to_recently_viewed(&movie(id)).unwrap();
        }
        let expected = prefs
            .recently_viewed()
            .choose(&mut StdRng::seed_from_u64(7))
            .map(|m| m.id)
            .unwrap();

        let mut catalog = base_mock();
        catalog
            .expect_similar()
            .with(eq(expected), eq(1))
            .times(1)
            .returning(|_, _| Ok(page(1, 500, 20, 1)));
        let feed = HomeFeed::with_rng(Arc::new(catalog), prefs, StdRng::seed_from_u64(7));

        feed.activate().await;
        assert_eq!(feed.snapshot().await.based_on.map(|m| m.id), Some(expected));
    }

    #[tokio::test]
    async fn test_load_more_skipped_before_activation() {
        let feed = HomeFeed::new(Arc::new(MockCatalogClient::new()), empty_prefs());
        assert_eq!(feed.load_more(HomeList::Popular).await, LoadOutcome::Skipped);
        assert_eq!(feed.snapshot().await.status, ViewStatus::Idle);
    }
}
