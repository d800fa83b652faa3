#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use moviepick::{
    error::{AppError, AppResult},
    models::{Credits, Genre, Movie, MovieDetail, MovieId, PagedResult, Videos},
    services::{CatalogClient, SortBy},
};

pub fn movie(id: MovieId) -> Movie {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Movie {}", id),
        "poster_path": format!("/poster{}.jpg", id),
        "release_date": "2021-06-01",
        "genre_ids": [28]
    }))
    .unwrap()
}

/// Scripted catalog that suspends once per call
///
/// Every list endpoint serves 20 movies per page out of `total_pages`, with
/// ids derived from the endpoint and page so results are distinguishable.
pub struct FakeCatalog {
    total_pages: u32,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<HashMap<&'static str, Vec<u32>>>,
}

impl FakeCatalog {
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failing.lock().remove(endpoint);
    }

    /// Pages requested from `endpoint`, in call order
    pub fn calls(&self, endpoint: &str) -> Vec<u32> {
        self.calls.lock().get(endpoint).cloned().unwrap_or_default()
    }

    async fn enter(&self, endpoint: &'static str, page: u32) -> AppResult<()> {
        self.calls.lock().entry(endpoint).or_default().push(page);
        tokio::task::yield_now().await;

        if self.failing.lock().contains(endpoint) {
            return Err(AppError::ExternalApi {
                status: 503,
                message: format!("{} unavailable", endpoint),
            });
        }
        Ok(())
    }

    async fn page(&self, endpoint: &'static str, base: i64, page: u32) -> AppResult<PagedResult<Movie>> {
        self.enter(endpoint, page).await?;
        let first = base + i64::from(page) * 100;
        Ok(PagedResult {
            page,
            results: (first..first + 20).map(movie).collect(),
            total_pages: self.total_pages,
            total_results: self.total_pages * 20,
        })
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_movies(&self, _query: &str, page: u32) -> AppResult<PagedResult<Movie>> {
        self.page("search", 10_000, page).await
    }

    async fn popular(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.page("popular", 20_000, page).await
    }

    async fn trending(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.page("trending", 30_000, page).await
    }

    async fn now_playing(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.page("now_playing", 40_000, page).await
    }

    async fn movie_detail(&self, id: MovieId) -> AppResult<MovieDetail> {
        self.enter("detail", 0).await?;
        Ok(serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Movie {}", id),
            "poster_path": "/detail.jpg",
            "genres": [{"id": 28, "name": "Action"}],
            "runtime": 101,
            "tagline": "Tagline"
        }))?)
    }

    async fn credits(&self, id: MovieId) -> AppResult<Credits> {
        self.enter("credits", 0).await?;
        Ok(Credits {
            id,
            cast: vec![],
            crew: vec![],
        })
    }

    async fn videos(&self, id: MovieId) -> AppResult<Videos> {
        self.enter("videos", 0).await?;
        Ok(Videos {
            id,
            results: vec![],
        })
    }

    async fn similar(&self, id: MovieId, page: u32) -> AppResult<PagedResult<Movie>> {
        self.page("similar", 50_000 + id * 1_000, page).await
    }

    async fn movies_by_genre(
        &self,
        genre_id: i64,
        page: u32,
        _sort_by: SortBy,
    ) -> AppResult<PagedResult<Movie>> {
        self.page("genre", 60_000 + genre_id * 1_000, page).await
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        self.enter("genres", 0).await?;
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
