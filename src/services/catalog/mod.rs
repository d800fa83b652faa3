/// Remote movie catalog abstraction
///
/// Feeds talk to the catalog only through [`CatalogClient`], so tests can
/// swap the HTTP client for a mock or a scripted fake. Every call is a single
/// request: no retry, no response caching, errors are returned unchanged.
use crate::{
    error::AppResult,
    models::{Credits, Genre, Movie, MovieDetail, MovieId, PagedResult, Videos},
};

pub mod images;
pub mod tmdb;

pub use images::{ImageSize, ImageUrlBuilder};
pub use tmdb::TmdbClient;

/// Sort order for genre discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    PopularityDesc,
    VoteAverageDesc,
    ReleaseDateDesc,
    RevenueDesc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::PopularityDesc => "popularity.desc",
            SortBy::VoteAverageDesc => "vote_average.desc",
            SortBy::ReleaseDateDesc => "primary_release_date.desc",
            SortBy::RevenueDesc => "revenue.desc",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text title search
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<PagedResult<Movie>>;

    async fn popular(&self, page: u32) -> AppResult<PagedResult<Movie>>;

    /// Titles trending today
    async fn trending(&self, page: u32) -> AppResult<PagedResult<Movie>>;

    async fn now_playing(&self, page: u32) -> AppResult<PagedResult<Movie>>;

    async fn movie_detail(&self, id: MovieId) -> AppResult<MovieDetail>;

    async fn credits(&self, id: MovieId) -> AppResult<Credits>;

    async fn videos(&self, id: MovieId) -> AppResult<Videos>;

    async fn similar(&self, id: MovieId, page: u32) -> AppResult<PagedResult<Movie>>;

    async fn movies_by_genre(
        &self,
        genre_id: i64,
        page: u32,
        sort_by: SortBy,
    ) -> AppResult<PagedResult<Movie>>;

    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
