/// TMDB v3 catalog client
///
/// Authenticates with a v4 read access token as a bearer token and requests
/// every response in one fixed locale.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Credits, Genre, GenreList, Movie, MovieDetail, MovieId, PagedResult, Videos},
    services::catalog::{CatalogClient, ImageUrlBuilder, SortBy},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    access_token: String,
    api_url: String,
    language: String,
    images: ImageUrlBuilder,
}

impl TmdbClient {
    pub fn new(
        access_token: String,
        api_url: String,
        language: String,
        images: ImageUrlBuilder,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            images,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_access_token.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            ImageUrlBuilder::new(config.tmdb_image_url.clone()),
        )
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// GET `path` with the locale and `query` parameters, decoding the body
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                path = %path,
                status = %status,
                body = %body,
                "Catalog request failed"
            );
            return Err(AppError::ExternalApi {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to decode catalog response");
            AppError::Decode(e)
        })
    }

    async fn get_page(
        &self,
        path: &str,
        mut query: Vec<(&str, String)>,
        page: u32,
    ) -> AppResult<PagedResult<Movie>> {
        query.push(("page", page.to_string()));
        let result: PagedResult<Movie> = self.get(path, &query).await?;

        tracing::debug!(
            path = %path,
            page = result.page,
            results = result.results.len(),
            total_pages = result.total_pages,
            "Catalog page fetched"
        );

        Ok(result)
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<PagedResult<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        self.get_page("/search/movie", vec![("query", query.to_string())], page)
            .await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn popular(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.get_page("/movie/popular", vec![], page).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn trending(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.get_page("/trending/movie/day", vec![], page).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn now_playing(&self, page: u32) -> AppResult<PagedResult<Movie>> {
        self.get_page("/movie/now_playing", vec![], page).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn movie_detail(&self, id: MovieId) -> AppResult<MovieDetail> {
        self.get(&format!("/movie/{}", id), &[]).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn credits(&self, id: MovieId) -> AppResult<Credits> {
        self.get(&format!("/movie/{}/credits", id), &[]).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn videos(&self, id: MovieId) -> AppResult<Videos> {
        self.get(&format!("/movie/{}/videos", id), &[]).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn similar(&self, id: MovieId, page: u32) -> AppResult<PagedResult<Movie>> {
        self.get_page(&format!("/movie/{}/similar", id), vec![], page)
            .await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn movies_by_genre(
        &self,
        genre_id: i64,
        page: u32,
        sort_by: SortBy,
    ) -> AppResult<PagedResult<Movie>> {
        self.get_page(
            "/discover/movie",
            vec![
                ("with_genres", genre_id.to_string()),
                ("sort_by", sort_by.as_str().to_string()),
            ],
            page,
        )
        .await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let list: GenreList = self.get("/genre/movie/list", &[]).await?;
        tracing::debug!(count = list.genres.len(), "Genres fetched");
        Ok(list.genres)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
