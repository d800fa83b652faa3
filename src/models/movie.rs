use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Catalog-wide movie identifier
pub type MovieId = i64;

/// Movie summary as returned by every list endpoint.
///
/// Snapshots of this type are what the preference store persists, so every
/// field tolerates absence when read back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
}

impl Movie {
    /// Year of the release date, `None` when the date is absent or malformed
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

/// Genre as returned by the genre list and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub name: String,
}

/// GET /movie/{movie_id}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: i64,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
}

impl MovieDetail {
    /// Summary snapshot of this detail, with `genre_ids` filled from the
    /// resolved genres since the detail endpoint omits them
    pub fn summary(&self) -> Movie {
        let mut movie = self.movie.clone();
        if movie.genre_ids.is_empty() {
            movie.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        movie
    }
}
