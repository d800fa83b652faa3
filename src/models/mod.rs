use serde::{Deserialize, Deserializer, Serialize};

pub mod credits;
pub mod movie;
pub mod video;

pub use credits::{Cast, Credits, Crew};
pub use movie::{
    Genre, GenreList, Movie, MovieDetail, MovieId, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};
pub use video::{Video, Videos};

/// Reads an explicit `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of a paginated catalog listing.
///
/// Search, popular, trending, now-playing, similar and discover all share
/// this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagedResult<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> PagedResult<T> {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}
