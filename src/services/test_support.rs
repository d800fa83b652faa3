use crate::models::{Movie, MovieId};

/// Listing-shaped movie with every field filled
pub(crate) fn movie(id: MovieId) -> Movie {
    Movie {
        id,
        title: format!("Movie {}", id),
        original_title: format!("Original {}", id),
        overview: String::new(),
        poster_path: Some(format!("/poster{}.jpg", id)),
        backdrop_path: None,
        release_date: Some("2020-01-01".to_string()),
        vote_average: 7.5,
        vote_count: 100,
        popularity: 10.0,
        genre_ids: vec![28],
        adult: false,
        video: false,
    }
}
