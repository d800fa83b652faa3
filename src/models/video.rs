use serde::{Deserialize, Serialize};

use super::{null_as_default, MovieId};

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const YOUTUBE_THUMBNAIL_URL: &str = "https://img.youtube.com/vi";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u32,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub video_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub official: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }

    pub fn is_trailer(&self) -> bool {
        self.video_type == "Trailer"
    }

    /// Playback link, only for YouTube-hosted videos
    pub fn watch_url(&self) -> Option<String> {
        self.is_youtube()
            .then(|| format!("{}{}", YOUTUBE_WATCH_URL, self.key))
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.is_youtube()
            .then(|| format!("{}/{}/maxresdefault.jpg", YOUTUBE_THUMBNAIL_URL, self.key))
    }
}

/// GET /movie/{movie_id}/videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Videos {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}

impl Videos {
    /// Playable videos, trailers first, catalog order otherwise
    pub fn playable(&self) -> Vec<&Video> {
        let (mut trailers, others): (Vec<&Video>, Vec<&Video>) = self
            .results
            .iter()
            .filter(|v| v.is_youtube())
            .partition(|v| v.is_trailer());
        trailers.extend(others);
        trailers
    }
}
