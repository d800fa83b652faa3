use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v4 read access token, sent as a bearer token
    pub tmdb_access_token: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image server root
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Response locale requested on every catalog call
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Directory holding the local preference file
    #[serde(default = "default_profile_dir")]
    pub profile_dir: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "ko-KR".to_string()
}

fn default_profile_dir() -> String {
    ".moviepick".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
