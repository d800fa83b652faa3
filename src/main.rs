use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use moviepick::{
    config::Config,
    db::FileStore,
    services::{
        BrowseFeed, CatalogClient, HomeFeed, ImageSize, PreferenceStore, TmdbClient, ViewStatus,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moviepick=info")),
        )
        .init();

    let config = Config::from_env()?;
    let tmdb = TmdbClient::from_config(&config);
    let images = tmdb.images().clone();
    let catalog: Arc<dyn CatalogClient> = Arc::new(tmdb);

    let store = FileStore::open(&config.profile_dir)?;
    tracing::info!(path = %store.path().display(), "Local profile opened");
    let prefs = PreferenceStore::new(Arc::new(store));

    // A command line argument browses search results instead of the home feed
    if let Some(query) = std::env::args().nth(1) {
        let browse = BrowseFeed::new(catalog);
        let status = browse.activate(Some(&query)).await;
        let snapshot = browse.snapshot().await;

        if status == ViewStatus::Error {
            anyhow::bail!(snapshot.error_message().unwrap_or_default());
        }
        for movie in &snapshot.results.items {
            tracing::info!(
                id = movie.id,
                title = %movie.title,
                year = ?movie.release_year(),
                poster = %images.url_opt(movie.poster_path.as_deref(), ImageSize::Poster),
                "Search result"
            );
        }
        return Ok(());
    }

    let home = HomeFeed::new(catalog, prefs);
    let status = home.activate().await;
    let snapshot = home.snapshot().await;
    if status == ViewStatus::Error {
        anyhow::bail!(snapshot.error_message().unwrap_or_default());
    }

    for (label, list) in [
        ("popular", &snapshot.popular),
        ("trending", &snapshot.trending),
        ("recent_based", &snapshot.recent_based),
    ] {
        for movie in &list.items {
            tracing::info!(list = label, id = movie.id, title = %movie.title, "Home entry");
        }
    }

    Ok(())
}
