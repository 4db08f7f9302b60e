use reelshelf::{MovieCache, MovieStore, Storage, TmdbClient, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelshelf=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("reelshelf/0.1")
        .timeout(config.request_timeout)
        .build()?;

    let storage = Storage::open(&config.database_url).await?;
    let cache = MovieCache::new(storage.connection().clone());

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_rps,
    );

    let store = MovieStore::new(cache, tmdb);
    store.set_offline_status(config.start_offline);

    let filters = config.filters.active_filters();
    store.load_from_filters(&filters).await;

    if store.is_offline() {
        tracing::warn!("offline; showing cached movies");
    } else {
        store.refresh_with_favorites_preserved().await;
        let state = store.snapshot();
        if let Some(error) = &state.error {
            tracing::warn!(%error, retryable = state.retryable, "refresh failed; showing cached movies");
        }
        store.load_from_filters(&filters).await;
    }

    let state = store.snapshot();
    if let Some(error) = &state.error {
        tracing::error!(%error, "could not load movies");
    }
    tracing::info!(count = state.movies.len(), ?filters, "working set ready");
    for movie in state.movies.iter() {
        tracing::info!(
            id = movie.id,
            title = %movie.title,
            rating = movie.vote_average,
            favorite = movie.favorite,
            "movie"
        );
    }

    storage.close().await?;
    Ok(())
}
