use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use futures::future::try_join;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::{
    cache::MovieCache,
    error::{QueryError, SyncError},
    models::{Movie, MovieDetails, MovieFilter},
    remote::{MetadataSource, RemoteMovie},
};

pub const OFFLINE_SYNC_MESSAGE: &str = "You are offline. Showing cached movies.";
pub const OFFLINE_REFRESH_MESSAGE: &str = "Cannot refresh while offline. Showing cached movies.";
pub const NOT_IN_LIST_MESSAGE: &str = "Movie not found in current list";

/// Categories every reconciliation writes and then reloads.
const SYNCED_FILTERS: [MovieFilter; 2] = [MovieFilter::Popular, MovieFilter::TopRated];
const FIRST_PAGE: u32 = 1;

/// What observers see. `movies` is replaced wholesale on every change and
/// never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    pub movies: Arc<Vec<Movie>>,
    pub loading: bool,
    pub syncing: bool,
    pub is_offline: bool,
    pub error: Option<String>,
    pub retryable: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Reconcile {
    /// Remote records replace local ones, favorites included.
    Overwrite,
    /// Locally favorited IDs stay favorited.
    PreserveFavorites,
}

impl Reconcile {
    fn offline_message(self) -> &'static str {
        match self {
            Reconcile::Overwrite => OFFLINE_SYNC_MESSAGE,
            Reconcile::PreserveFavorites => OFFLINE_REFRESH_MESSAGE,
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Reconcile::Overwrite => "Failed to sync with API",
            Reconcile::PreserveFavorites => "Failed to refresh movies",
        }
    }
}

/// The working set of movies plus the flags a UI renders around it.
///
/// Operations never return errors: failures land in [`StoreState::error`].
/// Both remote reconciliations share one slot, so at most one of them is in
/// flight at a time and a second request while one runs is dropped.
pub struct MovieStore<S> {
    cache: MovieCache,
    remote: S,
    state: watch::Sender<StoreState>,
    sync_slot: Mutex<()>,
}

impl<S: MetadataSource> MovieStore<S> {
    pub fn new(cache: MovieCache, remote: S) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { cache, remote, state, sync_slot: Mutex::new(()) }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn movies(&self) -> Arc<Vec<Movie>> {
        self.state.borrow().movies.clone()
    }

    pub fn is_offline(&self) -> bool {
        self.state.borrow().is_offline
    }

    pub fn cache(&self) -> &MovieCache {
        &self.cache
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    /// Replaces the working set with the union of the given categories,
    /// deduplicated by ID in first-seen order.
    ///
    /// `loading` stays set on completion while a reconciliation is in flight,
    /// since that reconciliation will replace the working set again.
    pub async fn load_from_filters(&self, filters: &[MovieFilter]) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.collect(filters).await {
            Ok(movies) => {
                debug!(count = movies.len(), ?filters, "loaded movies");
                self.state.send_modify(|s| {
                    s.movies = Arc::new(movies);
                    s.loading = s.syncing;
                });
            },
            Err(err) => {
                error!(error = %err, ?filters, "failed to load movies");
                self.state.send_modify(|s| {
                    s.movies = Arc::default();
                    s.loading = s.syncing;
                    s.error = Some(err.to_string());
                    s.retryable = true;
                });
            },
        }
    }

    pub async fn load_popular(&self) {
        self.load_from_filters(&[MovieFilter::Popular]).await;
    }

    pub async fn load_top_rated(&self) {
        self.load_from_filters(&[MovieFilter::TopRated]).await;
    }

    pub async fn load_favorites(&self) {
        self.load_from_filters(&[MovieFilter::Favorites]).await;
    }

    pub async fn load_all(&self) {
        self.load_from_filters(&[MovieFilter::All]).await;
    }

    /// Flips `favorite` on a movie in the working set, showing the change
    /// before it is written and restoring the previous working set if the
    /// write fails.
    pub async fn toggle_favorite(&self, id: i32) {
        let previous = self.movies();
        let Some(current) = previous.iter().find(|m| m.id == id) else {
            warn!(id, "favorite toggle for movie outside the working set");
            self.fail(NOT_IN_LIST_MESSAGE.to_string(), false);
            return;
        };

        let toggled = current.with_favorite(!current.favorite);
        let optimistic: Vec<Movie> = previous
            .iter()
            .map(|m| if m.id == id { toggled.clone() } else { m.clone() })
            .collect();
        self.state.send_modify(|s| s.movies = Arc::new(optimistic));

        if let Err(err) = self.cache.upsert_movie(&toggled).await {
            error!(id, error = %err, "favorite toggle failed, rolling back");
            self.state.send_modify(|s| {
                s.movies = previous;
                s.error = Some(format!("Failed to toggle favorite: {err}"));
                s.retryable = true;
            });
            return;
        }

        debug!(id, favorite = toggled.favorite, "favorite toggled");
    }

    /// Re-reads one movie from storage into its slot in the working set.
    pub async fn refresh_movie(&self, id: i32) {
        match self.cache.get_movie(id).await {
            Ok(Some(updated)) => self.state.send_modify(|s| {
                if s.movies.iter().any(|m| m.id == id) {
                    let movies =
                        s.movies.iter().map(|m| if m.id == id { updated.clone() } else { m.clone() });
                    s.movies = Arc::new(movies.collect());
                }
            }),
            Ok(None) => debug!(id, "movie no longer stored; nothing to refresh"),
            Err(err) => {
                error!(id, error = %err, "failed to refresh movie");
                self.fail(format!("Failed to refresh movie: {err}"), true);
            },
        }
    }

    /// Pulls both remote collections into storage, then reloads them.
    /// Remote records arrive unfavorited.
    pub async fn sync_with_remote(&self) {
        self.reconcile(Reconcile::Overwrite).await;
    }

    /// Like [`Self::sync_with_remote`], but movies favorited locally stay
    /// favorited.
    pub async fn refresh_with_favorites_preserved(&self) {
        self.reconcile(Reconcile::PreserveFavorites).await;
    }

    pub fn set_offline_status(&self, is_offline: bool) {
        self.state.send_modify(|s| s.is_offline = is_offline);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| {
            s.error = None;
            s.retryable = false;
        });
    }

    /// Videos, trailers and reviews for one movie. Storage is filled from the
    /// remote service the first time a movie with nothing stored is opened
    /// while online.
    pub async fn load_details(&self, movie_id: i32) -> Option<MovieDetails> {
        match self.details(movie_id).await {
            Ok(details) => Some(details),
            Err(err) => {
                error!(movie_id, error = %err, "failed to load movie details");
                self.fail(format!("Failed to load movie details: {err}"), err.is_retryable());
                None
            },
        }
    }

    async fn collect(&self, filters: &[MovieFilter]) -> Result<Vec<Movie>, QueryError> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for filter in filters {
            let movies = match filter {
                MovieFilter::Popular => self.cache.popular_movies().await?,
                MovieFilter::TopRated => self.cache.top_rated_movies().await?,
                MovieFilter::Favorites => self.cache.favorite_movies().await?,
                MovieFilter::All => self.cache.all_movies().await?,
            };
            merged.extend(movies.into_iter().filter(|m| seen.insert(m.id)));
        }

        Ok(merged)
    }

    async fn reconcile(&self, mode: Reconcile) {
        if self.is_offline() {
            warn!(?mode, "offline; keeping cached movies");
            self.fail(mode.offline_message().to_string(), true);
            return;
        }

        let Ok(_slot) = self.sync_slot.try_lock() else {
            debug!(?mode, "reconciliation already in flight; skipping");
            return;
        };

        self.state.send_modify(|s| {
            s.syncing = true;
            s.loading = true;
            s.error = None;
        });

        if let Err(err) = self.pull_remote(mode).await {
            error!(?mode, error = %err, "reconciliation failed");
            self.fail(format!("{}: {err}", mode.failure_prefix()), err.is_retryable());
        }

        self.state.send_modify(|s| {
            s.syncing = false;
            s.loading = false;
        });
    }

    async fn pull_remote(&self, mode: Reconcile) -> Result<(), SyncError> {
        let favorites: HashSet<i32> = match mode {
            Reconcile::Overwrite => HashSet::new(),
            Reconcile::PreserveFavorites => {
                self.cache.favorite_movies().await?.into_iter().map(|m| m.id).collect()
            },
        };

        let (popular, top_rated) = try_join(
            self.remote.fetch_popular(FIRST_PAGE),
            self.remote.fetch_top_rated(FIRST_PAGE),
        )
        .await?;

        let movies = merge_remote(popular.results, top_rated.results, &favorites);
        for movie in &movies {
            self.cache.upsert_movie(movie).await?;
        }
        info!(count = movies.len(), preserved = favorites.len(), "stored remote movies");

        self.load_from_filters(&SYNCED_FILTERS).await;
        Ok(())
    }

    async fn details(&self, movie_id: i32) -> Result<MovieDetails, SyncError> {
        let mut videos = self.cache.videos_for_movie(movie_id).await?;
        let mut reviews = self.cache.reviews_for_movie(movie_id).await?;

        if videos.is_empty() && reviews.is_empty() && !self.is_offline() {
            let (remote_videos, remote_reviews) = try_join(
                self.remote.fetch_videos(movie_id),
                self.remote.fetch_reviews(movie_id, FIRST_PAGE),
            )
            .await?;

            for video in remote_videos {
                self.cache.insert_video(&video.into_video(movie_id)).await?;
            }
            for review in remote_reviews {
                self.cache.insert_review(&review.into_review(movie_id)).await?;
            }

            videos = self.cache.videos_for_movie(movie_id).await?;
            reviews = self.cache.reviews_for_movie(movie_id).await?;
            debug!(movie_id, videos = videos.len(), reviews = reviews.len(), "cached movie details");
        }

        let trailers = self.cache.trailers_for_movie(movie_id).await?;
        Ok(MovieDetails { videos, trailers, reviews })
    }

    fn fail(&self, message: String, retryable: bool) {
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.retryable = retryable;
        });
    }
}

/// Tags popular and top-rated results with their category. An ID present in
/// both lists becomes one record carrying both flags.
fn merge_remote(
    popular: Vec<RemoteMovie>,
    top_rated: Vec<RemoteMovie>,
    favorites: &HashSet<i32>,
) -> Vec<Movie> {
    let tagged = popular
        .into_iter()
        .map(|m| (m, true, false))
        .chain(top_rated.into_iter().map(|m| (m, false, true)));

    let mut merged: Vec<Movie> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for (remote, popular, top_rated) in tagged {
        if let Some(&pos) = positions.get(&remote.id) {
            merged[pos].popular |= popular;
            merged[pos].top_rated |= top_rated;
            continue;
        }
        positions.insert(remote.id, merged.len());
        let favorite = favorites.contains(&remote.id);
        merged.push(remote.into_movie(popular, top_rated, favorite));
    }

    merged
}
