use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, sea_query::OnConflict,
};
use tracing::debug;

use crate::{
    entities::{movie, review, video},
    error::QueryError,
    mapper::flag_to_column,
    models::{Movie, Review, TRAILER, Video},
};

/// Narrow read/write operations over the `movie`, `video` and `review` tables.
///
/// Every failure comes back as a [`QueryError`] naming the operation. Nothing
/// here retries or holds state between calls.
#[derive(Clone)]
pub struct MovieCache {
    db: DatabaseConnection,
}

impl MovieCache {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert or fully replace the row with `movie.id`.
    pub async fn upsert_movie(&self, movie: &Movie) -> Result<(), QueryError> {
        debug!(id = movie.id, favorite = movie.favorite, "upserting movie");

        movie::Entity::insert(movie::ActiveModel::from(movie))
            .on_conflict(
                OnConflict::column(movie::Column::Id)
                    .update_columns([
                        movie::Column::Title,
                        movie::Column::Overview,
                        movie::Column::PosterPath,
                        movie::Column::ReleaseDate,
                        movie::Column::VoteAverage,
                        movie::Column::VoteCount,
                        movie::Column::Popularity,
                        movie::Column::OriginalLanguage,
                        movie::Column::Favorite,
                        movie::Column::Toprated,
                        movie::Column::Popular,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| QueryError::new("insert movie", e))?;

        Ok(())
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>, QueryError> {
        let row = movie::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| QueryError::new("get movie by ID", e))?;
        Ok(row.map(Movie::from))
    }

    pub async fn favorite_movies(&self) -> Result<Vec<Movie>, QueryError> {
        self.movies_flagged(movie::Column::Favorite)
            .await
            .map_err(|e| QueryError::new("get favorite movies", e))
    }

    pub async fn popular_movies(&self) -> Result<Vec<Movie>, QueryError> {
        self.movies_flagged(movie::Column::Popular)
            .await
            .map_err(|e| QueryError::new("get popular movies", e))
    }

    pub async fn top_rated_movies(&self) -> Result<Vec<Movie>, QueryError> {
        self.movies_flagged(movie::Column::Toprated)
            .await
            .map_err(|e| QueryError::new("get top-rated movies", e))
    }

    pub async fn all_movies(&self) -> Result<Vec<Movie>, QueryError> {
        let rows = movie::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| QueryError::new("get all movies", e))?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn delete_movie(&self, id: i32) -> Result<(), QueryError> {
        movie::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| QueryError::new("delete movie", e))?;
        Ok(())
    }

    /// Appends a video and returns the identity storage assigned to it.
    pub async fn insert_video(&self, video: &Video) -> Result<i32, QueryError> {
        let res = video::Entity::insert(video::ActiveModel::from(video))
            .on_conflict(
                OnConflict::column(video::Column::Identity)
                    .update_columns([
                        video::Column::MovieId,
                        video::Column::ImageUrl,
                        video::Column::Lang,
                        video::Column::Region,
                        video::Column::ProviderKey,
                        video::Column::Site,
                        video::Column::Size,
                        video::Column::Type,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| QueryError::new("insert video", e))?;
        Ok(res.last_insert_id)
    }

    pub async fn videos_for_movie(&self, movie_id: i32) -> Result<Vec<Video>, QueryError> {
        let rows = video::Entity::find()
            .filter(video::Column::MovieId.eq(movie_id))
            .all(&self.db)
            .await
            .map_err(|e| QueryError::new("get videos for movie", e))?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    pub async fn trailers_for_movie(&self, movie_id: i32) -> Result<Vec<Video>, QueryError> {
        let rows = video::Entity::find()
            .filter(video::Column::MovieId.eq(movie_id))
            .filter(video::Column::Type.eq(TRAILER))
            .all(&self.db)
            .await
            .map_err(|e| QueryError::new("get trailers for movie", e))?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    /// Appends a review and returns the identity storage assigned to it.
    pub async fn insert_review(&self, review: &Review) -> Result<i32, QueryError> {
        let res = review::Entity::insert(review::ActiveModel::from(review))
            .on_conflict(
                OnConflict::column(review::Column::Identity)
                    .update_columns([
                        review::Column::MovieId,
                        review::Column::Author,
                        review::Column::Content,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| QueryError::new("insert review", e))?;
        Ok(res.last_insert_id)
    }

    pub async fn reviews_for_movie(&self, movie_id: i32) -> Result<Vec<Review>, QueryError> {
        let rows = review::Entity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .all(&self.db)
            .await
            .map_err(|e| QueryError::new("get reviews for movie", e))?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn movies_flagged(&self, column: movie::Column) -> Result<Vec<Movie>, DbErr> {
        let rows = movie::Entity::find()
            .filter(column.eq(flag_to_column(true)))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }
}
