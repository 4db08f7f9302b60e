//! Version 1 stored `movie.vote_average` as INTEGER and `video.size` as TEXT.
//! SQLite cannot change a column type in place, so both tables are moved
//! aside, recreated at the current shape, refilled with coerced values and
//! the aside copies dropped.

use sea_orm_migration::{prelude::*, sea_orm::ConnectionTrait};

use crate::tables;

const MOVIE_COPY: &str = "INSERT OR REPLACE INTO movie \
    (id, title, overview, poster_path, release_date, vote_average, vote_count, popularity, \
     original_language, favorite, toprated, popular) \
    SELECT id, COALESCE(title, ''), COALESCE(overview, ''), COALESCE(poster_path, ''), \
           COALESCE(release_date, ''), CAST(COALESCE(vote_average, 0) AS REAL), \
           CAST(COALESCE(vote_count, 0) AS INTEGER), CAST(COALESCE(popularity, 0) AS REAL), \
           COALESCE(original_language, ''), COALESCE(favorite, 0), COALESCE(toprated, 0), \
           COALESCE(popular, 0) \
    FROM movie_old";

const VIDEO_COPY: &str = "INSERT OR REPLACE INTO video \
    (identity, movie_id, image_url, lang, region, provider_key, site, size, type) \
    SELECT identity, COALESCE(movie_id, 0), COALESCE(image_url, ''), COALESCE(lang, ''), \
           COALESCE(region, ''), COALESCE(provider_key, ''), COALESCE(site, ''), \
           CAST(COALESCE(size, 0) AS INTEGER), COALESCE(type, '') \
    FROM video_old";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        rebuild(manager, "movie", tables::movie_table(), MOVIE_COPY).await?;
        rebuild(manager, "video", tables::video_table(), VIDEO_COPY).await?;

        // Indexes travel with a renamed table and were dropped along with the
        // aside copies.
        tables::create_indexes(manager).await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration("numeric column migration cannot be reverted".to_string()))
    }
}

async fn rebuild(
    manager: &SchemaManager<'_>,
    table: &str,
    create: TableCreateStatement,
    copy_sql: &str,
) -> Result<(), DbErr> {
    let aside = format!("{table}_old");

    if manager.has_table(&aside).await? {
        // An earlier run stopped after moving the table aside. The aside copy
        // still holds every row; whatever sits under the live name is partial.
        tracing::warn!(table, "resuming interrupted table rebuild");
        manager
            .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
            .await?;
    } else {
        manager
            .rename_table(Table::rename().table(Alias::new(table), Alias::new(&aside)).to_owned())
            .await?;
    }

    manager.create_table(create).await?;
    manager.get_connection().execute_unprepared(copy_sql).await?;
    manager.drop_table(Table::drop().table(Alias::new(&aside)).to_owned()).await?;

    tracing::info!(table, "rebuilt table with numeric columns");
    Ok(())
}
