use sea_orm_migration::prelude::*;

use crate::tables::{self, Movie, Review, SchemaVersion, Video};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(tables::movie_table()).await?;
        manager.create_table(tables::video_table()).await?;
        manager.create_table(tables::review_table()).await?;
        manager.create_table(tables::schema_version_table()).await?;

        tables::create_indexes(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SchemaVersion::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Review::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Video::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
