use sea_orm_migration::{prelude::*, schema::*};

pub fn movie_table() -> TableCreateStatement {
    Table::create()
        .table(Movie::Table)
        .if_not_exists()
        .col(integer(Movie::Id).primary_key())
        .col(string(Movie::Title).default(""))
        .col(text(Movie::Overview).default(""))
        .col(string(Movie::PosterPath).default(""))
        .col(string(Movie::ReleaseDate).default(""))
        .col(double(Movie::VoteAverage).default(0.0))
        .col(integer(Movie::VoteCount).default(0))
        .col(double(Movie::Popularity).default(0.0))
        .col(string(Movie::OriginalLanguage).default(""))
        .col(integer(Movie::Favorite).default(0))
        .col(integer(Movie::Toprated).default(0))
        .col(integer(Movie::Popular).default(0))
        .to_owned()
}

pub fn video_table() -> TableCreateStatement {
    Table::create()
        .table(Video::Table)
        .if_not_exists()
        .col(pk_auto(Video::Identity))
        .col(integer(Video::MovieId))
        .col(string(Video::ImageUrl).default(""))
        .col(string(Video::Lang).default(""))
        .col(string(Video::Region).default(""))
        .col(string(Video::ProviderKey).default(""))
        .col(string(Video::Site).default(""))
        .col(integer(Video::Size).default(0))
        .col(string(Video::Type).default(""))
        .to_owned()
}

pub fn review_table() -> TableCreateStatement {
    Table::create()
        .table(Review::Table)
        .if_not_exists()
        .col(pk_auto(Review::Identity))
        .col(integer(Review::MovieId))
        .col(string(Review::Author).default(""))
        .col(text(Review::Content).default(""))
        .to_owned()
}

pub fn schema_version_table() -> TableCreateStatement {
    Table::create()
        .table(SchemaVersion::Table)
        .if_not_exists()
        .col(integer(SchemaVersion::Version).primary_key())
        .to_owned()
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_movie_favorite")
            .table(Movie::Table)
            .col(Movie::Favorite)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_movie_popular")
            .table(Movie::Table)
            .col(Movie::Popular)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_movie_toprated")
            .table(Movie::Table)
            .col(Movie::Toprated)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_video_movie_id")
            .table(Video::Table)
            .col(Video::MovieId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_video_trailer")
            .table(Video::Table)
            .col(Video::MovieId)
            .col(Video::Type)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_review_movie_id")
            .table(Review::Table)
            .col(Review::MovieId)
            .to_owned(),
    ]
}

pub async fn create_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    for index in indexes() {
        manager.create_index(index).await?;
    }
    Ok(())
}

#[derive(DeriveIden)]
pub enum Movie {
    Table,
    Id,
    Title,
    Overview,
    PosterPath,
    ReleaseDate,
    VoteAverage,
    VoteCount,
    Popularity,
    OriginalLanguage,
    Favorite,
    Toprated,
    Popular,
}

#[derive(DeriveIden)]
pub enum Video {
    Table,
    Identity,
    MovieId,
    ImageUrl,
    Lang,
    Region,
    ProviderKey,
    Site,
    Size,
    Type,
}

#[derive(DeriveIden)]
pub enum Review {
    Table,
    Identity,
    MovieId,
    Author,
    Content,
}

#[derive(DeriveIden)]
pub enum SchemaVersion {
    Table,
    Version,
}
