//! Conversions between stored rows and domain records.
//!
//! Flags live in SQLite as 0/1 integers. Nothing outside this module sees
//! that encoding.

use sea_orm::{ActiveValue::NotSet, Set};

use crate::{
    entities::{movie, review, video},
    models::{Movie, Review, Video},
};

pub fn flag_to_column(flag: bool) -> i32 {
    if flag { 1 } else { 0 }
}

pub fn column_to_flag(value: i32) -> bool {
    value != 0
}

impl From<movie::Model> for Movie {
    fn from(row: movie::Model) -> Self {
        Self {
            id: row.id,
            title: row.title,
            overview: row.overview,
            poster_path: row.poster_path,
            release_date: row.release_date,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            popularity: row.popularity,
            original_language: row.original_language,
            favorite: column_to_flag(row.favorite),
            top_rated: column_to_flag(row.toprated),
            popular: column_to_flag(row.popular),
        }
    }
}

impl From<&Movie> for movie::ActiveModel {
    fn from(movie: &Movie) -> Self {
        Self {
            id: Set(movie.id),
            title: Set(movie.title.clone()),
            overview: Set(movie.overview.clone()),
            poster_path: Set(movie.poster_path.clone()),
            release_date: Set(movie.release_date.clone()),
            vote_average: Set(movie.vote_average),
            vote_count: Set(movie.vote_count),
            popularity: Set(movie.popularity),
            original_language: Set(movie.original_language.clone()),
            favorite: Set(flag_to_column(movie.favorite)),
            toprated: Set(flag_to_column(movie.top_rated)),
            popular: Set(flag_to_column(movie.popular)),
        }
    }
}

impl From<video::Model> for Video {
    fn from(row: video::Model) -> Self {
        Self {
            identity: Some(row.identity),
            movie_id: row.movie_id,
            image_url: row.image_url,
            lang: row.lang,
            region: row.region,
            provider_key: row.provider_key,
            site: row.site,
            size: row.size,
            kind: row.r#type,
        }
    }
}

impl From<&Video> for video::ActiveModel {
    fn from(video: &Video) -> Self {
        Self {
            identity: video.identity.map_or(NotSet, Set),
            movie_id: Set(video.movie_id),
            image_url: Set(video.image_url.clone()),
            lang: Set(video.lang.clone()),
            region: Set(video.region.clone()),
            provider_key: Set(video.provider_key.clone()),
            site: Set(video.site.clone()),
            size: Set(video.size),
            r#type: Set(video.kind.clone()),
        }
    }
}

impl From<review::Model> for Review {
    fn from(row: review::Model) -> Self {
        Self {
            identity: Some(row.identity),
            movie_id: row.movie_id,
            author: row.author,
            content: row.content,
        }
    }
}

impl From<&Review> for review::ActiveModel {
    fn from(review: &Review) -> Self {
        Self {
            identity: review.identity.map_or(NotSet, Set),
            movie_id: Set(review.movie_id),
            author: Set(review.author.clone()),
            content: Set(review.content.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> movie::Model {
        movie::Model {
            id: 42,
            title: "Heat".to_string(),
            overview: "A crew of thieves".to_string(),
            poster_path: "/heat.jpg".to_string(),
            release_date: "1995-12-15".to_string(),
            vote_average: 7.9,
            vote_count: 6_000,
            popularity: 33.2,
            original_language: "en".to_string(),
            favorite: 1,
            toprated: 0,
            popular: 1,
        }
    }

    #[test]
    fn stored_flags_decode_by_truthiness() {
        let movie = Movie::from(movie::Model { toprated: 7, ..row() });
        assert!(movie.favorite);
        assert!(movie.top_rated);
        assert!(movie.popular);

        let movie = Movie::from(movie::Model { favorite: 0, popular: 0, ..row() });
        assert!(!movie.favorite);
        assert!(!movie.popular);
    }

    #[test]
    fn domain_flags_encode_as_one_and_zero() {
        let movie = Movie::from(row());
        let active = movie::ActiveModel::from(&movie);
        assert_eq!(active.favorite, Set(1));
        assert_eq!(active.toprated, Set(0));
        assert_eq!(active.popular, Set(1));
    }

    #[test]
    fn new_video_leaves_identity_unset() {
        let video = Video {
            identity: None,
            movie_id: 42,
            image_url: String::new(),
            lang: "en".to_string(),
            region: "US".to_string(),
            provider_key: "abc".to_string(),
            site: "YouTube".to_string(),
            size: 720,
            kind: "Teaser".to_string(),
        };
        let active = video::ActiveModel::from(&video);
        assert_eq!(active.identity, NotSet);
        assert_eq!(active.r#type, Set("Teaser".to_string()));

        let stored = video::ActiveModel::from(&Video { identity: Some(9), ..video });
        assert_eq!(stored.identity, Set(9));
    }
}
