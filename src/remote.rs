//! What the store needs from the remote metadata service.

use std::future::Future;

use serde::Deserialize;

use crate::{
    error::RemoteError,
    models::{Movie, Review, Video, youtube_thumbnail},
};

pub trait MetadataSource: Send + Sync {
    fn fetch_popular(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<DiscoverPage, RemoteError>> + Send;

    fn fetch_top_rated(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<DiscoverPage, RemoteError>> + Send;

    fn fetch_videos(
        &self,
        movie_id: i32,
    ) -> impl Future<Output = Result<Vec<RemoteVideo>, RemoteError>> + Send;

    fn fetch_reviews(
        &self,
        movie_id: i32,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RemoteReview>, RemoteError>> + Send;
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<RemoteMovie>,
}

/// A discover result. Movies carry `title`/`release_date`, TV shows
/// `name`/`first_air_date`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RemoteMovie {
    pub id: i32,
    pub title: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
}

impl RemoteMovie {
    pub fn into_movie(self, popular: bool, top_rated: bool, favorite: bool) -> Movie {
        Movie {
            id: self.id,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview,
            poster_path: self.poster_path.unwrap_or_default(),
            release_date: self.release_date.or(self.first_air_date).unwrap_or_default(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            original_language: self.original_language,
            favorite,
            top_rated,
            popular,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RemoteVideo {
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub iso_3166_1: String,
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub size: i32,
    #[serde(rename = "type", default)]
    pub type_: String,
}

impl RemoteVideo {
    pub fn into_video(self, movie_id: i32) -> Video {
        let image_url = if self.site.eq_ignore_ascii_case("youtube") {
            youtube_thumbnail(&self.key)
        } else {
            String::new()
        };
        Video {
            identity: None,
            movie_id,
            image_url,
            lang: self.iso_639_1,
            region: self.iso_3166_1,
            provider_key: self.key,
            site: self.site,
            size: self.size,
            kind: self.type_,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RemoteReview {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

impl RemoteReview {
    pub fn into_review(self, movie_id: i32) -> Review {
        Review { identity: None, movie_id, author: self.author, content: self.content }
    }
}
