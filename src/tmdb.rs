use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::RemoteError,
    remote::{DiscoverPage, MetadataSource, RemoteMovie, RemoteReview, RemoteVideo},
};

const POPULAR_ENDPOINT: &str = "/discover/movie";
const TOP_RATED_ENDPOINT: &str = "/discover/tv";

/// TMDB v4 client. Without an access token every call answers from a fixed
/// sample set instead of the network.
pub struct TmdbClient {
    http: reqwest::Client,
    token: Option<String>,
    api_base: String,
    throttle: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(http: reqwest::Client, token: String, api_base: String, per_second: u32) -> Self {
        let token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!("TMDB_ACCESS_TOKEN is empty; serving built-in sample movies");
        }

        let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            http,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            throttle: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        }
    }

    fn is_mock(&self) -> bool {
        self.token.is_none()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        self.throttle.until_ready().await;
        tracing::debug!(endpoint, "requesting TMDB");

        let mut request = self.http.get(format!("{}{endpoint}", self.api_base)).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RemoteError::Network { message: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(endpoint, status, &body));
        }

        resp.json().await.map_err(|e| RemoteError::Api {
            message: format!("invalid response body: {e}"),
            status: Some(status.as_u16()),
            endpoint: endpoint.to_string(),
        })
    }
}

fn api_error(endpoint: &str, status: reqwest::StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());

    RemoteError::Api { message, status: Some(status.as_u16()), endpoint: endpoint.to_string() }
}

impl MetadataSource for TmdbClient {
    async fn fetch_popular(&self, page: u32) -> Result<DiscoverPage, RemoteError> {
        if self.is_mock() {
            return Ok(mock_page(page, true));
        }

        self.get(
            POPULAR_ENDPOINT,
            &[("page", page.to_string()), ("sort_by", "popularity.desc".to_string())],
        )
        .await
    }

    async fn fetch_top_rated(&self, page: u32) -> Result<DiscoverPage, RemoteError> {
        if self.is_mock() {
            return Ok(mock_page(page, false));
        }

        self.get(
            TOP_RATED_ENDPOINT,
            &[
                ("page", page.to_string()),
                ("sort_by", "vote_average.desc".to_string()),
                ("vote_count.gte", "100".to_string()),
            ],
        )
        .await
    }

    async fn fetch_videos(&self, movie_id: i32) -> Result<Vec<RemoteVideo>, RemoteError> {
        if self.is_mock() {
            return Ok(vec![RemoteVideo {
                iso_639_1: "en".to_string(),
                iso_3166_1: "US".to_string(),
                key: "dQw4w9WgXcQ".to_string(),
                site: "YouTube".to_string(),
                size: 1080,
                type_: "Trailer".to_string(),
            }]);
        }

        let resp: VideosResponse = self.get(&format!("/movie/{movie_id}/videos"), &[]).await?;
        Ok(resp.results)
    }

    async fn fetch_reviews(
        &self,
        movie_id: i32,
        page: u32,
    ) -> Result<Vec<RemoteReview>, RemoteError> {
        if self.is_mock() {
            return Ok(vec![RemoteReview {
                author: "Mock reviewer".to_string(),
                content: "Mock review content".to_string(),
            }]);
        }

        let resp: ReviewsResponse =
            self.get(&format!("/movie/{movie_id}/reviews"), &[("page", page.to_string())]).await?;
        Ok(resp.results)
    }
}

fn mock_page(page: u32, popular: bool) -> DiscoverPage {
    let (id, title, name, vote_average) = if popular {
        (550, Some("Fight Club".to_string()), None, 8.4)
    } else {
        (1396, None, Some("Breaking Bad".to_string()), 8.9)
    };

    DiscoverPage {
        page,
        results: vec![RemoteMovie {
            id,
            title,
            name,
            overview: "Mock overview".to_string(),
            poster_path: None,
            release_date: popular.then(|| "1999-10-15".to_string()),
            first_air_date: (!popular).then(|| "2008-01-20".to_string()),
            vote_average,
            vote_count: 1000,
            popularity: 100.0,
            original_language: "en".to_string(),
        }],
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    results: Vec<RemoteVideo>,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    results: Vec<RemoteReview>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_client() -> TmdbClient {
        TmdbClient::new(reqwest::Client::new(), String::new(), "http://localhost".to_string(), 0)
    }

    #[tokio::test]
    async fn mock_mode_serves_both_collections() {
        let client = mock_client();
        let popular = client.fetch_popular(1).await.unwrap();
        let top_rated = client.fetch_top_rated(1).await.unwrap();

        assert_eq!(popular.results[0].id, 550);
        let show = top_rated.results[0].clone().into_movie(false, true, false);
        assert_eq!(show.title, "Breaking Bad");
        assert_eq!(show.release_date, "2008-01-20");
    }

    #[test]
    fn blank_token_selects_sample_mode() {
        let client = TmdbClient::new(
            reqwest::Client::new(),
            "  ".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            5,
        );
        assert!(client.is_mock());
        assert_eq!(client.api_base, "https://api.themoviedb.org/3");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = TmdbClient::new(
            reqwest::Client::new(),
            "token".to_string(),
            "http://127.0.0.1:9".to_string(),
            10,
        );
        let err = client.fetch_popular(1).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn api_error_prefers_status_message() {
        let err = api_error(
            "/movie/1/videos",
            reqwest::StatusCode::NOT_FOUND,
            r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#,
        );
        assert_eq!(
            err,
            RemoteError::Api {
                message: "The resource you requested could not be found.".to_string(),
                status: Some(404),
                endpoint: "/movie/1/videos".to_string(),
            }
        );
        assert!(!err.is_retryable());

        let err = api_error(POPULAR_ENDPOINT, reqwest::StatusCode::SERVICE_UNAVAILABLE, "<html>");
        assert_eq!(err.to_string(), "API request failed: Service Unavailable");
    }

    #[test]
    fn decodes_video_and_review_payloads() {
        let videos: VideosResponse = serde_json::from_str(
            r#"{"id":550,"results":[{"iso_639_1":"en","iso_3166_1":"US","name":"Trailer",
                "key":"qtRKdVHc-cE","site":"YouTube","size":720,"type":"Trailer","official":true}]}"#,
        )
        .unwrap();
        assert_eq!(videos.results[0].type_, "Trailer");
        assert_eq!(videos.results[0].size, 720);

        let reviews: ReviewsResponse = serde_json::from_str(
            r#"{"id":550,"page":1,"results":[{"author":"Goddard","content":"Pretty awesome movie.",
                "author_details":{"rating":10}}],"total_pages":1,"total_results":1}"#,
        )
        .unwrap();
        assert_eq!(reviews.results[0].author, "Goddard");
    }
}
