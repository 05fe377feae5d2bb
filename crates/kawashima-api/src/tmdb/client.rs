use reqwest::Client;

use super::error::TmdbError;
use super::types::{TmdbMovieDetail, TmdbPagedResponse, TmdbVideosResponse};
use crate::traits::{CatalogService, MovieDetail, MovieSummary, SearchPage, VideoRef};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Build a full image URL from a TMDB image path (`/abc123.jpg`).
pub fn image_url(size: &str, path: &str) -> String {
    format!("{IMAGE_BASE_URL}/{size}{path}")
}

/// TMDB API v3 client.
///
/// Authenticates with the static v3 `api_key` query parameter on
/// every call.
pub struct TmdbClient {
    api_key: String,
    language: String,
    include_adult: bool,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            language: "en-US".to_string(),
            include_adult: false,
            http: Client::new(),
        }
    }

    /// Override the results language (default `en-US`).
    pub fn with_language(mut self, language: String) -> Self {
        self.language = language;
        self
    }

    /// Include adult titles in search results (default off).
    pub fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TMDB API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }
}

impl CatalogService for TmdbClient {
    type Error = TmdbError;

    async fn now_playing(&self, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        let page = page.to_string();
        let resp = self
            .http
            .get(format!("{BASE_URL}/movie/now_playing"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let feed: TmdbPagedResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(feed.results.into_iter().map(|m| m.into_summary()).collect())
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError> {
        let page = page.to_string();
        let resp = self
            .http
            .get(format!("{BASE_URL}/search/movie"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("query", query),
                ("page", page.as_str()),
                ("include_adult", if self.include_adult { "true" } else { "false" }),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let found: TmdbPagedResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(SearchPage {
            results: found
                .results
                .into_iter()
                .map(|m| m.into_summary())
                .collect(),
            total_pages: found.total_pages,
        })
    }

    async fn movie_videos(&self, movie_id: u64) -> Result<Vec<VideoRef>, TmdbError> {
        let resp = self
            .http
            .get(format!("{BASE_URL}/movie/{movie_id}/videos"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let videos: TmdbVideosResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(videos
            .results
            .into_iter()
            .map(|v| v.into_video_ref())
            .collect())
    }

    async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetail, TmdbError> {
        let resp = self
            .http
            .get(format!("{BASE_URL}/movie/{movie_id}"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let detail: TmdbMovieDetail = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(detail.into_detail())
    }
}
