//! Trait definitions for movie catalog services.
//!
//! The concrete TMDB client implements this trait, keeping the session
//! engine and runtime service-agnostic.

use std::future::Future;

use chrono::NaiveDate;

/// A paged, searchable movie catalog interface.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of the now-playing feed.
    fn now_playing(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send;

    /// Search movies by keyword.
    fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send;

    /// Fetch the videos (trailers, teasers, clips) attached to a movie.
    fn movie_videos(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<Vec<VideoRef>, Self::Error>> + Send;

    /// Fetch full detail for a single movie.
    fn movie_detail(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<MovieDetail, Self::Error>> + Send;
}

/// A movie as it appears in feeds and search results.
///
/// Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<NaiveDate>,
    pub genre_ids: Vec<u32>,
}

/// Full detail for a single movie, fetched on focus.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MovieDetail {
    pub summary: MovieSummary,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    pub overview: String,
    /// Genre names, resolved server-side.
    pub genres: Vec<String>,
}

/// A video attached to a movie. Used transiently to pick a trailer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoRef {
    pub key: String,
    pub site: String,
    pub kind: String,
}

/// One page of keyword search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub results: Vec<MovieSummary>,
    pub total_pages: u32,
}
