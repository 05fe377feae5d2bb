use chrono::NaiveDate;
use serde::Deserialize;

use crate::traits::{MovieDetail, MovieSummary, VideoRef};

// ── Paged movie list responses ──────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbPagedResponse {
    pub results: Vec<TmdbMovie>,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

// ── Movie detail response ───────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

// ── Videos response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbVideosResponse {
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// ── Conversions to shared trait types ───────────────────────────

/// TMDB sends `release_date: ""` for unscheduled titles; treat that
/// and anything unparseable as absent.
fn parse_release_date(raw: Option<String>) -> Option<NaiveDate> {
    raw.as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl TmdbMovie {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            release_date: parse_release_date(self.release_date),
            genre_ids: self.genre_ids,
        }
    }
}

impl TmdbMovieDetail {
    pub fn into_detail(self) -> MovieDetail {
        let summary = MovieSummary {
            id: self.id,
            title: self.title,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            release_date: parse_release_date(self.release_date),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
        };
        MovieDetail {
            summary,
            runtime: self.runtime,
            overview: self.overview.unwrap_or_default(),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

impl TmdbVideo {
    pub fn into_video_ref(self) -> VideoRef {
        VideoRef {
            key: self.key,
            site: self.site,
            kind: self.kind,
        }
    }
}
