//! Frontend-agnostic async facade over the discovery session.
//!
//! [`Runtime`] owns the session behind an `RwLock`, executes its fetch
//! requests against a [`CatalogService`], and feeds responses back
//! through the generation-checked apply methods. Locks wrap only the
//! synchronous transitions, never a network await, so concurrent
//! actions interleave freely and staleness is resolved at apply time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use kawashima_api::tmdb::{self, TmdbClient};
use kawashima_api::traits::{CatalogService, MovieDetail, MovieSummary};
use kawashima_core::config::AppConfig;
use kawashima_core::focus::{EnrichRequest, EnrichmentOutcome, EnrichmentState};
use kawashima_core::session::{
    DiscoverySession, Mode, PageKind, PageOutcome, PageRequest, PageResponse,
};
use kawashima_core::sort::SortKey;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("catalog error: {0}")]
    Catalog(String),
}

/// One list entry with its annotations and image URL resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieEntry {
    pub movie: MovieSummary,
    pub poster_url: Option<String>,
    pub favorited: bool,
    pub watched: bool,
}

/// The focused item as presentation sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusedEntry {
    pub movie: MovieSummary,
    pub backdrop_url: Option<String>,
    pub detail: Option<MovieDetail>,
    pub enrichment: EnrichmentState,
}

/// A full, renderable view of the session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    pub mode: Mode,
    pub items: Vec<MovieEntry>,
    pub more_available: bool,
    pub active_sort: SortKey,
    pub no_results: bool,
    pub focused: Option<FocusedEntry>,
}

pub struct Runtime<C: CatalogService> {
    catalog: C,
    config: Arc<RwLock<AppConfig>>,
    session: Arc<RwLock<DiscoverySession>>,
}

impl Runtime<TmdbClient> {
    /// Build a runtime over TMDB from the user configuration.
    pub fn from_config() -> Result<Self, RuntimeError> {
        let config = AppConfig::load().map_err(|e| RuntimeError::Config(e.to_string()))?;
        let api_key = config
            .tmdb
            .api_key
            .clone()
            .ok_or_else(|| RuntimeError::Config("TMDB api_key required".into()))?;
        let catalog = TmdbClient::new(api_key)
            .with_language(config.tmdb.language.clone())
            .with_include_adult(config.tmdb.include_adult);
        Ok(Self::new(catalog, config))
    }
}

impl<C: CatalogService> Runtime<C> {
    pub fn new(catalog: C, config: AppConfig) -> Self {
        // The startup request is dropped here; reload() issues an
        // equivalent one once the caller has an async context.
        let (session, _) = DiscoverySession::new();
        Self {
            catalog,
            config: Arc::new(RwLock::new(config)),
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn get_config(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    pub async fn update_config(&self, new_config: AppConfig) -> Result<(), RuntimeError> {
        new_config
            .save()
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        *self.config.write().await = new_config;
        Ok(())
    }

    // ── Session actions ─────────────────────────────────────────

    /// Load page 1 of the current mode from scratch. Call once at
    /// startup to fill the empty browsing session; calling it again
    /// reloads the feed (or re-runs the search).
    pub async fn reload(&self) -> Result<(), RuntimeError> {
        let request = self.session.write().await.reload();
        self.execute_page(request).await
    }

    /// Switch to search mode and run the query's first page.
    pub async fn start_search(&self, query: &str) -> Result<(), RuntimeError> {
        let request = self.session.write().await.start_search(query);
        self.execute_page(request).await
    }

    /// Return to the browse feed and reload it.
    pub async fn clear_search(&self) -> Result<(), RuntimeError> {
        let request = self.session.write().await.clear_search();
        self.execute_page(request).await
    }

    /// Fetch the next page in the current mode. Does nothing once the
    /// end of the feed has been seen.
    pub async fn load_more(&self) -> Result<(), RuntimeError> {
        let request = self.session.read().await.load_more();
        match request {
            Some(request) => self.execute_page(request).await,
            None => Ok(()),
        }
    }

    pub async fn set_sort(&self, key: SortKey) {
        self.session.write().await.set_sort(key);
    }

    pub async fn toggle_favorite(&self, id: u64) -> bool {
        self.session.write().await.toggle_favorite(id)
    }

    pub async fn toggle_watched(&self, id: u64) -> bool {
        self.session.write().await.toggle_watched(id)
    }

    /// Open a movie's detail view and fetch its enrichment. Fetch
    /// failures surface as the focused item's `Failed` state, not as
    /// an error.
    pub async fn focus(&self, movie: MovieSummary) {
        let request = self.session.write().await.focus(movie);
        if let Some(request) = request {
            self.execute_enrichment(request).await;
        }
    }

    /// Retry enrichment for the focused item after a failure.
    pub async fn retry_enrichment(&self) {
        let request = self.session.write().await.retry_enrichment();
        if let Some(request) = request {
            self.execute_enrichment(request).await;
        }
    }

    pub async fn unfocus(&self) {
        self.session.write().await.unfocus();
    }

    // ── Read model ──────────────────────────────────────────────

    /// A full view of the current session state for presentation.
    pub async fn snapshot(&self) -> DiscoverySnapshot {
        let session = self.session.read().await;
        let config = self.config.read().await;

        let items = session
            .items()
            .iter()
            .map(|movie| MovieEntry {
                poster_url: movie
                    .poster_path
                    .as_deref()
                    .map(|p| tmdb::image_url(&config.images.poster_size, p)),
                favorited: session.is_favorited(movie.id),
                watched: session.is_watched(movie.id),
                movie: movie.clone(),
            })
            .collect();

        let focused = session.focused().map(|f| FocusedEntry {
            backdrop_url: f
                .movie
                .backdrop_path
                .as_deref()
                .map(|p| tmdb::image_url(&config.images.backdrop_size, p)),
            movie: f.movie.clone(),
            detail: f.detail.clone(),
            enrichment: f.enrichment.clone(),
        });

        DiscoverySnapshot {
            mode: session.mode().clone(),
            items,
            more_available: session.more_available(),
            active_sort: session.active_sort(),
            no_results: session.no_results(),
            focused,
        }
    }

    // ── Fetch plumbing ──────────────────────────────────────────

    async fn execute_page(&self, request: PageRequest) -> Result<(), RuntimeError> {
        let outcome = match &request.kind {
            PageKind::NowPlaying => {
                let results = self
                    .catalog
                    .now_playing(request.page)
                    .await
                    .map_err(|e| RuntimeError::Catalog(e.to_string()))?;
                PageOutcome::NowPlaying { results }
            }
            PageKind::Search { query } => {
                let found = self
                    .catalog
                    .search_movies(query, request.page)
                    .await
                    .map_err(|e| RuntimeError::Catalog(e.to_string()))?;
                PageOutcome::Search {
                    results: found.results,
                    total_pages: found.total_pages,
                }
            }
        };

        self.session.write().await.apply_page(PageResponse {
            generation: request.generation,
            page: request.page,
            outcome,
        });
        Ok(())
    }

    async fn execute_enrichment(&self, request: EnrichRequest) {
        let (detail, videos) = tokio::join!(
            self.catalog.movie_detail(request.movie_id),
            self.catalog.movie_videos(request.movie_id),
        );

        let detail = match detail {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!(movie_id = request.movie_id, "detail fetch failed: {e}");
                None
            }
        };
        let videos = match videos {
            Ok(videos) => Some(videos),
            Err(e) => {
                tracing::warn!(movie_id = request.movie_id, "videos fetch failed: {e}");
                None
            }
        };

        self.session
            .write()
            .await
            .apply_enrichment(EnrichmentOutcome {
                generation: request.generation,
                movie_id: request.movie_id,
                detail,
                videos,
            });
    }
}
