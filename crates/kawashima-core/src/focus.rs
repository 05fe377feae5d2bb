//! Focused-item tracking and on-demand detail enrichment.

use kawashima_api::traits::{MovieDetail, MovieSummary, VideoRef};
use serde::{Deserialize, Serialize};

/// Enrichment lifecycle of the focused item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrichmentState {
    NotRequested,
    Pending,
    Ready { trailer_url: Option<String> },
    Failed,
}

/// The single item currently opened for detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusedItem {
    pub movie: MovieSummary,
    /// Merged in on successful enrichment; never written back into
    /// the accumulated list.
    pub detail: Option<MovieDetail>,
    pub enrichment: EnrichmentState,
}

/// An enrichment fetch the caller should execute for the focused
/// item: its detail and its videos, concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichRequest {
    pub generation: u64,
    pub movie_id: u64,
}

/// The result of an executed [`EnrichRequest`]. A `None` part means
/// that call failed; the two fetches succeed or fail independently.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub generation: u64,
    pub movie_id: u64,
    pub detail: Option<MovieDetail>,
    pub videos: Option<Vec<VideoRef>>,
}

/// Tracks which item is focused and folds enrichment results in,
/// dropping any that belong to an earlier focus.
#[derive(Debug, Default)]
pub struct FocusCoordinator {
    focused: Option<FocusedItem>,
    generation: u64,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `movie` the focused item, replacing any previous focus.
    /// Enrichment starts separately via [`Self::request_enrichment`].
    pub fn focus(&mut self, movie: MovieSummary) {
        self.generation += 1;
        self.focused = Some(FocusedItem {
            movie,
            detail: None,
            enrichment: EnrichmentState::NotRequested,
        });
    }

    /// Drop the focus. In-flight enrichment for it will be discarded
    /// when it arrives.
    pub fn unfocus(&mut self) {
        self.generation += 1;
        self.focused = None;
    }

    /// Ask for the fetch that fills in the focused item's detail and
    /// trailer. Returns `None` when there is nothing to do: no focus,
    /// a fetch already in flight, or data already present. A `Failed`
    /// item can be requested again.
    pub fn request_enrichment(&mut self) -> Option<EnrichRequest> {
        let focused = self.focused.as_mut()?;
        match focused.enrichment {
            EnrichmentState::NotRequested | EnrichmentState::Failed => {
                focused.enrichment = EnrichmentState::Pending;
                Some(EnrichRequest {
                    generation: self.generation,
                    movie_id: focused.movie.id,
                })
            }
            EnrichmentState::Pending | EnrichmentState::Ready { .. } => None,
        }
    }

    /// Fold an enrichment result into the focused item.
    ///
    /// A result from an earlier focus (stale generation) is dropped
    /// whole. A missing detail marks the item `Failed`; missing
    /// videos alone still yield `Ready`, just without a trailer.
    pub fn apply_enrichment(&mut self, outcome: EnrichmentOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(movie_id = outcome.movie_id, "dropping stale enrichment");
            return;
        }
        let Some(focused) = self.focused.as_mut() else {
            return;
        };

        match outcome.detail {
            Some(detail) => {
                let trailer_url = outcome
                    .videos
                    .as_deref()
                    .and_then(pick_trailer)
                    .map(|v| format!("https://www.youtube.com/watch?v={}", v.key));
                focused.detail = Some(detail);
                focused.enrichment = EnrichmentState::Ready { trailer_url };
            }
            None => {
                tracing::warn!(movie_id = outcome.movie_id, "enrichment detail fetch failed");
                focused.enrichment = EnrichmentState::Failed;
            }
        }
    }

    pub fn focused(&self) -> Option<&FocusedItem> {
        self.focused.as_ref()
    }
}

/// Prefer a YouTube video typed `Trailer`, else any YouTube video,
/// else none.
fn pick_trailer(videos: &[VideoRef]) -> Option<&VideoRef> {
    videos
        .iter()
        .find(|v| v.kind == "Trailer" && v.site == "YouTube")
        .or_else(|| videos.iter().find(|v| v.site == "YouTube"))
}
