//! The discovery session: one paginated list shared by two mutually
//! exclusive fetch modes, with client-side sorting, annotations, and
//! a focused-item detail view.
//!
//! The session is a synchronous state machine. Actions return request
//! values describing the fetch to run; the caller executes them and
//! feeds the result back through [`DiscoverySession::apply_page`] or
//! [`DiscoverySession::apply_enrichment`]. Every request carries the
//! generation it was issued under, and a response whose generation no
//! longer matches is dropped, so a slow page can never leak into a
//! session that has since changed mode.

use std::collections::HashSet;

use kawashima_api::traits::MovieSummary;
use serde::{Deserialize, Serialize};

use crate::annotations::AnnotationSets;
use crate::focus::{EnrichRequest, EnrichmentOutcome, FocusCoordinator, FocusedItem};
use crate::sort::{self, SortKey};

/// Which fetch context the session is in. Search carries its query so
/// the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    Browsing,
    Searching { query: String },
}

/// A page fetch the caller should execute against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub kind: PageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    NowPlaying,
    Search { query: String },
}

/// The result of an executed [`PageRequest`], fed back into
/// [`DiscoverySession::apply_page`].
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub generation: u64,
    pub page: u32,
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone)]
pub enum PageOutcome {
    NowPlaying {
        results: Vec<MovieSummary>,
    },
    Search {
        results: Vec<MovieSummary>,
        total_pages: u32,
    },
}

/// Accumulating, mode-aware view over the movie catalog.
#[derive(Debug)]
pub struct DiscoverySession {
    mode: Mode,
    page: u32,
    items: Vec<MovieSummary>,
    seen: HashSet<u64>,
    more_available: bool,
    active_sort: SortKey,
    generation: u64,
    annotations: AnnotationSets,
    focus: FocusCoordinator,
}

impl DiscoverySession {
    /// A fresh browsing session plus the page-1 request that fills it.
    pub fn new() -> (Self, PageRequest) {
        let session = Self {
            mode: Mode::Browsing,
            page: 1,
            items: Vec::new(),
            seen: HashSet::new(),
            more_available: true,
            active_sort: SortKey::default(),
            generation: 0,
            annotations: AnnotationSets::new(),
            focus: FocusCoordinator::new(),
        };
        let request = session.request_for(1);
        (session, request)
    }

    // ── Mode transitions ────────────────────────────────────────

    /// Enter search mode and ask for the query's first page.
    ///
    /// The list resets immediately, before any data arrives. A blank
    /// query leaves search instead, as [`Self::clear_search`] does.
    pub fn start_search(&mut self, query: &str) -> PageRequest {
        let query = query.trim();
        if query.is_empty() {
            return self.clear_search();
        }
        tracing::debug!(query, "entering search mode");
        self.reset_to(Mode::Searching {
            query: query.to_string(),
        })
    }

    /// Leave search mode and reload the browse feed from page 1.
    pub fn clear_search(&mut self) -> PageRequest {
        tracing::debug!("entering browse mode");
        self.reset_to(Mode::Browsing)
    }

    /// Start over in the current mode: page 1, empty list, new
    /// generation. The browse feed reloads from the top; a search
    /// re-runs its query.
    pub fn reload(&mut self) -> PageRequest {
        self.reset_to(self.mode.clone())
    }

    fn reset_to(&mut self, mode: Mode) -> PageRequest {
        self.mode = mode;
        self.page = 1;
        self.items.clear();
        self.seen.clear();
        self.more_available = true;
        self.generation += 1;
        self.request_for(1)
    }

    // ── Pagination ──────────────────────────────────────────────

    /// Request the page after the last applied one, in the current
    /// mode. `None` once the end of the feed has been seen.
    pub fn load_more(&self) -> Option<PageRequest> {
        if !self.more_available {
            return None;
        }
        Some(self.request_for(self.page + 1))
    }

    /// Fold an executed page fetch back into the session.
    ///
    /// Responses from a stale generation are dropped whole, as are
    /// responses whose kind disagrees with the current mode. An empty
    /// page marks the end of the feed and changes nothing else.
    /// Anything else appends (deduplicated by id), re-applies the
    /// active sort, and advances the page cursor.
    pub fn apply_page(&mut self, response: PageResponse) {
        if response.generation != self.generation {
            tracing::debug!(
                stale = response.generation,
                current = self.generation,
                "dropping stale page response"
            );
            return;
        }

        let (results, total_pages) = match (&self.mode, response.outcome) {
            (Mode::Browsing, PageOutcome::NowPlaying { results }) => (results, None),
            (
                Mode::Searching { .. },
                PageOutcome::Search {
                    results,
                    total_pages,
                },
            ) => (results, Some(total_pages)),
            _ => {
                tracing::debug!("dropping page response whose kind does not match the mode");
                return;
            }
        };

        if results.is_empty() {
            self.more_available = false;
            return;
        }

        let incoming = results.len();
        let before = self.items.len();
        for movie in results {
            if self.seen.insert(movie.id) {
                self.items.push(movie);
            }
        }
        let appended = self.items.len() - before;
        if appended < incoming {
            tracing::debug!(
                dropped = incoming - appended,
                page = response.page,
                "dropped duplicate ids from page"
            );
        }

        sort::apply(&mut self.items, self.active_sort);
        self.page = response.page;
        if let Some(total_pages) = total_pages {
            self.more_available = response.page < total_pages;
        }
        tracing::debug!(
            page = response.page,
            total = self.items.len(),
            "applied page"
        );
    }

    // ── Sorting ─────────────────────────────────────────────────

    /// Change the active ordering and re-project the list in place.
    /// Never fetches; the key also survives mode switches.
    pub fn set_sort(&mut self, key: SortKey) {
        self.active_sort = key;
        sort::apply(&mut self.items, key);
    }

    // ── Annotations ─────────────────────────────────────────────

    /// Flip the favorite flag for a movie id; returns the new state.
    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        self.annotations.toggle_favorite(id)
    }

    /// Flip the watched flag for a movie id; returns the new state.
    pub fn toggle_watched(&mut self, id: u64) -> bool {
        self.annotations.toggle_watched(id)
    }

    pub fn is_favorited(&self, id: u64) -> bool {
        self.annotations.is_favorited(id)
    }

    pub fn is_watched(&self, id: u64) -> bool {
        self.annotations.is_watched(id)
    }

    // ── Focus ───────────────────────────────────────────────────

    /// Open a movie for detail view and request its enrichment. Any
    /// previous focus is replaced; its in-flight enrichment will be
    /// dropped on arrival.
    pub fn focus(&mut self, movie: MovieSummary) -> Option<EnrichRequest> {
        self.focus.focus(movie);
        self.focus.request_enrichment()
    }

    /// Re-request enrichment for the focused item after a failure.
    pub fn retry_enrichment(&mut self) -> Option<EnrichRequest> {
        self.focus.request_enrichment()
    }

    /// Close the detail view.
    pub fn unfocus(&mut self) {
        self.focus.unfocus();
    }

    /// Fold an executed enrichment fetch into the focused item.
    pub fn apply_enrichment(&mut self, outcome: EnrichmentOutcome) {
        self.focus.apply_enrichment(outcome);
    }

    // ── Read model ──────────────────────────────────────────────

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn more_available(&self) -> bool {
        self.more_available
    }

    pub fn active_sort(&self) -> SortKey {
        self.active_sort
    }

    /// True while a search shows nothing, either because it matched
    /// nothing or because its first page has not landed yet.
    pub fn no_results(&self) -> bool {
        matches!(self.mode, Mode::Searching { .. }) && self.items.is_empty()
    }

    pub fn focused(&self) -> Option<&FocusedItem> {
        self.focus.focused()
    }

    fn request_for(&self, page: u32) -> PageRequest {
        let kind = match &self.mode {
            Mode::Browsing => PageKind::NowPlaying,
            Mode::Searching { query } => PageKind::Search {
                query: query.clone(),
            },
        };
        PageRequest {
            generation: self.generation,
            page,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            backdrop_path: None,
            vote_average: (id % 10) as f64,
            release_date: None,
            genre_ids: vec![],
        }
    }

    fn page_of(ids: std::ops::Range<u64>) -> Vec<MovieSummary> {
        ids.map(|id| movie(id, &format!("Movie {id}"))).collect()
    }

    fn browse_response(generation: u64, page: u32, results: Vec<MovieSummary>) -> PageResponse {
        PageResponse {
            generation,
            page,
            outcome: PageOutcome::NowPlaying { results },
        }
    }

    fn search_response(
        generation: u64,
        page: u32,
        results: Vec<MovieSummary>,
        total_pages: u32,
    ) -> PageResponse {
        PageResponse {
            generation,
            page,
            outcome: PageOutcome::Search {
                results,
                total_pages,
            },
        }
    }

    fn item_ids(session: &DiscoverySession) -> Vec<u64> {
        session.items().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_new_session_requests_browse_page_one() {
        let (session, startup) = DiscoverySession::new();
        assert_eq!(startup.page, 1);
        assert_eq!(startup.kind, PageKind::NowPlaying);
        assert_eq!(session.mode(), &Mode::Browsing);
        assert!(session.items().is_empty());
        assert!(session.more_available());
    }

    #[test]
    fn test_browse_search_clear_scenario() {
        let (mut session, startup) = DiscoverySession::new();

        session.apply_page(browse_response(startup.generation, 1, page_of(1..21)));
        assert_eq!(session.items().len(), 20);
        assert_eq!(session.page(), 1);
        assert!(session.more_available());

        let next = session.load_more().unwrap();
        assert_eq!(next.page, 2);
        session.apply_page(browse_response(next.generation, 2, page_of(21..36)));
        assert_eq!(session.items().len(), 35);
        assert_eq!(session.page(), 2);

        // annotations set while browsing...
        session.toggle_favorite(3);
        session.toggle_watched(27);

        let search = session.start_search("dune");
        assert_eq!(search.page, 1);
        assert_eq!(
            search.kind,
            PageKind::Search {
                query: "dune".to_string()
            }
        );
        // ...the reset happens before any search data arrives...
        assert!(session.items().is_empty());
        assert_eq!(session.page(), 1);
        assert!(session.more_available());

        session.apply_page(search_response(search.generation, 1, page_of(100..105), 1));
        assert_eq!(session.items().len(), 5);
        assert!(!session.more_available());
        assert!(session.load_more().is_none());

        // ...and survive both mode switches
        assert!(session.is_favorited(3));
        assert!(session.is_watched(27));

        let back = session.clear_search();
        assert_eq!(session.mode(), &Mode::Browsing);
        assert!(session.items().is_empty());
        assert!(session.more_available());

        session.apply_page(browse_response(back.generation, 1, page_of(1..21)));
        assert_eq!(session.items().len(), 20);
        assert!(session.is_favorited(3));
        assert!(session.is_watched(27));
    }

    #[test]
    fn test_accumulation_is_monotonic_and_deduplicated() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..6)));

        // the feed shifted between fetches; page 2 repeats ids 4 and 5
        let next = session.load_more().unwrap();
        session.apply_page(browse_response(next.generation, 2, page_of(4..9)));

        assert_eq!(item_ids(&session), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn test_empty_browse_page_ends_feed() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..21)));

        let next = session.load_more().unwrap();
        session.apply_page(browse_response(next.generation, 2, vec![]));

        assert!(!session.more_available());
        assert_eq!(session.items().len(), 20);
        assert_eq!(session.page(), 1);
        assert!(session.load_more().is_none());
    }

    #[test]
    fn test_search_pagination_uses_total_pages() {
        let (mut session, _) = DiscoverySession::new();
        let search = session.start_search("alien");

        session.apply_page(search_response(search.generation, 1, page_of(1..21), 3));
        assert!(session.more_available());

        let next = session.load_more().unwrap();
        session.apply_page(search_response(next.generation, 2, page_of(21..41), 3));
        assert!(session.more_available());

        let last = session.load_more().unwrap();
        session.apply_page(search_response(last.generation, 3, page_of(41..49), 3));
        assert!(!session.more_available());
        assert_eq!(session.items().len(), 48);
        assert!(session.load_more().is_none());
    }

    #[test]
    fn test_search_with_no_matches() {
        let (mut session, _) = DiscoverySession::new();
        let search = session.start_search("zzzzzzz");
        assert!(session.no_results());

        session.apply_page(search_response(search.generation, 1, vec![], 0));
        assert!(session.no_results());
        assert!(!session.more_available());
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_blank_query_behaves_as_clear_search() {
        let (mut session, _) = DiscoverySession::new();
        session.start_search("dune");
        assert!(matches!(session.mode(), Mode::Searching { .. }));

        let request = session.start_search("   ");
        assert_eq!(session.mode(), &Mode::Browsing);
        assert_eq!(request.kind, PageKind::NowPlaying);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_stale_response_dropped_after_mode_switch() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..21)));

        let stale = session.load_more().unwrap();
        let search = session.start_search("dune");

        // the slow browse page resolves only after the switch
        session.apply_page(browse_response(stale.generation, 2, page_of(21..36)));
        assert!(session.items().is_empty());
        assert_eq!(session.page(), 1);
        assert!(session.more_available());

        session.apply_page(search_response(search.generation, 1, page_of(50..52), 3));
        assert_eq!(item_ids(&session), vec![50, 51]);
        assert!(session.more_available());
    }

    #[test]
    fn test_stale_responses_dropped_even_after_newer_data_landed() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..21)));

        // two browse pages in flight when the mode switches
        let slow_a = session.load_more().unwrap();
        let slow_b = PageRequest {
            page: slow_a.page + 1,
            ..slow_a.clone()
        };
        let search = session.start_search("dune");

        // the fast search page lands first, then the stragglers in
        // reverse order
        session.apply_page(search_response(search.generation, 1, page_of(100..103), 2));
        session.apply_page(browse_response(slow_b.generation, slow_b.page, page_of(41..61)));
        session.apply_page(browse_response(slow_a.generation, slow_a.page, page_of(21..41)));

        assert_eq!(item_ids(&session), vec![100, 101, 102]);
        assert_eq!(session.page(), 1);
        assert!(session.more_available());
    }

    #[test]
    fn test_mismatched_outcome_kind_ignored() {
        let (mut session, startup) = DiscoverySession::new();
        // a search outcome cannot land in a browsing session even
        // with a current generation
        session.apply_page(search_response(startup.generation, 1, page_of(1..3), 1));
        assert!(session.items().is_empty());
        assert!(session.more_available());
    }

    #[test]
    fn test_sort_reapplied_after_load_more() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(
            startup.generation,
            1,
            vec![movie(1, "Zodiac"), movie(2, "Arrival")],
        ));

        session.set_sort(SortKey::Title);
        assert_eq!(item_ids(&session), vec![2, 1]);

        let next = session.load_more().unwrap();
        session.apply_page(browse_response(
            next.generation,
            2,
            vec![movie(3, "Memento")],
        ));
        assert_eq!(item_ids(&session), vec![2, 3, 1]);

        // re-picking the same key is a no-op
        session.set_sort(SortKey::Title);
        assert_eq!(item_ids(&session), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_survives_mode_switch() {
        let (mut session, startup) = DiscoverySession::new();
        session.set_sort(SortKey::Rating);
        session.apply_page(browse_response(startup.generation, 1, page_of(1..6)));

        let search = session.start_search("heat");
        assert_eq!(session.active_sort(), SortKey::Rating);

        session.apply_page(search_response(
            search.generation,
            1,
            vec![movie(21, "Heat"), movie(39, "Heatwave"), movie(15, "Heather")],
            1,
        ));
        // vote_average derives from id % 10 in the fixture
        assert_eq!(item_ids(&session), vec![39, 15, 21]);
    }

    #[test]
    fn test_reload_restarts_current_mode() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..21)));

        let reload = session.reload();
        assert_eq!(reload.page, 1);
        assert_eq!(reload.kind, PageKind::NowPlaying);
        assert!(session.items().is_empty());

        // the pre-reload generation is dead
        assert!(reload.generation > startup.generation);
    }

    #[test]
    fn test_focus_passthrough_tracks_single_item() {
        let (mut session, startup) = DiscoverySession::new();
        session.apply_page(browse_response(startup.generation, 1, page_of(1..3)));

        let first = session.focus(movie(1, "Movie 1")).unwrap();
        let second = session.focus(movie(2, "Movie 2")).unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(session.focused().unwrap().movie.id, 2);

        session.unfocus();
        assert!(session.focused().is_none());
    }
}
