//! Client-side ordering for the accumulated movie list.

use std::cmp::Ordering;

use kawashima_api::traits::MovieSummary;
use serde::{Deserialize, Serialize};

/// Ordering applied to the accumulated list.
///
/// Sorting is a pure re-projection of what is already loaded; picking
/// a key never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// The order pages came back from the catalog.
    #[default]
    FetchOrder,
    /// Case-insensitive title, A to Z.
    Title,
    /// Release date, newest first. Undated titles sort last.
    ReleaseDate,
    /// Vote average, highest first.
    Rating,
}

impl SortKey {
    pub const ALL: &[SortKey] = &[Self::FetchOrder, Self::Title, Self::ReleaseDate, Self::Rating];
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchOrder => write!(f, "Default"),
            Self::Title => write!(f, "Title (A-Z)"),
            Self::ReleaseDate => write!(f, "Release Date (Newest)"),
            Self::Rating => write!(f, "Rating (Highest)"),
        }
    }
}

/// Re-project `items` under `key`, in place.
///
/// Every key yields a total order (ties fall back to `id` ascending),
/// so applying the same key twice changes nothing and items already
/// seen do not shuffle when a new page is folded in.
pub fn apply(items: &mut [MovieSummary], key: SortKey) {
    match key {
        SortKey::FetchOrder => {}
        SortKey::Title => items.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::ReleaseDate => items.sort_by(|a, b| {
            match (a.release_date, b.release_date) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Rating => items.sort_by(|a, b| {
            b.vote_average
                .total_cmp(&a.vote_average)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
}
