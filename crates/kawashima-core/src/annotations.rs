use std::collections::HashSet;

/// Favorite and watched flags, keyed by movie id.
///
/// Annotations live outside fetch state entirely: they survive mode
/// switches, pagination, and sorting, and keep applying to an id that
/// drops out of the visible list.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSets {
    favorited: HashSet<u64>,
    watched: HashSet<u64>,
}

impl AnnotationSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the favorite flag for `id`; returns the new membership.
    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        if self.favorited.remove(&id) {
            false
        } else {
            self.favorited.insert(id);
            true
        }
    }

    /// Flip the watched flag for `id`; returns the new membership.
    pub fn toggle_watched(&mut self, id: u64) -> bool {
        if self.watched.remove(&id) {
            false
        } else {
            self.watched.insert(id);
            true
        }
    }

    pub fn is_favorited(&self, id: u64) -> bool {
        self.favorited.contains(&id)
    }

    pub fn is_watched(&self, id: u64) -> bool {
        self.watched.contains(&id)
    }
}
