//! Starred items, kept locally so star markers render without API calls

use std::collections::HashSet;

/// What kind of entity a star applies to. The server uses a different
/// parameter name for each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavoriteKind {
    Song,
    Album,
    Artist,
}

impl FavoriteKind {
    pub fn id_param(self) -> &'static str {
        match self {
            FavoriteKind::Song => "id",
            FavoriteKind::Album => "albumId",
            FavoriteKind::Artist => "artistId",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Favorites {
    starred_ids: HashSet<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.starred_ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.starred_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.starred_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starred_ids.is_empty()
    }

    /// Flip membership locally. Returns whether the id was starred before the flip,
    /// which decides between the star and unstar server call.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.starred_ids.remove(id) {
            true
        } else {
            self.starred_ids.insert(id.to_string());
            false
        }
    }

    /// Undo a failed toggle. Only applies while the membership still reflects
    /// that toggle, so a later toggle of the same id is not clobbered.
    pub fn rollback(&mut self, id: &str, was_starred: bool) -> bool {
        let optimistic = !was_starred;
        if self.is_starred(id) != optimistic {
            return false;
        }
        if was_starred {
            self.starred_ids.insert(id.to_string());
        } else {
            self.starred_ids.remove(id);
        }
        true
    }
}
