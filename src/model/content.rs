//! Catalog entities and content view state (search results, playlists, albums, queue)

use super::types::SearchKind;

/// Entries per search request
pub const SEARCH_PAGE_SIZE: usize = 20;

/// A playable song. Immutable once fetched from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Zero when the server does not know the length
    pub duration_secs: u32,
    pub album_id: Option<String>,
    pub artist_id: Option<String>,
    pub cover_art: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: Option<String>,
    pub year: Option<u32>,
    pub song_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub album_count: u32,
}

/// A playlist as listed in the sidebar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub song_count: u32,
}

/// One page of search results for a single entity kind
#[derive(Clone, Debug)]
pub enum SearchResults {
    Songs(Vec<Track>),
    Albums(Vec<Album>),
    Artists(Vec<Artist>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Songs(v) => v.len(),
            SearchResults::Albums(v) => v.len(),
            SearchResults::Artists(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the user has starred on the server
#[derive(Clone, Debug, Default)]
pub struct Starred {
    pub songs: Vec<Track>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
}

impl Starred {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.songs
            .iter()
            .map(|s| s.id.as_str())
            .chain(self.albums.iter().map(|a| a.id.as_str()))
            .chain(self.artists.iter().map(|a| a.id.as_str()))
    }
}

/// The play queue saved on the server, with the entry that was playing
#[derive(Clone, Debug, Default)]
pub struct PlayQueue {
    pub tracks: Vec<Track>,
    pub current: Option<String>,
}

impl PlayQueue {
    pub fn current_index(&self) -> usize {
        self.current
            .as_deref()
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
            .unwrap_or(0)
    }
}

/// Paging state for a list that came from a search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPaging {
    pub kind: SearchKind,
    pub query: String,
    pub next_page: u32,
    pub has_more: bool,
    pub loading_more: bool,
}

impl SearchPaging {
    pub fn matches(&self, kind: SearchKind, query: &str, page: u32) -> bool {
        self.kind == kind && self.query == query && self.next_page == page
    }
}

/// Different views that can be shown in the main content area
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    #[default]
    Empty,
    Tracks {
        title: String,
        tracks: Vec<Track>,
        selected_index: usize,
        paging: Option<SearchPaging>,
    },
    Albums {
        title: String,
        albums: Vec<Album>,
        selected_index: usize,
        paging: Option<SearchPaging>,
    },
    Artists {
        title: String,
        artists: Vec<Artist>,
        selected_index: usize,
        paging: Option<SearchPaging>,
    },
    /// The play queue itself lives in the session; only the cursor is view state.
    Queue { selected_index: usize },
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub navigation_stack: Vec<ContentView>,
    pub is_loading: bool,
}
