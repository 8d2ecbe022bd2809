//! Core type definitions for the application

use std::time::Instant;

use super::content::{Album, Artist, PlaylistSummary, Track};

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Library,
    Playlists,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Library,
            ActiveSection::Library => ActiveSection::Playlists,
            ActiveSection::Playlists => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Library => ActiveSection::Search,
            ActiveSection::Playlists => ActiveSection::Library,
            ActiveSection::MainContent => ActiveSection::Playlists,
        }
    }
}

/// Playback continuation policy applied when a track ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    None,
    All,
    One,
}

impl LoopMode {
    pub fn next(self) -> Self {
        match self {
            LoopMode::None => LoopMode::All,
            LoopMode::All => LoopMode::One,
            LoopMode::One => LoopMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoopMode::None => "Loop: Off",
            LoopMode::All => "Loop: All",
            LoopMode::One => "Loop: One",
        }
    }
}

/// Entity kind a search request targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Songs,
    Albums,
    Artists,
}

impl SearchKind {
    pub fn next(self) -> Self {
        match self {
            Self::Songs => Self::Albums,
            Self::Albums => Self::Artists,
            Self::Artists => Self::Songs,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Songs => Self::Artists,
            Self::Albums => Self::Songs,
            Self::Artists => Self::Albums,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Songs => "Search songs...",
            Self::Albums => "Search albums...",
            Self::Artists => "Search artists...",
        }
    }
}

/// Server-side album lists shown in the Library section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlbumListKind {
    Random,
    Starred,
    Newest,
    Recent,
    Frequent,
}

impl AlbumListKind {
    pub const ALL: [AlbumListKind; 5] = [
        AlbumListKind::Random,
        AlbumListKind::Starred,
        AlbumListKind::Newest,
        AlbumListKind::Recent,
        AlbumListKind::Frequent,
    ];

    pub fn as_param(self) -> &'static str {
        match self {
            AlbumListKind::Random => "random",
            AlbumListKind::Starred => "starred",
            AlbumListKind::Newest => "newest",
            AlbumListKind::Recent => "recent",
            AlbumListKind::Frequent => "frequent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlbumListKind::Random => "Random albums",
            AlbumListKind::Starred => "Starred albums",
            AlbumListKind::Newest => "Recently added",
            AlbumListKind::Recent => "Recently played",
            AlbumListKind::Frequent => "Most played",
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    Track(Track),
    Album(Album),
    Artist(Artist),
    QueueEntry { index: usize, track: Track },
}

impl SelectedItem {
    pub fn track(&self) -> Option<&Track> {
        match self {
            SelectedItem::Track(track) | SelectedItem::QueueEntry { track, .. } => Some(track),
            _ => None,
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub search_kind: SearchKind,
    pub library_items: Vec<AlbumListKind>,
    pub library_selected: usize,
    pub playlists: Vec<PlaylistSummary>,
    pub playlist_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    /// A lone `g` was typed; the next key completes `gg`, `ga` or `gr`.
    pub pending_g: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            search_kind: SearchKind::default(),
            library_items: AlbumListKind::ALL.to_vec(),
            library_selected: 0,
            playlists: vec![], // Loaded from the server on startup
            playlist_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
            pending_g: false,
        }
    }
}
