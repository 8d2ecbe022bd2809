//! Events delivered to the controller's single event loop

use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::error::{CatalogResult, LoadError, PlayerResult};
use crate::model::{Album, PlayQueue, PlaybackStatus, PlaylistSummary, SearchKind, SearchResults, Starred, Track};
use crate::player::PlayerAdapter;

/// Everything that can change application state. Background tasks never touch
/// the model; they report back with one of these.
pub enum AppEvent {
    Key(KeyEvent),
    Command(UserCommand),
    /// One status poll. `None` when the player is not up yet or the query failed.
    StatusTick(Option<PlaybackStatus>),
    SearchResult {
        kind: SearchKind,
        query: String,
        page: u32,
        result: CatalogResult<SearchResults>,
    },
    /// Songs of a playlist or album.
    PlaylistResult {
        title: String,
        result: CatalogResult<Vec<Track>>,
    },
    PlaylistsResult(CatalogResult<Vec<PlaylistSummary>>),
    AlbumsResult {
        title: String,
        result: CatalogResult<Vec<Album>>,
    },
    /// The starred set; `show` opens the starred songs as a view.
    FavoritesResult {
        show: bool,
        result: CatalogResult<Starred>,
    },
    PlayQueueResult(CatalogResult<PlayQueue>),
    PlayerReady(PlayerResult<Arc<dyn PlayerAdapter>>),
    Background(BackgroundResult),
}

/// Completion of fire-and-forget work
#[derive(Debug)]
pub enum BackgroundResult {
    TrackLoaded {
        track_id: String,
        result: Result<(), LoadError>,
    },
    ScrobbleSubmitted {
        track_id: String,
        result: CatalogResult<()>,
    },
    StarToggled {
        id: String,
        was_starred: bool,
        result: CatalogResult<()>,
    },
    CoverArt {
        track_id: String,
        image: CatalogResult<Vec<u8>>,
    },
    PlayerCommand {
        action: &'static str,
        result: PlayerResult<()>,
    },
}

/// User intents that do not depend on which widget has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserCommand {
    TogglePause,
    NextTrack,
    PreviousTrack,
    RestartTrack,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    ShuffleQueue,
    CycleLoopMode,
    ToggleFavorite,
    ShowFavorites,
    ToggleQueueView,
    InsertNext,
    Append,
    RemoveFromQueue,
    ClearQueue,
    MoveUp,
    MoveDown,
    JumpToAlbum,
    JumpToArtist,
    ShowHelp,
    Quit,
}
