//! Model module - Application state and the playback session core
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (sections, loop mode, search kind, UI state)
//! - `content`: Catalog entities and content view data
//! - `playback`: Player status snapshots and the playback summary
//! - `queue`: Play queue with its current-entry cursor
//! - `advance`: End-of-track detection and loop resolution
//! - `scrobble`: One-shot listen reporting threshold
//! - `favorites`: Local starred set with optimistic toggling
//! - `session`: The aggregate tying the above together
//! - `app_model`: Main application model with state management methods

mod types;
mod content;
mod playback;
mod queue;
mod advance;
mod scrobble;
mod favorites;
mod session;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, AlbumListKind, SearchKind, SelectedItem, UiState};

pub use content::{
    Album, Artist, ContentView, PlayQueue, PlaylistSummary, SEARCH_PAGE_SIZE, SearchPaging,
    SearchResults, Starred, Track,
};

pub use playback::{PlaybackInfo, PlaybackStatus};

pub use favorites::{FavoriteKind, Favorites};
pub use session::SessionEffect;

pub use app_model::AppModel;
