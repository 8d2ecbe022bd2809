//! Catalog module - access to the remote music server
//!
//! - `subsonic`: REST client for Subsonic-compatible servers
//! - `models`: JSON wire types and their conversion into model types

mod models;
mod subsonic;

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::model::{
    Album, AlbumListKind, FavoriteKind, PlayQueue, PlaylistSummary, SearchKind, SearchResults, Starred,
    Track,
};

pub use subsonic::SubsonicClient;

/// Requests the session issues against the music server. Implementations hold
/// no session state.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn ping(&self) -> CatalogResult<()>;

    /// One page of results for a single entity kind; `page` is zero-based.
    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> CatalogResult<SearchResults>;

    async fn get_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>>;

    async fn get_playlist(&self, id: &str) -> CatalogResult<Vec<Track>>;

    async fn get_album(&self, id: &str) -> CatalogResult<Vec<Track>>;

    async fn get_artist_albums(&self, id: &str) -> CatalogResult<Vec<Album>>;

    async fn get_album_list(&self, kind: AlbumListKind) -> CatalogResult<Vec<Album>>;

    async fn get_starred(&self) -> CatalogResult<Starred>;

    /// The queue saved on the server, with the entry that was current.
    async fn get_play_queue(&self) -> CatalogResult<PlayQueue>;

    /// Signed URL the player can stream from. No network round-trip.
    fn stream_url(&self, track_id: &str) -> CatalogResult<String>;

    async fn report_now_playing(&self, track_id: &str) -> CatalogResult<()>;

    async fn report_final(&self, track_id: &str) -> CatalogResult<()>;

    async fn star(&self, id: &str, kind: FavoriteKind) -> CatalogResult<()>;

    async fn unstar(&self, id: &str, kind: FavoriteKind) -> CatalogResult<()>;

    async fn fetch_cover_art(&self, cover_id: &str) -> CatalogResult<Vec<u8>>;
}
