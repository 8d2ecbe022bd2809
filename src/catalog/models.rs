//! Wire types for the `subsonic-response` JSON envelope

use serde::{Deserialize, Deserializer};

use crate::error::CatalogError;
use crate::model::{Album, Artist, PlayQueue, PlaylistSummary, Starred, Track};

/// Subsonic error codes meaning the credentials were not accepted
const AUTH_ERROR_CODES: [i32; 2] = [40, 41];

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "subsonic-response")]
    pub response: ResponseBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub status: String,
    pub error: Option<ApiError>,
    pub search_result3: Option<SearchResult3>,
    pub playlists: Option<PlaylistsDto>,
    pub playlist: Option<PlaylistDto>,
    pub album: Option<AlbumWithSongsDto>,
    pub artist: Option<ArtistWithAlbumsDto>,
    pub album_list2: Option<AlbumListDto>,
    pub starred2: Option<StarredDto>,
    pub play_queue: Option<PlayQueueDto>,
}

impl ResponseBody {
    /// Turn a `status = "failed"` body into the matching error.
    pub fn into_result(self) -> Result<Self, CatalogError> {
        if self.status == "ok" {
            return Ok(self);
        }
        let error = self.error.unwrap_or_default();
        if AUTH_ERROR_CODES.contains(&error.code) {
            return Err(CatalogError::Auth(error.message));
        }
        Err(CatalogError::Api {
            code: error.code,
            message: error.message,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResult3 {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistDto>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumDto>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<SongDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistsDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub playlist: Vec<PlaylistSummaryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummaryDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub song_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub entry: Vec<SongDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlbumWithSongsDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<SongDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistWithAlbumsDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlbumListDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StarredDto {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistDto>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumDto>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<SongDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayQueueDto {
    #[serde(default, deserialize_with = "optional_id")]
    pub current: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub entry: Vec<SongDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration: u32,
    pub album_id: Option<String>,
    pub artist_id: Option<String>,
    pub cover_art: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDto {
    pub id: String,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    pub artist_id: Option<String>,
    pub year: Option<u32>,
    #[serde(default)]
    pub song_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub album_count: u32,
}

impl From<SongDto> for Track {
    fn from(song: SongDto) -> Self {
        Track {
            id: song.id,
            title: song.title,
            artist: song.artist,
            album: song.album,
            duration_secs: song.duration,
            album_id: song.album_id,
            artist_id: song.artist_id,
            cover_art: song.cover_art,
        }
    }
}

impl From<AlbumDto> for Album {
    fn from(album: AlbumDto) -> Self {
        Album {
            id: album.id,
            name: album.name,
            artist: album.artist,
            artist_id: album.artist_id,
            year: album.year,
            song_count: album.song_count,
        }
    }
}

impl From<ArtistDto> for Artist {
    fn from(artist: ArtistDto) -> Self {
        Artist {
            id: artist.id,
            name: artist.name,
            album_count: artist.album_count,
        }
    }
}

impl From<PlaylistSummaryDto> for PlaylistSummary {
    fn from(playlist: PlaylistSummaryDto) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            song_count: playlist.song_count,
        }
    }
}

impl From<StarredDto> for Starred {
    fn from(starred: StarredDto) -> Self {
        Starred {
            songs: convert(starred.song),
            albums: convert(starred.album),
            artists: convert(starred.artist),
        }
    }
}

impl From<PlayQueueDto> for PlayQueue {
    fn from(queue: PlayQueueDto) -> Self {
        PlayQueue {
            tracks: convert(queue.entry),
            current: queue.current,
        }
    }
}

pub fn convert<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

/// Some servers send a lone object where a list is expected.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Ids are strings on most servers, plain numbers on a few.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}
