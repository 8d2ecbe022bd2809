//! Subsonic REST client using salted token authentication

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::CatalogClient;
use super::models::{Envelope, ResponseBody, convert};
use crate::config::ServerConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Album, AlbumListKind, FavoriteKind, PlayQueue, PlaylistSummary, SEARCH_PAGE_SIZE, SearchKind,
    SearchResults, Starred, Track,
};
use crate::{log_api_request, log_api_result};

const API_VERSION: &str = "1.16.1";
const CLIENT_NAME: &str = "subsonic-tui";
const SALT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SALT_LEN: usize = 6;
const ALBUM_LIST_SIZE: &str = "50";
const COVER_ART_SIZE: &str = "300";

pub struct SubsonicClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl SubsonicClient {
    pub fn new(config: &ServerConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("subsonic-tui/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url: Self::parse_base_url(&config.url)?,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Accepts a bare host as well as a full URL, with or without a path prefix.
    fn parse_base_url(raw: &str) -> CatalogResult<Url> {
        let trimmed = raw.trim().trim_end_matches('/');
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        Ok(Url::parse(&format!("{with_scheme}/"))?)
    }

    fn make_salt() -> String {
        let mut rng = rand::thread_rng();
        (0..SALT_LEN)
            .map(|_| SALT_CHARSET[rng.gen_range(0..SALT_CHARSET.len())] as char)
            .collect()
    }

    fn auth_params(&self) -> [(&'static str, String); 6] {
        let salt = Self::make_salt();
        let token = format!("{:x}", md5::compute(format!("{}{}", self.password, salt)));
        [
            ("u", self.username.clone()),
            ("t", token),
            ("s", salt),
            ("v", API_VERSION.to_string()),
            ("c", CLIENT_NAME.to_string()),
            ("f", "json".to_string()),
        ]
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> CatalogResult<Url> {
        let mut url = self.base_url.join(&format!("rest/{endpoint}"))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in self.auth_params() {
                query.append_pair(key, &value);
            }
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn request(&self, endpoint: &str, params: &[(&str, &str)]) -> CatalogResult<ResponseBody> {
        log_api_request!(endpoint);
        let result = self.send(endpoint, params).await;
        log_api_result!(endpoint, result);
        result
    }

    async fn send(&self, endpoint: &str, params: &[(&str, &str)]) -> CatalogResult<ResponseBody> {
        let url = self.endpoint_url(endpoint, params)?;
        let bytes = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        envelope.response.into_result()
    }

    async fn scrobble(&self, track_id: &str, submission: bool) -> CatalogResult<()> {
        let time = chrono::Utc::now().timestamp_millis().to_string();
        let submission = if submission { "true" } else { "false" };
        self.request(
            "scrobble",
            &[("id", track_id), ("time", &time), ("submission", submission)],
        )
        .await?;
        Ok(())
    }
}

fn search_params<'a>(kind: SearchKind, query: &'a str, size: &'a str, offset: &'a str) -> Vec<(&'static str, &'a str)> {
    let slots = [
        (SearchKind::Artists, "artistCount", "artistOffset"),
        (SearchKind::Albums, "albumCount", "albumOffset"),
        (SearchKind::Songs, "songCount", "songOffset"),
    ];
    let mut params = vec![("query", query)];
    for (slot, count_key, offset_key) in slots {
        if slot == kind {
            params.push((count_key, size));
            params.push((offset_key, offset));
        } else {
            params.push((count_key, "0"));
            params.push((offset_key, "0"));
        }
    }
    params
}

#[async_trait]
impl CatalogClient for SubsonicClient {
    async fn ping(&self) -> CatalogResult<()> {
        self.request("ping", &[]).await?;
        tracing::info!(user = %self.username, server = %self.base_url, "Connected to server");
        Ok(())
    }

    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> CatalogResult<SearchResults> {
        let size = SEARCH_PAGE_SIZE.to_string();
        let offset = (page as usize * SEARCH_PAGE_SIZE).to_string();
        let params = search_params(kind, query, &size, &offset);

        let found = self.request("search3", &params).await?.search_result3.unwrap_or_default();
        Ok(match kind {
            SearchKind::Songs => SearchResults::Songs(convert(found.song)),
            SearchKind::Albums => SearchResults::Albums(convert(found.album)),
            SearchKind::Artists => SearchResults::Artists(convert(found.artist)),
        })
    }

    async fn get_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>> {
        let body = self.request("getPlaylists", &[]).await?;
        Ok(convert(body.playlists.unwrap_or_default().playlist))
    }

    async fn get_playlist(&self, id: &str) -> CatalogResult<Vec<Track>> {
        let body = self.request("getPlaylist", &[("id", id)]).await?;
        Ok(convert(body.playlist.unwrap_or_default().entry))
    }

    async fn get_album(&self, id: &str) -> CatalogResult<Vec<Track>> {
        let body = self.request("getAlbum", &[("id", id)]).await?;
        Ok(convert(body.album.unwrap_or_default().song))
    }

    async fn get_artist_albums(&self, id: &str) -> CatalogResult<Vec<Album>> {
        let body = self.request("getArtist", &[("id", id)]).await?;
        Ok(convert(body.artist.unwrap_or_default().album))
    }

    async fn get_album_list(&self, kind: AlbumListKind) -> CatalogResult<Vec<Album>> {
        let body = self
            .request("getAlbumList2", &[("type", kind.as_param()), ("size", ALBUM_LIST_SIZE)])
            .await?;
        Ok(convert(body.album_list2.unwrap_or_default().album))
    }

    async fn get_starred(&self) -> CatalogResult<Starred> {
        let body = self.request("getStarred2", &[]).await?;
        Ok(body.starred2.unwrap_or_default().into())
    }

    async fn get_play_queue(&self) -> CatalogResult<PlayQueue> {
        let body = self.request("getPlayQueue", &[]).await?;
        Ok(body.play_queue.unwrap_or_default().into())
    }

    fn stream_url(&self, track_id: &str) -> CatalogResult<String> {
        let url = self.endpoint_url("stream", &[("id", track_id), ("maxBitRate", "0")])?;
        Ok(url.into())
    }

    async fn report_now_playing(&self, track_id: &str) -> CatalogResult<()> {
        self.scrobble(track_id, false).await
    }

    async fn report_final(&self, track_id: &str) -> CatalogResult<()> {
        self.scrobble(track_id, true).await
    }

    async fn star(&self, id: &str, kind: FavoriteKind) -> CatalogResult<()> {
        self.request("star", &[(kind.id_param(), id)]).await?;
        Ok(())
    }

    async fn unstar(&self, id: &str, kind: FavoriteKind) -> CatalogResult<()> {
        self.request("unstar", &[(kind.id_param(), id)]).await?;
        Ok(())
    }

    async fn fetch_cover_art(&self, cover_id: &str) -> CatalogResult<Vec<u8>> {
        log_api_request!("getCoverArt", cover_id);
        let url = self.endpoint_url("getCoverArt", &[("id", cover_id), ("size", COVER_ART_SIZE)])?;
        let response = self.http.get(url).send().await?.error_for_status()?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        let bytes = response.bytes().await?;

        // Errors come back as a JSON envelope instead of image data.
        if is_json {
            let envelope: Envelope = serde_json::from_slice(&bytes)?;
            envelope.response.into_result()?;
            return Err(CatalogError::Api {
                code: 0,
                message: "server returned no image".to_string(),
            });
        }
        Ok(bytes.to_vec())
    }
}
