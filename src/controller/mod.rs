//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that owns the model,
//! dispatches every event through one `match`, and runs catalog and player
//! work as detached tasks. It is organized into submodules by responsibility:
//!
//! - `event`: The event and command types
//! - `input`: Key event handling
//! - `playback`: Session effects and playback commands
//! - `navigation`: Library/playlist/search navigation
//! - `status`: Status polling and player startup

mod event;
mod input;
mod navigation;
mod playback;
mod status;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

pub use event::{AppEvent, BackgroundResult, UserCommand};

use crate::catalog::CatalogClient;
use crate::config::PlayerConfig;
use crate::error::{CatalogError, LoadError, PlayerError};
use crate::model::AppModel;
use crate::notify::NotificationSink;
use crate::player::PlayerAdapter;

/// Subsonic error code for a missing resource
const NOT_FOUND_CODE: i32 = 70;

pub struct AppController {
    pub(crate) model: AppModel,
    catalog: Arc<dyn CatalogClient>,
    player: Option<Arc<dyn PlayerAdapter>>,
    notifier: Arc<dyn NotificationSink>,
    events: UnboundedSender<AppEvent>,
    settings: PlayerConfig,
}

impl AppController {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        notifier: Arc<dyn NotificationSink>,
        events: UnboundedSender<AppEvent>,
        settings: PlayerConfig,
    ) -> Self {
        Self {
            model: AppModel::new(),
            catalog,
            player: None,
            notifier,
            events,
            settings,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn should_quit(&self) -> bool {
        self.model.should_quit()
    }

    /// Kick off startup loads and the status poll chain.
    pub fn start(&self) {
        self.load_user_playlists();
        self.refresh_favorites(false);
        self.restore_play_queue();
        self.schedule_status_poll();
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        self.model.auto_clear_old_errors();

        match event {
            AppEvent::Key(key) => self.handle_key_event(key),
            AppEvent::Command(command) => self.handle_command(command),
            AppEvent::StatusTick(status) => self.on_status_tick(status),
            AppEvent::SearchResult {
                kind,
                query,
                page,
                result,
            } => self.on_search_result(kind, query, page, result),
            AppEvent::PlaylistResult { title, result } => self.on_tracks_result(title, result),
            AppEvent::PlaylistsResult(result) => self.on_playlists_result(result),
            AppEvent::AlbumsResult { title, result } => self.on_albums_result(title, result),
            AppEvent::FavoritesResult { show, result } => self.on_favorites_result(show, result),
            AppEvent::PlayQueueResult(result) => self.on_play_queue_result(result),
            AppEvent::PlayerReady(result) => self.on_player_ready(result),
            AppEvent::Background(result) => self.on_background_result(result),
        }
    }

    /// Stop the player process. In-flight tasks are abandoned.
    pub async fn shutdown(&mut self) {
        if let Some(player) = self.player.take() {
            player.shutdown().await;
        }
    }

    /// Run `task` detached and feed its result back into the event loop.
    pub(crate) fn spawn_event<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = task.await;
            // A closed channel means the app is shutting down.
            let _ = events.send(event);
        });
    }

    pub(crate) fn format_error(error: &CatalogError) -> String {
        match error {
            CatalogError::Http(e) if e.is_timeout() => "Server did not respond in time.".to_string(),
            CatalogError::Http(e) if e.is_connect() => {
                "Cannot reach the server. Check the URL and your connection.".to_string()
            }
            CatalogError::Auth(_) => "Authentication failed. Check your username and password.".to_string(),
            CatalogError::Api {
                code: NOT_FOUND_CODE, ..
            } => "Not found on the server.".to_string(),
            CatalogError::Api { message, .. } => format!("Server error: {message}"),
            other => format!("Error: {other}"),
        }
    }

    pub(crate) fn format_player_error(error: &PlayerError) -> String {
        match error {
            PlayerError::NotReady => "Player is still starting. Try again in a moment.".to_string(),
            PlayerError::Spawn(_) => "Could not start mpv. Is it installed?".to_string(),
            PlayerError::Timeout => "mpv did not respond.".to_string(),
            other => format!("Playback error: {other}"),
        }
    }

    pub(crate) fn format_load_error(error: &LoadError) -> String {
        match error {
            LoadError::Catalog(e) => Self::format_error(e),
            LoadError::Player(e) => Self::format_player_error(e),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory collaborators for controller tests

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::error::{CatalogResult, PlayerResult};
    use crate::model::{
        Album, AlbumListKind, FavoriteKind, PlayQueue, PlaybackStatus, PlaylistSummary, SearchKind, SearchResults,
        Starred, Track,
    };

    #[derive(Default)]
    pub struct FakeCatalog {
        pub calls: Mutex<Vec<String>>,
        pub search_results: Mutex<HashMap<u32, Vec<Track>>>,
        pub album_tracks: Mutex<Vec<Track>>,
        pub fail_star: bool,
    }

    impl FakeCatalog {
        fn record(&self, call: String) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn ping(&self) -> CatalogResult<()> {
            Ok(())
        }

        async fn search(&self, kind: SearchKind, query: &str, page: u32) -> CatalogResult<SearchResults> {
            self.record(format!("search {kind:?} {query} {page}"));
            let songs = self
                .search_results
                .lock()
                .ok()
                .and_then(|r| r.get(&page).cloned())
                .unwrap_or_default();
            Ok(SearchResults::Songs(songs))
        }

        async fn get_playlists(&self) -> CatalogResult<Vec<PlaylistSummary>> {
            self.record("getPlaylists".to_string());
            Ok(Vec::new())
        }

        async fn get_playlist(&self, id: &str) -> CatalogResult<Vec<Track>> {
            self.record(format!("getPlaylist {id}"));
            Ok(Vec::new())
        }

        async fn get_album(&self, id: &str) -> CatalogResult<Vec<Track>> {
            self.record(format!("getAlbum {id}"));
            Ok(self.album_tracks.lock().map(|t| t.clone()).unwrap_or_default())
        }

        async fn get_artist_albums(&self, id: &str) -> CatalogResult<Vec<Album>> {
            self.record(format!("getArtist {id}"));
            Ok(Vec::new())
        }

        async fn get_album_list(&self, kind: AlbumListKind) -> CatalogResult<Vec<Album>> {
            self.record(format!("getAlbumList2 {}", kind.as_param()));
            Ok(Vec::new())
        }

        async fn get_starred(&self) -> CatalogResult<Starred> {
            self.record("getStarred2".to_string());
            Ok(Starred::default())
        }

        async fn get_play_queue(&self) -> CatalogResult<PlayQueue> {
            self.record("getPlayQueue".to_string());
            Ok(PlayQueue::default())
        }

        fn stream_url(&self, track_id: &str) -> CatalogResult<String> {
            Ok(format!("http://stream/{track_id}"))
        }

        async fn report_now_playing(&self, track_id: &str) -> CatalogResult<()> {
            self.record(format!("nowPlaying {track_id}"));
            Ok(())
        }

        async fn report_final(&self, track_id: &str) -> CatalogResult<()> {
            self.record(format!("scrobble {track_id}"));
            Ok(())
        }

        async fn star(&self, id: &str, _kind: FavoriteKind) -> CatalogResult<()> {
            self.record(format!("star {id}"));
            if self.fail_star {
                return Err(CatalogError::Api {
                    code: 0,
                    message: "nope".to_string(),
                });
            }
            Ok(())
        }

        async fn unstar(&self, id: &str, _kind: FavoriteKind) -> CatalogResult<()> {
            self.record(format!("unstar {id}"));
            Ok(())
        }

        async fn fetch_cover_art(&self, cover_id: &str) -> CatalogResult<Vec<u8>> {
            self.record(format!("cover {cover_id}"));
            Ok(vec![1, 2, 3])
        }
    }

    #[derive(Default)]
    pub struct FakePlayer {
        pub calls: Mutex<Vec<String>>,
    }

    impl FakePlayer {
        fn record(&self, call: String) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl PlayerAdapter for FakePlayer {
        async fn load(&self, url: &str) -> PlayerResult<()> {
            self.record(format!("load {url}"));
            Ok(())
        }

        async fn set_paused(&self, paused: bool) -> PlayerResult<()> {
            self.record(format!("pause {paused}"));
            Ok(())
        }

        async fn set_loop(&self, enabled: bool) -> PlayerResult<()> {
            self.record(format!("loop {enabled}"));
            Ok(())
        }

        async fn set_shuffle(&self, enabled: bool) -> PlayerResult<()> {
            self.record(format!("shuffle {enabled}"));
            Ok(())
        }

        async fn seek_relative(&self, seconds: f64) -> PlayerResult<()> {
            self.record(format!("seek {seconds}"));
            Ok(())
        }

        async fn seek_absolute(&self, seconds: f64) -> PlayerResult<()> {
            self.record(format!("seek_to {seconds}"));
            Ok(())
        }

        async fn set_volume(&self, percent: f64) -> PlayerResult<()> {
            self.record(format!("volume {percent}"));
            Ok(())
        }

        async fn status(&self) -> PlayerResult<PlaybackStatus> {
            Ok(PlaybackStatus::idle())
        }

        async fn shutdown(&self) {
            self.record("shutdown".to_string());
        }
    }

    #[derive(Default)]
    pub struct FakeNotifier {
        pub sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for FakeNotifier {
        async fn notify(&self, _title: &str, body: &str, _image: Option<Vec<u8>>) {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(body.to_string());
            }
        }
    }

    pub struct Harness {
        pub controller: AppController,
        pub events: UnboundedReceiver<AppEvent>,
        pub catalog: Arc<FakeCatalog>,
        pub player: Arc<FakePlayer>,
        pub notifier: Arc<FakeNotifier>,
    }

    impl Harness {
        pub fn new(catalog: FakeCatalog) -> Self {
            let (tx, events) = mpsc::unbounded_channel();
            let catalog = Arc::new(catalog);
            let notifier = Arc::new(FakeNotifier::default());
            let settings = PlayerConfig {
                poll_interval_ms: 60_000,
                ..PlayerConfig::default()
            };
            let controller = AppController::new(catalog.clone(), notifier.clone(), tx, settings);
            Self {
                controller,
                events,
                catalog,
                player: Arc::new(FakePlayer::default()),
                notifier,
            }
        }

        /// Hand the fake player to the controller as if mpv had just come up.
        pub async fn with_player(mut self) -> Self {
            let player: Arc<dyn PlayerAdapter> = self.player.clone();
            self.controller.handle_event(AppEvent::PlayerReady(Ok(player)));
            // loop/shuffle reset
            self.pump().await;
            self
        }

        /// Wait for the next background event, skip status ticks, and handle it.
        pub async fn pump(&mut self) {
            loop {
                let event = tokio::time::timeout(Duration::from_secs(2), self.events.recv())
                    .await
                    .expect("event within timeout")
                    .expect("channel open");
                if matches!(event, AppEvent::StatusTick(_)) {
                    continue;
                }
                self.controller.handle_event(event);
                return;
            }
        }

        pub async fn pump_n(&mut self, count: usize) {
            for _ in 0..count {
                self.pump().await;
            }
        }
    }
}
