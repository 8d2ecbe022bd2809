//! Navigation-related controller methods (library, playlists, search)

use super::{AppController, AppEvent};
use crate::error::CatalogResult;
use crate::model::{ActiveSection, Album, PlayQueue, PlaylistSummary, SearchKind, SearchResults, Starred, Track};

impl AppController {
    pub(crate) fn perform_search(&mut self) {
        let query = self.model.ui_state.search_query.trim().to_string();
        if query.is_empty() {
            return;
        }
        let kind = self.model.ui_state.search_kind;
        tracing::debug!(query = %query, ?kind, "Performing search");
        self.model.set_content_loading(true);
        self.request_search_page(kind, query, 0);
    }

    /// Fetch the next page when the selection nears the end of a search list.
    pub(crate) fn load_more_if_needed(&mut self) {
        if let Some((kind, query, page)) = self.model.should_load_more() {
            tracing::debug!(query = %query, page, "Loading next search page");
            self.model.set_loading_more(true);
            self.request_search_page(kind, query, page);
        }
    }

    fn request_search_page(&self, kind: SearchKind, query: String, page: u32) {
        let catalog = self.catalog.clone();
        self.spawn_event(async move {
            let result = catalog.search(kind, &query, page).await;
            AppEvent::SearchResult {
                kind,
                query,
                page,
                result,
            }
        });
    }

    pub(crate) fn on_search_result(
        &mut self,
        kind: SearchKind,
        query: String,
        page: u32,
        result: CatalogResult<SearchResults>,
    ) {
        let results = match result {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(query = %query, page, error = %e, "Search failed");
                self.model.set_content_loading(false);
                self.model.set_loading_more(false);
                self.model.set_error(Self::format_error(&e));
                return;
            }
        };

        tracing::info!(query = %query, ?kind, page, count = results.len(), "Search completed");
        if page == 0 {
            self.model.set_search_results(query, results);
            self.model.set_active_section(ActiveSection::MainContent);
        } else if !self.model.append_search_page(kind, &query, page, results) {
            tracing::debug!(query = %query, page, "Dropping page for a search no longer shown");
        }
    }

    pub(crate) fn load_user_playlists(&self) {
        let catalog = self.catalog.clone();
        self.spawn_event(async move { AppEvent::PlaylistsResult(catalog.get_playlists().await) });
    }

    pub(crate) fn on_playlists_result(&mut self, result: CatalogResult<Vec<PlaylistSummary>>) {
        match result {
            Ok(playlists) => {
                tracing::info!(count = playlists.len(), "Playlists loaded");
                self.model.set_playlists(playlists);
            }
            Err(e) => self.model.set_error(Self::format_error(&e)),
        }
    }

    pub(crate) fn open_selected_playlist(&mut self) {
        let Some(playlist) = self.model.selected_playlist().cloned() else {
            return;
        };
        self.model.set_content_loading(true);
        let catalog = self.catalog.clone();
        self.spawn_event(async move {
            let result = catalog.get_playlist(&playlist.id).await;
            AppEvent::PlaylistResult {
                title: playlist.name,
                result,
            }
        });
    }

    pub(crate) fn open_selected_album_list(&mut self) {
        let Some(kind) = self.model.selected_album_list() else {
            return;
        };
        self.model.set_content_loading(true);
        let catalog = self.catalog.clone();
        self.spawn_event(async move {
            let result = catalog.get_album_list(kind).await;
            AppEvent::AlbumsResult {
                title: kind.label().to_string(),
                result,
            }
        });
    }

    pub(crate) fn open_album(&mut self, album_id: &str, title: String) {
        self.model.set_content_loading(true);
        let catalog = self.catalog.clone();
        let album_id = album_id.to_string();
        self.spawn_event(async move {
            let result = catalog.get_album(&album_id).await;
            AppEvent::PlaylistResult { title, result }
        });
    }

    pub(crate) fn open_artist(&mut self, artist_id: &str, title: String) {
        self.model.set_content_loading(true);
        let catalog = self.catalog.clone();
        let artist_id = artist_id.to_string();
        self.spawn_event(async move {
            let result = catalog.get_artist_albums(&artist_id).await;
            AppEvent::AlbumsResult { title, result }
        });
    }

    pub(crate) fn jump_to_album(&mut self) {
        let Some(track) = self.selected_track() else {
            return;
        };
        match &track.album_id {
            Some(album_id) => self.open_album(album_id, track.album.clone()),
            None => self.model.set_error("This song has no album to open.".to_string()),
        }
    }

    pub(crate) fn jump_to_artist(&mut self) {
        let Some(track) = self.selected_track() else {
            return;
        };
        match &track.artist_id {
            Some(artist_id) => self.open_artist(artist_id, track.artist.clone()),
            None => self.model.set_error("This song has no artist to open.".to_string()),
        }
    }

    pub(crate) fn on_tracks_result(&mut self, title: String, result: CatalogResult<Vec<Track>>) {
        match result {
            Ok(tracks) => {
                tracing::info!(title = %title, count = tracks.len(), "Tracks loaded");
                self.model.show_tracks(title, tracks);
                self.model.set_active_section(ActiveSection::MainContent);
            }
            Err(e) => {
                self.model.set_content_loading(false);
                self.model.set_error(Self::format_error(&e));
            }
        }
    }

    pub(crate) fn on_albums_result(&mut self, title: String, result: CatalogResult<Vec<Album>>) {
        match result {
            Ok(albums) => {
                tracing::info!(title = %title, count = albums.len(), "Albums loaded");
                self.model.show_albums(title, albums);
                self.model.set_active_section(ActiveSection::MainContent);
            }
            Err(e) => {
                self.model.set_content_loading(false);
                self.model.set_error(Self::format_error(&e));
            }
        }
    }

    pub(crate) fn refresh_favorites(&self, show: bool) {
        let catalog = self.catalog.clone();
        self.spawn_event(async move {
            let result = catalog.get_starred().await;
            AppEvent::FavoritesResult { show, result }
        });
    }

    pub(crate) fn on_favorites_result(&mut self, show: bool, result: CatalogResult<Starred>) {
        let starred = match result {
            Ok(starred) => starred,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load starred items");
                if show {
                    self.model.set_error(Self::format_error(&e));
                }
                return;
            }
        };

        let ids: Vec<String> = starred.ids().map(str::to_string).collect();
        self.model.session.favorites_mut().replace_all(ids);
        tracing::info!(count = self.model.session.favorites().len(), "Starred set refreshed");

        if show {
            self.model.show_tracks("Starred songs".to_string(), starred.songs);
            self.model.set_active_section(ActiveSection::MainContent);
        }
    }

    pub(crate) fn restore_play_queue(&self) {
        let catalog = self.catalog.clone();
        self.spawn_event(async move { AppEvent::PlayQueueResult(catalog.get_play_queue().await) });
    }

    pub(crate) fn on_play_queue_result(&mut self, result: CatalogResult<PlayQueue>) {
        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore the saved play queue");
                return;
            }
        };
        if saved.tracks.is_empty() || !self.model.session.queue().is_empty() {
            return;
        }

        let start = saved.current_index();
        tracing::info!(count = saved.tracks.len(), start, "Restoring saved play queue");
        self.model.session.queue_mut().set_queue(saved.tracks, start);
        // Without a player the load happens once it reports ready.
        if self.player.is_some() {
            let effects = self.model.session.load_current();
            self.run_effects(effects);
        }
    }
}
