//! Session effects and playback commands

use std::sync::Arc;

use super::{AppController, AppEvent, BackgroundResult, UserCommand};
use crate::catalog::CatalogClient;
use crate::error::{CatalogResult, LoadError, PlayerError, PlayerResult};
use crate::model::{FavoriteKind, SelectedItem, SessionEffect, Track};
use crate::notify::{NOTIFICATION_TITLE, now_playing_body};
use crate::player::PlayerAdapter;

/// Resolve the stream, hand it to the player and unpause.
async fn load_track(
    catalog: &dyn CatalogClient,
    player: &dyn PlayerAdapter,
    track: &Track,
) -> Result<(), LoadError> {
    let url = catalog.stream_url(&track.id)?;
    player.load(&url).await?;
    player.set_paused(false).await?;
    Ok(())
}

impl AppController {
    pub(crate) fn run_effects(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::Load { track } => {
                let Some(player) = self.player.clone() else {
                    self.on_background_result(BackgroundResult::TrackLoaded {
                        track_id: track.id,
                        result: Err(PlayerError::NotReady.into()),
                    });
                    return;
                };
                tracing::info!(track_id = %track.id, title = %track.title, "Loading track");
                let catalog = self.catalog.clone();
                self.spawn_event(async move {
                    let result = load_track(catalog.as_ref(), player.as_ref(), &track).await;
                    if result.is_ok()
                        && let Err(e) = catalog.report_now_playing(&track.id).await
                    {
                        tracing::warn!(track_id = %track.id, error = %e, "Now playing report failed");
                    }
                    AppEvent::Background(BackgroundResult::TrackLoaded {
                        track_id: track.id,
                        result,
                    })
                });
            }
            SessionEffect::ReportFinal { track_id } => {
                tracing::info!(track_id = %track_id, "Submitting scrobble");
                let catalog = self.catalog.clone();
                self.spawn_event(async move {
                    let result = catalog.report_final(&track_id).await;
                    AppEvent::Background(BackgroundResult::ScrobbleSubmitted { track_id, result })
                });
            }
            SessionEffect::FetchCoverArt { track } => {
                // Nothing is announced for a load the player never received.
                if !self.notifier.enabled() || self.player.is_none() {
                    return;
                }
                let catalog = self.catalog.clone();
                let cover_id = track.cover_art.clone().unwrap_or_else(|| track.id.clone());
                self.spawn_event(async move {
                    let image = catalog.fetch_cover_art(&cover_id).await;
                    AppEvent::Background(BackgroundResult::CoverArt {
                        track_id: track.id,
                        image,
                    })
                });
            }
        }
    }

    pub(crate) fn on_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::TrackLoaded { track_id, result } => {
                let succeeded = result.is_ok();
                if let Err(e) = &result {
                    tracing::error!(track_id = %track_id, error = %e, "Track load failed");
                    if self.model.session.is_current_track(&track_id) {
                        self.model.set_error(Self::format_load_error(e));
                    }
                }
                self.model.session.on_track_loaded(&track_id, succeeded);
            }
            BackgroundResult::ScrobbleSubmitted { track_id, result } => match result {
                Ok(()) => tracing::debug!(track_id = %track_id, "Scrobble submitted"),
                Err(e) => tracing::warn!(track_id = %track_id, error = %e, "Scrobble failed"),
            },
            BackgroundResult::StarToggled {
                id,
                was_starred,
                result,
            } => {
                if let Err(e) = result {
                    tracing::warn!(id = %id, error = %e, "Star toggle failed, reverting");
                    self.model.session.favorites_mut().rollback(&id, was_starred);
                    self.model.set_error(Self::format_error(&e));
                }
            }
            BackgroundResult::CoverArt { track_id, image } => self.on_cover_art(track_id, image),
            BackgroundResult::PlayerCommand { action, result } => {
                if let Err(e) = result {
                    tracing::warn!(action, error = %e, "Player command failed");
                }
            }
        }
    }

    fn on_cover_art(&self, track_id: String, image: CatalogResult<Vec<u8>>) {
        let Some(track) = self.model.session.current_track().filter(|t| t.id == track_id) else {
            tracing::debug!(track_id = %track_id, "Discarding cover art for a track no longer playing");
            return;
        };
        let image = match image {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!(track_id = %track_id, error = %e, "No cover art");
                None
            }
        };
        let body = now_playing_body(&track.title, &track.artist);
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            notifier.notify(NOTIFICATION_TITLE, &body, image).await;
        });
    }

    pub(crate) fn handle_command(&mut self, command: UserCommand) {
        tracing::debug!(?command, "Command");
        match command {
            UserCommand::TogglePause => {
                let paused = !self.model.session.status().paused;
                self.player_command("pause", move |player| async move { player.set_paused(paused).await });
            }
            UserCommand::NextTrack => {
                let effects = self.model.session.play_next();
                self.run_effects(effects);
            }
            UserCommand::PreviousTrack => {
                let effects = self.model.session.play_previous();
                self.run_effects(effects);
            }
            UserCommand::RestartTrack => {
                self.player_command("restart", |player| async move { player.seek_absolute(0.0).await });
            }
            UserCommand::SeekBackward => {
                let step = -self.settings.seek_step_secs;
                self.player_command("seek", move |player| async move { player.seek_relative(step).await });
            }
            UserCommand::SeekForward => {
                let step = self.settings.seek_step_secs;
                self.player_command("seek", move |player| async move { player.seek_relative(step).await });
            }
            UserCommand::VolumeUp => self.change_volume(self.settings.volume_step),
            UserCommand::VolumeDown => self.change_volume(-self.settings.volume_step),
            UserCommand::ShuffleQueue => {
                if self.model.session.queue_mut().shuffle() {
                    tracing::info!(len = self.model.session.queue().len(), "Queue shuffled");
                    self.model.set_queue_selection(0);
                }
            }
            UserCommand::CycleLoopMode => {
                let mode = self.model.session.cycle_loop_mode();
                tracing::info!(?mode, "Loop mode changed");
            }
            UserCommand::ToggleFavorite => self.toggle_favorite(),
            UserCommand::ShowFavorites => self.refresh_favorites(true),
            UserCommand::ToggleQueueView => self.model.toggle_queue_view(),
            UserCommand::InsertNext => {
                if let Some(track) = self.selected_track() {
                    let index = self.model.session.queue_mut().insert_next(track);
                    tracing::debug!(index, "Track queued next");
                }
            }
            UserCommand::Append => {
                if let Some(track) = self.selected_track() {
                    self.model.session.queue_mut().append(track);
                }
            }
            UserCommand::RemoveFromQueue => {
                if let Some(index) = self.model.selected_queue_index() {
                    if self.model.session.queue_mut().remove_at(index).is_none() {
                        tracing::debug!(index, "Refusing to remove the playing track");
                    }
                    self.model.set_queue_selection(index);
                }
            }
            UserCommand::ClearQueue => {
                self.model.session.queue_mut().clear();
                self.model.set_queue_selection(0);
            }
            UserCommand::MoveUp => {
                if let Some(index) = self.model.selected_queue_index()
                    && self.model.session.queue_mut().move_up(index)
                {
                    self.model.set_queue_selection(index - 1);
                }
            }
            UserCommand::MoveDown => {
                if let Some(index) = self.model.selected_queue_index()
                    && self.model.session.queue_mut().move_down(index)
                {
                    self.model.set_queue_selection(index + 1);
                }
            }
            UserCommand::JumpToAlbum => self.jump_to_album(),
            UserCommand::JumpToArtist => self.jump_to_artist(),
            UserCommand::ShowHelp => self.model.show_help_popup(),
            UserCommand::Quit => self.model.set_should_quit(true),
        }
    }

    /// Enter on a content row.
    pub(crate) fn activate_selected(&mut self) {
        let Some(item) = self.model.get_selected_content_item() else {
            return;
        };
        match item {
            SelectedItem::Track(_) => {
                if let Some((tracks, index)) = self.model.selected_track_list() {
                    let effects = self.model.session.play_list(tracks, index);
                    self.run_effects(effects);
                }
            }
            SelectedItem::QueueEntry { index, .. } => {
                let effects = self.model.session.play_index(index);
                self.run_effects(effects);
            }
            SelectedItem::Album(album) => self.open_album(&album.id, album.name),
            SelectedItem::Artist(artist) => self.open_artist(&artist.id, artist.name),
        }
    }

    /// The highlighted track, falling back to the playing one.
    pub(crate) fn selected_track(&self) -> Option<Track> {
        self.model
            .get_selected_content_item()
            .and_then(|item| item.track().cloned())
            .or_else(|| self.model.session.current_track().cloned())
    }

    fn change_volume(&mut self, delta: f64) {
        let volume = (self.model.session.status().volume + delta).clamp(0.0, 100.0);
        self.player_command("volume", move |player| async move { player.set_volume(volume).await });
    }

    /// Star or unstar the highlighted item, optimistically.
    fn toggle_favorite(&mut self) {
        let target = match self.model.get_selected_content_item() {
            Some(SelectedItem::Album(album)) => Some((album.id, FavoriteKind::Album)),
            Some(SelectedItem::Artist(artist)) => Some((artist.id, FavoriteKind::Artist)),
            Some(SelectedItem::Track(track)) | Some(SelectedItem::QueueEntry { track, .. }) => {
                Some((track.id, FavoriteKind::Song))
            }
            None => self
                .model
                .session
                .current_track()
                .map(|t| (t.id.clone(), FavoriteKind::Song)),
        };
        let Some((id, kind)) = target else {
            return;
        };

        let was_starred = self.model.session.favorites_mut().toggle(&id);
        tracing::info!(id = %id, ?kind, starred = !was_starred, "Toggling favorite");

        let catalog = self.catalog.clone();
        self.spawn_event(async move {
            let result = if was_starred {
                catalog.unstar(&id, kind).await
            } else {
                catalog.star(&id, kind).await
            };
            AppEvent::Background(BackgroundResult::StarToggled {
                id,
                was_starred,
                result,
            })
        });
    }

    /// Fire a player call in the background; a no-op until the player is up.
    fn player_command<F, Fut>(&self, action: &'static str, call: F)
    where
        F: FnOnce(Arc<dyn PlayerAdapter>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = PlayerResult<()>> + Send + 'static,
    {
        let Some(player) = self.player.clone() else {
            tracing::debug!(action, "Player not ready, command ignored");
            return;
        };
        self.spawn_event(async move {
            let result = call(player).await;
            AppEvent::Background(BackgroundResult::PlayerCommand { action, result })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeCatalog, Harness};
    use super::*;
    use crate::model::test_support::track;

    #[tokio::test]
    async fn playing_a_list_streams_unpauses_and_reports_now_playing() {
        let mut harness = Harness::new(FakeCatalog::default()).with_player().await;
        harness.controller.model.show_tracks("Album".to_string(), vec![track("a"), track("b")]);
        harness.controller.model.content_move_down();

        harness.controller.activate_selected();
        assert!(harness.controller.model.session.is_load_pending());
        harness.pump_n(2).await;

        let player_calls = harness.player.calls();
        assert!(player_calls.contains(&"load http://stream/b".to_string()));
        assert!(player_calls.contains(&"pause false".to_string()));
        assert!(harness.catalog.calls().contains(&"nowPlaying b".to_string()));
        assert_eq!(harness.controller.model.session.queue().current_index(), Some(1));
    }

    #[tokio::test]
    async fn loads_before_player_ready_are_skipped() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.model.show_tracks("Album".to_string(), vec![track("a")]);

        harness.controller.activate_selected();
        harness.controller.handle_command(UserCommand::TogglePause);

        assert!(!harness.controller.model.session.is_load_pending());
        assert!(harness.controller.model.has_error());
        assert_eq!(harness.controller.model.session.current_track().map(|t| t.id.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn failed_star_is_rolled_back_and_reported() {
        let catalog = FakeCatalog {
            fail_star: true,
            ..Default::default()
        };
        let mut harness = Harness::new(catalog);
        harness.controller.model.show_tracks("Songs".to_string(), vec![track("a")]);

        harness.controller.handle_command(UserCommand::ToggleFavorite);
        assert!(harness.controller.model.session.favorites().is_starred("a"));

        harness.pump().await;
        assert!(!harness.controller.model.session.favorites().is_starred("a"));
        assert!(harness.controller.model.has_error());
    }

    #[tokio::test]
    async fn cover_art_for_a_replaced_track_is_dropped() {
        let mut harness = Harness::new(FakeCatalog::default()).with_player().await;
        let effects = harness.controller.model.session.play_list(vec![track("a"), track("b")], 0);
        harness.controller.run_effects(effects);
        harness.pump_n(2).await;
        tokio::task::yield_now().await;
        assert_eq!(harness.notifier.sent.lock().map(|s| s.len()).unwrap_or(0), 1);

        harness.controller.handle_event(AppEvent::Background(BackgroundResult::CoverArt {
            track_id: "zzz".to_string(),
            image: Ok(vec![]),
        }));
        tokio::task::yield_now().await;
        assert_eq!(harness.notifier.sent.lock().map(|s| s.len()).unwrap_or(0), 1);
    }

    #[tokio::test]
    async fn queue_moves_keep_the_selection_on_the_moved_entry() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness
            .controller
            .model
            .session
            .queue_mut()
            .set_queue(vec![track("a"), track("b"), track("c")], 0);
        harness.controller.model.toggle_queue_view();
        harness.controller.model.set_queue_selection(1);

        harness.controller.handle_command(UserCommand::MoveDown);
        assert_eq!(harness.controller.model.selected_queue_index(), Some(2));
        assert_eq!(harness.controller.model.session.queue().get(2).map(|t| t.id.as_str()), Some("b"));

        harness.controller.handle_command(UserCommand::MoveDown);
        assert_eq!(harness.controller.model.selected_queue_index(), Some(2));
    }

    #[tokio::test]
    async fn removing_the_playing_entry_is_refused() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness
            .controller
            .model
            .session
            .queue_mut()
            .set_queue(vec![track("a"), track("b")], 1);
        harness.controller.model.toggle_queue_view();

        harness.controller.handle_command(UserCommand::RemoveFromQueue);
        assert_eq!(harness.controller.model.session.queue().len(), 2);

        harness.controller.model.set_queue_selection(0);
        harness.controller.handle_command(UserCommand::RemoveFromQueue);
        assert_eq!(harness.controller.model.session.queue().len(), 1);
        assert_eq!(harness.controller.model.session.queue().current_index(), Some(0));
    }
}
