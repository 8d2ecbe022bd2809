//! Status polling and player startup
//!
//! There is exactly one poll chain: `start` schedules the first poll and every
//! `StatusTick` schedules the next one until the app quits.

use std::sync::Arc;

use super::{AppController, AppEvent, BackgroundResult};
use crate::error::PlayerResult;
use crate::model::PlaybackStatus;
use crate::player::PlayerAdapter;

impl AppController {
    pub(crate) fn schedule_status_poll(&self) {
        let player = self.player.clone();
        let interval = self.settings.poll_interval();

        self.spawn_event(async move {
            tokio::time::sleep(interval).await;
            let Some(player) = player else {
                return AppEvent::StatusTick(None);
            };
            match player.status().await {
                Ok(status) => AppEvent::StatusTick(Some(status)),
                Err(e) => {
                    tracing::debug!(error = %e, "Status poll failed");
                    AppEvent::StatusTick(None)
                }
            }
        });
    }

    pub(crate) fn on_status_tick(&mut self, status: Option<PlaybackStatus>) {
        if let Some(status) = status {
            tracing::trace!(
                title = %status.title,
                position = status.position_secs,
                duration = status.duration_secs,
                paused = status.paused,
                "Status tick"
            );
            let effects = self.model.session.on_status(status);
            self.run_effects(effects);
        }

        if !self.model.should_quit() {
            self.schedule_status_poll();
        }
    }

    pub(crate) fn on_player_ready(&mut self, result: PlayerResult<Arc<dyn PlayerAdapter>>) {
        let player = match result {
            Ok(player) => player,
            Err(e) => {
                tracing::error!(error = %e, "Player failed to start");
                self.model.set_error(Self::format_player_error(&e));
                return;
            }
        };
        tracing::info!("Player ready");
        self.player = Some(player.clone());

        // The session sequences tracks itself; mpv must not loop or shuffle on its own.
        self.spawn_event(async move {
            let result = match player.set_loop(false).await {
                Ok(()) => player.set_shuffle(false).await,
                Err(e) => Err(e),
            };
            AppEvent::Background(BackgroundResult::PlayerCommand {
                action: "reset loop/shuffle",
                result,
            })
        });

        // A track chosen before the player came up still needs loading.
        let session = &self.model.session;
        if session.current_track().is_some() && !session.has_loaded() && !session.is_load_pending() {
            let effects = self.model.session.load_current();
            self.run_effects(effects);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeCatalog, Harness};
    use super::*;
    use crate::model::test_support::track;

    fn playing(position: f64, duration: f64) -> PlaybackStatus {
        PlaybackStatus {
            title: "Song".to_string(),
            position_secs: position,
            duration_secs: duration,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn player_ready_disables_mpv_loop_and_shuffle() {
        let harness = Harness::new(FakeCatalog::default()).with_player().await;
        assert_eq!(harness.player.calls(), vec!["loop false", "shuffle false"]);
    }

    #[tokio::test]
    async fn ended_track_loads_the_next_one() {
        let mut harness = Harness::new(FakeCatalog::default()).with_player().await;
        let effects = harness.controller.model.session.play_list(vec![track("a"), track("b")], 0);
        harness.controller.run_effects(effects);
        // load result + cover art
        harness.pump_n(2).await;

        harness.controller.handle_event(AppEvent::StatusTick(Some(playing(10.0, 200.0))));
        harness.controller.handle_event(AppEvent::StatusTick(Some(playing(199.8, 200.0))));
        // final scrobble of a, load of b, cover art of b
        harness.pump_n(3).await;

        assert_eq!(harness.controller.model.session.current_track().map(|t| t.id.as_str()), Some("b"));
        assert!(harness.player.calls().contains(&"load http://stream/b".to_string()));
    }

    #[tokio::test]
    async fn track_chosen_before_player_ready_plays_once_it_is() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness
            .controller
            .model
            .show_tracks("Album".to_string(), vec![track("a"), track("b"), track("c")]);
        harness.controller.activate_selected();
        assert!(!harness.controller.model.session.has_loaded());

        let mut harness = harness.with_player().await;
        // load result and cover art of a
        harness.pump_n(2).await;
        harness.controller.handle_event(AppEvent::StatusTick(Some(PlaybackStatus::idle())));
        harness.controller.handle_event(AppEvent::StatusTick(Some(playing(1.0, 200.0))));

        assert_eq!(harness.controller.model.session.current_track().map(|t| t.id.as_str()), Some("a"));
        let loads: Vec<String> = harness
            .player
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("load"))
            .collect();
        assert_eq!(loads, vec!["load http://stream/a"]);
    }

    #[tokio::test]
    async fn status_ticks_without_player_are_ignored() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.handle_event(AppEvent::StatusTick(None));
        assert!(harness.controller.model.session.status().title.is_empty());
    }
}
