//! Playback session: queue, loop mode, last status, scrobble and favorites state
//!
//! Every method here is synchronous and side-effect free. Work that needs the
//! catalog or the player comes back as [`SessionEffect`] values for the
//! controller to run in the background.

use super::advance::{self, AdvanceDecision};
use super::content::Track;
use super::favorites::Favorites;
use super::playback::PlaybackStatus;
use super::queue::Queue;
use super::scrobble::ScrobbleTracker;
use super::types::LoopMode;

/// Idle polls tolerated after a successful load before end detection resumes
const LOAD_SETTLE_TICKS: u32 = 4;

/// Background work requested by a session transition
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEffect {
    /// Resolve the stream, load it replacing the current file, unpause, report now playing.
    Load { track: Track },
    /// Submit the one-time final scrobble.
    ReportFinal { track_id: String },
    /// Fetch artwork for the now-playing notification.
    FetchCoverArt { track: Track },
}

#[derive(Clone, Debug)]
struct PendingLoad {
    track_id: String,
    acknowledged: bool,
    idle_ticks: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    queue: Queue,
    loop_mode: LoopMode,
    status: PlaybackStatus,
    scrobble: ScrobbleTracker,
    favorites: Favorites,
    last_loaded_id: Option<String>,
    /// Set once the player has confirmed a load.
    loaded: bool,
    pending_load: Option<PendingLoad>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.next();
        self.loop_mode
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    #[cfg(test)]
    pub fn scrobble(&self) -> &ScrobbleTracker {
        &self.scrobble
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut Favorites {
        &mut self.favorites
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current_track()
    }

    /// Background results keyed to another track are stale and must be dropped.
    pub fn is_current_track(&self, track_id: &str) -> bool {
        self.current_track().is_some_and(|t| t.id == track_id)
    }

    pub fn is_load_pending(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the queue and start playing at `start_index`.
    pub fn play_list(&mut self, tracks: Vec<Track>, start_index: usize) -> Vec<SessionEffect> {
        self.queue.set_queue(tracks, start_index);
        self.load_current()
    }

    pub fn play_index(&mut self, index: usize) -> Vec<SessionEffect> {
        if self.queue.select(index).is_none() {
            return Vec::new();
        }
        self.load_current()
    }

    pub fn play_next(&mut self) -> Vec<SessionEffect> {
        if self.queue.advance().is_none() {
            return Vec::new();
        }
        self.load_current()
    }

    pub fn play_previous(&mut self) -> Vec<SessionEffect> {
        if self.queue.retreat().is_none() {
            return Vec::new();
        }
        self.load_current()
    }

    /// Load whatever the cursor points at.
    pub fn load_current(&mut self) -> Vec<SessionEffect> {
        let Some(track) = self.queue.current_track().cloned() else {
            return Vec::new();
        };

        self.scrobble.reset(&track.id);
        self.pending_load = Some(PendingLoad {
            track_id: track.id.clone(),
            acknowledged: false,
            idle_ticks: 0,
        });

        let mut effects = Vec::with_capacity(2);
        if self.last_loaded_id.as_deref() != Some(track.id.as_str()) {
            effects.push(SessionEffect::FetchCoverArt {
                track: track.clone(),
            });
        }
        self.last_loaded_id = Some(track.id.clone());
        effects.insert(0, SessionEffect::Load { track });
        effects
    }

    /// Record the outcome of a load. Results for superseded loads are ignored.
    pub fn on_track_loaded(&mut self, track_id: &str, succeeded: bool) {
        let Some(pending) = &mut self.pending_load else {
            return;
        };
        if pending.track_id != track_id {
            return;
        }
        if succeeded {
            pending.acknowledged = true;
            self.loaded = true;
        } else {
            self.pending_load = None;
            // A retry of the same track must announce it again.
            if self.last_loaded_id.as_deref() == Some(track_id) {
                self.last_loaded_id = None;
            }
        }
    }

    /// Process one status snapshot: scrobble threshold, end of track, then store it.
    pub fn on_status(&mut self, status: PlaybackStatus) -> Vec<SessionEffect> {
        self.settle_pending_load(&status);

        let mut effects = Vec::new();
        let settled = self.pending_load.is_none();

        if settled
            && let Some(track_id) = self.scrobble.observe(status.position_secs, status.duration_secs)
        {
            effects.push(SessionEffect::ReportFinal { track_id });
        }

        let ended = settled && advance::track_ended(&status, &self.queue, self.has_loaded());
        self.status = status;

        if ended {
            match advance::resolve_next(&mut self.queue, self.loop_mode) {
                AdvanceDecision::PlayNext => effects.extend(self.play_next()),
                AdvanceDecision::Stop => {
                    tracing::debug!("Reached the end of the queue");
                }
            }
        }
        effects
    }

    fn settle_pending_load(&mut self, status: &PlaybackStatus) {
        let Some(pending) = &mut self.pending_load else {
            return;
        };
        if !pending.acknowledged {
            return;
        }
        if !status.is_idle() {
            self.pending_load = None;
            return;
        }
        pending.idle_ticks += 1;
        if pending.idle_ticks >= LOAD_SETTLE_TICKS {
            tracing::warn!(track_id = %pending.track_id, "Player stayed idle after load");
            self.pending_load = None;
        }
    }
}
