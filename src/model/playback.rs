//! Player status snapshots and the playback summary rendered by the UI

use super::content::Track;
use super::types::LoopMode;

/// Tolerance before the reported duration at which a track counts as finished
pub const END_TOLERANCE_SECS: f64 = 0.5;

/// Latest status read from the media player. Replaced wholesale on every poll.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackStatus {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub paused: bool,
    pub volume: f64,
}

impl PlaybackStatus {
    /// Title reported when the player has nothing loaded
    pub const IDLE_TITLE: &'static str = "<nil>";

    pub fn idle() -> Self {
        Self {
            title: Self::IDLE_TITLE.to_string(),
            ..Default::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.title == Self::IDLE_TITLE
    }

    pub fn reached_end(&self) -> bool {
        self.duration_secs > 0.0 && self.position_secs >= self.duration_secs - END_TOLERANCE_SECS
    }

    /// Playback progress in `0.0..=1.0`, zero when the duration is unknown
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub track: Option<Track>,
    pub status: PlaybackStatus,
    pub loop_mode: LoopMode,
    pub is_starred: bool,
    pub queue_position: Option<(usize, usize)>,
}

impl PlaybackInfo {
    pub fn display_title(&self) -> &str {
        match &self.track {
            Some(track) => &track.title,
            None => "No track playing",
        }
    }

    pub fn display_artist(&self) -> &str {
        self.track.as_ref().map(|t| t.artist.as_str()).unwrap_or_default()
    }

    pub fn is_playing(&self) -> bool {
        self.track.is_some() && !self.status.paused && !self.status.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reached_end_requires_known_duration() {
        let status = PlaybackStatus {
            position_secs: 10.0,
            duration_secs: 0.0,
            ..Default::default()
        };
        assert!(!status.reached_end());
    }

    #[test]
    fn reached_end_within_tolerance() {
        let mut status = PlaybackStatus {
            position_secs: 199.4,
            duration_secs: 200.0,
            ..Default::default()
        };
        assert!(!status.reached_end());
        status.position_secs = 199.5;
        assert!(status.reached_end());
    }

    #[test]
    fn idle_sentinel_is_distinct_from_empty_title() {
        assert!(PlaybackStatus::idle().is_idle());
        assert!(!PlaybackStatus::default().is_idle());
    }
}
