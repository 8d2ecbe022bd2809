//! Decides when the current track has been listened to long enough to report

/// Upper bound on the listening time required before a final report
pub const MAX_SCROBBLE_DELAY_SECS: f64 = 240.0;

/// Per-track scrobble state. Reset whenever a track is loaded.
#[derive(Clone, Debug, Default)]
pub struct ScrobbleTracker {
    track_id: Option<String>,
    reported: bool,
}

impl ScrobbleTracker {
    pub fn reset(&mut self, track_id: &str) {
        self.track_id = Some(track_id.to_string());
        self.reported = false;
    }

    #[cfg(test)]
    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    #[cfg(test)]
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Half the duration, capped at four minutes
    pub fn target_secs(duration_secs: f64) -> f64 {
        (duration_secs / 2.0).min(MAX_SCROBBLE_DELAY_SECS)
    }

    /// Feed a status observation. Returns the track id exactly once, on the
    /// first observation that crosses the target.
    pub fn observe(&mut self, position_secs: f64, duration_secs: f64) -> Option<String> {
        if self.reported || duration_secs <= 0.0 {
            return None;
        }
        let track_id = self.track_id.as_ref()?;
        if position_secs < Self::target_secs(duration_secs) {
            return None;
        }
        self.reported = true;
        Some(track_id.clone())
    }
}
