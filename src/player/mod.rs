//! Player module - control of the external audio player
//!
//! - `mpv`: long-lived mpv process driven over its JSON IPC socket

mod mpv;

use async_trait::async_trait;

use crate::error::PlayerResult;
use crate::model::PlaybackStatus;

pub use mpv::MpvPlayer;

/// Operations the session issues against the player. The adapter owns the
/// player process but no session state.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    /// Load `url`, replacing whatever is playing.
    async fn load(&self, url: &str) -> PlayerResult<()>;

    async fn set_paused(&self, paused: bool) -> PlayerResult<()>;

    async fn set_loop(&self, enabled: bool) -> PlayerResult<()>;

    async fn set_shuffle(&self, enabled: bool) -> PlayerResult<()>;

    async fn seek_relative(&self, seconds: f64) -> PlayerResult<()>;

    async fn seek_absolute(&self, seconds: f64) -> PlayerResult<()>;

    async fn set_volume(&self, percent: f64) -> PlayerResult<()>;

    async fn status(&self) -> PlayerResult<PlaybackStatus>;

    async fn shutdown(&self);
}
