//! Desktop "now playing" notifications

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

pub const NOTIFICATION_TITLE: &str = "subsonic-tui";

/// Best-effort notification delivery. Failures are logged, never returned.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, title: &str, body: &str, image: Option<Vec<u8>>);

    /// Whether cover art is worth fetching for this sink.
    fn enabled(&self) -> bool {
        true
    }
}

pub fn now_playing_body(title: &str, artist: &str) -> String {
    format!("Playing {title} - {artist}")
}

/// Shells out to `notify-send`, passing cover art as a temp file icon.
pub struct DesktopNotifier {
    cover_path: PathBuf,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            cover_path: std::env::temp_dir().join(format!("subsonic_tui_cover_{}", std::process::id())),
        }
    }

    async fn write_cover(&self, image: &[u8]) -> Option<String> {
        match tokio::fs::write(&self.cover_path, image).await {
            Ok(()) => Some(self.cover_path.display().to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "Could not write cover art for notification");
                None
            }
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str, image: Option<Vec<u8>>) {
        let icon = match image {
            Some(bytes) if !bytes.is_empty() => self.write_cover(&bytes).await,
            _ => None,
        };

        let mut command = Command::new("notify-send");
        command.arg("--app-name").arg(NOTIFICATION_TITLE);
        if let Some(icon) = &icon {
            command.arg("-i").arg(icon);
        }
        command
            .arg(title)
            .arg(body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.status().await {
            Ok(status) if status.success() => tracing::trace!(body, "Notification sent"),
            Ok(status) => tracing::debug!(%status, "notify-send exited with failure"),
            Err(e) => tracing::debug!(error = %e, "notify-send unavailable"),
        }
    }
}

/// Used when notifications are disabled in the config.
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn notify(&self, _title: &str, _body: &str, _image: Option<Vec<u8>>) {}

    fn enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_names_title_and_artist() {
        assert_eq!(now_playing_body("Song", "Band"), "Playing Song - Band");
    }
}
