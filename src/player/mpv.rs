//! mpv driven through `--input-ipc-server`
//!
//! Requests are JSON lines tagged with a `request_id`. A reader task routes
//! each reply to the waiting caller; unsolicited mpv events are dropped.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use super::PlayerAdapter;
use crate::config::PlayerConfig;
use crate::error::{PlayerError, PlayerResult};
use crate::model::PlaybackStatus;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const CONNECT_ATTEMPTS: usize = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(100);
const PROPERTY_UNAVAILABLE: &str = "property unavailable";

type PendingReplies = Arc<Mutex<HashMap<u64, oneshot::Sender<MpvReply>>>>;

#[derive(Debug, Deserialize)]
struct MpvReply {
    request_id: Option<u64>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    data: Value,
    event: Option<String>,
}

pub struct MpvPlayer {
    child: Mutex<Option<Child>>,
    writer: Mutex<OwnedWriteHalf>,
    pending: PendingReplies,
    next_request_id: AtomicU64,
    socket_path: PathBuf,
    reader: JoinHandle<()>,
}

impl MpvPlayer {
    pub fn socket_path() -> PathBuf {
        std::env::temp_dir().join(format!("subsonic_tui_mpv_{}.sock", std::process::id()))
    }

    /// Launch mpv idle and connect to its IPC socket.
    pub async fn spawn(config: &PlayerConfig) -> PlayerResult<Self> {
        let socket_path = Self::socket_path();
        // Left over from a crashed run with the same pid; absence is fine.
        let _ = tokio::fs::remove_file(&socket_path).await;

        tracing::info!(binary = %config.mpv_binary, socket = %socket_path.display(), "Starting mpv");
        let child = Command::new(&config.mpv_binary)
            .arg("--idle")
            .arg("--no-video")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(PlayerError::Spawn)?;

        let stream = connect_with_retry(&socket_path).await?;
        let (read_half, write_half) = stream.into_split();

        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_replies(read_half, pending.clone()));

        tracing::info!("mpv IPC connected");
        Ok(Self {
            child: Mutex::new(Some(child)),
            writer: Mutex::new(write_half),
            pending,
            next_request_id: AtomicU64::new(1),
            socket_path,
            reader,
        })
    }

    async fn command(&self, args: Value) -> PlayerResult<Value> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.lock().await.insert(request_id, reply_tx);

        let mut line = serde_json::to_vec(&json!({ "command": args, "request_id": request_id }))?;
        line.push(b'\n');
        if let Err(e) = self.writer.lock().await.write_all(&line).await {
            self.pending.lock().await.remove(&request_id);
            return Err(e.into());
        }

        let reply = match tokio::time::timeout(REQUEST_TIMEOUT, reply_rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => {
                return Err(PlayerError::Ipc(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "mpv closed the IPC connection",
                )));
            }
            Err(_) => {
                self.pending.lock().await.remove(&request_id);
                return Err(PlayerError::Timeout);
            }
        };

        if reply.error != "success" {
            return Err(PlayerError::Command {
                command: args.get(0).and_then(Value::as_str).unwrap_or("?").to_string(),
                error: reply.error,
            });
        }
        Ok(reply.data)
    }

    async fn set_property(&self, name: &str, value: Value) -> PlayerResult<()> {
        tracing::trace!(name, %value, "mpv set_property");
        self.command(json!(["set_property", name, value])).await?;
        Ok(())
    }

    /// `None` while mpv has no value for the property (e.g. nothing loaded).
    async fn property(&self, name: &str) -> PlayerResult<Option<Value>> {
        match self.command(json!(["get_property", name])).await {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(PlayerError::Command { error, .. }) if error == PROPERTY_UNAVAILABLE => Ok(None),
            Err(e) => Err(e),
        }
    }
}

async fn connect_with_retry(path: &Path) -> PlayerResult<UnixStream> {
    let mut last_error = None;
    for _ in 0..CONNECT_ATTEMPTS {
        match UnixStream::connect(path).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
    }
    Err(PlayerError::Ipc(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "mpv socket never appeared")
    })))
}

async fn read_replies(read_half: OwnedReadHalf, pending: PendingReplies) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => route_reply(&line, &pending).await,
            Ok(None) => {
                tracing::info!("mpv IPC stream closed");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "mpv IPC read failed");
                break;
            }
        }
    }
    // Dropping the senders wakes every waiter with an error.
    pending.lock().await.clear();
}

async fn route_reply(line: &str, pending: &PendingReplies) {
    let reply: MpvReply = match serde_json::from_str(line) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!(error = %e, line, "Unparseable mpv message");
            return;
        }
    };
    if let Some(event) = &reply.event {
        tracing::trace!(event, "mpv event");
        return;
    }
    let Some(request_id) = reply.request_id else {
        return;
    };
    if let Some(waiter) = pending.lock().await.remove(&request_id) {
        let _ = waiter.send(reply);
    }
}

fn as_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn as_number(value: &Option<Value>) -> f64 {
    value.as_ref().and_then(Value::as_f64).unwrap_or(0.0)
}

/// Build a snapshot from raw property values. A missing title means mpv is idle.
fn status_from_properties(
    title: Option<Value>,
    artist: Option<Value>,
    album: Option<Value>,
    position: Option<Value>,
    duration: Option<Value>,
    paused: Option<Value>,
    volume: Option<Value>,
) -> PlaybackStatus {
    PlaybackStatus {
        title: match title {
            Some(value) => as_text(Some(value)),
            None => PlaybackStatus::IDLE_TITLE.to_string(),
        },
        artist: as_text(artist),
        album: as_text(album),
        position_secs: as_number(&position),
        duration_secs: as_number(&duration),
        paused: paused.as_ref().and_then(Value::as_bool).unwrap_or(false),
        volume: as_number(&volume),
    }
}

#[async_trait]
impl PlayerAdapter for MpvPlayer {
    async fn load(&self, url: &str) -> PlayerResult<()> {
        tracing::debug!("mpv loadfile");
        self.command(json!(["loadfile", url, "replace"])).await?;
        Ok(())
    }

    async fn set_paused(&self, paused: bool) -> PlayerResult<()> {
        self.set_property("pause", json!(paused)).await
    }

    async fn set_loop(&self, enabled: bool) -> PlayerResult<()> {
        self.set_property("loop-file", json!(if enabled { "inf" } else { "no" })).await
    }

    async fn set_shuffle(&self, enabled: bool) -> PlayerResult<()> {
        self.set_property("shuffle", json!(enabled)).await
    }

    async fn seek_relative(&self, seconds: f64) -> PlayerResult<()> {
        self.command(json!(["seek", seconds, "relative"])).await?;
        Ok(())
    }

    async fn seek_absolute(&self, seconds: f64) -> PlayerResult<()> {
        self.command(json!(["seek", seconds, "absolute"])).await?;
        Ok(())
    }

    async fn set_volume(&self, percent: f64) -> PlayerResult<()> {
        self.set_property("volume", json!(percent.clamp(0.0, 100.0))).await
    }

    async fn status(&self) -> PlayerResult<PlaybackStatus> {
        let (title, artist, album, position, duration, paused, volume) = futures::join!(
            self.property("media-title"),
            self.property("metadata/by-key/artist"),
            self.property("metadata/by-key/album"),
            self.property("time-pos"),
            self.property("duration"),
            self.property("pause"),
            self.property("volume"),
        );
        Ok(status_from_properties(
            title?, artist?, album?, position?, duration?, paused?, volume?,
        ))
    }

    async fn shutdown(&self) {
        tracing::info!("Shutting down mpv");
        if let Some(mut child) = self.child.lock().await.take()
            && let Err(e) = child.kill().await
        {
            tracing::warn!(error = %e, "Failed to kill mpv");
        }
        self.reader.abort();
        let _ = tokio::fs::remove_file(&self.socket_path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_maps_to_idle_sentinel() {
        let status = status_from_properties(None, None, None, None, None, Some(json!(false)), Some(json!(80.0)));
        assert!(status.is_idle());
        assert_eq!(status.volume, 80.0);
        assert_eq!(status.duration_secs, 0.0);
    }

    #[test]
    fn playing_properties_are_decoded() {
        let status = status_from_properties(
            Some(json!("Song")),
            Some(json!("Band")),
            Some(json!("Record")),
            Some(json!(12.5)),
            Some(json!(200)),
            Some(json!(true)),
            Some(json!(55)),
        );
        assert_eq!(status.title, "Song");
        assert_eq!(status.artist, "Band");
        assert_eq!(status.position_secs, 12.5);
        assert_eq!(status.duration_secs, 200.0);
        assert!(status.paused);
        assert!(!status.is_idle());
    }

    #[tokio::test]
    async fn replies_are_routed_by_request_id() {
        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(7, tx);

        route_reply(r#"{"event": "idle"}"#, &pending).await;
        route_reply(r#"{"request_id": 7, "error": "success", "data": 3.5}"#, &pending).await;

        let reply = rx.await.expect("reply delivered");
        assert_eq!(reply.data, json!(3.5));
        assert!(pending.lock().await.is_empty());
    }
}
