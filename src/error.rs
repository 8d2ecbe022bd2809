//! Error types for the catalog, player and configuration layers

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Server error {code}: {message}")]
    Api { code: i32, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Player is not ready")]
    NotReady,

    #[error("Failed to start mpv: {0}")]
    Spawn(std::io::Error),

    #[error("mpv IPC error: {0}")]
    Ipc(#[from] std::io::Error),

    #[error("mpv command {command} failed: {error}")]
    Command { command: String, error: String },

    #[error("mpv did not answer in time")]
    Timeout,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot find the user configuration directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot write config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config is incomplete: {0}")]
    Incomplete(&'static str),
}

/// Failure while starting playback of a track: resolving its stream or handing it to the player
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type PlayerResult<T> = Result<T, PlayerError>;
