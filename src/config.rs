//! User configuration loaded from `<config_dir>/subsonic-tui/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

const APP_DIR: &str = "subsonic-tui";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_mpv_binary")]
    pub mpv_binary: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,
    #[serde(default = "default_volume_step")]
    pub volume_step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_mpv_binary() -> String {
    "mpv".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_seek_step_secs() -> f64 {
    10.0
}

fn default_volume_step() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mpv_binary: default_mpv_binary(),
            poll_interval_ms: default_poll_interval_ms(),
            seek_step_secs: default_seek_step_secs(),
            volume_step: default_volume_step(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl PlayerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(50))
    }
}

/// Outcome of looking for the config file on startup
pub enum LoadOutcome {
    Loaded(Config),
    /// No config existed; a template was written at this path.
    TemplateWritten(PathBuf),
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn load_or_init() -> Result<LoadOutcome, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::template().save_to(&path)?;
            return Ok(LoadOutcome::TemplateWritten(path));
        }
        let config = Self::load_from(&path)?;
        config.validate()?;
        Ok(LoadOutcome::Loaded(config))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Incomplete("server.url is empty"));
        }
        if self.server.username.trim().is_empty() {
            return Err(ConfigError::Incomplete("server.username is empty"));
        }
        Ok(())
    }

    fn template() -> Self {
        Self {
            server: ServerConfig {
                url: "https://music.example.com".to_string(),
                username: String::new(),
                password: String::new(),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file_with_defaults() {
        let config = Config::parse(
            r#"
            [server]
            url = "https://music.example.com"
            username = "alice"
            password = "pw"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.username, "alice");
        assert_eq!(config.player.mpv_binary, "mpv");
        assert_eq!(config.player.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.player.seek_step_secs, 10.0);
        assert!(config.notifications.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn template_is_rejected_until_filled_in() {
        let config = Config::template();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Incomplete("server.username is empty"))
        ));
    }

    #[test]
    fn saved_template_parses_back() {
        let dir = std::env::temp_dir().join(format!("subsonic-tui-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        Config::template().save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.url, "https://music.example.com");
        assert_eq!(loaded.player.volume_step, 5.0);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let player = PlayerConfig {
            poll_interval_ms: 1,
            ..Default::default()
        };
        assert_eq!(player.poll_interval(), Duration::from_millis(50));
    }
}
