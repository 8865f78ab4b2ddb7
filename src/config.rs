use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure for the shell itself
///
/// This is the shell's local configuration (theme, timings, daemon command).
/// The download settings shown on the settings page live in the daemon and
/// travel as a [`ConfigMap`] over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Color theme name ("dark" or "light")
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Main loop tick interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Splash screen behavior
    #[serde(default)]
    pub splash: SplashConfig,

    /// Daemon process settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Directory holding page fragment files; None uses the embedded set
    #[serde(default)]
    pub assets_dir: Option<std::path::PathBuf>,
}

fn default_theme_name() -> String {
    "dark".to_string()
}

fn default_tick_rate() -> u64 {
    50
}

/// Splash screen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplashConfig {
    /// Seconds to wait before force-closing the splash when startup
    /// events could not be subscribed to
    #[serde(default = "default_fallback_secs")]
    pub fallback_secs: u64,
}

fn default_fallback_secs() -> u64 {
    10
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            fallback_secs: default_fallback_secs(),
        }
    }
}

/// Daemon process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Command used to launch the daemon
    #[serde(default = "default_backend_command")]
    pub command: String,

    /// Extra arguments passed to the daemon
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_backend_command() -> String {
    "windlass-daemon".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: default_backend_command(),
            args: Vec::new(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            tick_rate_ms: default_tick_rate(),
            splash: SplashConfig::default(),
            backend: BackendConfig::default(),
            assets_dir: None,
        }
    }
}

impl ShellConfig {
    /// Get the default config file path
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("windlass").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults if not found
    pub fn load_or_default() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                match Self::load_from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}, using defaults",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: ShellConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A single value in the daemon's settings map
///
/// The daemon serializes its settings as a flat JSON object whose values are
/// either booleans (toggles) or strings (selects, radio groups). Untagged so
/// the wire shape stays `{"theme": "System", "geo_bypass": false, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Bool(_) => None,
            SettingValue::Text(s) => Some(s.as_str()),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

/// The daemon's settings, keyed by setting name
///
/// BTreeMap keeps serialization order stable, which keeps saved payloads
/// diffable in logs and deterministic in tests.
pub type ConfigMap = BTreeMap<String, SettingValue>;

/// The daemon's default settings
///
/// Mirrors what the daemon reports for a fresh profile. Used when a
/// settings fetch fails so the page still renders something sensible.
pub fn default_daemon_config() -> ConfigMap {
    let mut map = ConfigMap::new();
    map.insert("theme".into(), "System".into());
    map.insert("language".into(), "English".into());
    map.insert("close_behavior".into(), "hide".into());
    map.insert("update_app".into(), true.into());
    map.insert("update_ytdlp".into(), true.into());
    map.insert("update_ffmpeg".into(), true.into());
    map.insert("cookies_browser".into(), "None".into());
    map.insert("geo_bypass".into(), false.into());
    map.insert("video_format".into(), "mp4".into());
    map.insert("video_quality".into(), "1080p".into());
    map.insert("audio_format".into(), "mp3".into());
    map.insert("audio_quality".into(), "128kbps".into());
    map
}
