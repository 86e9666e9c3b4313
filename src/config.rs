//! Configuration loading and management
//!
//! Defaults are derived from `$HOME`, then overlaid by an optional TOML file
//! and finally by a handful of environment variables.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "GESTURE_PLAYER_CONFIG";
/// Environment variable overriding the music folder
pub const MUSIC_DIR_ENV: &str = "GESTURE_PLAYER_MUSIC_DIR";
/// Environment variable overriding the landmark feed (`-` for stdin)
pub const FEED_ENV: &str = "GESTURE_PLAYER_FEED";
/// Environment variable forcing standalone mode
pub const STANDALONE_ENV: &str = "GESTURE_PLAYER_STANDALONE";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for the status surface
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Folder scanned for tracks at startup
    pub music_dir: PathBuf,

    /// Where landmark frames are read from
    pub feed: FeedSource,

    /// Standalone runs exit on an empty playlist and skip the status socket
    pub standalone: bool,

    /// Frame size used when the feed does not report one
    pub frame_width: u32,
    pub frame_height: u32,

    /// Frames per second assumed for file feeds whose lines carry no timestamp
    pub frame_rate: f64,

    /// Volume applied when the session starts
    pub initial_volume: f64,

    /// Gesture thresholds and cooldowns
    pub gesture: GestureConfig,
}

/// Source of detector output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Stdin,
    File(PathBuf),
}

impl FeedSource {
    fn parse(value: &str) -> Self {
        if value == "-" {
            FeedSource::Stdin
        } else {
            FeedSource::File(PathBuf::from(value))
        }
    }
}

/// Thresholds used by the finger extractor, motion tracker and decision rules.
///
/// Times are seconds, distances in normalized units unless suffixed `_px`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub thumb_extension_threshold: f64,
    pub swipe_velocity_px_s: f64,
    pub swipe_cooldown_s: f64,
    pub seek_displacement_px: f64,
    pub seek_cooldown_s: f64,
    pub seek_seconds: f64,
    pub pinch_threshold: f64,
    pub favorite_cooldown_s: f64,
    pub volume_smoothing: f64,
    pub face_absence_pause_s: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            thumb_extension_threshold: 0.02,
            swipe_velocity_px_s: 1000.0,
            swipe_cooldown_s: 0.6,
            seek_displacement_px: 40.0,
            seek_cooldown_s: 0.6,
            seek_seconds: 10.0,
            pinch_threshold: 0.04,
            favorite_cooldown_s: 0.5,
            volume_smoothing: 0.05,
            face_absence_pause_s: 2.0,
        }
    }
}

/// On-disk overlay; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    socket_path: Option<PathBuf>,
    music_dir: Option<PathBuf>,
    feed: Option<String>,
    standalone: Option<bool>,
    frame_width: Option<u32>,
    frame_height: Option<u32>,
    frame_rate: Option<f64>,
    initial_volume: Option<f64>,
    gesture: Option<GestureConfig>,
}

impl Config {
    /// Load configuration from defaults, optional config file and environment
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        let mut config = Self::with_home(Path::new(&home));

        let file_path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_dir.join("config.toml"));
        if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            config.apply_toml(&content)
                .with_context(|| format!("failed to parse {}", file_path.display()))?;
        }

        if let Ok(dir) = std::env::var(MUSIC_DIR_ENV) {
            config.music_dir = PathBuf::from(dir);
        }
        if let Ok(feed) = std::env::var(FEED_ENV) {
            config.feed = FeedSource::parse(&feed);
        }
        if let Ok(flag) = std::env::var(STANDALONE_ENV) {
            config.standalone = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Defaults rooted at the given home directory
    pub fn with_home(home: &Path) -> Self {
        let data_dir = home.join(".local").join("share").join("gesture-player");
        let socket_path = data_dir.join("daemon.sock");

        Self {
            socket_path,
            music_dir: PathBuf::from("music"),
            data_dir,
            feed: FeedSource::Stdin,
            standalone: false,
            frame_width: 640,
            frame_height: 480,
            frame_rate: 30.0,
            initial_volume: 0.7,
            gesture: GestureConfig::default(),
        }
    }

    /// Overlay values from a TOML document
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(path) = file.socket_path {
            self.socket_path = path;
        }
        if let Some(dir) = file.music_dir {
            self.music_dir = dir;
        }
        if let Some(feed) = file.feed {
            self.feed = FeedSource::parse(&feed);
        }
        if let Some(standalone) = file.standalone {
            self.standalone = standalone;
        }
        if let Some(width) = file.frame_width {
            self.frame_width = width;
        }
        if let Some(height) = file.frame_height {
            self.frame_height = height;
        }
        if let Some(rate) = file.frame_rate {
            if !(rate.is_finite() && rate > 0.0) {
                bail!("frame_rate must be positive, got {}", rate);
            }
            self.frame_rate = rate;
        }
        if let Some(volume) = file.initial_volume {
            self.initial_volume = volume.clamp(0.0, 1.0);
        }
        if let Some(gesture) = file.gesture {
            self.gesture = gesture;
        }
        Ok(())
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::with_home(Path::new("/home/tester"));
        assert!(config.socket_path.to_string_lossy().contains("gesture-player"));
        assert_eq!(config.feed, FeedSource::Stdin);
        assert_eq!(config.initial_volume, 0.7);
        assert_eq!(config.gesture.swipe_velocity_px_s, 1000.0);
        assert_eq!(config.gesture.pinch_threshold, 0.04);
    }

    #[test]
    fn test_toml_overlay() {
        let mut config = Config::with_home(Path::new("/home/tester"));
        config
            .apply_toml(
                r#"
                music_dir = "/srv/music"
                feed = "/tmp/landmarks.jsonl"
                initial_volume = 1.5
                frame_rate = 25.0

                [gesture]
                swipe_velocity_px_s = 800.0
                "#,
            )
            .unwrap();

        assert_eq!(config.music_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.feed, FeedSource::File(PathBuf::from("/tmp/landmarks.jsonl")));
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.frame_rate, 25.0);
        assert_eq!(config.gesture.swipe_velocity_px_s, 800.0);
        // Unspecified thresholds keep their defaults
        assert_eq!(config.gesture.seek_seconds, 10.0);
    }

    #[test]
    fn test_invalid_toml() {
        let mut config = Config::with_home(Path::new("/home/tester"));
        assert!(config.apply_toml("frame_width = \"wide\"").is_err());
        assert!(config.apply_toml("frame_rate = 0.0").is_err());
    }
}
