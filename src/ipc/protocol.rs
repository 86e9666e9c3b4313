//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::events::PlayerEvent;
use crate::state::{ControlCommand, FrameReport, PlayerState};

/// Playback state as shown to clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    Playing,
    #[default]
    Paused,
}

/// Requests from clients to daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Request current player status
    GetStatus,

    /// Request the result of the most recent frame
    GetFrame,

    /// Issue a transport command, bypassing gestures
    Control { command: ControlCommand },

    /// Ping to check connectivity
    Ping,

    /// Subscribe to player event notifications
    Subscribe,
}

/// Responses from daemon to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Current player status
    Status(PlayerStatus),

    /// Latest frame result
    Frame(FrameReport),

    /// Command queued for the engine
    Accepted { command: ControlCommand },

    /// Pong response to ping
    Pong,

    /// Subscription confirmed
    Subscribed,

    /// Error response
    Error { code: String, message: String },
}

/// Push notification from daemon to subscribed clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A player event occurred
    PlayerEvent { event: PlayerEvent },
}

/// Full player status snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// File name of the current track, empty without tracks
    pub track_name: String,

    pub status: PlaybackStatus,

    /// Output level as a whole percentage
    #[serde(rename = "volume")]
    pub volume_percent: u8,

    pub current_index: usize,

    /// Track names in playback order
    pub playlist: Vec<String>,

    /// Favorite track indices, ascending
    pub favorites: Vec<usize>,
}

/// Truncating conversion used for the status feed and the volume label
pub fn volume_percent(volume: f64) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0) as u8
}

/// Convert session state to the status snapshot
impl From<&PlayerState> for PlayerStatus {
    fn from(player: &PlayerState) -> Self {
        Self {
            track_name: player.current_name().unwrap_or_default(),
            status: if player.is_playing() {
                PlaybackStatus::Playing
            } else {
                PlaybackStatus::Paused
            },
            volume_percent: volume_percent(player.volume()),
            current_index: player.current_index(),
            playlist: player.playlist().names(),
            favorites: player.favorites().iter().copied().collect(),
        }
    }
}
