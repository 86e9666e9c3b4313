//! Player events
//!
//! Emitted by the gesture engine whenever an action changes the session,
//! and pushed to subscribed status clients.

use serde::{Deserialize, Serialize};

/// Events emitted by the engine as actions are applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// A new track was loaded and started
    TrackChanged {
        index: usize,
        name: String,
    },

    /// Playback paused by gesture or command
    Paused,

    /// Playback resumed by gesture or command
    Resumed,

    /// Playback paused because no face was seen for too long
    AutoPaused {
        /// Seconds since the last face was observed
        absent_secs: f64,
    },

    /// Output level changed
    VolumeChanged { percent: u8 },

    /// Playback restarted at an offset
    Seeked {
        offset_secs: f64,
        /// False when the backend rejected the offset
        applied: bool,
    },

    /// Current track entered or left the favorites
    FavoriteToggled { index: usize, favorite: bool },

    /// Label shown on the overlay for this frame
    Gesture { label: String },
}

impl std::fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerEvent::TrackChanged { index, name } => {
                write!(f, "TRACK_CHANGED ({} {})", index, name)
            }
            PlayerEvent::Paused => write!(f, "PAUSED"),
            PlayerEvent::Resumed => write!(f, "RESUMED"),
            PlayerEvent::AutoPaused { absent_secs } => {
                write!(f, "AUTO_PAUSED ({:.1}s absent)", absent_secs)
            }
            PlayerEvent::VolumeChanged { percent } => write!(f, "VOLUME_CHANGED ({}%)", percent),
            PlayerEvent::Seeked { offset_secs, applied } => {
                write!(f, "SEEKED ({}s, applied={})", offset_secs, applied)
            }
            PlayerEvent::FavoriteToggled { index, favorite } => {
                write!(f, "FAVORITE_TOGGLED ({} -> {})", index, favorite)
            }
            PlayerEvent::Gesture { label } => write!(f, "GESTURE ({})", label),
        }
    }
}
