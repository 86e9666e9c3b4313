//! Overlay description for the annotated video frame
//!
//! Renderers draw these lines over the camera image; pixel work happens
//! outside the daemon.

use serde::{Deserialize, Serialize};

use crate::state::PlayerState;

pub const HELP_TEXT: &str =
    "Gestures: Open palm=Pause | Fist=Play | Swipe=Next/Prev | Index up=Volume | Pinch=Fav";

/// Text drawn on one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Track title, starred when it is a favorite; absent without tracks
    pub title: Option<String>,
    /// `Status: Playing` / `Status: Paused`; absent without tracks
    pub status: Option<String>,
    pub gesture_label: Option<String>,
    pub help: String,
}

impl Overlay {
    pub fn build(player: &PlayerState, gesture_label: Option<&str>) -> Self {
        let title = player.current_name().map(|name| {
            if player.is_favorite(player.current_index()) {
                format!("★ {}", name)
            } else {
                name
            }
        });
        let status = player.has_tracks().then(|| {
            format!("Status: {}", if player.is_playing() { "Playing" } else { "Paused" })
        });

        Self {
            title,
            status,
            gesture_label: gesture_label.map(str::to_owned),
            help: HELP_TEXT.to_string(),
        }
    }
}
