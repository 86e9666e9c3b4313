//! Player session state

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::playlist::Playlist;

/// Transport commands issued outside gesture input (console, IPC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCommand {
    Next,
    Previous,
    Play,
    Pause,
}

/// Mutable session state read by the overlay and status surface.
///
/// `current_index` is always a valid index into the playlist (or 0 for an
/// empty one) and `volume` always lies in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PlayerState {
    playlist: Playlist,
    current_index: usize,
    is_playing: bool,
    volume: f64,
    favorites: BTreeSet<usize>,
}

impl PlayerState {
    pub fn new(playlist: Playlist, volume: f64) -> Self {
        Self {
            playlist,
            current_index: 0,
            is_playing: false,
            volume: volume.clamp(0.0, 1.0),
            favorites: BTreeSet::new(),
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// False when the playlist is empty; every control is then a no-op
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.playlist.path(self.current_index)
    }

    pub fn current_name(&self) -> Option<String> {
        self.playlist.name(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && self.has_tracks();
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn favorites(&self) -> &BTreeSet<usize> {
        &self.favorites
    }

    pub fn is_favorite(&self, index: usize) -> bool {
        self.favorites.contains(&index)
    }

    /// Move `delta` tracks, wrapping in both directions. Returns the new index.
    pub fn step(&mut self, delta: i64) -> Option<usize> {
        let len = self.playlist.len() as i64;
        if len == 0 {
            return None;
        }
        self.current_index = (self.current_index as i64 + delta).rem_euclid(len) as usize;
        Some(self.current_index)
    }

    /// Flip membership of the current track. Returns true if it was added.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        if !self.has_tracks() {
            return None;
        }
        let index = self.current_index;
        if self.favorites.remove(&index) {
            Some(false)
        } else {
            self.favorites.insert(index);
            Some(true)
        }
    }
}
