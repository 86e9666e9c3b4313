//! Playback session state and the per-frame decision engine
//!
//! - `player`: playlist position, play/pause flag, volume, favorites
//! - `cooldown`: debounce timers and the face-absence clock
//! - `rules`: ordered gesture rules proposing actions
//! - `engine`: applies actions to the audio backend and publishes results

mod cooldown;
mod engine;
mod player;
mod rules;

pub use engine::{FrameReport, GestureEngine};
pub use player::{ControlCommand, PlayerState};
