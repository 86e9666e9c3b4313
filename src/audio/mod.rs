//! Audio backend interface
//!
//! The decision engine drives playback through [`AudioBackend`]. Calls are
//! synchronous: a later rule in the same frame sees the effect of an earlier
//! one (the volume rule reads back the clamped level).

mod logging;
#[cfg(test)]
pub(crate) mod recording;

use std::path::Path;

pub use logging::LoggingBackend;

/// Playback primitives consumed by the engine
pub trait AudioBackend: Send {
    /// Load a track, replacing the current one
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;

    /// Start the loaded track at `start_offset` seconds
    fn play(&mut self, start_offset: f64) -> Result<(), AudioError>;

    fn pause(&mut self);

    fn unpause(&mut self);

    fn stop(&mut self);

    /// Set the output level; backends clamp to `[0, 1]`
    fn set_volume(&mut self, volume: f64);

    fn volume(&self) -> f64;
}

/// Errors reported by an audio backend
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no track loaded")]
    NothingLoaded,

    #[error("start offset {offset}s is outside the track")]
    OffsetOutOfRange { offset: f64 },
}
