//! Backend that tracks playback state and logs every call
//!
//! Used when no real output device is wired in. It honors the backend
//! contract: volume is clamped, `play` fails without a loaded track, and an
//! optional track length bounds the start offset.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{AudioBackend, AudioError};

#[derive(Debug, Default)]
pub struct LoggingBackend {
    loaded: Option<PathBuf>,
    playing: bool,
    volume: f64,
    /// Seconds; offsets past this are rejected
    track_length: Option<f64>,
}

impl LoggingBackend {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Default::default()
        }
    }

    /// Reject start offsets beyond `seconds`
    #[cfg(test)]
    pub fn with_track_length(mut self, seconds: f64) -> Self {
        self.track_length = Some(seconds);
        self
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[cfg(test)]
    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }
}

impl AudioBackend for LoggingBackend {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        info!(?path, "audio: load");
        self.loaded = Some(path.to_owned());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self, start_offset: f64) -> Result<(), AudioError> {
        if self.loaded.is_none() {
            return Err(AudioError::NothingLoaded);
        }
        if let Some(length) = self.track_length {
            if start_offset < 0.0 || start_offset > length {
                return Err(AudioError::OffsetOutOfRange { offset: start_offset });
            }
        }
        info!(start_offset, "audio: play");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        info!("audio: pause");
        self.playing = false;
    }

    fn unpause(&mut self) {
        info!("audio: unpause");
        self.playing = self.loaded.is_some();
    }

    fn stop(&mut self) {
        info!("audio: stop");
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        debug!(volume = self.volume, "audio: set volume");
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
