//! Test backend that records every call

use std::path::{Path, PathBuf};

use super::{AudioBackend, AudioError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Play(f64),
    Pause,
    Unpause,
    Stop,
    SetVolume(f64),
}

#[derive(Debug)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub volume: f64,
    /// When set, every `play` with a non-zero offset fails
    pub fail_seek: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            volume: 1.0,
            fail_seek: false,
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl AudioBackend for RecordingBackend {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        self.calls.push(Call::Load(path.to_owned()));
        Ok(())
    }

    fn play(&mut self, start_offset: f64) -> Result<(), AudioError> {
        self.calls.push(Call::Play(start_offset));
        if self.fail_seek && start_offset > 0.0 {
            return Err(AudioError::OffsetOutOfRange { offset: start_offset });
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn unpause(&mut self) {
        self.calls.push(Call::Unpause);
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }

    fn set_volume(&mut self, volume: f64) {
        self.calls.push(Call::SetVolume(volume));
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
