//! Playlist loading from a music folder

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extensions picked up by the folder scan (compared case-insensitively)
pub const TRACK_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// Ordered track list, fixed for the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<PathBuf>,
}

impl Playlist {
    pub fn new(tracks: Vec<PathBuf>) -> Self {
        Self { tracks }
    }

    /// Scan `folder` for audio files, sorted by path
    pub fn load(folder: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(folder)
            .with_context(|| format!("failed to read music folder {}", folder.display()))?;

        let mut tracks = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_track(&path) {
                tracks.push(path);
            }
        }
        tracks.sort();

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.tracks.get(index).map(PathBuf::as_path)
    }

    /// File name of the track at `index`
    pub fn name(&self, index: usize) -> Option<String> {
        self.path(index).map(track_name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tracks.iter().map(|p| track_name(p)).collect()
    }
}

fn is_track(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TRACK_EXTENSIONS.iter().any(|t| e.eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}

fn track_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
