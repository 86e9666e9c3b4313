//! Landmark feed reader
//!
//! Reads detector output as JSON lines from stdin or a file on a dedicated
//! thread and forwards one [`Frame`] per line to the decision engine.
//! Closing the channel signals end-of-stream.
//!
//! Lines without a timestamp are stamped by a [`FrameClock`]: live sources use
//! arrival time, file replays advance by one frame period per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::FeedSource;

use super::snapshot::{DetectorFrame, Frame, LandmarkSnapshot};

/// Reads the landmark feed and forwards frames to the engine
pub struct FeedReader {
    frame_tx: mpsc::Sender<Frame>,
    source: FeedSource,
    frame_size: (u32, u32),
    frame_rate: f64,
    running: Arc<AtomicBool>,
}

impl FeedReader {
    /// Create a new feed reader
    pub fn new(
        frame_tx: mpsc::Sender<Frame>,
        source: FeedSource,
        frame_size: (u32, u32),
        frame_rate: f64,
    ) -> Self {
        Self {
            frame_tx,
            source,
            frame_size,
            frame_rate,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading on a dedicated thread
    ///
    /// The thread runs until the source reaches end-of-file, the engine
    /// drops its receiver, or `stop()` is called.
    pub fn start(&self) -> Result<(), FeedError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(FeedError::AlreadyRunning);
        }

        let reader: Box<dyn BufRead + Send> = match &self.source {
            FeedSource::Stdin => Box::new(BufReader::new(io::stdin())),
            FeedSource::File(path) => {
                let file = File::open(path).map_err(|source| {
                    self.running.store(false, Ordering::SeqCst);
                    FeedError::Open { path: path.clone(), source }
                })?;
                Box::new(BufReader::new(file))
            }
        };

        let frame_tx = self.frame_tx.clone();
        let running = Arc::clone(&self.running);
        let frame_size = self.frame_size;
        let clock = match &self.source {
            FeedSource::Stdin => FrameClock::live(),
            FeedSource::File(_) => FrameClock::replay(self.frame_rate),
        };

        thread::Builder::new()
            .name("landmark-feed".to_string())
            .spawn(move || {
                info!("landmark feed thread started");

                match read_frames(reader, &frame_tx, &running, frame_size, clock) {
                    Ok(count) => info!(frames = count, "landmark feed reached end of stream"),
                    Err(e) => error!(?e, "landmark feed error"),
                }

                running.store(false, Ordering::SeqCst);
                info!("landmark feed thread stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                FeedError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Stop the reader after the line currently being read
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the reader is currently running
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the feed reader
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("landmark feed is already running")]
    AlreadyRunning,

    #[error("failed to open landmark feed {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read landmark feed: {0}")]
    Read(#[from] io::Error),

    #[error("failed to spawn feed thread: {0}")]
    ThreadSpawn(String),
}

/// Timestamps for frames the detector did not stamp
///
/// Output never goes backwards: a stamp earlier than the previous frame is
/// raised to it.
#[derive(Debug)]
pub struct FrameClock {
    mode: ClockMode,
    last: Option<f64>,
    warned: bool,
}

#[derive(Debug)]
enum ClockMode {
    /// Seconds since the reader started
    Live(Instant),
    /// One frame period after the previous frame
    Replay { period: f64 },
}

impl FrameClock {
    pub fn live() -> Self {
        Self {
            mode: ClockMode::Live(Instant::now()),
            last: None,
            warned: false,
        }
    }

    pub fn replay(frame_rate: f64) -> Self {
        Self {
            mode: ClockMode::Replay { period: 1.0 / frame_rate },
            last: None,
            warned: false,
        }
    }

    /// Timestamp for a frame, given what the detector reported
    pub fn stamp(&mut self, reported: Option<f64>) -> f64 {
        let timestamp = match (reported, &self.mode) {
            (Some(t), _) => t,
            (None, ClockMode::Live(start)) => start.elapsed().as_secs_f64(),
            (None, ClockMode::Replay { period }) => {
                if !self.warned {
                    warn!(period = *period, "replayed frames carry no timestamp, assuming a fixed frame rate");
                    self.warned = true;
                }
                self.last.map_or(0.0, |last| last + *period)
            }
        };

        let timestamp = match self.last {
            Some(last) if timestamp < last => {
                debug!(timestamp, last, "non-monotonic frame timestamp clamped");
                last
            }
            _ => timestamp,
        };
        self.last = Some(timestamp);
        timestamp
    }
}

/// Parse one feed line into a frame
fn parse_line(
    line: &str,
    frame_size: (u32, u32),
    clock: &mut FrameClock,
) -> Result<Frame, serde_json::Error> {
    let detector: DetectorFrame = serde_json::from_str(line)?;
    let timestamp = clock.stamp(detector.timestamp);

    Ok(Frame {
        timestamp,
        snapshot: LandmarkSnapshot::from_detector(&detector),
        width: detector.frame_width.unwrap_or(frame_size.0),
        height: detector.frame_height.unwrap_or(frame_size.1),
    })
}

/// Forward every parseable line; returns the number of frames sent
fn read_frames<R: BufRead>(
    reader: R,
    frame_tx: &mpsc::Sender<Frame>,
    running: &AtomicBool,
    frame_size: (u32, u32),
    mut clock: FrameClock,
) -> Result<u64, FeedError> {
    let mut sent = 0;

    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            debug!("landmark feed stopped");
            break;
        }

        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame = match parse_line(line, frame_size, &mut clock) {
            Ok(frame) => frame,
            Err(e) => {
                // Malformed detector output is treated as a dropped frame
                warn!(%e, "skipping malformed landmark frame");
                continue;
            }
        };

        if frame_tx.blocking_send(frame).is_err() {
            warn!("failed to send landmark frame - channel closed?");
            break;
        }
        sent += 1;
    }

    Ok(sent)
}
