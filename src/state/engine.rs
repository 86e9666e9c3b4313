//! Gesture decision engine
//!
//! Owns every piece of mutable session state: the player, the audio
//! backend, the motion baseline, the cooldown timers and the volume
//! accumulator. Frames and transport commands reach it only through
//! channels, so exactly one frame-processing pass runs at a time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::audio::AudioBackend;
use crate::config::GestureConfig;
use crate::events::PlayerEvent;
use crate::gesture::{HandPose, MotionTracker};
use crate::input::Frame;
use crate::ipc::{volume_percent, PlayerStatus};
use crate::overlay::Overlay;
use crate::playlist::Playlist;

use super::cooldown::Cooldowns;
use super::player::{ControlCommand, PlayerState};
use super::rules::{
    self, Action, FrameInput, PlaybackToggle, RuleContext, SeekDirection, SwipeDirection,
    HAND_RULES,
};

pub const LABEL_AUTO_PAUSED: &str = "Auto-paused (no user)";
pub const LABEL_NEXT: &str = "Next Track";
pub const LABEL_PREVIOUS: &str = "Previous Track";
pub const LABEL_PAUSE: &str = "Pause";
pub const LABEL_PLAY: &str = "Play";
pub const LABEL_FAVORITE_ADDED: &str = "Added to Favorites";
pub const LABEL_FAVORITE_REMOVED: &str = "Removed from Favorites";
pub const LABEL_ADMIN: &str = "Admin Mode";

/// Result of one processed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub timestamp: f64,
    /// Label of the last rule that produced one, if any
    pub gesture_label: Option<String>,
    /// Actions applied, in rule order
    pub actions: Vec<Action>,
    pub finger_count: Option<u8>,
    pub overlay: Overlay,
}

/// The per-frame decision engine
pub struct GestureEngine<A: AudioBackend> {
    config: GestureConfig,
    player: PlayerState,
    audio: A,
    motion: MotionTracker,
    cooldowns: Cooldowns,
    /// Free-running accumulator behind the volume gesture
    smoothed_volume: f64,
    frames_processed: u64,
    event_tx: broadcast::Sender<PlayerEvent>,
    status_tx: watch::Sender<PlayerStatus>,
    frame_tx: watch::Sender<FrameReport>,
}

impl<A: AudioBackend> GestureEngine<A> {
    /// Create the engine and start the first track if there is one
    pub fn new(
        config: GestureConfig,
        playlist: Playlist,
        audio: A,
        initial_volume: f64,
        event_tx: broadcast::Sender<PlayerEvent>,
    ) -> Self {
        let cooldowns = Cooldowns::new(
            config.swipe_cooldown_s,
            config.seek_cooldown_s,
            config.favorite_cooldown_s,
        );
        let player = PlayerState::new(playlist, initial_volume);
        let (status_tx, _) = watch::channel(PlayerStatus::from(&player));
        let (frame_tx, _) = watch::channel(FrameReport::default());

        let mut engine = Self {
            config,
            smoothed_volume: player.volume(),
            player,
            audio,
            motion: MotionTracker::new(),
            cooldowns,
            frames_processed: 0,
            event_tx,
            status_tx,
            frame_tx,
        };
        engine.start_session();
        engine
    }

    #[cfg(test)]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    #[cfg(test)]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[cfg(test)]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Status snapshots, updated whenever the session changes
    pub fn subscribe_status(&self) -> watch::Receiver<PlayerStatus> {
        self.status_tx.subscribe()
    }

    /// The most recent frame result
    pub fn subscribe_frames(&self) -> watch::Receiver<FrameReport> {
        self.frame_tx.subscribe()
    }

    /// Process frames and commands until the landmark feed closes
    pub async fn run(
        &mut self,
        mut frame_rx: mpsc::Receiver<Frame>,
        mut control_rx: mpsc::Receiver<ControlCommand>,
    ) {
        info!(
            tracks = self.player.playlist().len(),
            playing = self.player.is_playing(),
            "gesture engine started"
        );

        loop {
            tokio::select! {
                frame = frame_rx.recv() => match frame {
                    Some(frame) => {
                        let report = self.process_frame(&frame);
                        if let Some(label) = &report.gesture_label {
                            debug!(timestamp = report.timestamp, label = %label, "frame labeled");
                        }
                    }
                    None => {
                        info!("landmark feed closed");
                        break;
                    }
                },
                Some(command) = control_rx.recv() => {
                    self.handle_control(command);
                }
            }
        }

        info!(frames = self.frames_processed, "gesture engine stopped");
    }

    /// Run every rule against one frame and apply what fires
    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        let now = frame.timestamp;
        let face_present = frame.snapshot.face_present;
        if face_present || self.cooldowns.last_face_seen.is_none() {
            self.cooldowns.last_face_seen = Some(now);
        }

        let hand = frame.snapshot.hand.as_ref().map(|landmarks| {
            HandPose::from_landmarks(
                landmarks,
                frame.width,
                frame.height,
                self.config.thumb_extension_threshold,
            )
        });
        let motion = match &hand {
            Some(pose) => self.motion.update(pose.centroid, now),
            None => {
                self.motion.clear();
                None
            }
        };
        let input = FrameInput {
            timestamp: now,
            face_present,
            hand,
            motion,
        };

        let mut actions = Vec::new();
        let mut label: Option<String> = None;

        let auto_pause = rules::auto_pause(&input, &self.rule_context(false));
        if let Some(action) = auto_pause {
            label = self.apply(action, &input);
            actions.push(action);
        } else if input.hand.is_some() {
            for (name, rule) in HAND_RULES {
                let proposed = rule(&input, &self.rule_context(label.is_some()));
                let Some(action) = proposed else { continue };

                debug!(rule = name, ?action, "rule fired");
                if let Some(text) = self.apply(action, &input) {
                    label = Some(text);
                }
                actions.push(action);
            }
        }

        if let Some(text) = &label {
            let _ = self.event_tx.send(PlayerEvent::Gesture { label: text.clone() });
        }
        if !actions.is_empty() {
            self.publish_status();
        }

        let report = FrameReport {
            timestamp: now,
            overlay: Overlay::build(&self.player, label.as_deref()),
            gesture_label: label,
            actions,
            finger_count: input.hand.map(|h| h.finger_count),
        };
        self.frame_tx.send_replace(report.clone());
        self.frames_processed += 1;
        report
    }

    /// Apply a transport command from the console or IPC
    pub fn handle_control(&mut self, command: ControlCommand) {
        info!(?command, "transport command");
        if !self.player.has_tracks() {
            debug!("no tracks, ignoring command");
            return;
        }

        match command {
            ControlCommand::Next => {
                self.change_track(1);
            }
            ControlCommand::Previous => {
                self.change_track(-1);
            }
            ControlCommand::Play if !self.player.is_playing() => self.resume(),
            ControlCommand::Pause if self.player.is_playing() => self.pause(),
            _ => debug!(?command, "already in requested state"),
        }
        self.publish_status();
    }

    /// Stop playback and log the session summary
    pub fn shutdown(&mut self) {
        self.audio.stop();
        self.player.set_playing(false);
        self.publish_status();

        let favorites: Vec<usize> = self.player.favorites().iter().copied().collect();
        info!(?favorites, "session summary");
        for (index, name) in self.player.playlist().names().iter().enumerate() {
            let mark = if self.player.is_favorite(index) { "*" } else { " " };
            info!("{:02}{} - {}", index, mark, name);
        }
    }

    fn rule_context(&self, labeled: bool) -> RuleContext<'_> {
        RuleContext {
            config: &self.config,
            player: &self.player,
            cooldowns: &self.cooldowns,
            smoothed_volume: self.smoothed_volume,
            labeled,
        }
    }

    /// Perform an action and return its overlay label
    fn apply(&mut self, action: Action, input: &FrameInput) -> Option<String> {
        let now = input.timestamp;

        match action {
            Action::AutoPause => {
                let absent_secs = self.cooldowns.face_absent_for(now);
                info!(absent_secs, "no user in view, auto-pausing");
                self.audio.pause();
                self.player.set_playing(false);
                let _ = self.event_tx.send(PlayerEvent::AutoPaused { absent_secs });
                Some(LABEL_AUTO_PAUSED.to_string())
            }

            Action::Swipe { direction } => {
                self.cooldowns.swipe.fire(now);
                let (delta, label) = match direction {
                    SwipeDirection::Next => (1, LABEL_NEXT),
                    SwipeDirection::Previous => (-1, LABEL_PREVIOUS),
                };
                self.change_track(delta);
                Some(label.to_string())
            }

            Action::VolumeSet { smoothed } => {
                self.smoothed_volume = smoothed;
                let before = volume_percent(self.player.volume());
                self.audio.set_volume(smoothed.clamp(0.0, 1.0));
                self.player.set_volume(self.audio.volume());

                let percent = volume_percent(self.player.volume());
                if percent != before {
                    let _ = self.event_tx.send(PlayerEvent::VolumeChanged { percent });
                }
                Some(format!("Volume: {}%", percent))
            }

            Action::PauseToggle { toggle: PlaybackToggle::Pause } => {
                self.pause();
                Some(LABEL_PAUSE.to_string())
            }

            Action::PauseToggle { toggle: PlaybackToggle::Resume } => {
                self.resume();
                Some(LABEL_PLAY.to_string())
            }

            Action::Seek { direction } => {
                self.cooldowns.seek.fire(now);
                let seconds = self.config.seek_seconds;
                let (offset_secs, sign) = match direction {
                    SeekDirection::Forward => (seconds, '+'),
                    SeekDirection::Back => (0.0, '-'),
                };

                let applied = match self.audio.play(offset_secs) {
                    Ok(()) => {
                        self.player.set_playing(true);
                        true
                    }
                    Err(e) => {
                        warn!(%e, offset_secs, "seek rejected by backend");
                        false
                    }
                };
                info!(offset_secs, applied, "seek");
                let _ = self.event_tx.send(PlayerEvent::Seeked { offset_secs, applied });
                Some(format!("Seek {}{}s", sign, seconds))
            }

            Action::FavoriteToggle => {
                self.cooldowns.favorite.fire(now);
                let index = self.player.current_index();
                let favorite = self.player.toggle_favorite()?;
                info!(index, favorite, "favorite toggled");
                let _ = self.event_tx.send(PlayerEvent::FavoriteToggled { index, favorite });
                let label = if favorite { LABEL_FAVORITE_ADDED } else { LABEL_FAVORITE_REMOVED };
                Some(label.to_string())
            }

            Action::AdminModeLabel => Some(LABEL_ADMIN.to_string()),
        }
    }

    fn start_session(&mut self) {
        if !self.player.has_tracks() {
            warn!("playlist is empty, playback disabled");
            return;
        }

        self.audio.set_volume(self.player.volume());
        self.player.set_volume(self.audio.volume());
        let started = self.load_and_play();
        self.player.set_playing(started);
        self.publish_status();
    }

    /// Move through the playlist and start the new track
    fn change_track(&mut self, delta: i64) -> Option<usize> {
        let from = self.player.current_index();
        let index = self.player.step(delta)?;
        let started = self.load_and_play();
        self.player.set_playing(started);

        let name = self.player.current_name().unwrap_or_default();
        info!(from, to = index, track = %name, "track changed");
        let _ = self.event_tx.send(PlayerEvent::TrackChanged { index, name });
        Some(index)
    }

    fn load_and_play(&mut self) -> bool {
        let Some(path) = self.player.current_path().map(PathBuf::from) else {
            return false;
        };

        if let Err(e) = self.audio.load(&path) {
            warn!(%e, ?path, "failed to load track");
            return false;
        }
        if let Err(e) = self.audio.play(0.0) {
            warn!(%e, ?path, "failed to start track");
            return false;
        }
        true
    }

    fn pause(&mut self) {
        self.audio.pause();
        self.player.set_playing(false);
        info!("paused");
        let _ = self.event_tx.send(PlayerEvent::Paused);
    }

    fn resume(&mut self) {
        self.audio.unpause();
        self.player.set_playing(true);
        info!("resumed");
        let _ = self.event_tx.send(PlayerEvent::Resumed);
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(PlayerStatus::from(&self.player));
    }
}
