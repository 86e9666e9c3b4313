//! gesture-player-daemon: hand-gesture controlled music player
//!
//! Reads hand and face landmarks produced by an external detector, turns
//! them into playback actions and drives an audio backend:
//! - Landmark feed reader on a dedicated thread
//! - Gesture engine applying ordered decision rules per frame
//! - Console transport controls when the feed is not stdin
//! - IPC server exposing status, the latest frame and transport commands

mod audio;
mod config;
mod events;
mod gesture;
mod input;
mod ipc;
mod lifecycle;
mod overlay;
mod playlist;
mod state;

use anyhow::{bail, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::audio::LoggingBackend;
use crate::config::{Config, FeedSource};
use crate::events::PlayerEvent;
use crate::input::{spawn_console, FeedReader};
use crate::ipc::{Server, ServerChannels};
use crate::lifecycle::ShutdownSignal;
use crate::playlist::Playlist;
use crate::state::GestureEngine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "gesture-player-daemon starting");

    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(
        music_dir = ?config.music_dir,
        feed = ?config.feed,
        standalone = config.standalone,
        "configuration loaded"
    );

    let playlist = match Playlist::load(&config.music_dir) {
        Ok(playlist) => playlist,
        Err(e) if !config.standalone => {
            warn!(?e, "failed to read music folder, continuing without tracks");
            Playlist::default()
        }
        Err(e) => return Err(e),
    };
    if playlist.is_empty() {
        if config.standalone {
            bail!("no music files found in {}", config.music_dir.display());
        }
        warn!(music_dir = ?config.music_dir, "no music files found");
    }
    info!(tracks = playlist.len(), "playlist loaded");

    let shutdown = ShutdownSignal::new();

    // Feed thread -> engine
    let (frame_tx, frame_rx) = mpsc::channel(64);
    // Console / IPC -> engine
    let (control_tx, control_rx) = mpsc::channel(16);
    // Engine -> subscribed clients
    let (event_tx, _event_rx) = broadcast::channel::<PlayerEvent>(64);

    let mut engine = GestureEngine::new(
        config.gesture.clone(),
        playlist,
        LoggingBackend::new(),
        config.initial_volume,
        event_tx.clone(),
    );

    let feed = FeedReader::new(
        frame_tx,
        config.feed.clone(),
        (config.frame_width, config.frame_height),
        config.frame_rate,
    );
    feed.start()?;
    info!("landmark feed started");

    if config.feed != FeedSource::Stdin {
        match spawn_console(control_tx.clone(), shutdown.clone()) {
            Ok(()) => debug!("console thread spawned"),
            Err(e) => warn!(?e, "failed to start console controls"),
        }
    }

    let server = if config.standalone {
        None
    } else {
        let channels = ServerChannels {
            status_rx: engine.subscribe_status(),
            frame_rx: engine.subscribe_frames(),
            control_tx: control_tx.clone(),
            event_tx: event_tx.clone(),
        };
        Some(Server::new(&config.socket_path, channels)?)
    };
    drop(control_tx);

    info!("daemon initialized, entering main loop");

    tokio::select! {
        _ = engine.run(frame_rx, control_rx) => {
            info!("gesture engine exited");
        }

        result = async {
            match &server {
                Some(server) => server.run().await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");

    feed.stop();
    if let Some(server) = &server {
        server.shutdown().await;
    }
    engine.shutdown();

    info!("gesture-player-daemon stopped");

    Ok(())
}
