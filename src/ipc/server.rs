//! Unix domain socket server for IPC
//!
//! Provides request-response communication and push notifications for
//! player events to subscribed clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::events::PlayerEvent;
use crate::state::{ControlCommand, FrameReport};

use super::protocol::{Notification, PlayerStatus, Request, Response};

const MAX_MESSAGE_LEN: usize = 1024 * 1024;

/// Engine-side endpoints the server reads from and forwards to
#[derive(Clone)]
pub struct ServerChannels {
    pub status_rx: watch::Receiver<PlayerStatus>,
    pub frame_rx: watch::Receiver<FrameReport>,
    pub control_tx: mpsc::Sender<ControlCommand>,
    pub event_tx: broadcast::Sender<PlayerEvent>,
}

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    channels: Arc<ServerChannels>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Bind the socket, replacing a stale one
    pub fn new(socket_path: &Path, channels: ServerChannels) -> Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener: Some(listener),
            channels: Arc::new(channels),
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.as_ref().context("server not initialized")?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let channels = Arc::clone(&self.channels);
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, channels) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    ///
    /// Reads happen on a separate task so a subscribed client can be sent
    /// notifications without interrupting a partially read request.
    async fn handle_client(stream: UnixStream, channels: Arc<ServerChannels>) -> Result<()> {
        let (mut reader, mut writer) = stream.into_split();
        let (request_tx, mut request_rx) = mpsc::channel::<Vec<u8>>(8);

        let read_task = tokio::spawn(async move {
            loop {
                match read_message(&mut reader).await {
                    Ok(Some(msg)) => {
                        if request_tx.send(msg).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("client disconnected");
                        break;
                    }
                    Err(e) => {
                        warn!(?e, "failed to read request");
                        break;
                    }
                }
            }
        });

        let mut events: Option<broadcast::Receiver<PlayerEvent>> = None;

        let result = loop {
            tokio::select! {
                msg = request_rx.recv() => {
                    let Some(msg) = msg else { break Ok(()) };

                    let response = match serde_json::from_slice::<Request>(&msg) {
                        Ok(request) => {
                            debug!(?request, "received request");
                            let (response, subscribe) = Self::process_request(request, &channels).await;
                            if subscribe && events.is_none() {
                                events = Some(channels.event_tx.subscribe());
                                debug!("client subscribed to notifications");
                            }
                            response
                        }
                        Err(e) => Response::Error {
                            code: "invalid_request".to_string(),
                            message: e.to_string(),
                        },
                    };

                    if let Err(e) = send_message(&mut writer, &response).await {
                        break Err(e);
                    }
                }

                event = next_event(&mut events) => match event {
                    Ok(event) => {
                        let notification = Notification::PlayerEvent { event };
                        if let Err(e) = send_message(&mut writer, &notification).await {
                            break Err(e);
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(skipped = n, "subscriber lagged");
                    }
                    Err(RecvError::Closed) => {
                        events = None;
                    }
                },
            }
        };

        read_task.abort();
        result
    }

    /// Process a request and return a response
    /// Returns (Response, should_subscribe)
    async fn process_request(request: Request, channels: &ServerChannels) -> (Response, bool) {
        match request {
            Request::Ping => (Response::Pong, false),

            Request::GetStatus => {
                let status = channels.status_rx.borrow().clone();
                (Response::Status(status), false)
            }

            Request::GetFrame => {
                let frame = channels.frame_rx.borrow().clone();
                (Response::Frame(frame), false)
            }

            Request::Control { command } => match channels.control_tx.send(command).await {
                Ok(()) => {
                    info!(?command, "command received via IPC");
                    (Response::Accepted { command }, false)
                }
                Err(_) => (
                    Response::Error {
                        code: "engine_unavailable".to_string(),
                        message: "gesture engine is not running".to_string(),
                    },
                    false,
                ),
            },

            Request::Subscribe => (Response::Subscribed, true),
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Wait for the next event, or forever when not subscribed
async fn next_event(
    events: &mut Option<broadcast::Receiver<PlayerEvent>>,
) -> Result<PlayerEvent, RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Read one length-prefixed message; `None` on a clean disconnect
async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_LEN {
        bail!("message too large: {} bytes", len);
    }

    let mut msg_buf = vec![0u8; len];
    reader.read_exact(&mut msg_buf).await?;
    Ok(Some(msg_buf))
}

/// Send a length-prefixed JSON message
async fn send_message<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let msg_bytes = serde_json::to_vec(msg)?;
    let msg_len = (msg_bytes.len() as u32).to_le_bytes();

    writer.write_all(&msg_len).await?;
    writer.write_all(&msg_bytes).await?;

    Ok(())
}
