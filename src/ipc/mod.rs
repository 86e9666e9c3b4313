//! IPC module for status clients
//!
//! Exposes the player status, the latest frame result and transport
//! commands over a Unix socket.

mod protocol;
mod server;

#[cfg(test)]
pub use protocol::PlaybackStatus;
pub use protocol::{volume_percent, PlayerStatus};
pub use server::{Server, ServerChannels};
