//! Input module for detector output and console controls
//!
//! Landmark frames are read from a JSON-lines feed on a dedicated thread;
//! transport commands can be typed on the console when the feed is a file.

mod console;
mod feed;
pub mod snapshot;

pub use console::spawn_console;
pub use feed::FeedReader;
pub use snapshot::Frame;
