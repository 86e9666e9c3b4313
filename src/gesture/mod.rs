//! Gesture feature extraction
//!
//! Turns a hand's landmarks into the per-frame features the decision rules
//! read: finger count, pinch distance, pixel centroid and horizontal motion.

mod fingers;
mod motion;

#[cfg(test)]
pub(crate) use fingers::fixtures;
pub use fingers::HandPose;
pub use motion::{Motion, MotionTracker};
