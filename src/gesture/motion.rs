//! Horizontal motion tracking for the hand centroid

use crate::input::snapshot::Point;

/// Floor applied to the frame interval before dividing
pub const MIN_DT: f64 = 1e-6;

/// Previous frame's centroid and timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub centroid: Point,
    pub timestamp: f64,
}

/// Horizontal motion between two consecutive hand frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Pixels per second, positive = rightward
    pub velocity_x: f64,
    /// Pixels
    pub displacement_x: f64,
}

/// Keeps the last centroid of the current detected-hand run.
///
/// A frame without a hand clears the baseline so that the next detection
/// starts fresh instead of reading the gap as a jump.
#[derive(Debug, Default)]
pub struct MotionTracker {
    previous: Option<MotionSample>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the stored sample, then replace it with this one
    pub fn update(&mut self, centroid: Point, timestamp: f64) -> Option<Motion> {
        let motion = self.previous.map(|prev| {
            let dx = centroid.x - prev.centroid.x;
            let dt = (timestamp - prev.timestamp).max(MIN_DT);
            Motion {
                velocity_x: dx / dt,
                displacement_x: dx,
            }
        });

        self.previous = Some(MotionSample { centroid, timestamp });
        motion
    }

    /// Forget the baseline (no hand this frame)
    pub fn clear(&mut self) {
        self.previous = None;
    }

    #[cfg(test)]
    pub fn previous(&self) -> Option<MotionSample> {
        self.previous
    }
}
