//! Finger-state extraction
//!
//! Derives the extended-finger count and pinch distance from one hand's
//! landmarks. Pure functions of their input.

use crate::input::snapshot::{
    HandLandmarks, Point, FINGER_TIPS, INDEX_TIP, THUMB_IP, THUMB_TIP, TIP_TO_JOINT,
};

/// Per-frame hand summary consumed by the decision rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    /// Extended fingers, 0..=5
    pub finger_count: u8,
    /// Thumb tip to index tip, normalized units
    pub pinch_distance: f64,
    /// Landmark centroid in pixels
    pub centroid: Point,
    /// Index fingertip height, normalized (smaller = higher)
    pub index_tip_y: f64,
}

impl HandPose {
    /// Summarize a hand for a frame of the given pixel size
    pub fn from_landmarks(
        hand: &HandLandmarks,
        width: u32,
        height: u32,
        thumb_threshold: f64,
    ) -> Self {
        let centroid = hand.centroid();
        Self {
            finger_count: count_extended(hand, thumb_threshold),
            pinch_distance: pinch_distance(hand),
            centroid: Point::new(centroid.x * width as f64, centroid.y * height as f64),
            index_tip_y: hand.point(INDEX_TIP).y,
        }
    }
}

/// Count extended fingers.
///
/// A non-thumb digit is extended when its tip sits above the joint two
/// landmarks below it. The thumb moves laterally, so it is extended when the
/// horizontal gap between tip and joint exceeds `thumb_threshold`.
pub fn count_extended(hand: &HandLandmarks, thumb_threshold: f64) -> u8 {
    let fingers = FINGER_TIPS
        .iter()
        .filter(|&&tip| hand.point(tip).y < hand.point(tip - TIP_TO_JOINT).y)
        .count() as u8;

    let thumb_gap = (hand.point(THUMB_TIP).x - hand.point(THUMB_IP).x).abs();
    let thumb = u8::from(thumb_gap > thumb_threshold);

    fingers + thumb
}

/// Euclidean distance between thumb tip and index tip
pub fn pinch_distance(hand: &HandLandmarks) -> f64 {
    hand.point(THUMB_TIP).distance(&hand.point(INDEX_TIP))
}

/// Synthetic hands for tests across the crate
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::input::snapshot::LANDMARK_COUNT;

    /// A hand centred at `(cx, cy)` with exactly `extended` fingers raised.
    ///
    /// The thumb is counted first, then index, middle, ring, pinky. Thumb and
    /// index tips are kept well apart so no pinch is detected.
    pub fn hand_with(extended: u8, cx: f64, cy: f64) -> HandLandmarks {
        let mut points = [Point::new(cx, cy); LANDMARK_COUNT];

        // Thumb: spread sideways only if counted
        points[THUMB_IP] = Point::new(cx, cy);
        points[THUMB_TIP] = if extended >= 1 {
            Point::new(cx - 0.08, cy + 0.05)
        } else {
            Point::new(cx + 0.01, cy + 0.12)
        };

        // Remaining fingers: index first
        let raised = extended.saturating_sub(1) as usize;
        for (i, &tip) in FINGER_TIPS.iter().enumerate() {
            let x = cx + 0.02 * i as f64;
            points[tip - TIP_TO_JOINT] = Point::new(x, cy);
            points[tip] = if i < raised {
                Point::new(x, cy - 0.06)
            } else {
                Point::new(x, cy + 0.03)
            };
        }

        HandLandmarks::from_points(points)
    }

    /// The volume pose (index only, thumb tucked) with the index tip at `tip_y`
    pub fn pointing_hand(tip_y: f64) -> HandLandmarks {
        let mut points = *hand_with(0, 0.5, 0.5).points();
        points[INDEX_TIP - TIP_TO_JOINT] = Point::new(0.5, tip_y + 0.05);
        points[INDEX_TIP] = Point::new(0.5, tip_y);
        HandLandmarks::from_points(points)
    }

    /// A fist whose thumb and index tips touch
    pub fn pinching_hand(gap: f64) -> HandLandmarks {
        let mut points = *hand_with(0, 0.5, 0.5).points();
        let index = points[INDEX_TIP];
        points[THUMB_TIP] = Point::new(index.x, index.y + gap);
        points[THUMB_IP] = Point::new(index.x, index.y + gap);
        HandLandmarks::from_points(points)
    }
}
