//! Landmark snapshot types and the detector-output adapter
//!
//! The detector reports zero or more hands as lists of normalized points plus
//! a face-presence flag. Only the first hand is kept, and only if it carries
//! a full, finite set of landmarks. A malformed hand never rejects the frame:
//! it is read as "no hand" so the face clock and the motion reset still run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of landmarks in one hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Tips of the four non-thumb digits
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Offset from a fingertip back to the joint it is compared against
pub const TIP_TO_JOINT: usize = 2;

/// A normalized image-space point; smaller `y` is higher on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The 21 landmarks of one detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Point; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build from raw `[x, y]` pairs. Returns `None` for short or non-finite input.
    pub fn from_raw(raw: &[[f64; 2]]) -> Option<Self> {
        if raw.len() < LANDMARK_COUNT {
            return None;
        }

        let mut points = [Point::default(); LANDMARK_COUNT];
        for (slot, [x, y]) in points.iter_mut().zip(raw.iter()) {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            *slot = Point::new(*x, *y);
        }
        Some(Self { points })
    }

    /// Lenient conversion from detector JSON.
    ///
    /// Points may be `[x, y]`, `[x, y, z]` or `{"x": .., "y": ..}`; depth is
    /// ignored. Any point without two numeric coordinates yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let raw = value
            .as_array()?
            .iter()
            .map(point_coords)
            .collect::<Option<Vec<_>>>()?;
        Self::from_raw(&raw)
    }

    pub fn from_points(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    /// Arithmetic mean of all landmarks, normalized
    pub fn centroid(&self) -> Point {
        let n = LANDMARK_COUNT as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

fn point_coords(point: &Value) -> Option<[f64; 2]> {
    match point {
        Value::Array(coords) => match coords.as_slice() {
            [x, y, ..] => Some([x.as_f64()?, y.as_f64()?]),
            _ => None,
        },
        Value::Object(map) => Some([map.get("x")?.as_f64()?, map.get("y")?.as_f64()?]),
        _ => None,
    }
}

/// One detector frame as it arrives on the feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorFrame {
    /// Seconds on a monotonic clock; stamped on arrival when absent
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub face_present: bool,
    /// Hands as lists of points; validated per hand, never per line
    #[serde(default)]
    pub hands: Value,
    #[serde(default)]
    pub frame_width: Option<u32>,
    #[serde(default)]
    pub frame_height: Option<u32>,
}

/// Core input for one frame: at most one hand plus the face flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSnapshot {
    pub hand: Option<HandLandmarks>,
    pub face_present: bool,
}

impl LandmarkSnapshot {
    pub fn from_detector(frame: &DetectorFrame) -> Self {
        Self {
            hand: frame
                .hands
                .as_array()
                .and_then(|hands| hands.first())
                .and_then(HandLandmarks::from_json),
            face_present: frame.face_present,
        }
    }
}

/// A timestamped snapshot with the pixel geometry needed for motion
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp: f64,
    pub snapshot: LandmarkSnapshot,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_hand(x: f64, y: f64) -> Vec<[f64; 2]> {
        vec![[x, y]; LANDMARK_COUNT]
    }

    fn parse(json: &str) -> LandmarkSnapshot {
        let frame: DetectorFrame = serde_json::from_str(json).unwrap();
        LandmarkSnapshot::from_detector(&frame)
    }

    #[test]
    fn test_first_hand_only() {
        let frame = DetectorFrame {
            face_present: true,
            hands: serde_json::json!([raw_hand(0.2, 0.3), raw_hand(0.8, 0.8)]),
            ..Default::default()
        };
        let snapshot = LandmarkSnapshot::from_detector(&frame);
        assert!(snapshot.face_present);
        let hand = snapshot.hand.unwrap();
        assert_eq!(hand.point(WRIST), Point::new(0.2, 0.3));
    }

    #[test]
    fn test_short_hand_is_no_hand() {
        let frame = DetectorFrame {
            hands: serde_json::json!([vec![[0.5, 0.5]; 12]]),
            ..Default::default()
        };
        assert!(LandmarkSnapshot::from_detector(&frame).hand.is_none());
    }

    #[test]
    fn test_non_finite_is_no_hand() {
        let mut raw = raw_hand(0.5, 0.5);
        raw[7] = [f64::NAN, 0.5];
        assert!(HandLandmarks::from_raw(&raw).is_none());
    }

    #[test]
    fn test_centroid() {
        let mut raw = raw_hand(0.0, 0.0);
        for (i, p) in raw.iter_mut().enumerate() {
            *p = [i as f64 / 20.0, 0.5];
        }
        let centroid = HandLandmarks::from_raw(&raw).unwrap().centroid();
        assert!((centroid.x - 0.5).abs() < 1e-9);
        assert!((centroid.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_detector_frame_parsing() {
        let json = r#"{"face_present":true,"hands":[]}"#;
        let frame: DetectorFrame = serde_json::from_str(json).unwrap();
        assert!(frame.timestamp.is_none());
        assert!(LandmarkSnapshot::from_detector(&frame).hand.is_none());
    }

    #[test]
    fn test_depth_coordinate_ignored() {
        let points: Vec<[f64; 3]> = (0..LANDMARK_COUNT).map(|i| [0.5, i as f64 / 40.0, -0.1]).collect();
        let json = serde_json::json!({ "face_present": true, "hands": [points] }).to_string();
        let hand = parse(&json).hand.unwrap();
        assert_eq!(hand.point(2), Point::new(0.5, 2.0 / 40.0));
    }

    #[test]
    fn test_object_points() {
        let points: Vec<Value> = (0..LANDMARK_COUNT)
            .map(|_| serde_json::json!({ "x": 0.25, "y": 0.75, "z": 0.0 }))
            .collect();
        let json = serde_json::json!({ "hands": [points] }).to_string();
        assert_eq!(parse(&json).hand.unwrap().point(WRIST), Point::new(0.25, 0.75));
    }

    #[test]
    fn test_degenerate_hand_keeps_frame() {
        let snapshot = parse(r#"{"face_present":true,"hands":[[[0.5]]]}"#);
        assert!(snapshot.face_present);
        assert!(snapshot.hand.is_none());

        assert!(parse(r#"{"hands":[[["a","b"]]]}"#).hand.is_none());
        assert!(parse(r#"{"hands":null}"#).hand.is_none());
        assert!(parse(r#"{"hands":"lost"}"#).hand.is_none());
    }
}
