//! Re-trigger gating for debounced gestures

/// Minimum spacing between two firings of one action class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    window: f64,
    last: Option<f64>,
}

impl Cooldown {
    pub fn new(window: f64) -> Self {
        Self { window, last: None }
    }

    /// True if at least `window` seconds have passed since the last firing
    pub fn ready(&self, now: f64) -> bool {
        self.last.map_or(true, |last| now - last >= self.window)
    }

    pub fn fire(&mut self, now: f64) {
        self.last = Some(now);
    }
}

/// The debounce timers plus the face-presence clock
#[derive(Debug, Clone)]
pub struct Cooldowns {
    pub swipe: Cooldown,
    pub seek: Cooldown,
    pub favorite: Cooldown,
    /// Last frame a face was observed; seeded with the first frame seen
    pub last_face_seen: Option<f64>,
}

impl Cooldowns {
    pub fn new(swipe: f64, seek: f64, favorite: f64) -> Self {
        Self {
            swipe: Cooldown::new(swipe),
            seek: Cooldown::new(seek),
            favorite: Cooldown::new(favorite),
            last_face_seen: None,
        }
    }

    /// Seconds without a face as of `now`
    pub fn face_absent_for(&self, now: f64) -> f64 {
        self.last_face_seen.map_or(0.0, |seen| now - seen)
    }
}
