//! Ordered decision rules
//!
//! Each rule inspects the immutable [`FrameInput`] and a read-only view of
//! the engine, and proposes at most one [`Action`]. The engine applies a
//! proposed action before evaluating the next rule, so later rules observe
//! earlier effects (a swipe that starts playback lets an open palm pause
//! it in the same frame).

use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;
use crate::gesture::{HandPose, Motion};

use super::cooldown::Cooldowns;
use super::player::PlayerState;

/// Everything the rules know about one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub timestamp: f64,
    pub face_present: bool,
    pub hand: Option<HandPose>,
    /// Defined only when the previous frame of this hand run exists
    pub motion: Option<Motion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackToggle {
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekDirection {
    Forward,
    /// Restarts the track; the backend is not assumed to seek backward
    Back,
}

/// What a rule asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    AutoPause,
    Swipe { direction: SwipeDirection },
    /// `smoothed` is the new accumulator value, not yet clamped
    VolumeSet { smoothed: f64 },
    PauseToggle { toggle: PlaybackToggle },
    Seek { direction: SeekDirection },
    FavoriteToggle,
    AdminModeLabel,
}

/// Read-only engine state visible to rules
pub struct RuleContext<'a> {
    pub config: &'a GestureConfig,
    pub player: &'a PlayerState,
    pub cooldowns: &'a Cooldowns,
    pub smoothed_volume: f64,
    /// A label was already produced earlier in this frame
    pub labeled: bool,
}

pub type Rule = fn(&FrameInput, &RuleContext<'_>) -> Option<Action>;

/// Hand-driven rules in priority order; run only when a hand is present
pub const HAND_RULES: [(&str, Rule); 6] = [
    ("swipe", swipe),
    ("volume", volume),
    ("pause_toggle", pause_toggle),
    ("seek", seek),
    ("favorite", favorite),
    ("admin_mode", admin_mode),
];

/// Pause when nobody has been in front of the camera for too long
pub fn auto_pause(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let absent = ctx.cooldowns.face_absent_for(input.timestamp);
    (!input.face_present && ctx.player.is_playing() && absent > ctx.config.face_absence_pause_s)
        .then_some(Action::AutoPause)
}

fn swipe(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let motion = input.motion?;
    if !ctx.player.has_tracks()
        || motion.velocity_x.abs() <= ctx.config.swipe_velocity_px_s
        || !ctx.cooldowns.swipe.ready(input.timestamp)
    {
        return None;
    }

    let direction = if motion.velocity_x > 0.0 {
        SwipeDirection::Next
    } else {
        SwipeDirection::Previous
    };
    Some(Action::Swipe { direction })
}

fn volume(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let hand = input.hand?;
    if hand.finger_count != 1 || !ctx.player.has_tracks() {
        return None;
    }

    let target = 1.0 - hand.index_tip_y;
    let alpha = ctx.config.volume_smoothing;
    let smoothed = ctx.smoothed_volume * (1.0 - alpha) + target * alpha;
    Some(Action::VolumeSet { smoothed })
}

/// Only fires when the pose disagrees with the current playback state, so
/// holding a pose does not re-trigger.
fn pause_toggle(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let hand = input.hand?;
    if !ctx.player.has_tracks() {
        return None;
    }

    let toggle = match (hand.finger_count, ctx.player.is_playing()) {
        (n, true) if n >= 4 => PlaybackToggle::Pause,
        (0, false) => PlaybackToggle::Resume,
        _ => return None,
    };
    Some(Action::PauseToggle { toggle })
}

fn seek(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let hand = input.hand?;
    let motion = input.motion?;
    if hand.finger_count < 2
        || !ctx.player.has_tracks()
        || motion.displacement_x.abs() <= ctx.config.seek_displacement_px
        || !ctx.cooldowns.seek.ready(input.timestamp)
    {
        return None;
    }

    let direction = if motion.displacement_x > 0.0 {
        SeekDirection::Forward
    } else {
        SeekDirection::Back
    };
    Some(Action::Seek { direction })
}

fn favorite(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let hand = input.hand?;
    (hand.pinch_distance < ctx.config.pinch_threshold
        && ctx.player.has_tracks()
        && ctx.cooldowns.favorite.ready(input.timestamp))
        .then_some(Action::FavoriteToggle)
}

fn admin_mode(input: &FrameInput, ctx: &RuleContext<'_>) -> Option<Action> {
    let hand = input.hand?;
    (hand.finger_count == 2 && !ctx.labeled).then_some(Action::AdminModeLabel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::snapshot::Point;
    use crate::playlist::Playlist;
    use std::path::PathBuf;

    fn pose(finger_count: u8) -> HandPose {
        HandPose {
            finger_count,
            pinch_distance: 0.2,
            centroid: Point::new(320.0, 240.0),
            index_tip_y: 0.5,
        }
    }

    fn input(hand: HandPose, motion: Option<Motion>) -> FrameInput {
        FrameInput {
            timestamp: 10.0,
            face_present: true,
            hand: Some(hand),
            motion,
        }
    }

    struct Fixture {
        config: GestureConfig,
        player: PlayerState,
        cooldowns: Cooldowns,
    }

    impl Fixture {
        fn new(playing: bool) -> Self {
            let config = GestureConfig::default();
            let mut player = PlayerState::new(
                Playlist::new(vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp3")]),
                0.7,
            );
            player.set_playing(playing);
            let cooldowns = Cooldowns::new(0.6, 0.6, 0.5);
            Self { config, player, cooldowns }
        }

        fn ctx(&self) -> RuleContext<'_> {
            RuleContext {
                config: &self.config,
                player: &self.player,
                cooldowns: &self.cooldowns,
                smoothed_volume: 0.7,
                labeled: false,
            }
        }
    }

    fn moving(velocity_x: f64, displacement_x: f64) -> Option<Motion> {
        Some(Motion { velocity_x, displacement_x })
    }

    #[test]
    fn test_swipe_threshold_and_direction() {
        let f = Fixture::new(true);
        assert_eq!(swipe(&input(pose(3), moving(999.0, 10.0)), &f.ctx()), None);
        assert_eq!(
            swipe(&input(pose(3), moving(-1500.0, -75.0)), &f.ctx()),
            Some(Action::Swipe { direction: SwipeDirection::Previous })
        );
        assert_eq!(swipe(&input(pose(3), None), &f.ctx()), None);
    }

    #[test]
    fn test_swipe_blocked_by_cooldown() {
        let mut f = Fixture::new(true);
        f.cooldowns.swipe.fire(9.7);
        assert_eq!(swipe(&input(pose(3), moving(4000.0, 200.0)), &f.ctx()), None);
    }

    #[test]
    fn test_pause_toggle_only_on_mismatch() {
        let playing = Fixture::new(true);
        let paused = Fixture::new(false);

        assert_eq!(
            pause_toggle(&input(pose(5), None), &playing.ctx()),
            Some(Action::PauseToggle { toggle: PlaybackToggle::Pause })
        );
        assert_eq!(pause_toggle(&input(pose(5), None), &paused.ctx()), None);
        assert_eq!(
            pause_toggle(&input(pose(0), None), &paused.ctx()),
            Some(Action::PauseToggle { toggle: PlaybackToggle::Resume })
        );
        assert_eq!(pause_toggle(&input(pose(0), None), &playing.ctx()), None);
        assert_eq!(pause_toggle(&input(pose(2), None), &playing.ctx()), None);
    }

    #[test]
    fn test_volume_smoothing_step() {
        let f = Fixture::new(true);
        let mut hand = pose(1);
        hand.index_tip_y = 0.0;
        match volume(&input(hand, None), &f.ctx()) {
            Some(Action::VolumeSet { smoothed }) => {
                assert!((smoothed - (0.7 * 0.95 + 1.0 * 0.05)).abs() < 1e-12)
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(volume(&input(pose(2), None), &f.ctx()), None);
    }

    #[test]
    fn test_seek_needs_two_fingers_and_distance() {
        let f = Fixture::new(true);
        assert_eq!(seek(&input(pose(1), moving(100.0, 60.0)), &f.ctx()), None);
        assert_eq!(seek(&input(pose(2), moving(100.0, 30.0)), &f.ctx()), None);
        assert_eq!(
            seek(&input(pose(2), moving(100.0, -60.0)), &f.ctx()),
            Some(Action::Seek { direction: SeekDirection::Back })
        );
    }

    #[test]
    fn test_admin_mode_yields_to_earlier_labels() {
        let f = Fixture::new(true);
        let mut ctx = f.ctx();
        assert_eq!(admin_mode(&input(pose(2), None), &ctx), Some(Action::AdminModeLabel));
        ctx.labeled = true;
        assert_eq!(admin_mode(&input(pose(2), None), &ctx), None);
    }

    #[test]
    fn test_auto_pause_requires_playing() {
        let mut playing = Fixture::new(true);
        playing.cooldowns.last_face_seen = Some(7.0);
        let absent = FrameInput {
            timestamp: 10.0,
            face_present: false,
            hand: None,
            motion: None,
        };
        assert_eq!(auto_pause(&absent, &playing.ctx()), Some(Action::AutoPause));

        let mut paused = Fixture::new(false);
        paused.cooldowns.last_face_seen = Some(7.0);
        assert_eq!(auto_pause(&absent, &paused.ctx()), None);
    }
}
