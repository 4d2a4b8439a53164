// rig/pose.rs
//
// The pose driver: computes every joint angle and the root bob from the
// scene clock, each frame, from nothing but waveform parameters. No
// keyframe data anywhere. One-shot poses (jump) and held poses (the
// rank-1 salute) run through an explicit two-state override machine
// instead of ad hoc flags.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Vec2;

use crate::core::rng::Rng;
use crate::rig::figure::Figure;

/// Vertical head bob range, in design pixels.
const HEAD_BOB_RANGE: f32 = 3.0;
/// Vertical root bob range, in design pixels.
const ROOT_BOB_RANGE: f32 = 5.0;
/// Root bob runs at twice the base clock rate.
const ROOT_BOB_SPEED: f32 = 2.0;
/// Forearm trails the upper arm by this phase.
const FOREARM_LAG: f32 = FRAC_PI_4;
/// Forearm swing amplitude relative to the upper arm's.
const FOREARM_RANGE_FACTOR: f32 = 0.4;
/// Full raise used by salutes and action poses.
const RAISE_ANGLE: f32 = FRAC_PI_2;
/// Thigh swing amplitude in radians.
const THIGH_RANGE: f32 = 0.35;
/// Shin swing amplitude relative to the thigh's.
const SHIN_RANGE_FACTOR: f32 = 0.5;
/// Legs run slightly slower than arms.
const LEG_SPEED_FACTOR: f32 = 0.75;

/// Default jump arc, in design pixels and seconds.
pub const JUMP_HEIGHT: f32 = 60.0;
pub const JUMP_DURATION: f32 = 0.6;

/// A single periodic joint motion: `angle(t) = amplitude * sin(speed*t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waveform {
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

impl Waveform {
    pub fn new(amplitude: f32, speed: f32, phase: f32) -> Self {
        Self {
            amplitude,
            speed,
            phase,
        }
    }

    #[inline]
    pub fn angle(&self, t: f32) -> f32 {
        self.amplitude * (self.speed * t + self.phase).sin()
    }
}

/// Which way a character leans its gestures. Drawn once at creation so
/// every figure in the cast moves differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionStyle {
    Forward,
    Left,
    Right,
    Diagonal,
}

impl DirectionStyle {
    pub fn sample(rng: &mut Rng) -> Self {
        match rng.next_int(4) {
            0 => DirectionStyle::Left,
            1 => DirectionStyle::Right,
            2 => DirectionStyle::Diagonal,
            _ => DirectionStyle::Forward,
        }
    }

    /// Signed gain applied to swings and action poses.
    pub fn multiplier(self) -> f32 {
        match self {
            DirectionStyle::Forward => 0.8,
            DirectionStyle::Left => -1.0,
            DirectionStyle::Right => 1.0,
            DirectionStyle::Diagonal => 0.5,
        }
    }
}

/// Per-character idle randomness, fixed at creation time.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// Phase offset for the root bob.
    pub bob_phase: f32,
    /// Phase offset for the arm swing.
    pub arm_phase: f32,
    /// Arm swing speed multiplier, 2.0 to 4.0.
    pub arm_speed: f32,
    /// Arm swing range in radians, 0.6 to 1.0.
    pub arm_range: f32,
    pub direction: DirectionStyle,
}

impl MotionParams {
    pub fn generate(rng: &mut Rng) -> Self {
        Self {
            bob_phase: rng.next_f32() * TAU,
            arm_phase: rng.next_f32() * TAU,
            arm_speed: rng.range_f32(2.0, 4.0),
            arm_range: rng.range_f32(0.6, 1.0),
            direction: DirectionStyle::sample(rng),
        }
    }
}

/// A pose that supersedes the idle computation while active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideKind {
    /// One-shot sine arc lifting the root, arms raised for the ride.
    Jump { height: f32 },
    /// Held salute: arms pinned at the raise angle, root planted.
    ArmsRaised,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverridePose {
    pub kind: OverrideKind,
    elapsed: f32,
    /// None holds the pose until something replaces it.
    duration: Option<f32>,
}

impl OverridePose {
    pub fn one_shot(kind: OverrideKind, duration: f32) -> Self {
        Self {
            kind,
            elapsed: 0.0,
            duration: Some(duration),
        }
    }

    pub fn held(kind: OverrideKind) -> Self {
        Self {
            kind,
            elapsed: 0.0,
            duration: None,
        }
    }

    /// Normalized progress for timed poses, 0 for held ones.
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(d) if d > 0.0 => (self.elapsed / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        matches!(self.duration, Some(d) if self.elapsed >= d)
    }
}

/// The override machine. Exactly two states, one entry, one exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseState {
    Idle,
    Override {
        pose: OverridePose,
        /// A held pose displaced by a one-shot, restored on exit.
        resume: Option<OverridePose>,
    },
}

impl PoseState {
    pub fn is_override(&self) -> bool {
        matches!(self, PoseState::Override { .. })
    }

    /// Single entry point. A held pose already in place is remembered and
    /// comes back when the new pose finishes.
    pub fn start_override(&mut self, next: OverridePose) {
        let resume = match *self {
            PoseState::Override { pose, resume } if pose.duration.is_none() => Some(pose),
            PoseState::Override { resume, .. } => resume,
            PoseState::Idle => None,
        };
        *self = PoseState::Override { pose: next, resume };
    }

    /// Single exit point. Control returns to the displaced held pose, or
    /// to the idle computation.
    pub fn finish_override(&mut self) {
        *self = match *self {
            PoseState::Override {
                resume: Some(held), ..
            } => PoseState::Override {
                pose: held,
                resume: None,
            },
            _ => PoseState::Idle,
        };
    }

    /// Advance timers; timed poses expire through the single exit.
    fn advance(&mut self, dt: f32) {
        if let PoseState::Override { pose, .. } = self {
            if pose.advance(dt) {
                self.finish_override();
            }
        }
    }
}

/// Per-figure pose computation.
#[derive(Debug, Clone)]
pub struct PoseDriver {
    pub params: MotionParams,
    state: PoseState,
}

impl PoseDriver {
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            state: PoseState::Idle,
        }
    }

    /// Driver for the rank-1 character: permanently saluting, planted.
    pub fn saluting(params: MotionParams) -> Self {
        let mut driver = Self::new(params);
        driver
            .state
            .start_override(OverridePose::held(OverrideKind::ArmsRaised));
        driver
    }

    pub fn state(&self) -> &PoseState {
        &self.state
    }

    /// Launch the one-shot jump. Ratio converts the design-pixel arc to
    /// the current viewport.
    pub fn start_jump(&mut self, ratio: f32) {
        self.state.start_override(OverridePose::one_shot(
            OverrideKind::Jump {
                height: JUMP_HEIGHT * ratio,
            },
            JUMP_DURATION,
        ));
    }

    pub fn is_jumping(&self) -> bool {
        matches!(
            self.state,
            PoseState::Override {
                pose: OverridePose {
                    kind: OverrideKind::Jump { .. },
                    ..
                },
                ..
            }
        )
    }

    /// Compute this frame's pose. Writes joint rotations and the head
    /// offset into the rig and returns the root position the hierarchy
    /// should propagate from.
    pub fn apply(&mut self, time: f32, dt: f32, fig: &mut Figure, home: Vec2) -> Vec2 {
        self.state.advance(dt);

        let ratio = fig.ratio;
        let joints = fig.joints;
        let p = self.params;
        let dir = p.direction.multiplier();

        // The head bobs in every state.
        let head_wave = Waveform::new(HEAD_BOB_RANGE * ratio, 1.0, 0.0);
        let head_y = fig.head_rest_y + head_wave.angle(time);
        fig.rig.set_offset(joints.head, Vec2::new(0.0, head_y));

        let mut origin = home;

        match self.state {
            PoseState::Override { pose, .. } => {
                match pose.kind {
                    OverrideKind::Jump { height } => {
                        // Up and back down along half a sine period.
                        origin.y = home.y - (PI * pose.progress()).sin() * height;
                    }
                    OverrideKind::ArmsRaised => {
                        // Planted: no bob at all.
                    }
                }

                // Both override poses pin the arms at the raise angle and
                // keep the legs straight.
                fig.rig.set_rotation(joints.upper_arm_l, RAISE_ANGLE);
                fig.rig.set_rotation(joints.lower_arm_l, RAISE_ANGLE);
                fig.rig.set_rotation(joints.upper_arm_r, RAISE_ANGLE);
                fig.rig.set_rotation(joints.lower_arm_r, RAISE_ANGLE);
                for leg in [joints.thigh_l, joints.shin_l, joints.thigh_r, joints.shin_r] {
                    fig.rig.set_rotation(leg, 0.0);
                }
            }
            PoseState::Idle => {
                let bob = Waveform::new(ROOT_BOB_RANGE * ratio, ROOT_BOB_SPEED, p.bob_phase);
                origin.y = home.y + bob.angle(time);

                // Base arm swing, forearms trailing by a quarter turn at a
                // reduced range.
                let arm_wave = Waveform::new(p.arm_range, p.arm_speed, p.arm_phase);
                let fore_wave = Waveform::new(
                    p.arm_range * FOREARM_RANGE_FACTOR,
                    p.arm_speed,
                    p.arm_phase + FOREARM_LAG,
                );
                let swing = arm_wave.angle(time);
                let fore = fore_wave.angle(time);

                // Two slow oscillators gate the action poses: a wave tier
                // (both arms, left only, right only) and a robot tier.
                let wave = ((time * 0.8 + p.arm_phase * 0.3) * 0.2).sin() * 0.5 + 0.5;
                let robot = ((time * 1.5 + p.arm_phase * 0.5) * 0.3).sin() * 0.5 + 0.5;

                let mut action_upper_l = 0.0;
                let mut action_upper_r = 0.0;
                let mut action_lower_l = 0.0;
                let mut action_lower_r = 0.0;
                if wave > 0.85 {
                    action_upper_l = RAISE_ANGLE * dir;
                    action_upper_r = RAISE_ANGLE * dir;
                    action_lower_l = RAISE_ANGLE * dir;
                    action_lower_r = RAISE_ANGLE * dir;
                } else if wave > 0.7 {
                    action_upper_l = RAISE_ANGLE * dir;
                    action_lower_l = RAISE_ANGLE * dir;
                } else if wave > 0.55 {
                    action_upper_r = RAISE_ANGLE * dir;
                    action_lower_r = RAISE_ANGLE * dir;
                } else if robot > 0.7 {
                    action_upper_l = RAISE_ANGLE * dir;
                    action_upper_r = RAISE_ANGLE * dir;
                }

                // Swings never drop below the rest pose; the action angle
                // stacks on top.
                let upper_l = (swing * dir).max(0.0) + action_upper_l;
                let upper_r = (-swing * dir).max(0.0) + action_upper_r;
                let lower_l = (fore * dir).max(0.0) + action_lower_l;
                let lower_r = (-fore * dir).max(0.0) + action_lower_r;

                fig.rig.set_rotation(joints.upper_arm_l, upper_l);
                fig.rig.set_rotation(joints.lower_arm_l, lower_l);
                fig.rig.set_rotation(joints.upper_arm_r, upper_r);
                fig.rig.set_rotation(joints.lower_arm_r, lower_r);

                // Legs counter-swing each other, shins trailing thighs.
                let leg_speed = p.arm_speed * LEG_SPEED_FACTOR;
                let thigh_wave = Waveform::new(THIGH_RANGE, leg_speed, p.bob_phase);
                let shin_wave = Waveform::new(
                    THIGH_RANGE * SHIN_RANGE_FACTOR,
                    leg_speed,
                    p.bob_phase + FOREARM_LAG,
                );
                let thigh = thigh_wave.angle(time);
                let shin = shin_wave.angle(time);
                fig.rig.set_rotation(joints.thigh_l, thigh);
                fig.rig.set_rotation(joints.shin_l, shin);
                fig.rig.set_rotation(joints.thigh_r, -thigh);
                fig.rig.set_rotation(joints.shin_r, -shin);
            }
        }

        // Feet cancel the leg chain so they stay level with the ground.
        let foot_l = -(fig.rig.rotation(joints.thigh_l) + fig.rig.rotation(joints.shin_l));
        let foot_r = -(fig.rig.rotation(joints.thigh_r) + fig.rig.rotation(joints.shin_r));
        fig.rig.set_rotation(joints.foot_l, foot_l);
        fig.rig.set_rotation(joints.foot_r, foot_r);

        origin
    }
}
