// skeletal/runtime.rs
//
// Boundary to the skeletal-animation runtime. The real runtime lives on
// the host; the core only requests track changes and consumes two kinds
// of event back: non-looping completions and named animation events.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::TrackId;

/// The capability the core needs from a skeletal runtime.
pub trait SkeletalRuntime {
    /// Set a named animation on a track, looping or one-shot.
    fn set_animation(&mut self, track: TrackId, name: &str, looped: bool);
    /// Clear whatever is playing on a track.
    fn clear_track(&mut self, track: TrackId);
    /// Switch the skeleton's skin.
    fn set_skin(&mut self, skin: &str);
    /// Swap an attachment in a slot.
    fn set_attachment(&mut self, slot: &str, attachment: &str);
    /// Mirror the skeleton horizontally.
    fn set_flip_x(&mut self, flipped: bool);
    /// Move a named bone.
    fn set_bone_position(&mut self, bone: &str, x: f32, y: f32);
    /// Read a named bone's position, if the runtime knows it.
    fn bone_position(&self, bone: &str) -> Option<Vec2>;
}

/// Everything the core consumes from the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A non-looping animation finished.
    Complete { track: TrackId, animation: String },
    /// A named event fired inside an animation (footsteps and the like).
    Named { name: String },
}

/// One call recorded by `RecordingRuntime`, in the wire form the host
/// bridge replays against the real runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RuntimeCall {
    SetAnimation {
        track: TrackId,
        name: String,
        looped: bool,
    },
    ClearTrack {
        track: TrackId,
    },
    SetSkin {
        skin: String,
    },
    SetAttachment {
        slot: String,
        attachment: String,
    },
    SetFlipX {
        flipped: bool,
    },
    SetBonePosition {
        bone: String,
        x: f32,
        y: f32,
    },
}

/// A runtime that records every call instead of animating anything.
///
/// Two jobs: the test double for controller logic, and the outbox the
/// web bridge drains so the host can apply the calls to the real runtime.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    calls: Vec<RuntimeCall>,
    bones: HashMap<String, Vec2>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> &[RuntimeCall] {
        &self.calls
    }

    /// Drain recorded calls for forwarding to the host.
    pub fn drain_calls(&mut self) -> Vec<RuntimeCall> {
        std::mem::take(&mut self.calls)
    }

    /// Host-reported bone position, fed back so reads have answers.
    pub fn report_bone(&mut self, bone: impl Into<String>, pos: Vec2) {
        self.bones.insert(bone.into(), pos);
    }
}

impl SkeletalRuntime for RecordingRuntime {
    fn set_animation(&mut self, track: TrackId, name: &str, looped: bool) {
        self.calls.push(RuntimeCall::SetAnimation {
            track,
            name: name.to_string(),
            looped,
        });
    }

    fn clear_track(&mut self, track: TrackId) {
        self.calls.push(RuntimeCall::ClearTrack { track });
    }

    fn set_skin(&mut self, skin: &str) {
        self.calls.push(RuntimeCall::SetSkin {
            skin: skin.to_string(),
        });
    }

    fn set_attachment(&mut self, slot: &str, attachment: &str) {
        self.calls.push(RuntimeCall::SetAttachment {
            slot: slot.to_string(),
            attachment: attachment.to_string(),
        });
    }

    fn set_flip_x(&mut self, flipped: bool) {
        self.calls.push(RuntimeCall::SetFlipX { flipped });
    }

    fn set_bone_position(&mut self, bone: &str, x: f32, y: f32) {
        self.bones.insert(bone.to_string(), Vec2::new(x, y));
        self.calls.push(RuntimeCall::SetBonePosition {
            bone: bone.to_string(),
            x,
            y,
        });
    }

    fn bone_position(&self, bone: &str) -> Option<Vec2> {
        self.bones.get(bone).copied()
    }
}
