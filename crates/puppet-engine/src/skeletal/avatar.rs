// skeletal/avatar.rs
//
// Controller for one skeletal avatar. Owns the track state machine: a
// one-shot animation (jump) overrides whatever loop is running, and the
// loop comes back only when the runtime reports the one-shot complete.

use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::{SoundCue, TrackId};
use crate::skeletal::runtime::{SkeletalRuntime, TrackEvent};

/// The animation that interrupts and auto-restores.
const OVERRIDE_ANIMATION: &str = "jump";
/// Cue fired when the override starts.
const OVERRIDE_CUE: &str = "jump_pulse";

/// Horizontal facing of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Track state: either the steady loop is in charge, or a one-shot
/// override is playing and the remembered loop waits for its completion.
#[derive(Debug, Clone, PartialEq)]
enum TrackState {
    Idle,
    OverrideActive { animation: String },
}

/// Wraps a skeletal runtime with playback memory, sound-event routing,
/// and the override/restore machine.
pub struct AvatarController<R: SkeletalRuntime> {
    runtime: R,
    track: TrackId,
    state: TrackState,
    /// Last steady animation requested, restored after an override.
    last: Option<(String, bool)>,
    /// Runtime event name to sound cue name.
    sound_events: HashMap<String, String>,
}

impl<R: SkeletalRuntime> AvatarController<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            track: TrackId(0),
            state: TrackState::Idle,
            last: None,
            sound_events: HashMap::new(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Play a named animation. Steady animations are remembered; the
    /// override animation arms the state machine and fires its cue.
    pub fn play(&mut self, name: &str, looped: bool, cues: &mut Vec<SoundCue>) {
        if name == OVERRIDE_ANIMATION {
            self.state = TrackState::OverrideActive {
                animation: name.to_string(),
            };
            cues.push(SoundCue::new(OVERRIDE_CUE, 1.0));
        } else {
            self.last = Some((name.to_string(), looped));
            self.state = TrackState::Idle;
        }
        self.runtime.set_animation(self.track, name, looped);
    }

    /// Clear the track. Also forgets any pending restore: a stop after a
    /// jump should leave the avatar still.
    pub fn stop(&mut self) {
        self.state = TrackState::Idle;
        self.runtime.clear_track(self.track);
    }

    /// Feed a runtime event back into the controller.
    pub fn handle_event(&mut self, event: TrackEvent, cues: &mut Vec<SoundCue>) {
        match event {
            TrackEvent::Complete { track, animation } => {
                if track != self.track {
                    return;
                }
                let armed = matches!(
                    &self.state,
                    TrackState::OverrideActive { animation: a } if *a == animation
                );
                if armed {
                    // Single exit: restore the remembered loop, flag intact.
                    self.state = TrackState::Idle;
                    if let Some((name, looped)) = self.last.clone() {
                        self.runtime.set_animation(self.track, &name, looped);
                    }
                }
            }
            TrackEvent::Named { name } => {
                if let Some(cue) = self.sound_events.get(&name) {
                    cues.push(SoundCue::new(cue.clone(), 1.0));
                }
            }
        }
    }

    pub fn is_overriding(&self) -> bool {
        matches!(self.state, TrackState::OverrideActive { .. })
    }

    /// Map a runtime animation event to a sound cue.
    pub fn map_sound(&mut self, event: impl Into<String>, cue: impl Into<String>) {
        self.sound_events.insert(event.into(), cue.into());
    }

    pub fn unmap_sound(&mut self, event: &str) {
        self.sound_events.remove(event);
    }

    pub fn set_direction(&mut self, facing: Facing) {
        self.runtime.set_flip_x(facing == Facing::Left);
    }

    pub fn set_skin(&mut self, skin: &str) {
        self.runtime.set_skin(skin);
    }

    pub fn set_attachment(&mut self, slot: &str, attachment: &str) {
        self.runtime.set_attachment(slot, attachment);
    }

    pub fn set_bone_position(&mut self, bone: &str, pos: Vec2) {
        self.runtime.set_bone_position(bone, pos.x, pos.y);
    }

    pub fn bone_position(&self, bone: &str) -> Option<Vec2> {
        self.runtime.bone_position(bone)
    }

    /// Teardown: silence the track and drop event mappings.
    pub fn dispose(&mut self) {
        self.runtime.clear_track(self.track);
        self.sound_events.clear();
        self.last = None;
        self.state = TrackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeletal::runtime::{RecordingRuntime, RuntimeCall};

    fn controller() -> (AvatarController<RecordingRuntime>, Vec<SoundCue>) {
        (AvatarController::new(RecordingRuntime::new()), Vec::new())
    }

    fn last_call(c: &AvatarController<RecordingRuntime>) -> RuntimeCall {
        c.runtime().calls().last().cloned().unwrap()
    }

    #[test]
    fn jump_restores_the_walk_loop_only_after_completion() {
        let (mut c, mut cues) = controller();

        c.play("walk", true, &mut cues);
        c.play("jump", false, &mut cues);
        assert!(c.is_overriding());

        // No restore yet: the last runtime call is still the jump.
        assert_eq!(
            last_call(&c),
            RuntimeCall::SetAnimation {
                track: TrackId(0),
                name: "jump".to_string(),
                looped: false,
            }
        );

        // A completion for some other animation must not trigger it either.
        c.handle_event(
            TrackEvent::Complete {
                track: TrackId(0),
                animation: "walk".to_string(),
            },
            &mut cues,
        );
        assert!(c.is_overriding());

        // The jump completion restores walk, loop flag intact.
        c.handle_event(
            TrackEvent::Complete {
                track: TrackId(0),
                animation: "jump".to_string(),
            },
            &mut cues,
        );
        assert!(!c.is_overriding());
        assert_eq!(
            last_call(&c),
            RuntimeCall::SetAnimation {
                track: TrackId(0),
                name: "walk".to_string(),
                looped: true,
            }
        );
    }

    #[test]
    fn jump_fires_its_cue() {
        let (mut c, mut cues) = controller();
        c.play("jump", false, &mut cues);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].name, OVERRIDE_CUE);
    }

    #[test]
    fn steady_animations_update_the_restore_target() {
        let (mut c, mut cues) = controller();
        c.play("walk", true, &mut cues);
        c.play("run", true, &mut cues);
        c.play("jump", false, &mut cues);
        c.handle_event(
            TrackEvent::Complete {
                track: TrackId(0),
                animation: "jump".to_string(),
            },
            &mut cues,
        );
        assert_eq!(
            last_call(&c),
            RuntimeCall::SetAnimation {
                track: TrackId(0),
                name: "run".to_string(),
                looped: true,
            }
        );
    }

    #[test]
    fn stop_disarms_the_restore() {
        let (mut c, mut cues) = controller();
        c.play("walk", true, &mut cues);
        c.play("jump", false, &mut cues);
        c.stop();

        c.handle_event(
            TrackEvent::Complete {
                track: TrackId(0),
                animation: "jump".to_string(),
            },
            &mut cues,
        );
        // Track stays cleared, nothing restarted.
        assert_eq!(last_call(&c), RuntimeCall::ClearTrack { track: TrackId(0) });
    }

    #[test]
    fn named_events_route_to_mapped_cues() {
        let (mut c, mut cues) = controller();
        c.map_sound("footstep", "walk_sound");
        c.handle_event(
            TrackEvent::Named {
                name: "footstep".to_string(),
            },
            &mut cues,
        );
        c.handle_event(
            TrackEvent::Named {
                name: "unmapped".to_string(),
            },
            &mut cues,
        );
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].name, "walk_sound");
    }

    #[test]
    fn direction_flips_the_skeleton() {
        let (mut c, _) = controller();
        c.set_direction(Facing::Left);
        assert_eq!(last_call(&c), RuntimeCall::SetFlipX { flipped: true });
        c.set_direction(Facing::Right);
        assert_eq!(last_call(&c), RuntimeCall::SetFlipX { flipped: false });
    }

    #[test]
    fn dispose_clears_track_and_mappings() {
        let (mut c, mut cues) = controller();
        c.map_sound("footstep", "walk_sound");
        c.play("walk", true, &mut cues);
        c.dispose();

        cues.clear();
        c.handle_event(
            TrackEvent::Named {
                name: "footstep".to_string(),
            },
            &mut cues,
        );
        assert!(cues.is_empty());
    }
}
