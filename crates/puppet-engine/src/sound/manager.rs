// sound/manager.rs
//
// The sound service: explicitly constructed, owned by the host runner,
// and handed cues each frame. No global instance anywhere. Playback is
// fire and forget; a failed or unknown cue is logged and dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::api::types::SoundCue;
use crate::core::rng::Rng;
use crate::sound::tones::{tone_for, Tone};

/// A registered sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundDef {
    pub base_volume: f32,
    pub looped: bool,
}

impl Default for SoundDef {
    fn default() -> Self {
        Self {
            base_volume: 1.0,
            looped: false,
        }
    }
}

/// The playback capability the manager drives. Implementations must
/// swallow their own failures; nothing here returns errors.
pub trait AudioBackend {
    fn play_sample(&mut self, name: &str, volume: f32, looped: bool);
    fn play_tone(&mut self, tone: &Tone, volume: f32);
    fn stop(&mut self, name: &str);
    fn stop_all(&mut self);
}

/// Playback request in wire form, for backends that forward to a host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    Sample {
        name: String,
        volume: f32,
        looped: bool,
    },
    Tone {
        tone: Tone,
        volume: f32,
    },
    Stop {
        name: String,
    },
    StopAll,
}

/// Backend that queues events for a host to drain. Doubles as the test
/// recorder.
#[derive(Debug, Default)]
pub struct QueueBackend {
    events: Vec<AudioEvent>,
}

impl QueueBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AudioEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AudioBackend for QueueBackend {
    fn play_sample(&mut self, name: &str, volume: f32, looped: bool) {
        self.events.push(AudioEvent::Sample {
            name: name.to_string(),
            volume,
            looped,
        });
    }

    fn play_tone(&mut self, tone: &Tone, volume: f32) {
        self.events.push(AudioEvent::Tone {
            tone: tone.clone(),
            volume,
        });
    }

    fn stop(&mut self, name: &str) {
        self.events.push(AudioEvent::Stop {
            name: name.to_string(),
        });
    }

    fn stop_all(&mut self) {
        self.events.push(AudioEvent::StopAll);
    }
}

/// Registry, enable switch, and master volume over an audio backend.
pub struct SoundManager<B: AudioBackend> {
    backend: B,
    sounds: HashMap<String, SoundDef>,
    /// Playback stays muted until the host reports the audio context is
    /// unlocked (browsers require a user gesture first).
    enabled: bool,
    master_volume: f32,
    rng: Rng,
}

impl<B: AudioBackend> SoundManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sounds: HashMap::new(),
            enabled: false,
            master_volume: 0.7,
            rng: Rng::new(0xac1d),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Register a sample the host managed to load. Load failures simply
    /// never get registered, so their cues fall through to synthesis.
    pub fn register(&mut self, name: impl Into<String>, def: SoundDef) {
        let name = name.into();
        log::debug!("sound registered: {}", name);
        self.sounds.insert(name, def);
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    pub fn sound_names(&self) -> Vec<&str> {
        self.sounds.keys().map(String::as_str).collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle playback. Disabling also silences anything still playing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.backend.stop_all();
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Play one cue. Master volume scales multiplicatively everywhere:
    /// `effective = base * cue * master`.
    pub fn play(&mut self, cue: &SoundCue) {
        if !self.enabled {
            return;
        }
        if let Some(def) = self.sounds.get(cue.name.as_str()) {
            let volume = def.base_volume * cue.volume * self.master_volume;
            self.backend.play_sample(&cue.name, volume, def.looped);
        } else if let Some(tone) = tone_for(&cue.name, &mut self.rng) {
            let volume = tone.peak * cue.volume * self.master_volume;
            self.backend.play_tone(&tone, volume);
        } else {
            log::debug!("no sample or tone for cue {:?}", cue.name);
        }
    }

    /// Play every cue a frame emitted.
    pub fn dispatch(&mut self, cues: &[SoundCue]) {
        for cue in cues {
            self.play(cue);
        }
    }

    pub fn stop(&mut self, name: &str) {
        self.backend.stop(name);
    }

    pub fn stop_all(&mut self) {
        self.backend.stop_all();
    }

    /// Teardown: silence everything and drop the registry.
    pub fn dispose(&mut self) {
        self.backend.stop_all();
        self.sounds.clear();
        self.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SoundManager<QueueBackend> {
        let mut m = SoundManager::new(QueueBackend::new());
        m.set_enabled(true);
        m.backend_mut().drain();
        m
    }

    #[test]
    fn disabled_manager_emits_nothing() {
        let mut m = SoundManager::new(QueueBackend::new());
        m.register("walk_sound", SoundDef::default());
        m.play(&SoundCue::new("walk_sound", 1.0));
        assert!(m.backend().events().is_empty());
    }

    #[test]
    fn effective_volume_is_base_times_master() {
        let mut m = manager();
        m.register(
            "walk_sound",
            SoundDef {
                base_volume: 0.5,
                looped: false,
            },
        );
        m.set_master_volume(0.4);
        m.play(&SoundCue::new("walk_sound", 1.0));

        match &m.backend().events()[0] {
            AudioEvent::Sample { volume, .. } => {
                assert!((volume - 0.5 * 0.4).abs() < 1e-6);
            }
            other => panic!("expected a sample, got {:?}", other),
        }
    }

    #[test]
    fn master_volume_clamps_to_unit_range() {
        let mut m = manager();
        m.set_master_volume(3.0);
        assert_eq!(m.master_volume(), 1.0);
        m.set_master_volume(-1.0);
        assert_eq!(m.master_volume(), 0.0);
    }

    #[test]
    fn unregistered_cue_falls_back_to_a_tone() {
        let mut m = manager();
        m.play(&SoundCue::new("jump_pulse", 1.0));
        assert!(matches!(m.backend().events()[0], AudioEvent::Tone { .. }));
    }

    #[test]
    fn tone_volume_scales_by_master() {
        let mut m = manager();
        m.set_master_volume(0.5);
        m.play(&SoundCue::new("land", 1.0));
        match &m.backend().events()[0] {
            AudioEvent::Tone { tone, volume } => {
                assert!((volume - tone.peak * 0.5).abs() < 1e-6);
            }
            other => panic!("expected a tone, got {:?}", other),
        }
    }

    #[test]
    fn unknown_cue_is_swallowed() {
        let mut m = manager();
        m.play(&SoundCue::new("no_such_cue", 1.0));
        assert!(m.backend().events().is_empty());
    }

    #[test]
    fn disabling_stops_everything() {
        let mut m = manager();
        m.set_enabled(false);
        assert_eq!(m.backend().events().len(), 1);
        assert!(matches!(m.backend().events()[0], AudioEvent::StopAll));
    }

    #[test]
    fn dispatch_plays_each_cue() {
        let mut m = manager();
        m.dispatch(&[
            SoundCue::new("jump_pulse", 1.0),
            SoundCue::new("footstep", 1.0),
        ]);
        assert_eq!(m.backend().events().len(), 2);
    }
}
