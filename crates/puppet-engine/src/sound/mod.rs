// sound/mod.rs
//
// Fire-and-forget sound: a service over a host audio backend, with
// procedural tone synthesis as the fallback for missing samples.

pub mod manager;
pub mod tones;

pub use manager::{AudioBackend, AudioEvent, QueueBackend, SoundDef, SoundManager};
pub use tones::{tone_for, Tone, ToneVoice, WaveShape};
