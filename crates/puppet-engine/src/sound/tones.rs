// sound/tones.rs
//
// Procedural fallback effects: when a cue has no sample registered, the
// manager synthesizes one of these oscillator recipes instead. The host
// audio backend realizes them; here they are pure data.

use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
}

/// One oscillator: frequency ramps linearly from `start_freq` to
/// `end_freq` over `duration`, starting after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneVoice {
    pub shape: WaveShape,
    pub start_freq: f32,
    pub end_freq: f32,
    pub delay: f32,
    pub duration: f32,
    /// Per-voice gain relative to the tone peak.
    pub gain: f32,
}

impl ToneVoice {
    fn new(shape: WaveShape, start_freq: f32, end_freq: f32, delay: f32, duration: f32) -> Self {
        Self {
            shape,
            start_freq,
            end_freq,
            delay,
            duration,
            gain: 1.0,
        }
    }

    fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }
}

/// A complete synthesized effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub voices: Vec<ToneVoice>,
    /// Peak amplitude before the master/cue gain is applied.
    pub peak: f32,
}

impl Tone {
    fn single(shape: WaveShape, start: f32, end: f32, duration: f32, peak: f32) -> Self {
        Self {
            voices: vec![ToneVoice::new(shape, start, end, 0.0, duration)],
            peak,
        }
    }

    /// Short dull tap.
    pub fn footstep() -> Self {
        Self::single(WaveShape::Sine, 200.0, 200.0, 0.1, 0.05)
    }

    /// Rising sine plus a delayed falling triangle.
    pub fn jump() -> Self {
        Self {
            voices: vec![
                ToneVoice::new(WaveShape::Sine, 200.0, 500.0, 0.0, 0.3),
                ToneVoice::new(WaveShape::Triangle, 400.0, 150.0, 0.1, 0.2),
            ],
            peak: 0.15,
        }
    }

    /// Single sharp rising square.
    pub fn jump_simple() -> Self {
        Self::single(WaveShape::Square, 150.0, 400.0, 0.25, 0.12)
    }

    /// Three quick pulses stepping up in pitch and down in gain.
    pub fn jump_pulse() -> Self {
        let voices = (0..3)
            .map(|i| {
                let freq = 300.0 + i as f32 * 50.0;
                ToneVoice::new(WaveShape::Sine, freq, freq, i as f32 * 0.05, 0.1)
                    .with_gain(1.0 - i as f32 * 0.3)
            })
            .collect();
        Self { voices, peak: 0.1 }
    }

    /// Two rapid taps.
    pub fn run() -> Self {
        Self {
            voices: vec![
                ToneVoice::new(WaveShape::Sine, 250.0, 250.0, 0.0, 0.05),
                ToneVoice::new(WaveShape::Sine, 200.0, 200.0, 0.05, 0.05),
            ],
            peak: 0.04,
        }
    }

    /// High short click.
    pub fn button_click() -> Self {
        Self::single(WaveShape::Sine, 800.0, 800.0, 0.1, 0.08)
    }

    /// Low thud.
    pub fn land() -> Self {
        Self::single(WaveShape::Sine, 150.0, 150.0, 0.15, 0.06)
    }

    /// Rising chime.
    pub fn notification() -> Self {
        Self::single(WaveShape::Sine, 400.0, 800.0, 0.3, 0.1)
    }

    /// Total length including delays.
    pub fn duration(&self) -> f32 {
        self.voices
            .iter()
            .map(|v| v.delay + v.duration)
            .fold(0.0, f32::max)
    }
}

/// Resolve a cue name to a fallback recipe. Jump cues pick a variant at
/// random so repeated jumps do not sound identical.
pub fn tone_for(name: &str, rng: &mut Rng) -> Option<Tone> {
    match name {
        "walk_sound" | "footstep" => Some(Tone::footstep()),
        "jump_sound" | "jump" => Some(match rng.next_int(3) {
            0 => Tone::jump(),
            1 => Tone::jump_simple(),
            _ => Tone::jump_pulse(),
        }),
        "jump_01" | "jump_02" | "jump_03" => Some(Tone::jump()),
        "jump_simple" => Some(Tone::jump_simple()),
        "jump_pulse" => Some(Tone::jump_pulse()),
        "run_sound" | "run" => Some(Tone::run()),
        "button_sound" | "button_click" => Some(Tone::button_click()),
        "land_sound" | "land" => Some(Tone::land()),
        "notification_sound" | "notification" => Some(Tone::notification()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        let mut rng = Rng::new(1);
        for name in [
            "footstep",
            "walk_sound",
            "jump",
            "jump_pulse",
            "run",
            "button_click",
            "land",
            "notification",
        ] {
            assert!(tone_for(name, &mut rng).is_some(), "no tone for {}", name);
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let mut rng = Rng::new(1);
        assert!(tone_for("explosion", &mut rng).is_none());
    }

    #[test]
    fn jump_cue_picks_among_variants() {
        let mut rng = Rng::new(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let tone = tone_for("jump", &mut rng).unwrap();
            seen.insert(tone.voices.len());
        }
        // The three variants have distinct voice counts (2, 1, 3).
        assert!(seen.len() >= 2, "variants never alternated: {:?}", seen);
    }

    #[test]
    fn pulse_gains_step_down() {
        let pulse = Tone::jump_pulse();
        assert_eq!(pulse.voices.len(), 3);
        assert!(pulse.voices[0].gain > pulse.voices[1].gain);
        assert!(pulse.voices[1].gain > pulse.voices[2].gain);
    }

    #[test]
    fn duration_spans_delays() {
        let jump = Tone::jump();
        assert!((jump.duration() - 0.3).abs() < 1e-6);
        let pulse = Tone::jump_pulse();
        assert!((pulse.duration() - 0.2).abs() < 1e-6);
    }
}
