use crate::api::types::{EntityId, SoundCue};
use crate::core::clock::SceneClock;
use crate::core::scene::Scene;
use crate::layout::viewport::{AspectRatio, DesignSize};

/// Configuration for the stage, provided once at startup.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Base design resolution all absolute layout is authored against.
    pub base: DesignSize,
    /// Fixed target aspect ratio; container height derives from width.
    pub aspect: AspectRatio,
    /// Animation time scale fed to the scene clock.
    pub time_scale: f32,
    /// Maximum number of draw instances per frame.
    pub max_instances: usize,
    /// Maximum number of sound cues per frame.
    pub max_cues: usize,
    /// Seed for the per-character motion randomness.
    pub seed: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            base: DesignSize::DEFAULT,
            aspect: AspectRatio::SIXTEEN_NINE,
            time_scale: SceneClock::DEFAULT_TIME_SCALE,
            max_instances: 512,
            max_cues: 32,
            seed: 0x5eed,
        }
    }
}

/// Mutable stage state threaded through every update.
pub struct StageContext {
    pub scene: Scene,
    /// Sound cues emitted this frame, drained by the host each tick.
    pub cues: Vec<SoundCue>,
    next_id: u32,
}

impl StageContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            cues: Vec::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound cue to be forwarded to the sound service.
    pub fn emit_cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.cues.clear();
    }
}

impl Default for StageContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = StageContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }

    #[test]
    fn cues_clear_each_frame() {
        let mut ctx = StageContext::new();
        ctx.emit_cue(SoundCue::new("jump_pulse", 1.0));
        assert_eq!(ctx.cues.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.cues.is_empty());
    }
}
