pub mod api;
pub mod core;
pub mod extensions;
pub mod input;
pub mod layout;
pub mod perf;
pub mod render;
pub mod rig;
pub mod skeletal;
pub mod sound;
pub mod stage;

// Re-export key types at crate root for convenience
pub use api::app::{StageConfig, StageContext};
pub use api::types::{Color, ColorParseError, EntityId, SoundCue, TrackId};
pub use core::clock::{Frame, SceneClock};
pub use core::node::{Node, Shape, ShapeComponent, Stroke};
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use input::commands::{Command, CommandQueue};
pub use layout::position::{presets, Position};
pub use layout::viewport::{content_scale, AspectRatio, DesignSize, Viewport};
pub use perf::FrameProfiler;
pub use render::draw_list::{build_draw_list, DrawInstance, DrawList};
pub use rig::animator::{AnimatorState, FigureAnimator};
pub use rig::bone::{BoneDesc, BoneId, Rig};
pub use rig::figure::{build_figure, Figure, FigureStyle, JointSet};
pub use rig::pose::{
    DirectionStyle, MotionParams, OverrideKind, OverridePose, PoseDriver, PoseState, Waveform,
};
pub use skeletal::avatar::{AvatarController, Facing};
pub use skeletal::runtime::{RecordingRuntime, RuntimeCall, SkeletalRuntime, TrackEvent};
pub use sound::manager::{AudioBackend, AudioEvent, QueueBackend, SoundDef, SoundManager};
pub use sound::tones::{Tone, ToneVoice, WaveShape};
pub use stage::ranking::{competition_ranks, rank_for_score};
pub use stage::roster::{CharacterRecord, Roster, RosterError};
pub use stage::stage::Stage;

// Extensions: decoupled optional systems
pub use extensions::{
    ease, ease_vec2, lerp, lerp_vec2, Easing, Tween, TweenId, TweenLoop, TweenState, TweenTarget,
};
