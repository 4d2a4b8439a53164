// rig/mod.rs
//
// The procedural limb-animation core: an arena of bones per character, a
// builder that assembles the humanoid, and the waveform pose driver that
// moves it every frame.

pub mod animator;
pub mod bone;
pub mod figure;
pub mod pose;

pub use animator::{AnimatorState, FigureAnimator};
pub use bone::{BoneDesc, BoneId, Rig};
pub use figure::{build_figure, Figure, FigureStyle, JointSet};
pub use pose::{
    DirectionStyle, MotionParams, OverrideKind, OverridePose, PoseDriver, PoseState, Waveform,
};
