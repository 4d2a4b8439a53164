// extensions/mod.rs
//
// Optional systems layered over the core scene. The stage opts in by
// constructing them; nothing here is required to render a static cast.

pub mod easing;
pub mod tween;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
pub use tween::{Tween, TweenId, TweenLoop, TweenState, TweenTarget};
