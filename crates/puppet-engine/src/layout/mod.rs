// layout/mod.rs
//
// Viewport mapping: fixed aspect ratio, base design resolution, and the
// three logical position addressing modes.

pub mod position;
pub mod viewport;

pub use position::{presets, Position};
pub use viewport::{content_scale, AspectRatio, DesignSize, Viewport};
