// stage/scenery.rs
//
// Background dressing: soft clouds drifting across a sky band, riding
// ping-pong tweens. Purely decorative, rebuilt on resize like the cast.

use glam::Vec2;

use crate::api::app::StageContext;
use crate::api::types::{Color, EntityId};
use crate::core::node::{Node, Shape, ShapeComponent};
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenLoop, TweenState};
use crate::layout::viewport::Viewport;

/// Fraction of the container height where clouds hang.
const SKY_BAND: f32 = 0.17;
/// Cloud pill geometry against the base design width.
const CLOUD_W: f32 = 120.0;
const CLOUD_H: f32 = 44.0;
const CLOUD_ALPHA: f32 = 0.85;
/// Clouds composite behind everything else.
const Z_CLOUDS: i32 = -100;

/// One drifting cloud.
#[derive(Debug, Clone, Copy)]
pub struct CloudSpec {
    /// Horizontal drift range in design pixels.
    pub travel: f32,
    /// Drift speed in design pixels per second.
    pub speed: f32,
    /// Start offset from the container center, design pixels.
    pub start_offset_x: f32,
    /// Size multiplier.
    pub scale: f32,
}

impl Default for CloudSpec {
    fn default() -> Self {
        Self {
            travel: 240.0,
            speed: 72.0,
            start_offset_x: 0.0,
            scale: 1.0,
        }
    }
}

/// A loose trio that reads well on the default stage.
pub fn default_clouds() -> Vec<CloudSpec> {
    vec![
        CloudSpec {
            start_offset_x: -260.0,
            speed: 54.0,
            scale: 0.8,
            ..CloudSpec::default()
        },
        CloudSpec::default(),
        CloudSpec {
            start_offset_x: 250.0,
            travel: 180.0,
            speed: 90.0,
            scale: 1.2,
            ..CloudSpec::default()
        },
    ]
}

/// Spawn cloud nodes and register their drift tweens.
/// Returns the spawned IDs so a resize can tear them down.
pub fn spawn_clouds(
    ctx: &mut StageContext,
    tweens: &mut TweenState,
    viewport: &Viewport,
    specs: &[CloudSpec],
) -> Vec<EntityId> {
    let ratio = viewport.width_ratio();
    let sky_y = viewport.height() * SKY_BAND;
    let center_x = viewport.width() / 2.0;

    let mut ids = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let w = CLOUD_W * spec.scale * ratio;
        let h = CLOUD_H * spec.scale * ratio;
        let shape = ShapeComponent::new(
            Shape::RoundedRect {
                width: w,
                height: h,
                radius: h / 2.0,
            },
            Color::WHITE,
        )
        .with_offset(Vec2::new(-w / 2.0, -h / 2.0))
        .with_alpha(CLOUD_ALPHA);

        let start_x = center_x + spec.start_offset_x * ratio;
        let id = ctx.next_id();
        ctx.scene.spawn(
            Node::new(id)
                .with_tag(format!("cloud.{}", i))
                .with_pos(Vec2::new(start_x, sky_y))
                .with_z(Z_CLOUDS)
                .with_shape(shape),
        );

        let travel = spec.travel * ratio;
        let speed = spec.speed * ratio;
        if travel > 0.0 && speed > 0.0 {
            let duration = travel / speed;
            tweens.add(
                id,
                Tween::position_x(
                    start_x - travel / 2.0,
                    start_x + travel / 2.0,
                    duration,
                    Easing::SineInOut,
                )
                .with_loop(TweenLoop::PingPong),
            );
        }
        ids.push(id);
    }
    ids
}
