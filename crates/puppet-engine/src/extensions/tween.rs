// extensions/tween.rs
//
// Tween system managing animated node transitions by EntityId.
// Explicit character moves and drifting scenery run through here; the
// per-frame pose driver never does (it recomputes from waveforms instead).
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(node_id, Tween::position(from, to, 0.6, Easing::QuadOut));
//   tweens.tick(dt, &mut scene);

use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::scene::Scene;

use super::easing::{ease, ease_vec2, Easing};

/// What property a tween animates.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Animate Node.pos.
    Position { from: Vec2, to: Vec2 },
    /// Animate Node.pos.x only. Cloud drift.
    PositionX { from: f32, to: f32 },
    /// Animate Node.pos.y only.
    PositionY { from: f32, to: f32 },
    /// Animate the shape alpha (no-op for shapeless anchors).
    Alpha { from: f32, to: f32 },
}

/// What happens when a tween reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Reverse direction each cycle (ping-pong).
    PingPong,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration of one cycle in seconds.
    pub duration: f32,
    /// Elapsed time within the current cycle.
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
}

impl Tween {
    fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            forward: true,
        }
    }

    /// Tween a node's full position.
    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    /// Tween the horizontal position only.
    pub fn position_x(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::PositionX { from, to }, duration, easing)
    }

    /// Tween the vertical position only.
    pub fn position_y(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::PositionY { from, to }, duration, easing)
    }

    /// Tween the shape alpha.
    pub fn alpha(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, duration, easing)
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Whether the tween has completed (Once mode only).
    pub fn is_complete(&self) -> bool {
        self.loop_mode == TweenLoop::Once && self.elapsed >= self.duration
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for a node. Returns a handle for later control.
    pub fn add(&mut self, node: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (node, tween));
        id
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens for a node. Part of figure teardown: a despawned
    /// node must not keep receiving position writes.
    pub fn remove_entity(&mut self, node: EntityId) {
        self.tweens.retain(|_, (n, _)| *n != node);
    }

    /// Replace any position tween on the node with a new one.
    /// A second MoveTo should win, not fight the first.
    pub fn retarget(&mut self, node: EntityId, tween: Tween) -> TweenId {
        self.tweens.retain(|_, (n, t)| {
            *n != node || matches!(t.target, TweenTarget::Alpha { .. })
        });
        self.add(node, tween)
    }

    /// Advance all tweens and apply them to scene nodes.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let mut completed = Vec::new();

        for (&id, (node_id, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;

            let raw_t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };
            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            if let Some(node) = scene.get_mut(*node_id) {
                match tween.target {
                    TweenTarget::Position { from, to } => {
                        node.pos = ease_vec2(from, to, t, tween.easing);
                    }
                    TweenTarget::PositionX { from, to } => {
                        node.pos.x = ease(from, to, t, tween.easing);
                    }
                    TweenTarget::PositionY { from, to } => {
                        node.pos.y = ease(from, to, t, tween.easing);
                    }
                    TweenTarget::Alpha { from, to } => {
                        if let Some(shape) = &mut node.shape {
                            shape.alpha = ease(from, to, t, tween.easing);
                        }
                    }
                }
            }

            if tween.elapsed >= tween.duration {
                match tween.loop_mode {
                    TweenLoop::Once => completed.push(id),
                    TweenLoop::PingPong => {
                        tween.elapsed = 0.0;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.tweens.remove(&id);
        }

        count
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Clear all tweens.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;

    #[test]
    fn tween_position() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Node::new(id).with_pos(Vec2::ZERO));
        tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.0, Easing::Linear),
        );

        tweens.tick(0.5, &mut scene);
        let n = scene.get(id).unwrap();
        assert!((n.pos.x - 50.0).abs() < 0.01);

        tweens.tick(0.5, &mut scene);
        let n = scene.get(id).unwrap();
        assert!((n.pos.x - 100.0).abs() < 0.01);

        assert!(tweens.is_empty());
    }

    #[test]
    fn tween_ping_pong() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Node::new(id).with_pos(Vec2::ZERO));
        tweens.add(
            id,
            Tween::position_x(0.0, 100.0, 1.0, Easing::Linear).with_loop(TweenLoop::PingPong),
        );

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().pos.x - 100.0).abs() < 0.01);

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().pos.x - 0.0).abs() < 0.01);

        // Still registered after two full cycles.
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn remove_entity_tweens() {
        let mut tweens = TweenState::new();
        let id = EntityId(1);

        tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear),
        );
        tweens.add(id, Tween::alpha(0.0, 1.0, 1.0, Easing::Linear));

        assert_eq!(tweens.len(), 2);
        tweens.remove_entity(id);
        assert!(tweens.is_empty());
    }

    #[test]
    fn retarget_replaces_position_but_keeps_alpha() {
        let mut tweens = TweenState::new();
        let id = EntityId(1);

        tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear),
        );
        tweens.add(id, Tween::alpha(0.0, 1.0, 1.0, Easing::Linear));
        tweens.retarget(
            id,
            Tween::position(Vec2::ONE, Vec2::ZERO, 1.0, Easing::Linear),
        );

        assert_eq!(tweens.len(), 2);
    }
}
