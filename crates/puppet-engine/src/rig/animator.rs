// rig/animator.rs
//
// Per-figure frame callbacks, keyed by the figure's anchor node. This is
// the registration/deregistration boundary: a figure animates only while
// its animator is registered here, and `remove` on the teardown path
// guarantees a destroyed figure is never mutated again.

use std::collections::HashMap;

use crate::api::types::EntityId;
use crate::core::clock::Frame;
use crate::core::scene::Scene;
use crate::rig::figure::Figure;
use crate::rig::pose::PoseDriver;

/// One figure plus its pose driver.
#[derive(Debug, Clone)]
pub struct FigureAnimator {
    pub figure: Figure,
    pub driver: PoseDriver,
}

impl FigureAnimator {
    pub fn new(figure: Figure, driver: PoseDriver) -> Self {
        Self { figure, driver }
    }

    /// Advance one frame: read the anchor (tweens may have moved it),
    /// compute the pose, and flatten the rig into the scene.
    pub fn tick(&mut self, frame: Frame, scene: &mut Scene) {
        // Anchor gone means the figure is mid-teardown; touch nothing.
        let Some(home) = scene.get(self.figure.anchor).map(|n| n.pos) else {
            return;
        };
        let origin = self
            .driver
            .apply(frame.time, frame.dt, &mut self.figure, home);
        self.figure.rig.propagate(origin, scene);
    }

    pub fn start_jump(&mut self) {
        let ratio = self.figure.ratio;
        self.driver.start_jump(ratio);
    }
}

/// Registry of all running figure animators.
#[derive(Debug, Default)]
pub struct AnimatorState {
    animators: HashMap<EntityId, FigureAnimator>,
}

impl AnimatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animator under its figure's anchor ID.
    pub fn register(&mut self, animator: FigureAnimator) -> EntityId {
        let key = animator.figure.anchor;
        self.animators.insert(key, animator);
        key
    }

    /// Deregister. The returned animator carries the figure's node list so
    /// the caller can despawn them on the same path.
    pub fn remove(&mut self, anchor: EntityId) -> Option<FigureAnimator> {
        self.animators.remove(&anchor)
    }

    pub fn get(&self, anchor: EntityId) -> Option<&FigureAnimator> {
        self.animators.get(&anchor)
    }

    pub fn get_mut(&mut self, anchor: EntityId) -> Option<&mut FigureAnimator> {
        self.animators.get_mut(&anchor)
    }

    pub fn contains(&self, anchor: EntityId) -> bool {
        self.animators.contains_key(&anchor)
    }

    /// Advance every registered animator by one frame.
    pub fn tick(&mut self, frame: Frame, scene: &mut Scene) {
        for animator in self.animators.values_mut() {
            animator.tick(frame, scene);
        }
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    pub fn clear(&mut self) {
        self.animators.clear();
    }
}
