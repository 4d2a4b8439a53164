// rig/bone.rs
//
// Bone arena: the hierarchy of rigid segments making up one character.
// The arena is the single source of truth for parent-child structure; the
// scene graph only receives flattened world transforms. Rotating a bone
// swings every descendant through the composed transform chain.

use glam::Vec2;

use crate::api::types::{Color, EntityId};
use crate::core::scene::Scene;

/// Index of a bone within its rig's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneId(pub usize);

/// Geometry of a single rigid segment.
///
/// Length runs from the proximal joint (the pivot) to the distal tip.
/// Negative or zero lengths are allowed and simply produce degenerate
/// geometry, never a panic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneDesc {
    pub length: f32,
    pub thickness: f32,
    pub color: Color,
}

impl BoneDesc {
    pub fn new(length: f32, thickness: f32, color: Color) -> Self {
        Self {
            length,
            thickness,
            color,
        }
    }

    /// Zero-size descriptor for pure attachment anchors (shoulders, hips,
    /// label mounts).
    pub fn anchor() -> Self {
        Self::new(0.0, 0.0, Color::WHITE)
    }
}

#[derive(Debug, Clone)]
struct Bone {
    tag: String,
    desc: BoneDesc,
    /// Local offset from the parent's origin (for roots: from the rig
    /// origin). Children attached at a distal tip get `(0, parent.length)`.
    offset: Vec2,
    /// Local rotation around the proximal joint.
    rotation: f32,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    /// Scene node carrying this bone's drawable, if bound.
    node: Option<EntityId>,
}

/// Arena of bones forming one character's skeleton.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    bones: Vec<Bone>,
    roots: Vec<BoneId>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, bone: Bone) -> BoneId {
        let id = BoneId(self.bones.len());
        if bone.parent.is_none() {
            self.roots.push(id);
        }
        self.bones.push(bone);
        id
    }

    /// Add a root bone at a local offset from the rig origin.
    pub fn add_root(&mut self, tag: impl Into<String>, desc: BoneDesc, offset: Vec2) -> BoneId {
        self.push(Bone {
            tag: tag.into(),
            desc,
            offset,
            rotation: 0.0,
            parent: None,
            children: Vec::new(),
            node: None,
        })
    }

    /// Attach a child at the parent's distal tip: the child's proximal
    /// joint lands exactly where the parent ends.
    pub fn attach(&mut self, parent: BoneId, tag: impl Into<String>, desc: BoneDesc) -> BoneId {
        let tip = self.distal_point(parent);
        self.attach_at(parent, tag, desc, tip)
    }

    /// Attach a child at an arbitrary local offset from the parent origin.
    /// Used for anchors that sit beside the parent rather than below it
    /// (shoulders on the torso top, hips on the torso bottom).
    pub fn attach_at(
        &mut self,
        parent: BoneId,
        tag: impl Into<String>,
        desc: BoneDesc,
        offset: Vec2,
    ) -> BoneId {
        let id = self.push(Bone {
            tag: tag.into(),
            desc,
            offset,
            rotation: 0.0,
            parent: Some(parent),
            children: Vec::new(),
            node: None,
        });
        self.bones[parent.0].children.push(id);
        id
    }

    /// The distal attachment point of a bone in its own local space.
    pub fn distal_point(&self, id: BoneId) -> Vec2 {
        Vec2::new(0.0, self.bones[id.0].desc.length)
    }

    /// Bind a scene node to receive this bone's world transform.
    pub fn bind(&mut self, id: BoneId, node: EntityId) {
        self.bones[id.0].node = Some(node);
    }

    pub fn desc(&self, id: BoneId) -> BoneDesc {
        self.bones[id.0].desc
    }

    pub fn set_rotation(&mut self, id: BoneId, rotation: f32) {
        self.bones[id.0].rotation = rotation;
    }

    pub fn rotation(&self, id: BoneId) -> f32 {
        self.bones[id.0].rotation
    }

    /// Move a bone relative to its parent. The head bob drives this.
    pub fn set_offset(&mut self, id: BoneId, offset: Vec2) {
        self.bones[id.0].offset = offset;
    }

    pub fn offset(&self, id: BoneId) -> Vec2 {
        self.bones[id.0].offset
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bones[id.0].parent
    }

    pub fn children(&self, id: BoneId) -> &[BoneId] {
        &self.bones[id.0].children
    }

    pub fn find(&self, tag: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .position(|b| b.tag == tag)
            .map(BoneId)
    }

    pub fn node(&self, id: BoneId) -> Option<EntityId> {
        self.bones[id.0].node
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// World-space position and rotation of one bone, composed root-down.
    pub fn world_transform(&self, id: BoneId, origin: Vec2) -> (Vec2, f32) {
        let bone = &self.bones[id.0];
        let (parent_pos, parent_rot) = match bone.parent {
            Some(p) => self.world_transform(p, origin),
            None => (origin, 0.0),
        };
        compose(parent_pos, parent_rot, bone.offset, bone.rotation)
    }

    /// Flatten local transforms into world space and write them to every
    /// bound scene node. Roots first, then children recursively, so each
    /// bone's rotation swings all of its descendants.
    pub fn propagate(&self, origin: Vec2, scene: &mut Scene) {
        for &root in &self.roots {
            self.propagate_recursive(root, origin, 0.0, scene);
        }
    }

    fn propagate_recursive(
        &self,
        id: BoneId,
        parent_pos: Vec2,
        parent_rot: f32,
        scene: &mut Scene,
    ) {
        let bone = &self.bones[id.0];
        let (world_pos, world_rot) = compose(parent_pos, parent_rot, bone.offset, bone.rotation);

        if let Some(node_id) = bone.node {
            if let Some(node) = scene.get_mut(node_id) {
                node.pos = world_pos;
                node.rotation = world_rot;
            }
        }

        for &child in &bone.children {
            self.propagate_recursive(child, world_pos, world_rot, scene);
        }
    }
}

/// Rotate the local offset into the parent frame, then translate.
#[inline]
fn compose(parent_pos: Vec2, parent_rot: f32, offset: Vec2, rotation: f32) -> (Vec2, f32) {
    let (sin_r, cos_r) = parent_rot.sin_cos();
    let rotated = Vec2::new(
        offset.x * cos_r - offset.y * sin_r,
        offset.x * sin_r + offset.y * cos_r,
    );
    (parent_pos + rotated, parent_rot + rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;
    use std::f32::consts::FRAC_PI_2;

    fn bone_desc(length: f32) -> BoneDesc {
        BoneDesc::new(length, 8.0, Color::WHITE)
    }

    #[test]
    fn attach_places_child_at_distal_tip() {
        let mut rig = Rig::new();
        let upper = rig.add_root("arm.upper", bone_desc(20.0), Vec2::ZERO);
        let lower = rig.attach(upper, "arm.lower", bone_desc(26.0));
        assert_eq!(rig.offset(lower), Vec2::new(0.0, 20.0));
        assert_eq!(rig.parent(lower), Some(upper));
        assert_eq!(rig.children(upper), &[lower]);
    }

    #[test]
    fn parent_rotation_swings_children() {
        let mut rig = Rig::new();
        let upper = rig.add_root("arm.upper", bone_desc(20.0), Vec2::ZERO);
        let lower = rig.attach(upper, "arm.lower", bone_desc(26.0));

        // Straight down: child sits 20 below the origin.
        let (pos, rot) = rig.world_transform(lower, Vec2::ZERO);
        assert!((pos - Vec2::new(0.0, 20.0)).length() < 1e-5);
        assert_eq!(rot, 0.0);

        // Rotate the parent 90 degrees: the elbow swings sideways and the
        // child inherits the rotation.
        rig.set_rotation(upper, FRAC_PI_2);
        let (pos, rot) = rig.world_transform(lower, Vec2::ZERO);
        assert!((pos - Vec2::new(-20.0, 0.0)).length() < 1e-5, "pos {:?}", pos);
        assert!((rot - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn propagate_writes_bound_nodes() {
        let mut rig = Rig::new();
        let mut scene = Scene::new();
        let root = rig.add_root("torso", bone_desc(60.0), Vec2::ZERO);
        let child = rig.attach(root, "arm", bone_desc(20.0));

        scene.spawn(Node::new(EntityId(1)));
        scene.spawn(Node::new(EntityId(2)));
        rig.bind(root, EntityId(1));
        rig.bind(child, EntityId(2));

        rig.propagate(Vec2::new(100.0, 300.0), &mut scene);

        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec2::new(100.0, 300.0));
        assert_eq!(scene.get(EntityId(2)).unwrap().pos, Vec2::new(100.0, 360.0));
    }

    #[test]
    fn unbound_bones_are_skipped() {
        let mut rig = Rig::new();
        let mut scene = Scene::new();
        rig.add_root("anchor", BoneDesc::anchor(), Vec2::ZERO);
        // No nodes bound, nothing to write, and no panic.
        rig.propagate(Vec2::ZERO, &mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn degenerate_lengths_do_not_crash() {
        let mut rig = Rig::new();
        let root = rig.add_root("stub", bone_desc(-10.0), Vec2::ZERO);
        let child = rig.attach(root, "stub.child", bone_desc(0.0));
        let (pos, _) = rig.world_transform(child, Vec2::ZERO);
        assert_eq!(pos, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn find_by_tag() {
        let mut rig = Rig::new();
        rig.add_root("torso", bone_desc(60.0), Vec2::ZERO);
        let head = rig.find("torso").unwrap();
        assert_eq!(head, BoneId(0));
        assert!(rig.find("missing").is_none());
    }
}
