use glam::Vec2;

use crate::api::types::{Color, EntityId};

/// Drawable primitive. The host compositor rasterizes these; the core only
/// describes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rounded rectangle, `offset` gives the top-left corner in
    /// node-local space.
    RoundedRect { width: f32, height: f32, radius: f32 },
    /// Circle centered on the shape offset.
    Circle { radius: f32 },
    /// Text label centered on the shape offset.
    Label { text: String, font_size: f32 },
}

/// Stroke drawn around a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// Shape attached to a node.
///
/// `offset` positions the drawable relative to the node origin. The node
/// origin is the pivot: rotation and bobbing happen around it, so a bone
/// whose rectangle extends from `offset.y = 0` toward `+y` swings about its
/// proximal joint rather than its centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeComponent {
    pub shape: Shape,
    pub offset: Vec2,
    pub color: Color,
    pub alpha: f32,
    pub stroke: Option<Stroke>,
}

impl ShapeComponent {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            color,
            alpha: 1.0,
            stroke: None,
        }
    }

    /// Rounded rectangle whose top edge is centered on the node origin and
    /// which extends toward `+y`. This is the bone silhouette: thickness
    /// across, length down, pivot at the proximal joint.
    pub fn bone(length: f32, thickness: f32, color: Color) -> Self {
        Self::new(
            Shape::RoundedRect {
                width: thickness,
                height: length,
                radius: thickness / 2.0,
            },
            color,
        )
        .with_offset(Vec2::new(-thickness / 2.0, 0.0))
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_stroke(mut self, width: f32, color: Color) -> Self {
        self.stroke = Some(Stroke { width, color });
        self
    }
}

/// Fat node: a single struct with an optional drawable.
/// Favors simplicity and rapid prototyping over ECS purity.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding nodes by name. Figure parts share a common
    /// prefix so a whole character can be torn down at once.
    pub tag: String,
    /// Inactive nodes are skipped by every system and by the draw list.
    pub active: bool,
    /// Pivot position in world space.
    pub pos: Vec2,
    /// Rotation in radians around the pivot.
    pub rotation: f32,
    /// Scale multiplier. `x = -1` mirrors the drawable.
    pub scale: Vec2,
    /// Draw order, higher values composite on top.
    pub z_index: i32,
    /// Drawable (optional, anchor nodes carry none).
    pub shape: Option<ShapeComponent>,
}

impl Node {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            z_index: 0,
            shape: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_shape(mut self, shape: ShapeComponent) -> Self {
        self.shape = Some(shape);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bone_shape_pivots_at_proximal_joint() {
        let shape = ShapeComponent::bone(26.0, 8.0, Color::WHITE);
        // Rect spans x in [-4, 4] and y in [0, 26] relative to the pivot.
        assert_eq!(shape.offset, Vec2::new(-4.0, 0.0));
        match shape.shape {
            Shape::RoundedRect {
                width,
                height,
                radius,
            } => {
                assert_eq!(width, 8.0);
                assert_eq!(height, 26.0);
                assert_eq!(radius, 4.0);
            }
            _ => panic!("expected a rounded rect"),
        }
    }

    #[test]
    fn degenerate_bone_does_not_crash() {
        let shape = ShapeComponent::bone(-5.0, 0.0, Color::WHITE);
        match shape.shape {
            Shape::RoundedRect { height, .. } => assert_eq!(height, -5.0),
            _ => panic!("expected a rounded rect"),
        }
    }

    #[test]
    fn builder_sets_fields() {
        let node = Node::new(EntityId(7))
            .with_tag("hero.torso")
            .with_pos(Vec2::new(100.0, 300.0))
            .with_z(10);
        assert_eq!(node.tag, "hero.torso");
        assert_eq!(node.z_index, 10);
        assert!(node.shape.is_none());
    }
}
