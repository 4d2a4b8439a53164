// render/draw_list.rs
//
// The rendering-engine boundary. Each frame the scene is flattened into a
// z-sorted buffer of flat-float draw instances; the host compositor reads
// it and rasterizes. Nothing ever reads pixels back.

use bytemuck::{Pod, Zeroable};

use crate::core::node::{Node, Shape};

/// Shape kind codes in the wire protocol.
pub const KIND_ROUNDED_RECT: f32 = 0.0;
pub const KIND_CIRCLE: f32 = 1.0;
pub const KIND_LABEL: f32 = 2.0;

/// Per-instance draw data, 16 floats = 64 bytes stride.
/// Field meaning by kind:
///   rounded rect: dims = (width, height, corner radius)
///   circle:       dims = (radius, 0, 0)
///   label:        dims = (font size, label table index, 0)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DrawInstance {
    /// Pivot position in world space.
    pub x: f32,
    pub y: f32,
    /// Rotation around the pivot, radians.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Shape offset from the pivot, in node-local space.
    pub offset_x: f32,
    pub offset_y: f32,
    /// One of the KIND_* codes.
    pub kind: f32,
    pub dim_a: f32,
    pub dim_b: f32,
    pub dim_c: f32,
    /// Packed 0xRRGGBB fill color.
    pub color: f32,
    pub alpha: f32,
    /// Z order the buffer was sorted by, kept for host-side debugging.
    pub z: f32,
    pub stroke_width: f32,
    /// Packed 0xRRGGBB stroke color, meaningful when stroke_width > 0.
    pub stroke_color: f32,
}

impl DrawInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Z-sorted draw buffer plus the label text table.
pub struct DrawList {
    instances: Vec<DrawInstance>,
    /// Text for label instances, addressed by dim_b.
    labels: Vec<String>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(256),
            labels: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            labels: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.labels.clear();
    }

    pub fn instances(&self) -> &[DrawInstance] {
        &self.instances
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer for zero-copy host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten the scene into the draw list, lowest z first.
pub fn build_draw_list<'a>(nodes: impl Iterator<Item = &'a Node>, list: &mut DrawList) {
    list.clear();

    let mut drawable: Vec<&Node> = nodes
        .filter(|n| n.active && n.shape.is_some())
        .collect();
    // Stable sort keeps spawn order within a z layer.
    drawable.sort_by_key(|n| n.z_index);

    for node in drawable {
        let Some(component) = node.shape.as_ref() else {
            continue;
        };
        let (kind, dims) = match &component.shape {
            Shape::RoundedRect {
                width,
                height,
                radius,
            } => (KIND_ROUNDED_RECT, [*width, *height, *radius]),
            Shape::Circle { radius } => (KIND_CIRCLE, [*radius, 0.0, 0.0]),
            Shape::Label { text, font_size } => {
                let index = list.labels.len() as f32;
                list.labels.push(text.clone());
                (KIND_LABEL, [*font_size, index, 0.0])
            }
        };
        let (stroke_width, stroke_color) = component
            .stroke
            .map(|s| (s.width, s.color.0 as f32))
            .unwrap_or((0.0, 0.0));

        list.instances.push(DrawInstance {
            x: node.pos.x,
            y: node.pos.y,
            rotation: node.rotation,
            scale_x: node.scale.x,
            scale_y: node.scale.y,
            offset_x: component.offset.x,
            offset_y: component.offset.y,
            kind,
            dim_a: dims[0],
            dim_b: dims[1],
            dim_c: dims[2],
            color: component.color.0 as f32,
            alpha: component.alpha,
            z: node.z_index as f32,
            stroke_width,
            stroke_color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, EntityId};
    use crate::core::node::ShapeComponent;
    use crate::core::scene::Scene;
    use glam::Vec2;

    fn circle(id: u32, z: i32) -> Node {
        Node::new(EntityId(id))
            .with_z(z)
            .with_shape(ShapeComponent::new(
                Shape::Circle { radius: 10.0 },
                Color::WHITE,
            ))
    }

    #[test]
    fn instance_is_sixteen_floats() {
        assert_eq!(std::mem::size_of::<DrawInstance>(), 64);
        assert_eq!(DrawInstance::FLOATS, 16);
    }

    #[test]
    fn sorts_by_z_order() {
        let mut scene = Scene::new();
        scene.spawn(circle(1, 1000));
        scene.spawn(circle(2, -100));
        scene.spawn(circle(3, 10));

        let mut list = DrawList::new();
        build_draw_list(scene.iter(), &mut list);

        let zs: Vec<f32> = list.instances().iter().map(|i| i.z).collect();
        assert_eq!(zs, vec![-100.0, 10.0, 1000.0]);
    }

    #[test]
    fn skips_inactive_and_shapeless_nodes() {
        let mut scene = Scene::new();
        scene.spawn(Node::new(EntityId(1)));
        let mut hidden = circle(2, 0);
        hidden.active = false;
        scene.spawn(hidden);
        scene.spawn(circle(3, 0));

        let mut list = DrawList::new();
        build_draw_list(scene.iter(), &mut list);
        assert_eq!(list.instance_count(), 1);
    }

    #[test]
    fn labels_land_in_the_text_table() {
        let mut scene = Scene::new();
        scene.spawn(
            Node::new(EntityId(1))
                .with_pos(Vec2::new(5.0, 6.0))
                .with_shape(ShapeComponent::new(
                    Shape::Label {
                        text: "Mori".to_string(),
                        font_size: 11.0,
                    },
                    Color::BLACK,
                )),
        );

        let mut list = DrawList::new();
        build_draw_list(scene.iter(), &mut list);

        let inst = &list.instances()[0];
        assert_eq!(inst.kind, KIND_LABEL);
        assert_eq!(inst.dim_b, 0.0);
        assert_eq!(list.labels().len(), 1);
        assert_eq!(list.labels()[0], "Mori");
    }

    #[test]
    fn stroke_fields_carry_through() {
        let mut scene = Scene::new();
        scene.spawn(
            Node::new(EntityId(1)).with_shape(
                ShapeComponent::new(
                    Shape::RoundedRect {
                        width: 80.0,
                        height: 25.0,
                        radius: 12.5,
                    },
                    Color::WHITE,
                )
                .with_stroke(2.0, Color::BLACK),
            ),
        );

        let mut list = DrawList::new();
        build_draw_list(scene.iter(), &mut list);
        let inst = &list.instances()[0];
        assert_eq!(inst.stroke_width, 2.0);
        assert_eq!(inst.stroke_color, 0.0);
        assert_eq!(inst.color, 0xffffff as f32);
    }

    #[test]
    fn rebuild_clears_previous_frame() {
        let mut scene = Scene::new();
        scene.spawn(circle(1, 0));
        let mut list = DrawList::new();
        build_draw_list(scene.iter(), &mut list);
        build_draw_list(scene.iter(), &mut list);
        assert_eq!(list.instance_count(), 1);
    }
}
