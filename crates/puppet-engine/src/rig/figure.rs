// rig/figure.rs
//
// Assembles the full humanoid rig for one character: torso, head, two arm
// chains, two leg chains, feet, and the name tag. All geometry is authored
// against the 800-wide base design and multiplied by the viewport ratio,
// so a rebuild at a new width reproduces the same proportions.

use glam::Vec2;

use crate::api::app::StageContext;
use crate::api::types::{Color, EntityId};
use crate::core::node::{Node, Shape, ShapeComponent};
use crate::rig::bone::{BoneDesc, BoneId, Rig};

// Base-design geometry (multiplied by the viewport width ratio).
const TORSO_W: f32 = 60.0;
const TORSO_H: f32 = 60.0;
const TORSO_RADIUS: f32 = 10.0;
const HEAD_RADIUS: f32 = 30.0;
const HEAD_REST_Y: f32 = -40.0;
const UPPER_ARM_LEN: f32 = 20.0;
const UPPER_ARM_THICK: f32 = 8.0;
const LOWER_ARM_LEN: f32 = 26.0;
const LOWER_ARM_THICK: f32 = 7.0;
const HIP_SPREAD: f32 = 18.0;
const THIGH_LEN: f32 = 26.0;
const THIGH_THICK: f32 = 9.0;
const SHIN_LEN: f32 = 24.0;
const SHIN_THICK: f32 = 8.0;
const FOOT_LEN: f32 = 14.0;
const FOOT_THICK: f32 = 6.0;
const NAME_TAG_HEIGHT: f32 = 25.0;
const NAME_TAG_MIN_WIDTH: f32 = 80.0;
const NAME_TAG_CHAR_WIDTH: f32 = 12.0;
const NAME_TAG_DROP: f32 = 27.0;
const NAME_FONT_SIZE: f32 = 11.0;

// Draw order within a figure. Legs sit behind the torso, the name tag
// always composites on top.
const Z_LEGS: i32 = 5;
const Z_TORSO: i32 = 10;
const Z_HEAD: i32 = 20;
const Z_ARMS: i32 = 30;
const Z_NAME_TAG: i32 = 1000;
const Z_NAME_TEXT: i32 = 1001;

/// Visual attributes a figure is built from.
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub name: String,
    pub body: Color,
    pub face: Color,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            body: Color::BODY_DEFAULT,
            face: Color::FACE_DEFAULT,
        }
    }
}

/// Handles to every animated joint of a built figure.
#[derive(Debug, Clone, Copy)]
pub struct JointSet {
    pub head: BoneId,
    pub upper_arm_l: BoneId,
    pub lower_arm_l: BoneId,
    pub upper_arm_r: BoneId,
    pub lower_arm_r: BoneId,
    pub thigh_l: BoneId,
    pub shin_l: BoneId,
    pub foot_l: BoneId,
    pub thigh_r: BoneId,
    pub shin_r: BoneId,
    pub foot_r: BoneId,
}

/// One assembled character: rig, joint handles, and the scene nodes the
/// rig writes into. Destroying a figure means despawning `nodes` and
/// deregistering its animator, nothing else holds onto it.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Shapeless anchor node. Its world position is the character's ground
    /// point; tweens move it, the pose driver bobs around it.
    pub anchor: EntityId,
    /// Tag prefix shared by every node of this figure.
    pub family: String,
    pub rig: Rig,
    pub joints: JointSet,
    /// Every spawned node, anchor included, for teardown.
    pub nodes: Vec<EntityId>,
    /// Width ratio the geometry was built at.
    pub ratio: f32,
    /// Head rest offset (local to the torso), bob oscillates around it.
    pub head_rest_y: f32,
}

/// Build a figure and spawn its nodes at `origin`.
///
/// `index` keys the tag family; callers rebuild a character by tearing
/// down the old family and calling this again with the new attributes.
pub fn build_figure(
    ctx: &mut StageContext,
    index: usize,
    style: &FigureStyle,
    origin: Vec2,
    ratio: f32,
) -> Figure {
    let family = format!("figure.{}.", index);
    let mut rig = Rig::new();
    let mut nodes = Vec::new();

    let mut spawn = |ctx: &mut StageContext,
                     nodes: &mut Vec<EntityId>,
                     tag: &str,
                     z: i32,
                     shape: Option<ShapeComponent>|
     -> EntityId {
        let id = ctx.next_id();
        let mut node = Node::new(id).with_tag(format!("{}{}", family, tag)).with_z(z);
        if let Some(shape) = shape {
            node = node.with_shape(shape);
        }
        ctx.scene.spawn(node);
        nodes.push(id);
        id
    };

    // Anchor: the character's ground point. No drawable.
    let anchor = spawn(ctx, &mut nodes, "root", 0, None);

    // Torso hangs upward from the root: rect spans y in [-h, 0] so the
    // pivot is its own bottom edge.
    let torso = rig.add_root(
        "torso",
        BoneDesc::new(TORSO_H * ratio, TORSO_W * ratio, style.body),
        Vec2::ZERO,
    );
    let torso_shape = ShapeComponent::new(
        Shape::RoundedRect {
            width: TORSO_W * ratio,
            height: TORSO_H * ratio,
            radius: TORSO_RADIUS * ratio,
        },
        style.body,
    )
    .with_offset(Vec2::new(-TORSO_W / 2.0 * ratio, -TORSO_H * ratio));
    let torso_node = spawn(ctx, &mut nodes, "torso", Z_TORSO, Some(torso_shape));
    rig.bind(torso, torso_node);

    // Head: a circle riding above the torso top, free to bob vertically.
    let head_rest_y = HEAD_REST_Y * ratio;
    let head = rig.attach_at(
        torso,
        "head",
        BoneDesc::anchor(),
        Vec2::new(0.0, head_rest_y),
    );
    let head_shape = ShapeComponent::new(
        Shape::Circle {
            radius: HEAD_RADIUS * ratio,
        },
        style.face,
    );
    let head_node = spawn(ctx, &mut nodes, "head", Z_HEAD, Some(head_shape));
    rig.bind(head, head_node);

    // Shoulder anchors at the torso's top corners.
    let half_w = TORSO_W / 2.0 * ratio;
    let shoulder_l = rig.attach_at(
        torso,
        "shoulder.l",
        BoneDesc::anchor(),
        Vec2::new(-half_w, -TORSO_H * ratio),
    );
    let shoulder_r = rig.attach_at(
        torso,
        "shoulder.r",
        BoneDesc::anchor(),
        Vec2::new(half_w, -TORSO_H * ratio),
    );

    let mut arm_chain = |rig: &mut Rig,
                         ctx: &mut StageContext,
                         nodes: &mut Vec<EntityId>,
                         shoulder: BoneId,
                         side: &str|
     -> (BoneId, BoneId) {
        let upper = rig.attach(
            shoulder,
            format!("arm.upper.{}", side),
            BoneDesc::new(UPPER_ARM_LEN * ratio, UPPER_ARM_THICK * ratio, Color::WHITE),
        );
        let upper_node = spawn(
            ctx,
            nodes,
            &format!("arm.upper.{}", side),
            Z_ARMS,
            Some(ShapeComponent::bone(
                UPPER_ARM_LEN * ratio,
                UPPER_ARM_THICK * ratio,
                Color::WHITE,
            )),
        );
        rig.bind(upper, upper_node);

        // Forearm hangs from the upper arm's distal tip.
        let lower = rig.attach(
            upper,
            format!("arm.lower.{}", side),
            BoneDesc::new(LOWER_ARM_LEN * ratio, LOWER_ARM_THICK * ratio, Color::WHITE),
        );
        let lower_node = spawn(
            ctx,
            nodes,
            &format!("arm.lower.{}", side),
            Z_ARMS,
            Some(ShapeComponent::bone(
                LOWER_ARM_LEN * ratio,
                LOWER_ARM_THICK * ratio,
                Color::WHITE,
            )),
        );
        rig.bind(lower, lower_node);
        (upper, lower)
    };

    let (upper_arm_l, lower_arm_l) = arm_chain(&mut rig, ctx, &mut nodes, shoulder_l, "l");
    let (upper_arm_r, lower_arm_r) = arm_chain(&mut rig, ctx, &mut nodes, shoulder_r, "r");

    // Hip anchors at the torso bottom, legs hang below the root.
    let hip_l = rig.attach_at(
        torso,
        "hip.l",
        BoneDesc::anchor(),
        Vec2::new(-HIP_SPREAD * ratio, 0.0),
    );
    let hip_r = rig.attach_at(
        torso,
        "hip.r",
        BoneDesc::anchor(),
        Vec2::new(HIP_SPREAD * ratio, 0.0),
    );

    let mut leg_chain = |rig: &mut Rig,
                         ctx: &mut StageContext,
                         nodes: &mut Vec<EntityId>,
                         hip: BoneId,
                         side: &str|
     -> (BoneId, BoneId, BoneId) {
        let thigh = rig.attach(
            hip,
            format!("leg.thigh.{}", side),
            BoneDesc::new(THIGH_LEN * ratio, THIGH_THICK * ratio, Color::WHITE),
        );
        let thigh_node = spawn(
            ctx,
            nodes,
            &format!("leg.thigh.{}", side),
            Z_LEGS,
            Some(ShapeComponent::bone(
                THIGH_LEN * ratio,
                THIGH_THICK * ratio,
                Color::WHITE,
            )),
        );
        rig.bind(thigh, thigh_node);

        let shin = rig.attach(
            thigh,
            format!("leg.shin.{}", side),
            BoneDesc::new(SHIN_LEN * ratio, SHIN_THICK * ratio, Color::WHITE),
        );
        let shin_node = spawn(
            ctx,
            nodes,
            &format!("leg.shin.{}", side),
            Z_LEGS,
            Some(ShapeComponent::bone(
                SHIN_LEN * ratio,
                SHIN_THICK * ratio,
                Color::WHITE,
            )),
        );
        rig.bind(shin, shin_node);

        // Foot: a level pad at the ankle, pointing forward.
        let foot = rig.attach(shin, format!("leg.foot.{}", side), BoneDesc::anchor());
        let foot_shape = ShapeComponent::new(
            Shape::RoundedRect {
                width: FOOT_LEN * ratio,
                height: FOOT_THICK * ratio,
                radius: FOOT_THICK / 2.0 * ratio,
            },
            Color::WHITE,
        )
        .with_offset(Vec2::new(-FOOT_LEN / 3.0 * ratio, 0.0));
        let foot_node = spawn(
            ctx,
            nodes,
            &format!("leg.foot.{}", side),
            Z_LEGS,
            Some(foot_shape),
        );
        rig.bind(foot, foot_node);
        (thigh, shin, foot)
    };

    let (thigh_l, shin_l, foot_l) = leg_chain(&mut rig, ctx, &mut nodes, hip_l, "l");
    let (thigh_r, shin_r, foot_r) = leg_chain(&mut rig, ctx, &mut nodes, hip_r, "r");

    // Name tag: mounted on the root so it never inherits limb motion.
    if !style.name.is_empty() {
        let tag_width =
            (style.name.chars().count() as f32 * NAME_TAG_CHAR_WIDTH).max(NAME_TAG_MIN_WIDTH)
                * ratio;
        let tag_height = NAME_TAG_HEIGHT * ratio;
        let drop = NAME_TAG_DROP * ratio;

        let mount = rig.add_root("label", BoneDesc::anchor(), Vec2::ZERO);
        let tag_shape = ShapeComponent::new(
            Shape::RoundedRect {
                width: tag_width,
                height: tag_height,
                radius: tag_height / 2.0,
            },
            Color::WHITE,
        )
        .with_offset(Vec2::new(-tag_width / 2.0, drop - tag_height))
        .with_stroke(2.0 * ratio, Color::BLACK);
        let tag_node = spawn(ctx, &mut nodes, "nametag", Z_NAME_TAG, Some(tag_shape));
        rig.bind(mount, tag_node);

        let text_mount = rig.add_root("label.text", BoneDesc::anchor(), Vec2::ZERO);
        let text_shape = ShapeComponent::new(
            Shape::Label {
                text: style.name.clone(),
                font_size: NAME_FONT_SIZE * ratio,
            },
            Color::BLACK,
        )
        .with_offset(Vec2::new(0.0, drop - tag_height / 2.0));
        let text_node = spawn(ctx, &mut nodes, "nametext", Z_NAME_TEXT, Some(text_shape));
        rig.bind(text_mount, text_node);
    }

    let figure = Figure {
        anchor,
        family,
        rig,
        joints: JointSet {
            head,
            upper_arm_l,
            lower_arm_l,
            upper_arm_r,
            lower_arm_r,
            thigh_l,
            shin_l,
            foot_l,
            thigh_r,
            shin_r,
            foot_r,
        },
        nodes,
        ratio,
        head_rest_y,
    };

    // Place the anchor and settle the whole hierarchy once so the figure
    // is visible before its first animation frame.
    if let Some(node) = ctx.scene.get_mut(anchor) {
        node.pos = origin;
    }
    figure.rig.propagate(origin, &mut ctx.scene);

    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(name: &str) -> FigureStyle {
        FigureStyle {
            name: name.to_string(),
            ..FigureStyle::default()
        }
    }

    #[test]
    fn forearm_hangs_from_upper_arm_tip() {
        let mut ctx = StageContext::new();
        let fig = build_figure(&mut ctx, 0, &style(""), Vec2::new(100.0, 500.0), 1.0);
        let offset = fig.rig.offset(fig.joints.lower_arm_l);
        assert_eq!(offset, Vec2::new(0.0, UPPER_ARM_LEN));
    }

    #[test]
    fn shoulders_sit_at_torso_top_corners() {
        let mut ctx = StageContext::new();
        let fig = build_figure(&mut ctx, 0, &style(""), Vec2::ZERO, 1.0);
        let shoulder = fig.rig.parent(fig.joints.upper_arm_l).unwrap();
        assert_eq!(fig.rig.offset(shoulder), Vec2::new(-30.0, -60.0));
    }

    #[test]
    fn geometry_scales_with_ratio() {
        let mut ctx = StageContext::new();
        let fig = build_figure(&mut ctx, 0, &style(""), Vec2::ZERO, 2.0);
        let desc = fig.rig.desc(fig.joints.upper_arm_l);
        assert_eq!(desc.length, UPPER_ARM_LEN * 2.0);
        assert_eq!(desc.thickness, UPPER_ARM_THICK * 2.0);
    }

    #[test]
    fn named_figure_gets_tag_and_text_nodes() {
        let mut ctx = StageContext::new();
        build_figure(&mut ctx, 3, &style("Mori"), Vec2::ZERO, 1.0);
        assert!(ctx.scene.find_by_tag("figure.3.nametag").is_some());
        let text = ctx.scene.find_by_tag("figure.3.nametext").unwrap();
        assert_eq!(text.z_index, Z_NAME_TEXT);
        match &text.shape.as_ref().unwrap().shape {
            Shape::Label { text, .. } => assert_eq!(text, "Mori"),
            _ => panic!("expected a label"),
        }
    }

    #[test]
    fn anonymous_figure_skips_name_tag() {
        let mut ctx = StageContext::new();
        build_figure(&mut ctx, 0, &style(""), Vec2::ZERO, 1.0);
        assert!(ctx.scene.find_by_tag("figure.0.nametag").is_none());
    }

    #[test]
    fn all_nodes_share_the_family_prefix() {
        let mut ctx = StageContext::new();
        let fig = build_figure(&mut ctx, 7, &style("Nim"), Vec2::ZERO, 1.0);
        for &id in &fig.nodes {
            let node = ctx.scene.get(id).unwrap();
            assert!(node.tag.starts_with("figure.7."), "tag {}", node.tag);
        }
    }

    #[test]
    fn initial_propagate_places_limbs_in_world() {
        let mut ctx = StageContext::new();
        let origin = Vec2::new(200.0, 400.0);
        let fig = build_figure(&mut ctx, 0, &style(""), origin, 1.0);
        // Left upper arm pivot sits on the shoulder: torso top left corner.
        let node = fig.rig.node(fig.joints.upper_arm_l).unwrap();
        let pos = ctx.scene.get(node).unwrap().pos;
        assert!((pos - (origin + Vec2::new(-30.0, -60.0))).length() < 1e-4);
    }
}
