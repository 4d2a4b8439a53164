use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::viewport::{content_scale, Viewport};

/// A logical stage position, resolved to pixels against the live viewport.
///
/// Three addressing modes, matching how stage layouts are authored:
/// percentages and ratios scale with the container directly, design-pixel
/// positions scale by the uniform min-scale so authored layouts keep their
/// proportions on any container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Position {
    /// 0..100 of the container on each axis.
    Percentage { x: f32, y: f32 },
    /// Pixels against the base design resolution.
    Absolute { x: f32, y: f32 },
    /// 0..1 of the container on each axis.
    Ratio { x: f32, y: f32 },
}

impl Position {
    /// Resolve to pixel coordinates for the current viewport.
    pub fn resolve(self, viewport: &Viewport) -> Vec2 {
        let (w, h) = (viewport.width(), viewport.height());
        match self {
            Position::Percentage { x, y } => Vec2::new(w * x / 100.0, h * y / 100.0),
            Position::Absolute { x, y } => {
                let base = viewport.base();
                let scale = content_scale(w, h, base.width, base.height);
                Vec2::new(x * scale, y * scale)
            }
            Position::Ratio { x, y } => Vec2::new(w * x, h * y),
        }
    }

    /// Express pixel coordinates back as a percentage of the container.
    pub fn percentage_of(pixels: Vec2, viewport: &Viewport) -> Position {
        Position::Percentage {
            x: pixels.x / viewport.width() * 100.0,
            y: pixels.y / viewport.height() * 100.0,
        }
    }
}

/// Common stage marks, percentage based.
pub mod presets {
    use super::Position;

    pub const CENTER: Position = Position::Percentage { x: 50.0, y: 50.0 };
    pub const LEFT_TOP: Position = Position::Percentage { x: 15.0, y: 30.0 };
    pub const RIGHT_TOP: Position = Position::Percentage { x: 85.0, y: 30.0 };
    pub const LEFT_BOTTOM: Position = Position::Percentage { x: 15.0, y: 70.0 };
    pub const RIGHT_BOTTOM: Position = Position::Percentage { x: 85.0, y: 70.0 };
    pub const BOTTOM_CENTER: Position = Position::Percentage { x: 50.0, y: 70.0 };
    pub const LEFT_CENTER: Position = Position::Percentage { x: 15.0, y: 50.0 };
    pub const RIGHT_CENTER: Position = Position::Percentage { x: 85.0, y: 50.0 };
    pub const TOP_CENTER: Position = Position::Percentage { x: 50.0, y: 30.0 };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::viewport::{AspectRatio, DesignSize};

    const EPS: f32 = 1e-3;

    fn vp(width: f32) -> Viewport {
        Viewport::new(width, AspectRatio::SIXTEEN_NINE, DesignSize::DEFAULT)
    }

    #[test]
    fn percentage_scales_with_container() {
        let p = Position::Percentage { x: 50.0, y: 70.0 };
        let px = p.resolve(&vp(1600.0));
        assert!((px.x - 800.0).abs() < EPS);
        assert!((px.y - 630.0).abs() < EPS);
    }

    #[test]
    fn absolute_scales_by_min_ratio() {
        // 1600x900 against the 800x450 base: scale 2.
        let p = Position::Absolute { x: 120.0, y: 315.0 };
        let px = p.resolve(&vp(1600.0));
        assert!((px.x - 240.0).abs() < EPS);
        assert!((px.y - 630.0).abs() < EPS);
    }

    #[test]
    fn ratio_scales_with_container() {
        let p = Position::Ratio { x: 0.5, y: 0.5 };
        let px = p.resolve(&vp(800.0));
        assert!((px.x - 400.0).abs() < EPS);
        assert!((px.y - 225.0).abs() < EPS);
    }

    #[test]
    fn percentage_round_trips_through_pixels() {
        let vp = vp(1366.0);
        for (x, y) in [(15.0, 30.0), (50.0, 50.0), (85.0, 70.0), (3.0, 97.0)] {
            let original = Position::Percentage { x, y };
            let back = Position::percentage_of(original.resolve(&vp), &vp);
            match back {
                Position::Percentage { x: bx, y: by } => {
                    assert!((bx - x).abs() < EPS, "x {} vs {}", bx, x);
                    assert!((by - y).abs() < EPS, "y {} vs {}", by, y);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn presets_resolve_inside_container() {
        let vp = vp(800.0);
        for p in [
            presets::CENTER,
            presets::LEFT_TOP,
            presets::RIGHT_BOTTOM,
            presets::BOTTOM_CENTER,
        ] {
            let px = p.resolve(&vp);
            assert!(px.x >= 0.0 && px.x <= vp.width());
            assert!(px.y >= 0.0 && px.y <= vp.height());
        }
    }

    #[test]
    fn position_serde_tagged_form() {
        let p = Position::Percentage { x: 15.0, y: 70.0 };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"type\":\"percentage\""));
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
