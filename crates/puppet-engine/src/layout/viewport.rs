use glam::Vec2;

/// A fixed target aspect ratio expressed as integer parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub w: u32,
    pub h: u32,
}

impl AspectRatio {
    pub const SIXTEEN_NINE: AspectRatio = AspectRatio { w: 16, h: 9 };
    pub const FOUR_THREE: AspectRatio = AspectRatio { w: 4, h: 3 };
    pub const ULTRAWIDE: AspectRatio = AspectRatio { w: 21, h: 9 };

    /// Width divided by height.
    pub fn ratio(self) -> f32 {
        self.w as f32 / self.h as f32
    }

    /// Height matching this ratio for a given width.
    pub fn height_for_width(self, width: f32) -> f32 {
        width * self.h as f32 / self.w as f32
    }

    /// Width matching this ratio for a given height.
    pub fn width_for_height(self, height: f32) -> f32 {
        height * self.w as f32 / self.h as f32
    }
}

/// The base design resolution all absolute positions and sizes are
/// authored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignSize {
    pub width: f32,
    pub height: f32,
}

impl DesignSize {
    /// Stage positions are authored against 800x450 (16:9).
    pub const DEFAULT: DesignSize = DesignSize {
        width: 800.0,
        height: 450.0,
    };
}

/// Uniform content scale for the current container.
/// Taking the min of both axis ratios guarantees scaled content never
/// overflows either axis.
pub fn content_scale(current_w: f32, current_h: f32, base_w: f32, base_h: f32) -> f32 {
    (current_w / base_w).min(current_h / base_h)
}

/// Current container dimensions plus the layout constants.
///
/// Width is the only externally driven dimension; height always derives
/// from the aspect ratio. Resize by calling `set_width`.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: f32,
    height: f32,
    aspect: AspectRatio,
    base: DesignSize,
}

impl Viewport {
    pub fn new(width: f32, aspect: AspectRatio, base: DesignSize) -> Self {
        Self {
            width,
            height: aspect.height_for_width(width),
            aspect,
            base,
        }
    }

    /// Container resized. Height is re-derived, never set directly.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.height = self.aspect.height_for_width(width);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn base(&self) -> DesignSize {
        self.base
    }

    /// Uniform scale for sizes and thicknesses at the current width.
    pub fn scale(&self) -> f32 {
        content_scale(self.width, self.height, self.base.width, self.base.height)
    }

    /// Ratio of current width to the design width. Figure geometry is
    /// authored against the design width and multiplied by this.
    pub fn width_ratio(&self) -> f32 {
        self.width / self.base.width
    }

    /// Center of the container in pixels.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            DesignSize::DEFAULT.width,
            AspectRatio::SIXTEEN_NINE,
            DesignSize::DEFAULT,
        )
    }
}
