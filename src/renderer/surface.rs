//! Host drawing capability
//!
//! The narrow boundary between the simulation and whatever actually paints.
//! Positions are render pixels, colors are [`Rgb`], angles are radians.
//! Paint state (alpha, fill, stroke) is sticky until changed; `save` and
//! `restore` scope it the way a canvas context does.

use glam::Vec2;

use crate::sim::color::Rgb;

pub trait Surface {
    /// Backing store changed size; contents may be discarded
    fn resize(&mut self, width: u32, height: u32);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_stroke_color(&mut self, color: Rgb);
    /// Opaque flood of the whole surface, ignoring the current alpha
    fn fill_background(&mut self, color: Rgb);
    /// Filled ellipse around a center, tilted by `rotation` radians
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32);
    /// Filled axis-aligned rectangle around a center
    fn fill_rect(&mut self, center: Vec2, size: Vec2);
    fn stroke_line(&mut self, from: Vec2, to: Vec2);
    /// Radial gradient disc: `color` at `alpha` in the center, clear at the rim
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
}

/// One captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(u32, u32),
    Save,
    Restore,
    Alpha(f32),
    FillColor(Rgb),
    StrokeColor(Rgb),
    Background(Rgb),
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
    },
    Rect {
        center: Vec2,
        size: Vec2,
    },
    Line {
        from: Vec2,
        to: Vec2,
    },
    Gradient {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
}

impl Op {
    /// True for ops that put pixels down, as opposed to state changes
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Op::Ellipse { .. } | Op::Rect { .. } | Op::Line { .. } | Op::Gradient { .. }
        )
    }
}

/// Headless backend recording every op in order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn shape_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_shape()).count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.ops.push(Op::Resize(width, height));
    }

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ops.push(Op::Alpha(alpha));
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.ops.push(Op::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.ops.push(Op::StrokeColor(color));
    }

    fn fill_background(&mut self, color: Rgb) {
        self.ops.push(Op::Background(color));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32) {
        self.ops.push(Op::Ellipse {
            center,
            radii,
            rotation,
        });
    }

    fn fill_rect(&mut self, center: Vec2, size: Vec2) {
        self.ops.push(Op::Rect { center, size });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.ops.push(Op::Line { from, to });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.ops.push(Op::Gradient {
            center,
            radius,
            color,
            alpha,
        });
    }
}
