use eframe::egui::{Pos2, Rect, Vec2, pos2};

use crate::model::Point;

/// Axis-aligned bounding box of a point cloud in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// `None` for an empty cloud.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Width of the box; a unit range when all x coincide.
    pub fn range_x(&self) -> f64 {
        non_degenerate(self.max_x - self.min_x)
    }

    /// Height of the box; a unit range when all y coincide.
    pub fn range_y(&self) -> f64 {
        non_degenerate(self.max_y - self.min_y)
    }
}

// Two finite extremes can still overflow `max - min`; saturate so the
// division stays finite.
fn non_degenerate(range: f64) -> f64 {
    if range.is_infinite() {
        f64::MAX
    } else if range > 0.0 {
        range
    } else {
        1.0
    }
}

/// Position of `value` along `[min, min + range]`, clamped to `[0, 1]`.
fn unit_offset(value: f64, min: f64, range: f64) -> f32 {
    let t = (value - min) / range;
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 }
}

/// Affine map from data space into the padded canvas region.
///
/// x grows left to right, y grows bottom to top, and both axes use only
/// `shrink` of the region so the outermost points keep some air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    bounds: Bounds,
    region: Rect,
    shrink: f32,
}

impl CanvasTransform {
    pub fn new(
        canvas: Vec2,
        padding: f32,
        shrink: f32,
        bounds: Bounds,
    ) -> Self {
        let max = pos2(
            (canvas.x - padding).max(padding),
            (canvas.y - padding).max(padding),
        );
        Self {
            bounds,
            region: Rect::from_min_max(pos2(padding, padding), max),
            shrink: shrink.clamp(0.0, 1.0),
        }
    }

    /// Drawing area inside the padding.
    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn to_canvas(&self, x: f64, y: f64) -> Pos2 {
        let tx = unit_offset(x, self.bounds.min_x, self.bounds.range_x());
        let ty = unit_offset(y, self.bounds.min_y, self.bounds.range_y());
        pos2(
            self.region.left() + tx * self.region.width() * self.shrink,
            self.region.bottom() - ty * self.region.height() * self.shrink,
        )
    }
}
