//! Cubic bezier edge routing and SVG path commands.

use crate::geometry::Point;
use crate::graph::Side;
use std::fmt::Write;

/// Minimum control point offset, in world units, used when none is configured.
pub const DEFAULT_MIN_OFFSET: f32 = 50.0;

/// Cubic bezier curve for rendering and distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Degenerate bezier that draws as a straight segment.
    pub fn line(start: Point, end: Point) -> Self {
        CubicBezier { p0: start, p1: start, p2: end, p3: end }
    }

    /// Route a curve between two handle anchors.
    ///
    /// Control points leave each anchor along the outward normal of its side.
    /// The offset is half the distance along that side's axis, but never less
    /// than `min_offset * zoom`. Anchors closer than `10 * zoom` get a straight line.
    pub fn between(
        start: Point,
        start_side: Side,
        end: Point,
        end_side: Side,
        zoom: f32,
        min_offset: f32,
    ) -> Self {
        let threshold = 10.0 * zoom;
        if start.distance_sq(end) < threshold * threshold {
            return CubicBezier::line(start, end);
        }

        let offset_for = |side: Side| {
            let along = if side.is_horizontal() {
                (end.x - start.x).abs()
            } else {
                (end.y - start.y).abs()
            };
            (along * 0.5).max(min_offset * zoom)
        };

        CubicBezier {
            p0: start,
            p1: start + start_side.normal() * offset_for(start_side),
            p2: end + end_side.normal() * offset_for(end_side),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    pub fn midpoint(&self) -> Point {
        self.eval(0.5)
    }

    fn is_line(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }

    /// SVG path command, e.g. `"M 10 20 C 60 20 90 80 140 80"`.
    ///
    /// Straight curves are emitted as `"M x y L x y"`.
    pub fn to_svg_commands(&self) -> String {
        let mut out = String::with_capacity(64);
        if self.is_line() {
            let _ = write!(out, "M {} {} L {} {}", self.p0.x, self.p0.y, self.p3.x, self.p3.y);
        } else {
            let _ = write!(
                out,
                "M {} {} C {} {} {} {} {} {}",
                self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
            );
        }
        out
    }
}

/// Generate SVG path command for a bezier between two side-aware anchors.
pub fn generate_bezier_path(
    start: Point,
    start_side: Side,
    end: Point,
    end_side: Side,
    zoom: f32,
    min_offset: f32,
) -> String {
    CubicBezier::between(start, start_side, end, end_side, zoom, min_offset).to_svg_commands()
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);

    point.distance_sq(a + ab * t)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against the resulting
/// polyline. `num_samples == 0` uses 20.
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
