//! World/screen geometry and the viewport transform.
//!
//! All transforms are affine with a uniform scale and no rotation:
//!
//! ```text
//! screen = world * scale + pan
//! world  = (screen - pan) / scale
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::ops::{Add, Mul, Sub};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle spanned by two corners in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `other` lies entirely inside `self`, within `epsilon`.
    pub fn contains_rect(&self, other: &Rect, epsilon: f32) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }

    /// Strict overlap test (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Union of all rects, `None` for an empty iterator.
    pub fn union_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}

/// Corner of the host surface an overlay panel is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Place a panel of `panel` size inside `surface`, `margin` pixels from the corner.
    pub fn place(self, surface: Size, panel: Size, margin: f32) -> Rect {
        let left = margin;
        let right = surface.width - panel.width - margin;
        let top = margin;
        let bottom = surface.height - panel.height - margin;
        let (x, y) = match self {
            Corner::TopLeft => (left, top),
            Corner::TopRight => (right, top),
            Corner::BottomLeft => (left, bottom),
            Corner::BottomRight => (right, bottom),
        };
        Rect::new(x, y, panel.width, panel.height)
    }
}

/// Allowed range for the viewport scale. Always `0 < min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawZoomRange")]
pub struct ZoomRange {
    min: f32,
    max: f32,
}

#[derive(Deserialize)]
struct RawZoomRange {
    min: f32,
    max: f32,
}

impl TryFrom<RawZoomRange> for ZoomRange {
    type Error = ConfigError;

    fn try_from(raw: RawZoomRange) -> Result<Self, Self::Error> {
        ZoomRange::new(raw.min, raw.max)
    }
}

impl ZoomRange {
    pub fn new(min: f32, max: f32) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidZoomRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamp a scale into the range. NaN maps to `min`.
    pub fn clamp(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f32) -> bool {
        scale >= self.min && scale <= self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0.5, max: 2.0 }
    }
}

/// Pan offset and zoom scale mapping world coordinates to screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

impl Viewport {
    pub const fn new(x: f32, y: f32, scale: f32) -> Self {
        Self { x, y, scale }
    }

    pub fn pan(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    pub fn world_rect_to_screen(&self, r: &Rect) -> Rect {
        let origin = self.world_to_screen(r.min());
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }

    pub fn screen_rect_to_world(&self, r: &Rect) -> Rect {
        let origin = self.screen_to_world(r.min());
        Rect::new(origin.x, origin.y, r.width / self.scale, r.height / self.scale)
    }

    /// Zoom by `2^delta`, keeping the world point under `anchor` fixed on screen.
    pub fn zoom_at(&self, anchor: Point, delta: f32, range: &ZoomRange) -> Viewport {
        self.zoom_by_factor(anchor, delta.exp2(), range)
    }

    /// Multiply the scale by `factor`, keeping the world point under `anchor` fixed.
    pub fn zoom_by_factor(&self, anchor: Point, factor: f32, range: &ZoomRange) -> Viewport {
        let scale = range.clamp(self.scale * factor);
        if scale == self.scale {
            return *self;
        }
        let world = self.screen_to_world(anchor);
        Viewport::new(anchor.x - world.x * scale, anchor.y - world.y * scale, scale)
    }

    pub fn pan_by(&self, delta: Point) -> Viewport {
        Viewport::new(self.x + delta.x, self.y + delta.y, self.scale)
    }

    /// The world-space rectangle currently visible on a surface of `size`.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        self.screen_rect_to_world(&Rect::new(0.0, 0.0, size.width, size.height))
    }

    /// Keep the scale and move the pan so `world` lands in the middle of the surface.
    pub fn center_on(&self, world: Point, size: Size) -> Viewport {
        Viewport::new(
            size.width * 0.5 - world.x * self.scale,
            size.height * 0.5 - world.y * self.scale,
            self.scale,
        )
    }

    /// Compute the viewport that fits `bounds` into a surface of `size`.
    ///
    /// `padding` is the fraction of the surface kept free on each side, clamped
    /// to `[0, 0.45]`. The scale is clamped to `range` and the bounds are centered.
    pub fn fit_to_bounds(bounds: &Rect, size: Size, padding: f32, range: &ZoomRange) -> Viewport {
        let padding = if padding.is_finite() { padding.clamp(0.0, 0.45) } else { 0.0 };
        let usable = 1.0 - 2.0 * padding;
        let fit_axis = |available: f32, extent: f32| {
            if extent > f32::EPSILON {
                available * usable / extent
            } else {
                f32::INFINITY
            }
        };

        let scale = fit_axis(size.width, bounds.width).min(fit_axis(size.height, bounds.height));
        let scale = if scale.is_finite() { range.clamp(scale) } else { range.max() };

        Viewport::new(0.0, 0.0, scale).center_on(bounds.center(), size)
    }
}

/// Free-function form of [`Viewport::screen_to_world`].
pub fn screen_to_world(point: Point, viewport: &Viewport) -> Point {
    viewport.screen_to_world(point)
}

/// Free-function form of [`Viewport::world_to_screen`].
pub fn world_to_screen(point: Point, viewport: &Viewport) -> Point {
    viewport.world_to_screen(point)
}
