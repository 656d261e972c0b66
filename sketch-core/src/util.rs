//! Utility types, used throughout the crate.
//! Points are plain `f32` pairs in view space: logical pixels, origin top-left, +X right, +Y down.

/// A float which is non-NaN and non-infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}
impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}
impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

// No component is ever NaN, so PartialEq acts like Eq.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.to_bits());
    }
}

/// A position in view space.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Default,
    Debug,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
    /// Component-wise multiply, used to map between normalized and view coordinates.
    #[must_use]
    pub fn scale(self, [sx, sy]: [f32; 2]) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
        }
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// An axis-aligned rectangle. `min` is the top-left corner.
///
/// An empty rect (see [`Rect::NOTHING`]) is the identity for [`Rect::union`] and intersects nothing.
#[derive(Copy, Clone, PartialEq, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}
impl Rect {
    /// Inverted rect that absorbs into anything it is unioned with.
    pub const NOTHING: Self = Self {
        min: Point::new(f32::INFINITY, f32::INFINITY),
        max: Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    };
    #[must_use]
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self { min, max }
    }
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Point::ZERO,
            max: Point::new(width, height),
        }
    }
    /// The smallest rect containing both corners, in whatever order they were given.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
    #[must_use]
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::NOTHING, |rect, point| rect.including(point))
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    #[must_use]
    pub fn size(&self) -> [f32; 2] {
        [self.width(), self.height()]
    }
    #[must_use]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn including(self, point: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        self.including(other.min).including(other.max)
    }
    /// Grow outward by `amount` on every side.
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn expand(self, amount: f32) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: Point::new(self.min.x - amount, self.min.y - amount),
            max: Point::new(self.max.x + amount, self.max.y + amount),
        }
    }
    /// The overlapping area of both rects. Empty if they don't overlap.
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn intersection(self, other: Self) -> Self {
        let rect = Self {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if rect.is_empty() {
            Self::NOTHING
        } else {
            rect
        }
    }
    /// Closed-interval overlap test: rects sharing only an edge still intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
    /// The nearest point inside. An empty rect leaves the point as is.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        if self.is_empty() {
            return point;
        }
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}
impl Default for Rect {
    fn default() -> Self {
        Self::NOTHING
    }
}
