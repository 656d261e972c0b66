//! # Paths
//!
//! Renderable geometry: an ordered list of path commands, in view space. A path may contain
//! several sub-paths, each started by a [`Segment::MoveTo`].

use crate::util::{Point, Rect};

#[derive(Copy, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}
impl Segment {
    /// Every point this command references, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let points: smallvec::SmallVec<[Point; 3]> = match *self {
            Self::MoveTo(p) | Self::LineTo(p) => smallvec::smallvec![p],
            Self::QuadTo { ctrl, to } => smallvec::smallvec![ctrl, to],
            Self::CubicTo { ctrl1, ctrl2, to } => smallvec::smallvec![ctrl1, ctrl2, to],
            Self::Close => smallvec::SmallVec::new(),
        };
        points.into_iter()
    }
}

#[derive(Clone, PartialEq, Default, Debug, serde::Serialize, serde::Deserialize)]
pub struct Path {
    segments: Vec<Segment>,
}
impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// A path with no commands. Empty paths draw nothing and have an empty bounding box.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    pub fn clear(&mut self) {
        self.segments.clear();
    }
    pub fn move_to(&mut self, to: Point) {
        self.segments.push(Segment::MoveTo(to));
    }
    pub fn line_to(&mut self, to: Point) {
        self.segments.push(Segment::LineTo(to));
    }
    pub fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.segments.push(Segment::QuadTo { ctrl, to });
    }
    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
    }
    pub fn close(&mut self) {
        self.segments.push(Segment::Close);
    }
    /// Append all of `other`'s commands after this path's.
    pub fn append(&mut self, other: &Path) {
        self.segments.extend_from_slice(&other.segments);
    }
    /// Bounding box of every point of the path, control points included.
    ///
    /// This is a superset of the tight curve bounds, which is what the coarse eraser
    /// overlap test wants.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.segments.iter().flat_map(Segment::points))
    }
    /// Axis-aligned rect, clockwise from `rect.min`.
    pub fn add_rect(&mut self, rect: Rect) {
        self.move_to(rect.min);
        self.line_to(Point::new(rect.max.x, rect.min.y));
        self.line_to(rect.max);
        self.line_to(Point::new(rect.min.x, rect.max.y));
        self.close();
    }
    /// Ellipse inscribed in `rect`, approximated by four cubic arcs.
    pub fn add_ellipse(&mut self, rect: Rect) {
        // Control point distance for a quarter circle.
        const KAPPA: f32 = 0.552_284_8;
        let c = rect.center();
        let rx = rect.width() * 0.5;
        let ry = rect.height() * 0.5;
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        self.move_to(Point::new(c.x + rx, c.y));
        self.cubic_to(
            Point::new(c.x + rx, c.y + ky),
            Point::new(c.x + kx, c.y + ry),
            Point::new(c.x, c.y + ry),
        );
        self.cubic_to(
            Point::new(c.x - kx, c.y + ry),
            Point::new(c.x - rx, c.y + ky),
            Point::new(c.x - rx, c.y),
        );
        self.cubic_to(
            Point::new(c.x - rx, c.y - ky),
            Point::new(c.x - kx, c.y - ry),
            Point::new(c.x, c.y - ry),
        );
        self.cubic_to(
            Point::new(c.x + kx, c.y - ry),
            Point::new(c.x + rx, c.y - ky),
            Point::new(c.x + rx, c.y),
        );
        self.close();
    }
}

#[cfg(test)]
mod test {
    use super::{Path, Segment};
    use crate::util::{Point, Rect};

    #[test]
    fn empty_bounds() {
        let path = Path::new();
        assert!(path.is_empty());
        assert!(path.bounding_box().is_empty());
    }
    #[test]
    fn bounds_include_control_points() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.quad_to(Point::new(5.0, 20.0), Point::new(10.0, 0.0));
        assert_eq!(
            path.bounding_box(),
            Rect::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 20.0))
        );
    }
    #[test]
    fn ellipse_stays_in_rect() {
        let rect = Rect::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 40.0));
        let mut path = Path::new();
        path.add_ellipse(rect);
        assert_eq!(path.bounding_box(), rect);
        assert_eq!(path.segments().last(), Some(&Segment::Close));
    }
    #[test]
    fn append_keeps_order() {
        let mut a = Path::new();
        a.move_to(Point::new(1.0, 1.0));
        let mut b = Path::new();
        b.line_to(Point::new(2.0, 2.0));
        a.append(&b);
        assert_eq!(
            a.segments(),
            &[
                Segment::MoveTo(Point::new(1.0, 1.0)),
                Segment::LineTo(Point::new(2.0, 2.0))
            ]
        );
    }
}
