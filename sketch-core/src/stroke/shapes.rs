//! Geometry for the drag-out shape tools. Each is rebuilt from scratch on every move.

use super::Span;
use crate::image::Bitmap;
use crate::path::Path;
use crate::util::{Point, Rect};

/// Arrow head length, as a multiple of the line width.
const ARROW_HEAD_SCALE: f32 = 4.0;
/// Arrow heads never get shorter than this, so thin arrows still read as arrows.
const ARROW_HEAD_MIN: f32 = 10.0;
/// Half-angle between the shaft and each barb.
const ARROW_HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

#[must_use]
pub fn line(span: Span) -> Path {
    let mut path = Path::new();
    path.move_to(span.start);
    path.line_to(span.end);
    path
}

/// A line with two barbs at `span.end`, pointing back along the shaft.
#[must_use]
pub fn arrow(span: Span, line_width: f32) -> Path {
    let mut path = line(span);
    let dx = span.end.x - span.start.x;
    let dy = span.end.y - span.start.y;
    // No direction to point in.
    if dx == 0.0 && dy == 0.0 {
        return path;
    }
    let length = (line_width * ARROW_HEAD_SCALE).max(ARROW_HEAD_MIN);
    let angle = dy.atan2(dx);
    for barb in [angle + ARROW_HEAD_ANGLE, angle - ARROW_HEAD_ANGLE] {
        path.move_to(span.end);
        path.line_to(Point::new(
            span.end.x - length * barb.cos(),
            span.end.y - length * barb.sin(),
        ));
    }
    path
}

#[must_use]
pub fn rectangle(span: Span) -> Path {
    let mut path = Path::new();
    path.add_rect(Rect::from_corners(span.start, span.end));
    path
}

#[must_use]
pub fn ellipse(span: Span) -> Path {
    let mut path = Path::new();
    path.add_ellipse(Rect::from_corners(span.start, span.end));
    path
}

/// Where a stamp image lands: natural size, centered on `center`.
#[must_use]
pub fn stamp_rect(image: &Bitmap, center: Point) -> Rect {
    let [w, h] = image.size();
    #[allow(clippy::cast_precision_loss)]
    let (half_w, half_h) = (w as f32 * 0.5, h as f32 * 0.5);
    Rect::from_corners(
        Point::new(center.x - half_w, center.y - half_h),
        Point::new(center.x + half_w, center.y + half_h),
    )
}

#[must_use]
pub fn stamp(image: &Bitmap, center: Point) -> Path {
    let mut path = Path::new();
    path.add_rect(stamp_rect(image, center));
    path
}
