//! # Rendering
//!
//! Rasterization lives outside this crate. The canvas talks to it through [`Renderer`], issuing
//! one sequential draw call per stroke in z-order, and tells it how much of the cached image is
//! stale through [`Invalidation`].

use crate::blend::BlendMode;
use crate::color::Color;
use crate::image::{Bitmap, ImageRenderingMode};
use crate::path::Path;
use crate::stroke::{shapes, PenType, Stroke, StrokeKind};
use crate::util::Rect;

/// How much of the cached image must be redrawn.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Invalidation {
    /// Throw the cache away and replay background plus every active stroke.
    Full,
    /// Only this area changed, and only because of the stroke in progress.
    Region(Rect),
}
impl Invalidation {
    /// Combine two pending invalidations. `Full` absorbs everything.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Region(a), Self::Region(b)) => Self::Region(a.union(b)),
            _ => Self::Full,
        }
    }
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Everything a renderer needs to draw one stroke.
#[derive(Copy, Clone, Debug)]
pub struct DrawRequest<'a> {
    pub path: &'a Path,
    pub color: Color,
    pub width: f32,
    pub alpha: f32,
    /// Fill the path's interior instead of stroking its outline.
    pub fill: bool,
    pub blend: BlendMode,
    /// Stamp image and the rect to place it in.
    pub image: Option<(&'a Bitmap, Rect)>,
}
impl<'a> DrawRequest<'a> {
    /// The draw call for `stroke`, or `None` if it has no visible geometry.
    #[must_use]
    pub fn for_stroke(stroke: &'a Stroke) -> Option<Self> {
        if stroke.path().is_empty() {
            return None;
        }
        let style = stroke.style();
        let blend = match stroke.kind() {
            StrokeKind::Eraser { .. }
            | StrokeKind::Pen {
                pen_type: PenType::Eraser,
                ..
            } => BlendMode::Clear,
            _ => BlendMode::Normal,
        };
        let image = match stroke.kind() {
            StrokeKind::Stamp { image, center } => {
                Some((&**image, shapes::stamp_rect(image, *center)))
            }
            _ => None,
        };
        Some(Self {
            path: stroke.path(),
            color: style.color,
            width: style.width,
            alpha: style.alpha,
            fill: stroke.is_filled(),
            blend,
            image,
        })
    }
}

/// Rasterizer for the cached canvas image.
pub trait Renderer {
    /// Begin a full rebuild: discard the cached image and size it to `bounds`.
    fn clear(&mut self, bounds: Rect);
    /// Draw an image into `dest`, scaling as needed.
    fn draw_image(&mut self, image: &Bitmap, dest: Rect);
    fn draw_stroke(&mut self, request: &DrawRequest<'_>);
}

/// Where the background lands for the given mode.
#[must_use]
pub fn background_rect(image: &Bitmap, mode: ImageRenderingMode, bounds: Rect) -> Rect {
    match mode {
        ImageRenderingMode::Scale => bounds,
        ImageRenderingMode::Original => {
            let [w, h] = image.size();
            #[allow(clippy::cast_precision_loss)]
            Rect::from_size(w as f32, h as f32)
        }
    }
}

/// Redraw the whole cache: background first, then every stroke in order.
pub fn replay<'s>(
    renderer: &mut impl Renderer,
    bounds: Rect,
    background: Option<(&Bitmap, ImageRenderingMode)>,
    strokes: impl IntoIterator<Item = &'s Stroke>,
) {
    renderer.clear(bounds);
    if let Some((image, mode)) = background {
        renderer.draw_image(image, background_rect(image, mode, bounds));
    }
    let mut drawn = 0usize;
    for request in strokes.into_iter().filter_map(DrawRequest::for_stroke) {
        renderer.draw_stroke(&request);
        drawn += 1;
    }
    log::trace!("replayed {drawn} strokes");
}

#[cfg(test)]
mod test {
    use super::{DrawRequest, Invalidation};
    use crate::blend::BlendMode;
    use crate::stroke::{PenType, Stroke, StrokeStyle};
    use crate::util::{Point, Rect};

    #[test]
    fn full_absorbs_regions() {
        let r = Rect::from_size(1.0, 1.0);
        assert_eq!(
            Invalidation::Region(r).merge(Invalidation::Full),
            Invalidation::Full
        );
        let other = Rect::from_corners(Point::new(2.0, 2.0), Point::new(3.0, 3.0));
        assert_eq!(
            Invalidation::Region(r).merge(Invalidation::Region(other)),
            Invalidation::Region(Rect::from_size(3.0, 3.0))
        );
    }
    #[test]
    fn empty_strokes_are_not_drawn() {
        let pen = Stroke::pen(StrokeStyle::default(), PenType::Eraser);
        assert!(DrawRequest::for_stroke(&pen).is_none());
    }
    #[test]
    fn eraser_pens_clear() {
        let mut pen = Stroke::pen(StrokeStyle::default(), PenType::Eraser);
        let p = Point::new(5.0, 5.0);
        pen.push_sample(
            crate::stroke::CoordinateSample {
                previous_point2: p,
                previous_point1: p,
                current_point: p,
            },
            &crate::smoothing::SmoothingParams {
                line_width: 1.0,
                slack: 0.0,
                view: Rect::from_size(10.0, 10.0),
            },
        );
        let request = DrawRequest::for_stroke(&pen).unwrap();
        assert_eq!(request.blend, BlendMode::Clear);
    }
}
