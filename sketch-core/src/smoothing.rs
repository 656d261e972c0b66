//! # Smoothing
//!
//! Raw pointer samples are turned into a curve by joining the midpoints of consecutive
//! samples with quadratic Beziers, using the shared sample as the control point. Each new
//! sample therefore only affects one new segment, which keeps redraw regions small.

use crate::path::Path;
use crate::util::{Point, Rect};

/// Extra room around a redraw region, on top of the stroke's half-width.
pub const DEFAULT_REGION_SLACK: f32 = 2.0;

/// Parameters shared by every smoothing call on one canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothingParams {
    /// Width of the stroke being extended.
    pub line_width: f32,
    /// Extra margin added to the returned region.
    pub slack: f32,
    /// Regions are clamped to these bounds.
    pub view: Rect,
}

/// Append the smoothed segment for the sample triple to `path`, returning the area of the view
/// that needs redrawing.
///
/// The segment runs from `midpoint(previous2, previous1)` to `midpoint(previous1, current)` with
/// `previous1` as its control point. If `path` is empty, it's started at the first midpoint;
/// otherwise a new sub-path begins there too, so segments replayed out of a gesture's context
/// still land in the right place.
pub fn extend(
    path: &mut Path,
    previous2: Point,
    previous1: Point,
    current: Point,
    params: &SmoothingParams,
) -> Rect {
    let mid1 = previous2.midpoint(previous1);
    let mid2 = previous1.midpoint(current);

    path.move_to(mid1);
    path.quad_to(previous1, mid2);

    let region = Rect::from_points([mid1, previous1, mid2])
        .expand(params.line_width * 0.5 + params.slack)
        .intersection(params.view);
    log::trace!("smoothed segment {mid1:?} -> {mid2:?}, dirty region {region:?}");
    region
}
