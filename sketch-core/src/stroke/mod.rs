//! # Strokes
//!
//! One recorded gesture: its geometry, how to draw it, and whatever the tool needs to rebuild
//! that geometry later. Pen strokes keep every sample they were smoothed from so they can be
//! re-smoothed at another scale or color.

pub mod shapes;

use crate::color::Color;
use crate::image::ImageRef;
use crate::path::Path;
use crate::smoothing::{self, SmoothingParams};
use crate::util::{Point, Rect};

pub type StrokeID = crate::SketchID<Stroke>;

/// The three points that produce one smoothed segment.
#[derive(Copy, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct CoordinateSample {
    pub previous_point2: Point,
    pub previous_point1: Point,
    pub current_point: Point,
}
impl CoordinateSample {
    /// Map every point through `f`, e.g. to normalize or denormalize.
    #[must_use]
    pub fn map(self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            previous_point2: f(self.previous_point2),
            previous_point1: f(self.previous_point1),
            current_point: f(self.current_point),
        }
    }
    #[must_use]
    pub fn points(&self) -> [Point; 3] {
        [self.previous_point2, self.previous_point1, self.current_point]
    }
}

/// Whether a pen lays down color or clears it.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PenType {
    #[default]
    Normal,
    Eraser,
}

/// The tool a gesture is drawn with.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Line,
    Arrow,
    RectangleStroke,
    RectangleFill,
    EllipseStroke,
    EllipseFill,
    Stamp,
}

/// Drag extent of a shape tool: where the gesture began and where it is now.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

/// Tool-specific stroke data.
#[derive(Clone, Debug)]
pub enum StrokeKind {
    Pen {
        coordinates: Vec<CoordinateSample>,
        pen_type: PenType,
    },
    /// Eraser gestures are never committed to the history, only tested against it.
    Eraser { coordinates: Vec<CoordinateSample> },
    Line(Span),
    Arrow(Span),
    RectangleStroke(Span),
    RectangleFill(Span),
    EllipseStroke(Span),
    EllipseFill(Span),
    Stamp { image: ImageRef, center: Point },
}
impl StrokeKind {
    #[must_use]
    pub fn tool(&self) -> ToolKind {
        match self {
            Self::Pen { .. } => ToolKind::Pen,
            Self::Eraser { .. } => ToolKind::Eraser,
            Self::Line(_) => ToolKind::Line,
            Self::Arrow(_) => ToolKind::Arrow,
            Self::RectangleStroke(_) => ToolKind::RectangleStroke,
            Self::RectangleFill(_) => ToolKind::RectangleFill,
            Self::EllipseStroke(_) => ToolKind::EllipseStroke,
            Self::EllipseFill(_) => ToolKind::EllipseFill,
            Self::Stamp { .. } => ToolKind::Stamp,
        }
    }
}

/// Color, width and opacity applied to a stroke.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StrokeStyle {
    pub color: Color,
    /// Always > 0.
    pub width: f32,
    /// In `[0, 1]`.
    pub alpha: f32,
}
impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 10.0,
            alpha: 1.0,
        }
    }
}

/// Bookkeeping for a stroke blanked by the eraser.
///
/// `slot` is the active-list position the stroke occupied when it was split, `backup_path`
/// the geometry it had. Having both in one optional struct keeps them present or absent together.
#[derive(Clone, PartialEq, Debug)]
pub struct Split {
    pub slot: usize,
    pub backup_path: Path,
    /// Whether the placeholder is also listed on top of the canvas. False for the copy a pinch
    /// leaves behind, which is only listed at `slot`.
    pub on_top: bool,
}

#[derive(Clone, Debug)]
pub struct Stroke {
    kind: StrokeKind,
    style: StrokeStyle,
    path: Path,
    split: Option<Split>,
}
impl Stroke {
    /// Create an empty stroke for `tool`. Returns `None` for [`ToolKind::Stamp`] without an image.
    #[must_use]
    pub fn for_tool(
        tool: ToolKind,
        style: StrokeStyle,
        pen_type: PenType,
        stamp: Option<&ImageRef>,
    ) -> Option<Self> {
        let span = Span {
            start: Point::ZERO,
            end: Point::ZERO,
        };
        let kind = match tool {
            ToolKind::Pen => StrokeKind::Pen {
                coordinates: Vec::new(),
                pen_type,
            },
            ToolKind::Eraser => StrokeKind::Eraser {
                coordinates: Vec::new(),
            },
            ToolKind::Line => StrokeKind::Line(span),
            ToolKind::Arrow => StrokeKind::Arrow(span),
            ToolKind::RectangleStroke => StrokeKind::RectangleStroke(span),
            ToolKind::RectangleFill => StrokeKind::RectangleFill(span),
            ToolKind::EllipseStroke => StrokeKind::EllipseStroke(span),
            ToolKind::EllipseFill => StrokeKind::EllipseFill(span),
            ToolKind::Stamp => StrokeKind::Stamp {
                image: stamp?.clone(),
                center: Point::ZERO,
            },
        };
        Some(Self {
            kind,
            style,
            path: Path::new(),
            split: None,
        })
    }
    /// A new, empty pen stroke.
    #[must_use]
    pub fn pen(style: StrokeStyle, pen_type: PenType) -> Self {
        Self {
            kind: StrokeKind::Pen {
                coordinates: Vec::new(),
                pen_type,
            },
            style,
            path: Path::new(),
            split: None,
        }
    }
    #[must_use]
    pub fn kind(&self) -> &StrokeKind {
        &self.kind
    }
    #[must_use]
    pub fn tool(&self) -> ToolKind {
        self.kind.tool()
    }
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
    #[must_use]
    pub fn split(&self) -> Option<&Split> {
        self.split.as_ref()
    }
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.split.is_some()
    }
    #[must_use]
    pub fn is_pen(&self) -> bool {
        matches!(self.kind, StrokeKind::Pen { .. })
    }
    /// Recorded samples, for pen and eraser strokes. Empty for every other tool.
    #[must_use]
    pub fn coordinates(&self) -> &[CoordinateSample] {
        match &self.kind {
            StrokeKind::Pen { coordinates, .. } | StrokeKind::Eraser { coordinates } => coordinates,
            _ => &[],
        }
    }
    #[must_use]
    pub fn pen_type(&self) -> Option<PenType> {
        match self.kind {
            StrokeKind::Pen { pen_type, .. } => Some(pen_type),
            _ => None,
        }
    }
    /// First point of a gesture. Places stamps and anchors shapes; pens wait for samples.
    pub fn set_initial_point(&mut self, point: Point) {
        match &mut self.kind {
            StrokeKind::Pen { .. } | StrokeKind::Eraser { .. } => (),
            StrokeKind::Line(span)
            | StrokeKind::Arrow(span)
            | StrokeKind::RectangleStroke(span)
            | StrokeKind::RectangleFill(span)
            | StrokeKind::EllipseStroke(span)
            | StrokeKind::EllipseFill(span) => {
                *span = Span {
                    start: point,
                    end: point,
                };
            }
            StrokeKind::Stamp { center, .. } => {
                *center = point;
                self.rebuild_shape();
            }
        }
    }
    /// Record a sample on a pen or eraser stroke and extend its path, returning the redraw region.
    ///
    /// Other tools ignore samples and return an empty region.
    pub fn push_sample(&mut self, sample: CoordinateSample, params: &SmoothingParams) -> Rect {
        match &mut self.kind {
            StrokeKind::Pen { coordinates, .. } | StrokeKind::Eraser { coordinates } => {
                coordinates.push(sample);
                smoothing::extend(
                    &mut self.path,
                    sample.previous_point2,
                    sample.previous_point1,
                    sample.current_point,
                    params,
                )
            }
            _ => Rect::NOTHING,
        }
    }
    /// Drag a shape or stamp to `to`, rebuilding its geometry. Pens and erasers are unaffected.
    pub fn move_to_point(&mut self, to: Point) {
        match &mut self.kind {
            StrokeKind::Pen { .. } | StrokeKind::Eraser { .. } => return,
            StrokeKind::Line(span)
            | StrokeKind::Arrow(span)
            | StrokeKind::RectangleStroke(span)
            | StrokeKind::RectangleFill(span)
            | StrokeKind::EllipseStroke(span)
            | StrokeKind::EllipseFill(span) => span.end = to,
            StrokeKind::Stamp { center, .. } => *center = to,
        }
        self.rebuild_shape();
    }
    fn rebuild_shape(&mut self) {
        self.path = match &self.kind {
            StrokeKind::Pen { .. } | StrokeKind::Eraser { .. } => return,
            StrokeKind::Line(span) => shapes::line(*span),
            StrokeKind::Arrow(span) => shapes::arrow(*span, self.style.width),
            StrokeKind::RectangleStroke(span) | StrokeKind::RectangleFill(span) => {
                shapes::rectangle(*span)
            }
            StrokeKind::EllipseStroke(span) | StrokeKind::EllipseFill(span) => {
                shapes::ellipse(*span)
            }
            StrokeKind::Stamp { image, center } => shapes::stamp(image, *center),
        };
    }
    /// Whether the geometry should be filled rather than outlined.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(
            self.kind,
            StrokeKind::RectangleFill(_) | StrokeKind::EllipseFill(_)
        )
    }
    /// Re-smooth a pen stroke from its recorded samples, optionally recoloring it.
    ///
    /// The samples are mapped through `transform` first, and the recorded samples are replaced
    /// by the mapped ones. A split stroke stays split: the rebuilt geometry becomes its backup.
    pub fn resmooth(
        &mut self,
        color: Option<Color>,
        transform: impl Fn(Point) -> Point,
        params: &SmoothingParams,
    ) {
        if let Some(color) = color {
            self.style.color = color;
        }
        let StrokeKind::Pen { coordinates, .. } = &mut self.kind else {
            return;
        };
        let mut path = Path::new();
        let params = SmoothingParams {
            line_width: self.style.width,
            ..*params
        };
        for sample in coordinates.iter_mut() {
            *sample = sample.map(&transform);
            let _ = smoothing::extend(
                &mut path,
                sample.previous_point2,
                sample.previous_point1,
                sample.current_point,
                &params,
            );
        }
        match &mut self.split {
            Some(split) => split.backup_path = path,
            None => self.path = path,
        }
    }
    /// A deep copy of this stroke in the split state: geometry moved to the backup, path cleared.
    #[must_use]
    pub fn to_split(&self, slot: usize) -> Self {
        let mut copy = self.clone();
        let backup_path = std::mem::take(&mut copy.path);
        copy.split = Some(Split {
            slot,
            backup_path,
            on_top: true,
        });
        copy
    }
    /// A deep copy of this split placeholder that is listed only at its slot.
    #[must_use]
    pub fn to_slot_only(&self) -> Self {
        let mut copy = self.clone();
        if let Some(split) = &mut copy.split {
            split.on_top = false;
        }
        copy
    }
    /// A deep copy of this stroke with `path` as its geometry and no split state.
    #[must_use]
    pub fn to_restored(&self, path: Path) -> Self {
        let mut copy = self.clone();
        copy.path = path;
        copy.split = None;
        copy
    }
}

#[cfg(test)]
mod test {
    use super::{CoordinateSample, PenType, Stroke, StrokeStyle, ToolKind};
    use crate::smoothing::SmoothingParams;
    use crate::util::{Point, Rect};

    fn params() -> SmoothingParams {
        SmoothingParams {
            line_width: 10.0,
            slack: 2.0,
            view: Rect::from_size(300.0, 300.0),
        }
    }
    fn sample(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> CoordinateSample {
        CoordinateSample {
            previous_point2: Point::new(a.0, a.1),
            previous_point1: Point::new(b.0, b.1),
            current_point: Point::new(c.0, c.1),
        }
    }

    #[test]
    fn split_moves_geometry_to_backup() {
        let mut pen = Stroke::pen(StrokeStyle::default(), PenType::Normal);
        pen.push_sample(sample((0.0, 0.0), (0.0, 0.0), (10.0, 0.0)), &params());
        let original = pen.path().clone();

        let split = pen.to_split(3);
        assert!(split.path().is_empty());
        let info = split.split().unwrap();
        assert_eq!(info.slot, 3);
        assert_eq!(info.backup_path, original);
        assert_eq!(split.coordinates(), pen.coordinates());

        let restored = split.to_restored(info.backup_path.clone());
        assert!(!restored.is_split());
        assert_eq!(restored.path(), &original);
    }
    #[test]
    fn resmooth_keeps_split_state() {
        let mut pen = Stroke::pen(StrokeStyle::default(), PenType::Normal);
        pen.push_sample(sample((0.0, 0.0), (0.0, 0.0), (10.0, 0.0)), &params());
        let mut split = pen.to_split(0);
        split.resmooth(None, |p| p, &params());
        assert!(split.path().is_empty());
        assert_eq!(split.split().unwrap().backup_path, *pen.path());
    }
    #[test]
    fn shapes_ignore_samples() {
        let mut line = Stroke::for_tool(
            ToolKind::Line,
            StrokeStyle::default(),
            PenType::Normal,
            None,
        )
        .unwrap();
        line.set_initial_point(Point::new(1.0, 1.0));
        let region = line.push_sample(sample((0.0, 0.0), (1.0, 1.0), (2.0, 2.0)), &params());
        assert!(region.is_empty());
        assert!(line.path().is_empty());
        line.move_to_point(Point::new(5.0, 5.0));
        assert_eq!(
            line.path().bounding_box(),
            Rect::from_corners(Point::new(1.0, 1.0), Point::new(5.0, 5.0))
        );
    }
    #[test]
    fn stamp_requires_image() {
        assert!(Stroke::for_tool(
            ToolKind::Stamp,
            StrokeStyle::default(),
            PenType::Normal,
            None
        )
        .is_none());
    }
}
