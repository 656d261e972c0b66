//! # Controller
//!
//! Turns a stream of touch samples into strokes, and fronts the history, eraser and persistence
//! for one canvas.
//!
//! A gesture moves through three states:
//! * `Idle`: nothing in progress. Moves and ends are dropped.
//! * `Capturing`: a stroke is being drawn. It is held here, not in the history, until the
//!   gesture finishes.
//! * `CutOver`: the gesture hit the sample cap and was finished early. Further moves are
//!   dropped until the input source ends or cancels the gesture.

use crate::color::Color;
use crate::config::{ConfigError, SketchConfig};
use crate::eraser::{self, EraseReport};
use crate::history::History;
use crate::image::ImageRef;
use crate::io::{self, ExportError, ImportError, ImportPolicy, ImportReport, StrokeRecord};
use crate::render::{self, DrawRequest, Invalidation, Renderer};
use crate::smoothing::SmoothingParams;
use crate::stroke::{CoordinateSample, PenType, Stroke, StrokeStyle, ToolKind};
use crate::util::{Point, Rect};

/// Notifications from a canvas to its host. Every method defaults to doing nothing.
pub trait SketchDelegate {
    fn will_begin_drawing(&mut self, _tool: ToolKind) {}
    fn did_end_drawing(&mut self, _tool: ToolKind) {}
    /// A gesture ran long enough to be cut over. Now is a good time to persist.
    fn save_backup_required(&mut self) {}
}
/// A delegate that ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDelegate;
impl SketchDelegate for NoDelegate {}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, strum::AsRefStr)]
pub enum Phase {
    Began,
    Moved,
    Ended,
    Cancelled,
}
/// One event from the input source. `position` is `None` if the source lost track of the touch.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TouchSample {
    pub phase: Phase,
    pub position: Option<Point>,
}

struct Capture {
    stroke: Stroke,
    previous2: Point,
    previous1: Point,
    current: Point,
    /// Moves seen so far in this gesture.
    moves: usize,
}
#[derive(Default)]
enum GestureState {
    #[default]
    Idle,
    Capturing(Box<Capture>),
    CutOver,
}

pub struct SketchController<D = NoDelegate> {
    config: SketchConfig,
    style: StrokeStyle,
    tool: ToolKind,
    pen_type: PenType,
    stamp: Option<ImageRef>,
    background: Option<ImageRef>,
    view: Rect,
    history: History,
    gesture: GestureState,
    last_erase: Option<EraseReport>,
    delegate: D,
}
impl SketchController<NoDelegate> {
    pub fn new(config: SketchConfig, view: Rect) -> Result<Self, ConfigError> {
        Self::with_delegate(config, view, NoDelegate)
    }
}
impl<D: SketchDelegate> SketchController<D> {
    pub fn with_delegate(config: SketchConfig, view: Rect, delegate: D) -> Result<Self, ConfigError> {
        let style = config.stroke_style()?;
        Ok(Self {
            config,
            style,
            tool: ToolKind::default(),
            pen_type: PenType::default(),
            stamp: None,
            background: None,
            view,
            history: History::new(),
            gesture: GestureState::Idle,
            last_erase: None,
            delegate,
        })
    }
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
    #[must_use]
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }
    #[must_use]
    pub fn delegate(&self) -> &D {
        &self.delegate
    }
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }
    #[must_use]
    pub fn view_bounds(&self) -> Rect {
        self.view
    }
    /// Resize the view. Existing strokes keep their coordinates.
    pub fn set_view_bounds(&mut self, view: Rect) {
        self.view = view;
        self.history.invalidate(Invalidation::Full);
    }
    #[must_use]
    pub fn tool(&self) -> ToolKind {
        self.tool
    }
    /// Takes effect from the next gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }
    pub fn set_pen_type(&mut self, pen_type: PenType) {
        self.pen_type = pen_type;
    }
    /// Image used by the stamp tool. Stamp gestures are dropped while this is `None`.
    pub fn set_stamp_image(&mut self, image: Option<ImageRef>) {
        self.stamp = image;
    }
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
    pub fn set_line_color(&mut self, color: Color) {
        self.style.color = color;
    }
    pub fn set_line_width(&mut self, width: f32) -> Result<(), ConfigError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "line_width",
                reason: "must be finite and greater than zero",
            });
        }
        self.style.width = width;
        Ok(())
    }
    pub fn set_line_alpha(&mut self, alpha: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::InvalidValue {
                field: "line_alpha",
                reason: "must be within [0, 1]",
            });
        }
        self.style.alpha = alpha;
        Ok(())
    }
    /// The outcome of the eraser's most recent pass, if it has run.
    #[must_use]
    pub fn last_erase_report(&self) -> Option<&EraseReport> {
        self.last_erase.as_ref()
    }
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self.gesture, GestureState::Capturing(_))
    }
    #[must_use]
    pub fn is_cut_over(&self) -> bool {
        matches!(self.gesture, GestureState::CutOver)
    }
}

// Input
impl<D: SketchDelegate> SketchController<D> {
    /// Feed one event from the input source.
    ///
    /// Begins and moves without a position are dropped. Ends and cancels without one still
    /// finish the gesture, using only the samples already seen.
    pub fn handle(&mut self, sample: TouchSample) {
        match (sample.phase, sample.position) {
            (Phase::Began, Some(position)) => {
                self.begin(position);
            }
            (Phase::Moved, Some(position)) => self.move_to(position),
            // The touch is over either way, so what was drawn is kept.
            (Phase::Ended, position) => self.end(position),
            (Phase::Cancelled, _) => self.cancel(),
            (phase, None) => log::trace!("dropped {} without a position", phase.as_ref()),
        }
    }
    /// Start a gesture with the current tool. Returns false if the tool can't draw right now.
    ///
    /// Positions are clamped to the view bounds, here and for every later sample of the gesture.
    pub fn begin(&mut self, point: Point) -> bool {
        let point = self.view.clamp(point);
        if !matches!(self.gesture, GestureState::Idle) {
            log::warn!("gesture began while another was in progress, finishing it");
            self.finish_gesture();
        }
        let stroke = Stroke::for_tool(self.tool, self.style, self.pen_type, self.stamp.as_ref());
        let Some(mut stroke) = stroke else {
            log::warn!("no stamp image set, dropping gesture");
            return false;
        };
        self.delegate.will_begin_drawing(self.tool);
        stroke.set_initial_point(point);
        if !stroke.path().is_empty() {
            self.history.invalidate(Invalidation::Region(self.view));
        }
        self.gesture = GestureState::Capturing(Box::new(Capture {
            stroke,
            previous2: point,
            previous1: point,
            current: point,
            moves: 0,
        }));
        log::debug!("began {} gesture", self.tool.as_ref());
        true
    }
    pub fn move_to(&mut self, point: Point) {
        let cap = self.config.max_samples_per_stroke;
        let GestureState::Capturing(capture) = &mut self.gesture else {
            return;
        };
        capture.moves += 1;
        if capture.moves >= cap {
            log::debug!("gesture reached {cap} moves, cutting over");
            self.delegate.save_backup_required();
            self.finish_gesture();
            self.gesture = GestureState::CutOver;
            return;
        }
        self.advance(point);
    }
    /// Finish the gesture. A final position that differs from the last one seen is drawn first.
    pub fn end(&mut self, point: Option<Point>) {
        if let Some(point) = point.map(|point| self.view.clamp(point)) {
            let moved = match &self.gesture {
                GestureState::Capturing(capture) => capture.current != point,
                _ => false,
            };
            if moved {
                self.advance(point);
            }
        }
        self.finish_gesture();
    }
    /// Finish the gesture with what has been drawn so far.
    pub fn cancel(&mut self) {
        self.finish_gesture();
    }
    fn advance(&mut self, point: Point) {
        let point = self.view.clamp(point);
        let GestureState::Capturing(capture) = &mut self.gesture else {
            return;
        };
        capture.previous2 = capture.previous1;
        capture.previous1 = capture.current;
        capture.current = point;
        match capture.stroke.tool() {
            tool @ (ToolKind::Pen | ToolKind::Eraser) => {
                let params = SmoothingParams {
                    line_width: capture.stroke.style().width,
                    slack: self.config.region_slack,
                    view: self.view,
                };
                let sample = CoordinateSample {
                    previous_point2: capture.previous2,
                    previous_point1: capture.previous1,
                    current_point: capture.current,
                };
                let region = capture.stroke.push_sample(sample, &params);
                if !region.is_empty() {
                    self.history.invalidate(Invalidation::Region(region));
                }
                if tool == ToolKind::Eraser && self.history.can_undo() {
                    self.last_erase = Some(eraser::erase(&mut self.history, capture.stroke.path()));
                }
            }
            _ => {
                capture.stroke.move_to_point(point);
                self.history.invalidate(Invalidation::Region(self.view));
            }
        }
    }
    /// Commit whatever the gesture drew and return to idle. Undone strokes can't be redone after
    /// any gesture, even one that drew nothing.
    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle | GestureState::CutOver => (),
            GestureState::Capturing(capture) => {
                let Capture { stroke, moves, .. } = *capture;
                let tool = stroke.tool();
                if tool != ToolKind::Eraser && !stroke.path().is_empty() {
                    let id = self.history.commit(stroke);
                    log::debug!("committed {id} after {moves} moves");
                } else {
                    self.history.discard_redo();
                    self.history.invalidate(Invalidation::Region(self.view));
                }
                self.delegate.did_end_drawing(tool);
            }
        }
    }
}

// History
impl<D: SketchDelegate> SketchController<D> {
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.history.can_delete()
    }
    /// Same as dirty: there is something new to save.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.history.is_dirty()
    }
    #[must_use]
    pub fn number_of_strokes(&self) -> usize {
        self.history.number_of_strokes()
    }
    pub fn note_saved(&mut self) {
        self.history.note_saved();
    }
    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        self.history.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        self.history.redo()
    }
    pub fn pinch(&mut self) -> bool {
        self.finish_gesture();
        self.history.pinch()
    }
    pub fn clear(&mut self) {
        self.finish_gesture();
        self.history.clear();
    }
    /// Start over on a new background.
    pub fn load_background(&mut self, image: ImageRef) {
        self.finish_gesture();
        log::debug!("loaded background {image:?}");
        self.background = Some(image);
        self.history.reset();
    }
    /// Change the default color and re-smooth every pen stroke, undone ones included, in that
    /// color. Other tools keep their color.
    pub fn redraw_with_color(&mut self, color: Color) {
        self.finish_gesture();
        self.style.color = color;
        let params = SmoothingParams {
            line_width: self.style.width,
            slack: self.config.region_slack,
            view: self.view,
        };
        for stroke in self.history.strokes_mut().filter(|stroke| stroke.is_pen()) {
            stroke.resmooth(Some(color), |p| p, &params);
        }
        self.history.invalidate(Invalidation::Full);
    }
}

// Persistence
impl<D: SketchDelegate> SketchController<D> {
    pub fn export(&self) -> Result<Vec<StrokeRecord>, ExportError> {
        io::export(&self.history, self.view)
    }
    pub fn export_json(&self) -> Result<String, ExportError> {
        io::export_json(&self.history, self.view)
    }
    fn import_settings(&self, policy: ImportPolicy) -> io::ImportSettings {
        io::ImportSettings {
            view: self.view,
            style: self.style,
            slack: self.config.region_slack,
            policy,
        }
    }
    /// Add saved strokes on top of the canvas, in the current style.
    pub fn import(
        &mut self,
        records: &[StrokeRecord],
        policy: ImportPolicy,
    ) -> Result<ImportReport, ImportError> {
        self.finish_gesture();
        let settings = self.import_settings(policy);
        io::import(&mut self.history, records, &settings)
    }
    pub fn import_json(
        &mut self,
        json: &str,
        policy: ImportPolicy,
    ) -> Result<ImportReport, ImportError> {
        self.finish_gesture();
        let settings = self.import_settings(policy);
        io::import_json(&mut self.history, json, &settings)
    }
}

// Rendering
impl<D: SketchDelegate> SketchController<D> {
    /// Bring `renderer` up to date, returning what was invalidated, or `None` if nothing was.
    ///
    /// A full invalidation replays the background and every active stroke. The stroke being
    /// drawn, if any, is then drawn on top.
    pub fn render(&mut self, renderer: &mut impl Renderer) -> Option<Invalidation> {
        let invalidation = self.history.take_invalidation()?;
        if invalidation.is_full() {
            let background = self
                .background
                .as_deref()
                .map(|image| (image, self.config.rendering_mode));
            render::replay(
                renderer,
                self.view,
                background,
                self.history.active_strokes(),
            );
        }
        if let GestureState::Capturing(capture) = &self.gesture {
            if let Some(request) = DrawRequest::for_stroke(&capture.stroke) {
                renderer.draw_stroke(&request);
            }
        }
        Some(invalidation)
    }
}

#[cfg(test)]
mod test {
    use super::{Phase, SketchController, SketchDelegate, TouchSample};
    use crate::config::SketchConfig;
    use crate::stroke::ToolKind;
    use crate::util::{Point, Rect};

    #[derive(Default)]
    struct Counter {
        began: usize,
        ended: usize,
        backups: usize,
    }
    impl SketchDelegate for Counter {
        fn will_begin_drawing(&mut self, _: ToolKind) {
            self.began += 1;
        }
        fn did_end_drawing(&mut self, _: ToolKind) {
            self.ended += 1;
        }
        fn save_backup_required(&mut self) {
            self.backups += 1;
        }
    }
    fn controller(cap: usize) -> SketchController<Counter> {
        let config = SketchConfig {
            max_samples_per_stroke: cap,
            ..SketchConfig::default()
        };
        SketchController::with_delegate(config, Rect::from_size(300.0, 300.0), Counter::default())
            .unwrap()
    }

    #[test]
    fn positionless_moves_dropped() {
        let mut canvas = controller(1000);
        canvas.handle(TouchSample {
            phase: Phase::Began,
            position: None,
        });
        assert!(!canvas.is_capturing());
        canvas.begin(Point::new(1.0, 1.0));
        canvas.handle(TouchSample {
            phase: Phase::Moved,
            position: None,
        });
        canvas.handle(TouchSample {
            phase: Phase::Ended,
            position: None,
        });
        // Nothing was drawn, so nothing is committed.
        assert_eq!(canvas.number_of_strokes(), 0);
        assert_eq!(canvas.delegate().ended, 1);
    }
    #[test]
    fn positionless_end_keeps_stroke() {
        let mut canvas = controller(1000);
        canvas.begin(Point::new(10.0, 10.0));
        canvas.move_to(Point::new(10.0, 20.0));
        canvas.move_to(Point::new(10.0, 30.0));
        canvas.handle(TouchSample {
            phase: Phase::Ended,
            position: None,
        });
        assert!(!canvas.is_capturing());
        assert_eq!(canvas.number_of_strokes(), 1);
        assert_eq!(canvas.delegate().ended, 1);
    }
    #[test]
    fn cutover_ignores_moves_until_end() {
        let mut canvas = controller(3);
        canvas.begin(Point::new(0.0, 0.0));
        canvas.move_to(Point::new(1.0, 0.0));
        canvas.move_to(Point::new(2.0, 0.0));
        assert!(canvas.is_capturing());
        canvas.move_to(Point::new(3.0, 0.0));
        assert!(canvas.is_cut_over());
        assert_eq!(canvas.delegate().backups, 1);
        assert_eq!(canvas.number_of_strokes(), 1);
        assert_eq!(canvas.history().active_strokes().next().unwrap().coordinates().len(), 2);

        canvas.move_to(Point::new(4.0, 0.0));
        canvas.end(Some(Point::new(5.0, 0.0)));
        assert!(!canvas.is_capturing() && !canvas.is_cut_over());
        assert_eq!(canvas.delegate().backups, 1);
        assert_eq!(canvas.delegate().ended, 1);
        assert_eq!(canvas.number_of_strokes(), 1);
    }
    #[test]
    fn stamp_without_image_dropped() {
        let mut canvas = controller(1000);
        canvas.set_tool(ToolKind::Stamp);
        assert!(!canvas.begin(Point::new(5.0, 5.0)));
        assert_eq!(canvas.delegate().began, 0);
    }
    #[test]
    fn shape_committed_on_end() {
        let mut canvas = controller(1000);
        canvas.set_tool(ToolKind::RectangleFill);
        canvas.begin(Point::new(10.0, 10.0));
        canvas.move_to(Point::new(50.0, 40.0));
        canvas.end(Some(Point::new(60.0, 40.0)));
        let rect = canvas.history().active_strokes().next().unwrap();
        assert!(rect.is_filled());
        assert_eq!(
            rect.path().bounding_box(),
            Rect::from_corners(Point::new(10.0, 10.0), Point::new(60.0, 40.0))
        );
    }
    #[test]
    fn invalid_style_rejected() {
        let mut canvas = controller(1000);
        assert!(canvas.set_line_width(-1.0).is_err());
        assert!(canvas.set_line_alpha(2.0).is_err());
        assert!(canvas.set_line_width(3.0).is_ok());
        assert_eq!(canvas.style().width, 3.0);
    }
}
