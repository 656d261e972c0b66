//! # Persistence format
//!
//! Pen strokes are saved as the samples they were smoothed from, normalized against the view so
//! a drawing made on one view size reloads on another. Geometry is never saved: it's rebuilt by
//! replaying the samples through the smoother.
//!
//! The JSON form is an array of strokes, each an array of samples, each an object holding three
//! `{"x", "y"}` points under `previousPoint2Key`, `previousPointKey` and `currentPointKey`.

use crate::history::History;
use crate::render::Invalidation;
use crate::smoothing::SmoothingParams;
use crate::stroke::{CoordinateSample, PenType, Stroke, StrokeStyle};
use crate::util::{Point, Rect};

const PREVIOUS_POINT2_KEY: &str = "previousPoint2Key";
const PREVIOUS_POINT1_KEY: &str = "previousPointKey";
const CURRENT_POINT_KEY: &str = "currentPointKey";

/// One sample, in normalized coordinates.
#[derive(Copy, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct SampleRecord {
    #[serde(rename = "previousPoint2Key")]
    pub previous_point2: Point,
    #[serde(rename = "previousPointKey")]
    pub previous_point1: Point,
    #[serde(rename = "currentPointKey")]
    pub current_point: Point,
}
impl From<CoordinateSample> for SampleRecord {
    fn from(sample: CoordinateSample) -> Self {
        Self {
            previous_point2: sample.previous_point2,
            previous_point1: sample.previous_point1,
            current_point: sample.current_point,
        }
    }
}
impl From<SampleRecord> for CoordinateSample {
    fn from(record: SampleRecord) -> Self {
        Self {
            previous_point2: record.previous_point2,
            previous_point1: record.previous_point1,
            current_point: record.current_point,
        }
    }
}
/// One pen stroke's samples, in capture order.
pub type StrokeRecord = Vec<SampleRecord>;

/// Why a single stroke record couldn't be read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a list of samples")]
    NotAList,
    #[error("sample {sample} is not an object")]
    NotASample { sample: usize },
    #[error("sample {sample} is missing `{key}`")]
    MissingKey { sample: usize, key: &'static str },
    #[error("sample {sample} has a malformed point under `{key}`")]
    BadPoint { sample: usize, key: &'static str },
    #[error("sample {sample} has non-finite coordinates")]
    NonFinite { sample: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("sketch data is not a list of strokes")]
    NotAnArray,
    #[error("stroke record {record} is malformed: {source}")]
    MalformedRecord {
        record: usize,
        #[source]
        source: RecordError,
    },
    #[error("couldn't parse sketch data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("view bounds have no area")]
    InvalidBounds,
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("view bounds have no area")]
    InvalidBounds,
    #[error("couldn't write sketch data: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do when a record is malformed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ImportPolicy {
    /// Log it, skip it, keep going.
    #[default]
    SkipInvalid,
    /// Stop at the first bad record. Strokes already imported stay.
    Abort,
}

/// How imported strokes are built.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ImportSettings {
    /// Normalized coordinates are scaled back up against these bounds.
    pub view: Rect,
    /// Every imported stroke gets this style.
    pub style: StrokeStyle,
    pub slack: f32,
    pub policy: ImportPolicy,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    /// Records skipped under [`ImportPolicy::SkipInvalid`], by index.
    pub skipped: Vec<(usize, RecordError)>,
}

fn check_bounds(view: Rect) -> bool {
    !view.is_empty() && view.width() > 0.0 && view.height() > 0.0
}
// Captured samples already lie inside the view. The clamp only absorbs rounding.
fn normalize(point: Point, view: Rect) -> Point {
    Point::new(
        ((point.x - view.min.x) / view.width()).clamp(0.0, 1.0),
        ((point.y - view.min.y) / view.height()).clamp(0.0, 1.0),
    )
}
fn denormalize(point: Point, view: Rect) -> Point {
    let scaled = point.scale(view.size());
    Point::new(scaled.x + view.min.x, scaled.y + view.min.y)
}

/// The samples of every visible pen stroke, in draw order, normalized against `view`.
pub fn export(history: &History, view: Rect) -> Result<Vec<StrokeRecord>, ExportError> {
    if !check_bounds(view) {
        return Err(ExportError::InvalidBounds);
    }
    Ok(history
        .active_strokes()
        .filter(|stroke| stroke.is_pen() && !stroke.path().is_empty())
        .map(|stroke| {
            stroke
                .coordinates()
                .iter()
                .map(|sample| SampleRecord::from(sample.map(|p| normalize(p, view))))
                .collect::<StrokeRecord>()
        })
        .collect())
}

pub fn export_json(history: &History, view: Rect) -> Result<String, ExportError> {
    Ok(serde_json::to_string(&export(history, view)?)?)
}

/// Append a pen stroke for each record, on top of whatever is already on the canvas.
pub fn import(
    history: &mut History,
    records: &[StrokeRecord],
    settings: &ImportSettings,
) -> Result<ImportReport, ImportError> {
    import_parsed(
        history,
        records.iter().map(|record| {
            let samples = record.iter().copied().map(CoordinateSample::from);
            for (sample, coords) in samples.clone().enumerate() {
                if !coords.points().iter().all(|p| p.is_finite()) {
                    return Err(RecordError::NonFinite { sample });
                }
            }
            Ok(samples.collect())
        }),
        settings,
    )
}

/// Like [`import`], reading the JSON form. Structural problems inside a record are handled per
/// the import policy; data that isn't JSON or isn't a list at all is rejected outright.
pub fn import_json(
    history: &mut History,
    json: &str,
    settings: &ImportSettings,
) -> Result<ImportReport, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(records) = value else {
        return Err(ImportError::NotAnArray);
    };
    import_parsed(history, records.iter().map(parse_record), settings)
}

fn parse_record(record: &serde_json::Value) -> Result<Vec<CoordinateSample>, RecordError> {
    let serde_json::Value::Array(samples) = record else {
        return Err(RecordError::NotAList);
    };
    samples
        .iter()
        .enumerate()
        .map(|(sample, value)| {
            let serde_json::Value::Object(object) = value else {
                return Err(RecordError::NotASample { sample });
            };
            let point = |key: &'static str| -> Result<Point, RecordError> {
                let value = object
                    .get(key)
                    .ok_or(RecordError::MissingKey { sample, key })?;
                let point: Point = serde_json::from_value(value.clone())
                    .map_err(|_| RecordError::BadPoint { sample, key })?;
                if point.is_finite() {
                    Ok(point)
                } else {
                    Err(RecordError::NonFinite { sample })
                }
            };
            Ok(CoordinateSample {
                previous_point2: point(PREVIOUS_POINT2_KEY)?,
                previous_point1: point(PREVIOUS_POINT1_KEY)?,
                current_point: point(CURRENT_POINT_KEY)?,
            })
        })
        .collect()
}

fn import_parsed(
    history: &mut History,
    records: impl Iterator<Item = Result<Vec<CoordinateSample>, RecordError>>,
    settings: &ImportSettings,
) -> Result<ImportReport, ImportError> {
    if !check_bounds(settings.view) {
        return Err(ImportError::InvalidBounds);
    }
    let params = SmoothingParams {
        line_width: settings.style.width,
        slack: settings.slack,
        view: settings.view,
    };
    let mut report = ImportReport::default();
    let mut failure = None;
    for (record, samples) in records.enumerate() {
        match samples {
            Ok(samples) if samples.is_empty() => {
                log::debug!("stroke record {record} has no samples, skipping");
            }
            Ok(samples) => {
                let mut stroke = Stroke::pen(settings.style, PenType::Normal);
                for sample in samples {
                    let _ = stroke.push_sample(
                        sample.map(|p| denormalize(p, settings.view)),
                        &params,
                    );
                }
                history.append(stroke);
                report.imported += 1;
            }
            Err(source) => match settings.policy {
                ImportPolicy::SkipInvalid => {
                    log::warn!("skipping stroke record {record}: {source}");
                    report.skipped.push((record, source));
                }
                ImportPolicy::Abort => {
                    failure = Some(ImportError::MalformedRecord { record, source });
                    break;
                }
            },
        }
    }
    if report.imported > 0 {
        history.mark_dirty();
        history.invalidate(Invalidation::Full);
    }
    log::debug!(
        "imported {} strokes, skipped {}",
        report.imported,
        report.skipped.len()
    );
    match failure {
        Some(failure) => Err(failure),
        None => Ok(report),
    }
}

#[cfg(test)]
mod test {
    use super::{
        export, import, import_json, ImportError, ImportPolicy, ImportSettings, RecordError,
        SampleRecord,
    };
    use crate::history::History;
    use crate::stroke::StrokeStyle;
    use crate::util::{Point, Rect};

    fn settings(policy: ImportPolicy) -> ImportSettings {
        ImportSettings {
            view: Rect::from_size(200.0, 100.0),
            style: StrokeStyle::default(),
            slack: 2.0,
            policy,
        }
    }
    fn sample_json(x: f32) -> String {
        format!(
            r#"{{"previousPoint2Key":{{"x":{x},"y":0.25}},"previousPointKey":{{"x":{x},"y":0.5}},"currentPointKey":{{"x":{x},"y":0.75}}}}"#
        )
    }

    #[test]
    fn json_keys() {
        let record = SampleRecord {
            previous_point2: Point::new(0.0, 0.0),
            previous_point1: Point::new(0.5, 0.5),
            current_point: Point::new(1.0, 1.0),
        };
        let json = serde_json::to_value(record).unwrap();
        assert!(json.get("previousPoint2Key").is_some());
        assert!(json.get("previousPointKey").is_some());
        assert!(json.get("currentPointKey").is_some());
    }
    #[test]
    fn import_denormalizes() {
        let mut history = History::new();
        let json = format!("[[{}]]", sample_json(0.5));
        let report = import_json(&mut history, &json, &settings(ImportPolicy::Abort)).unwrap();
        assert_eq!(report.imported, 1);
        assert!(history.is_dirty());
        let stroke = history.active_strokes().next().unwrap();
        assert_eq!(stroke.coordinates()[0].current_point, Point::new(100.0, 75.0));
        assert!(!stroke.path().is_empty());

        let exported = export(&history, Rect::from_size(200.0, 100.0)).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0][0].current_point, Point::new(0.5, 0.75));
    }
    #[test]
    fn skip_invalid_keeps_going() {
        let mut history = History::new();
        let json = format!(
            r#"[[{}], [{{"previousPointKey":{{"x":0,"y":0}}}}], 7, [{}]]"#,
            sample_json(0.1),
            sample_json(0.9)
        );
        let report =
            import_json(&mut history, &json, &settings(ImportPolicy::SkipInvalid)).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(
            report.skipped,
            vec![
                (
                    1,
                    RecordError::MissingKey {
                        sample: 0,
                        key: "previousPoint2Key"
                    }
                ),
                (2, RecordError::NotAList),
            ]
        );
        assert_eq!(history.number_of_strokes(), 2);
    }
    #[test]
    fn abort_keeps_earlier_strokes() {
        let mut history = History::new();
        let json = format!(r#"[[{}], [5], [{}]]"#, sample_json(0.1), sample_json(0.9));
        let err = import_json(&mut history, &json, &settings(ImportPolicy::Abort)).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MalformedRecord {
                record: 1,
                source: RecordError::NotASample { sample: 0 }
            }
        ));
        assert_eq!(history.number_of_strokes(), 1);
        assert!(history.is_dirty());
    }
    #[test]
    fn rejects_non_list() {
        let mut history = History::new();
        assert!(matches!(
            import_json(&mut history, "{}", &settings(ImportPolicy::SkipInvalid)),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(
            import_json(&mut history, "[[", &settings(ImportPolicy::SkipInvalid)),
            Err(ImportError::Json(_))
        ));
        assert!(!history.is_dirty());
    }
    #[test]
    fn non_finite_typed_record() {
        let mut history = History::new();
        let bad = SampleRecord {
            previous_point2: Point::new(f32::NAN, 0.0),
            previous_point1: Point::ZERO,
            current_point: Point::ZERO,
        };
        let report = import(&mut history, &[vec![bad]], &settings(ImportPolicy::SkipInvalid))
            .unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, vec![(0, RecordError::NonFinite { sample: 0 })]);
        assert!(!history.is_dirty());
    }
    #[test]
    fn zero_area_view_rejected() {
        let history = History::new();
        assert!(export(&history, Rect::from_size(0.0, 10.0)).is_err());
    }
}
