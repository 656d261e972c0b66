//! # Eraser
//!
//! The eraser doesn't cut strokes apart. Any pen stroke whose bounding box touches the eraser
//! path's bounding box is blanked as a whole by splitting it (see [`History::split`]), which
//! undo can reverse.

use crate::history::History;
use crate::path::Path;

/// What one pass of the eraser did.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct EraseReport {
    /// Active-list slots that were blanked by this pass.
    pub newly_split: smallvec::SmallVec<[usize; 4]>,
    /// No visible, unsplit pen strokes remain.
    pub fully_resolved: bool,
}

/// Blank every pen stroke that overlaps `eraser`.
///
/// Only strokes that were on the canvas before this call are tested. Strokes that are already
/// split or have no geometry are skipped.
pub fn erase(history: &mut History, eraser: &Path) -> EraseReport {
    let mut report = EraseReport::default();
    let bounds = eraser.bounding_box();
    if !bounds.is_empty() {
        // Splitting appends placeholders, which are never candidates.
        let candidates: smallvec::SmallVec<[usize; 4]> = history
            .active()
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                let stroke = history.get(*id)?;
                (stroke.is_pen()
                    && !stroke.is_split()
                    && !stroke.path().is_empty()
                    && stroke.path().bounding_box().intersects(&bounds))
                .then_some(slot)
            })
            .collect();
        for slot in candidates {
            if history.split(slot).is_some() {
                report.newly_split.push(slot);
            }
        }
    }
    report.fully_resolved = !history
        .active_strokes()
        .any(|stroke| stroke.is_pen() && !stroke.is_split() && !stroke.path().is_empty());
    if report.fully_resolved {
        log::debug!("eraser resolved every pen stroke");
    }
    report
}
