//! # History
//!
//! Strokes are owned by a [`StrokeArena`] and referred to by [`StrokeID`]. Two ordered lists
//! of handles say what's on the canvas:
//! * The *active* list: visible strokes, in draw order.
//! * The *buffer*: strokes taken off the canvas by undo or pinch, most recent last, available
//!   to redo.
//!
//! A handle is never in both lists at once. The only handle that appears twice is a split
//! placeholder, which sits at the slot its stroke used to occupy *and* at the tail of the
//! active list, so that undoing the erase finds it at the tail and knows where to restore.

mod arena;

pub use arena::StrokeArena;

use crate::render::Invalidation;
use crate::stroke::{Split, Stroke, StrokeID};

#[derive(Default, Debug)]
pub struct History {
    arena: StrokeArena,
    active: Vec<StrokeID>,
    buffer: Vec<StrokeID>,
    /// Unsaved changes exist. Set by every mutation, cleared only by [`Self::note_saved`].
    dirty: bool,
    pending: Option<Invalidation>,
}

// Queries
impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.active.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.buffer.is_empty()
    }
    /// There is something visible to delete.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.active_strokes().any(|stroke| !stroke.path().is_empty())
    }
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    /// Length of the active list, split placeholders counted at each place they appear.
    #[must_use]
    pub fn number_of_strokes(&self) -> usize {
        self.active.len()
    }
    #[must_use]
    pub fn active(&self) -> &[StrokeID] {
        &self.active
    }
    #[must_use]
    pub fn buffer(&self) -> &[StrokeID] {
        &self.buffer
    }
    #[must_use]
    pub fn get(&self, id: StrokeID) -> Option<&Stroke> {
        self.arena.get(id)
    }
    /// Active strokes in draw order.
    pub fn active_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.active.iter().filter_map(|id| self.arena.get(*id))
    }
    /// Check the list bookkeeping:
    /// * No handle is both active and buffered.
    /// * No handle is buffered twice.
    /// * A handle listed twice in the active list is a split placeholder, one of whose
    ///   positions is its own slot.
    /// * Every listed handle resolves, and the arena holds nothing else.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = hashbrown::HashMap::<StrokeID, smallvec::SmallVec<[usize; 2]>>::new();
        for (idx, id) in self.active.iter().enumerate() {
            seen.entry(*id).or_default().push(idx);
        }
        for (id, positions) in &seen {
            match positions.as_slice() {
                [_] => (),
                [a, b] => {
                    let Some(split) = self.arena.get(*id).and_then(Stroke::split) else {
                        return false;
                    };
                    if split.slot != *a && split.slot != *b {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        let mut buffered = hashbrown::HashSet::new();
        for id in &self.buffer {
            if seen.contains_key(id) || !buffered.insert(*id) {
                return false;
            }
        }
        seen.keys().chain(buffered.iter()).all(|id| self.arena.contains(*id))
            && self.arena.len() == seen.len() + buffered.len()
    }
}

// Invalidation and dirty tracking
impl History {
    /// Add to the pending invalidation.
    pub fn invalidate(&mut self, invalidation: Invalidation) {
        self.pending = Some(match self.pending {
            Some(pending) => pending.merge(invalidation),
            None => invalidation,
        });
    }
    /// Take everything invalidated since the last call.
    pub fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.pending.take()
    }
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
    /// The persistence layer has stored the current state.
    pub fn note_saved(&mut self) {
        self.dirty = false;
    }
    fn changed(&mut self) {
        self.dirty = true;
        self.invalidate(Invalidation::Full);
    }
}

// Mutation
impl History {
    /// Add a finished stroke to the top of the canvas. Anything undone can no longer be redone.
    pub fn commit(&mut self, stroke: Stroke) -> StrokeID {
        self.discard_redo();
        let id = self.append(stroke);
        self.changed();
        id
    }
    /// Add a stroke to the top of the canvas, leaving the buffer and the dirty flag alone.
    pub fn append(&mut self, stroke: Stroke) -> StrokeID {
        let id = self.arena.insert(stroke);
        self.active.push(id);
        id
    }
    /// Drop every undone stroke.
    pub fn discard_redo(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        log::debug!("discarding {} undone strokes", self.buffer.len());
        for id in std::mem::take(&mut self.buffer) {
            self.release(id);
        }
    }
    /// Take the top stroke off the canvas. If it's a split placeholder, the stroke it blanked is
    /// put back at its slot with its original geometry.
    pub fn undo(&mut self) -> bool {
        let Some(id) = self.active.pop() else {
            return false;
        };
        let mut replaced = None;
        if let Some(Split {
            slot,
            backup_path,
            on_top,
        }) = self.arena.get(id).and_then(Stroke::split).cloned()
        {
            if !on_top && slot == self.active.len() {
                // It was only listed at its slot, which it just left.
                if let Some(restored) = self.arena.get(id).map(|s| s.to_restored(backup_path)) {
                    let restored = self.arena.insert(restored);
                    self.active.push(restored);
                    log::debug!("undo restored {restored} at slot {slot}");
                }
            } else {
                let restoration = self.active.get(slot).copied().and_then(|occupant| {
                    let restored = self.arena.get(occupant)?.to_restored(backup_path);
                    Some((occupant, restored))
                });
                match restoration {
                    Some((occupant, restored)) => {
                        let restored = self.arena.insert(restored);
                        self.active[slot] = restored;
                        replaced = Some(occupant);
                        log::debug!("undo restored {restored} at slot {slot}");
                    }
                    None => log::warn!("{id} refers to slot {slot}, which no longer exists"),
                }
            }
        }
        self.buffer.push(id);
        if let Some(replaced) = replaced {
            self.release(replaced);
        }
        log::debug!("undo {id}");
        self.changed();
        true
    }
    /// Put the most recently undone stroke back. A split placeholder also returns to its slot.
    pub fn redo(&mut self) -> bool {
        let Some(id) = self.buffer.pop() else {
            return false;
        };
        let mut replaced = None;
        let mut listed = false;
        let split = self.arena.get(id).and_then(Stroke::split);
        if let Some((slot, on_top)) = split.map(|split| (split.slot, split.on_top)) {
            if on_top || slot < self.active.len() {
                match self.active.get_mut(slot) {
                    Some(occupant) => {
                        replaced = Some(std::mem::replace(occupant, id));
                        listed = !on_top;
                    }
                    None => log::warn!("{id} refers to slot {slot}, which no longer exists"),
                }
            }
        }
        if !listed {
            self.active.push(id);
        }
        if let Some(replaced) = replaced {
            self.release(replaced);
        }
        log::debug!("redo {id}");
        self.changed();
        true
    }
    /// Move the top stroke to the buffer without restoring anything it split.
    ///
    /// A split placeholder popped this way leaves a blank copy of itself at its slot, so the
    /// slot stays blank and the placeholder is only listed in the buffer. Undoing that copy later
    /// restores the stroke it blanked.
    pub fn pinch(&mut self) -> bool {
        let Some(id) = self.active.pop() else {
            return false;
        };
        if let Some(slot) = self.arena.get(id).and_then(Stroke::split).map(|s| s.slot) {
            if self.active.get(slot) == Some(&id) {
                if let Some(copy) = self.arena.get(id).map(Stroke::to_slot_only) {
                    self.active[slot] = self.arena.insert(copy);
                }
            }
        }
        self.buffer.push(id);
        log::debug!("pinch {id}");
        self.changed();
        true
    }
    /// Empty both lists.
    pub fn clear(&mut self) {
        self.reset();
        self.dirty = true;
        log::debug!("cleared");
    }
    /// Empty both lists without marking the canvas as changed, as when starting over on a new
    /// background.
    pub fn reset(&mut self) {
        self.active.clear();
        self.buffer.clear();
        self.arena.clear();
        self.invalidate(Invalidation::Full);
    }
    /// Blank the active stroke at `slot`: it's replaced by a split placeholder that also goes on
    /// top of the canvas. Returns the placeholder's handle.
    ///
    /// Like any new edit, this drops everything undone.
    pub fn split(&mut self, slot: usize) -> Option<StrokeID> {
        let original = *self.active.get(slot)?;
        let placeholder = self.arena.get(original)?.to_split(slot);
        self.discard_redo();
        let placeholder = self.arena.insert(placeholder);
        self.active[slot] = placeholder;
        self.active.push(placeholder);
        self.release(original);
        log::debug!("split {original} at slot {slot} into {placeholder}");
        self.changed();
        Some(placeholder)
    }
    /// Every stroke in either list, for bulk edits like recoloring.
    pub fn strokes_mut(&mut self) -> impl Iterator<Item = &mut Stroke> + '_ {
        self.arena.iter_mut().map(|(_, stroke)| stroke)
    }
    /// Free `id` if neither list refers to it anymore.
    fn release(&mut self, id: StrokeID) {
        if !self.active.contains(&id) && !self.buffer.contains(&id) {
            self.arena.remove(id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::History;
    use crate::render::Invalidation;
    use crate::smoothing::SmoothingParams;
    use crate::stroke::{CoordinateSample, PenType, Stroke, StrokeStyle};
    use crate::util::{Point, Rect};

    fn pen(x: f32) -> Stroke {
        let mut stroke = Stroke::pen(StrokeStyle::default(), PenType::Normal);
        let params = SmoothingParams {
            line_width: 10.0,
            slack: 2.0,
            view: Rect::from_size(300.0, 300.0),
        };
        let a = Point::new(x, 10.0);
        let b = Point::new(x, 20.0);
        stroke.push_sample(
            CoordinateSample {
                previous_point2: a,
                previous_point1: a,
                current_point: b,
            },
            &params,
        );
        stroke
    }

    #[test]
    fn empty_is_noop() {
        let mut history = History::new();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(!history.pinch());
        assert!(!history.is_dirty());
        assert!(history.take_invalidation().is_none());
        assert!(!history.can_delete());
    }
    #[test]
    fn undo_redo_moves_between_lists() {
        let mut history = History::new();
        let a = history.commit(pen(10.0));
        assert!(history.can_undo() && !history.can_redo());
        assert_eq!(history.take_invalidation(), Some(Invalidation::Full));

        history.note_saved();
        assert!(history.undo());
        assert!(history.is_dirty());
        assert!(history.active().is_empty());
        assert_eq!(history.buffer(), &[a]);

        assert!(history.redo());
        assert_eq!(history.active(), &[a]);
        assert!(history.buffer().is_empty());
        assert!(history.is_consistent());
    }
    #[test]
    fn commit_discards_redo() {
        let mut history = History::new();
        let a = history.commit(pen(10.0));
        history.undo();
        let b = history.commit(pen(20.0));
        assert!(!history.can_redo());
        assert!(history.get(a).is_none());
        assert_eq!(history.active(), &[b]);
        assert!(history.is_consistent());
    }
    #[test]
    fn split_then_undo_restores() {
        let mut history = History::new();
        let a = history.commit(pen(10.0));
        let b = history.commit(pen(50.0));
        let original = history.get(a).unwrap().path().clone();

        let placeholder = history.split(0).unwrap();
        assert_eq!(history.active(), &[placeholder, b, placeholder]);
        assert!(history.get(placeholder).unwrap().path().is_empty());
        assert!(history.get(a).is_none());
        assert!(history.is_consistent());

        history.undo();
        assert_eq!(history.active().len(), 2);
        assert_eq!(history.active()[1], b);
        let restored = history.get(history.active()[0]).unwrap();
        assert_eq!(restored.path(), &original);
        assert!(!restored.is_split());
        assert_eq!(history.buffer(), &[placeholder]);
        assert!(history.is_consistent());

        history.redo();
        assert_eq!(history.active(), &[placeholder, b, placeholder]);
        assert!(history.buffer().is_empty());
        assert!(history.is_consistent());
    }
    #[test]
    fn pinch_leaves_slot_blank() {
        let mut history = History::new();
        history.commit(pen(10.0));
        let placeholder = history.split(0).unwrap();
        assert!(history.pinch());
        assert_eq!(history.active().len(), 1);
        assert_ne!(history.active()[0], placeholder);
        assert!(history.get(history.active()[0]).unwrap().path().is_empty());
        assert!(!history.can_delete());
        assert!(history.is_consistent());

        // Redo puts the placeholder itself back.
        history.redo();
        assert_eq!(history.active(), &[placeholder, placeholder]);
        assert!(history.is_consistent());
    }
    #[test]
    fn undoing_pinched_copy_restores() {
        let mut history = History::new();
        let a = history.commit(pen(10.0));
        let original = history.get(a).unwrap().path().clone();
        let placeholder = history.split(0).unwrap();
        history.pinch();
        let copy = history.active()[0];

        assert!(history.undo());
        assert_eq!(history.active().len(), 1);
        let restored = history.get(history.active()[0]).unwrap();
        assert_eq!(restored.path(), &original);
        assert!(!restored.is_split());
        assert_eq!(history.buffer(), &[placeholder, copy]);
        assert!(history.is_consistent());

        // The copy goes back alone, blanking the slot again.
        assert!(history.redo());
        assert_eq!(history.active(), &[copy]);
        assert!(history.get(copy).unwrap().path().is_empty());
        assert!(history.is_consistent());

        assert!(history.redo());
        assert_eq!(history.active(), &[placeholder, placeholder]);
        assert!(history.get(copy).is_none());
        assert!(history.is_consistent());
    }
    #[test]
    fn clear_and_reset() {
        let mut history = History::new();
        history.commit(pen(10.0));
        history.commit(pen(20.0));
        history.undo();
        history.note_saved();
        history.reset();
        assert!(!history.can_undo() && !history.can_redo());
        assert!(!history.is_dirty());
        history.commit(pen(10.0));
        history.note_saved();
        history.clear();
        assert!(history.is_dirty());
        assert!(history.is_consistent());
    }
}
