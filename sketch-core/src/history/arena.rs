use crate::stroke::{Stroke, StrokeID};

/// Owner of every stroke the history can reach, by handle.
///
/// The arena never decides when a stroke dies; the history releases handles once neither list
/// refers to them anymore.
#[derive(Clone, Default, Debug)]
pub struct StrokeArena(hashbrown::HashMap<StrokeID, Stroke>);
impl StrokeArena {
    /// Take ownership of a stroke, returning its new handle.
    pub fn insert(&mut self, stroke: Stroke) -> StrokeID {
        let id = StrokeID::default();
        self.0.insert(id, stroke);
        id
    }
    #[must_use]
    pub fn get(&self, id: StrokeID) -> Option<&Stroke> {
        self.0.get(&id)
    }
    #[must_use]
    pub fn get_mut(&mut self, id: StrokeID) -> Option<&mut Stroke> {
        self.0.get_mut(&id)
    }
    pub fn remove(&mut self, id: StrokeID) -> Option<Stroke> {
        self.0.remove(&id)
    }
    #[must_use]
    pub fn contains(&self, id: StrokeID) -> bool {
        self.0.contains_key(&id)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    /// Every stroke, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StrokeID, &mut Stroke)> + '_ {
        self.0.iter_mut().map(|(id, stroke)| (*id, stroke))
    }
}
