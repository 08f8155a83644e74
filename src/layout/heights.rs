//! Preferred (minimum) cell heights supplied by the rendering policy.

use crate::model::{Interval, IntervalId};
use std::collections::HashMap;

/// Table of per-interval preferred heights with a fallback default.
///
/// The layout engines take a height function; this table is the owned form
/// used where a closure cannot travel, e.g. across the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightTable {
    default_height: i32,
    overrides: HashMap<IntervalId, i32>,
}

impl HeightTable {
    /// Create a table where every interval uses `default_height`.
    pub fn new(default_height: i32) -> Self {
        Self {
            default_height,
            overrides: HashMap::new(),
        }
    }

    /// Set the preferred height of one interval.
    pub fn set(&mut self, id: IntervalId, height: i32) {
        self.overrides.insert(id, height);
    }

    /// Preferred height of `id`.
    pub fn get(&self, id: IntervalId) -> i32 {
        self.overrides
            .get(&id)
            .copied()
            .unwrap_or(self.default_height)
    }

    /// Height used for intervals without an override.
    pub fn default_height(&self) -> i32 {
        self.default_height
    }

    /// Make room for an interval inserted at `id`, shifting later overrides of
    /// the same track down by one position.
    pub fn insert_at(&mut self, id: IntervalId, height: Option<i32>) {
        self.shift_track(id, |position| if position >= id.position { position + 1 } else { position });
        if let Some(height) = height {
            self.overrides.insert(id, height);
        }
    }

    /// Forget the interval at `id`, shifting later overrides of the same
    /// track up by one position.
    pub fn remove_at(&mut self, id: IntervalId) {
        self.overrides.remove(&id);
        self.shift_track(id, |position| if position > id.position { position - 1 } else { position });
    }

    fn shift_track(&mut self, id: IntervalId, remap: impl Fn(usize) -> usize) {
        self.overrides = std::mem::take(&mut self.overrides)
            .into_iter()
            .map(|(key, height)| {
                if key.track == id.track {
                    (IntervalId::new(key.track, remap(key.position)), height)
                } else {
                    (key, height)
                }
            })
            .collect();
    }

    /// Adapter matching the engines' height-function signature.
    pub fn preferred_height(&self, id: IntervalId, _interval: &Interval) -> i32 {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackIndex;

    #[test]
    fn falls_back_to_default() {
        let table = HeightTable::new(20);
        assert_eq!(table.get(IntervalId::new(TrackIndex::new(0), 0)), 20);
    }

    #[test]
    fn override_wins() {
        let mut table = HeightTable::new(20);
        let id = IntervalId::new(TrackIndex::new(1), 2);
        table.set(id, 45);
        assert_eq!(table.get(id), 45);
        assert_eq!(table.get(IntervalId::new(TrackIndex::new(1), 3)), 20);
    }

    #[test]
    fn insert_and_remove_keep_overrides_attached() {
        let t0 = TrackIndex::new(0);
        let t1 = TrackIndex::new(1);
        let mut table = HeightTable::new(20);
        table.set(IntervalId::new(t0, 1), 40);
        table.set(IntervalId::new(t1, 1), 70);

        table.insert_at(IntervalId::new(t0, 0), Some(5));
        assert_eq!(table.get(IntervalId::new(t0, 0)), 5);
        assert_eq!(table.get(IntervalId::new(t0, 1)), 20);
        assert_eq!(table.get(IntervalId::new(t0, 2)), 40);
        assert_eq!(table.get(IntervalId::new(t1, 1)), 70);

        table.remove_at(IntervalId::new(t0, 0));
        assert_eq!(table.get(IntervalId::new(t0, 1)), 40);
        assert_eq!(table.get(IntervalId::new(t0, 0)), 20);
    }
}
