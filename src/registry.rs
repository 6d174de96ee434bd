//! Chart handle ownership.

use crate::render::{ChartHandle, ChartSlot};
use tracing::debug;

/// Owns at most one live chart per slot.
///
/// Any handle already bound to a slot is destroyed before a new one takes its
/// place.
pub struct ChartRegistry<H: ChartHandle> {
    slots: [Option<H>; 4],
}

impl<H: ChartHandle> ChartRegistry<H> {
    /// Create a registry with every slot empty.
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
        }
    }

    /// Destroy the current handle in `slot`, if any, then bind `handle`.
    pub fn replace(&mut self, slot: ChartSlot, handle: H) {
        self.clear(slot);
        self.slots[slot.index()] = Some(handle);
    }

    /// Destroy the current handle in `slot`, then bind the one `create` builds.
    ///
    /// `create` runs only after the old chart is gone, so a renderer that
    /// reuses the slot's draw surface never sees two charts on it.
    pub fn replace_with<F>(&mut self, slot: ChartSlot, create: F)
    where
        F: FnOnce() -> H,
    {
        self.clear(slot);
        self.slots[slot.index()] = Some(create());
    }

    /// Destroy the handle in `slot`. Returns whether one was bound.
    pub fn clear(&mut self, slot: ChartSlot) -> bool {
        match self.slots[slot.index()].take() {
            Some(old) => {
                debug!(slot = slot.as_str(), "Destroying chart");
                old.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroy every bound handle.
    pub fn clear_all(&mut self) {
        for slot in ChartSlot::ALL {
            self.clear(slot);
        }
    }

    /// Handle bound to `slot`, if any.
    pub fn get(&self, slot: ChartSlot) -> Option<&H> {
        self.slots[slot.index()].as_ref()
    }

    /// Whether `slot` holds a live chart.
    pub fn is_bound(&self, slot: ChartSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Number of slots holding a live chart.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
