// Fixed-length per-minute window domain model
use crate::domain::circular_stats::normalize_degrees;
use serde::Serialize;

/// Upper bound for displayed wind and gust speeds.
pub const MAX_SPEED: f64 = 60.0;

/// One minute of the visible window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowSlot {
    pub wind: f64,
    pub gust: f64,
    pub direction: f64,
}

impl WindowSlot {
    /// Build a slot with speeds clamped to `[0, MAX_SPEED]` and direction in `[0, 360)`.
    pub fn clamped(wind: f64, gust: f64, direction: f64) -> Self {
        Self {
            wind: clamp_speed(wind),
            gust: clamp_speed(gust),
            direction: normalize_degrees(direction),
        }
    }
}

fn clamp_speed(value: f64) -> f64 {
    value.clamp(0.0, MAX_SPEED)
}

/// Ordered minute slots, oldest first. The length is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Window {
    slots: Vec<WindowSlot>,
}

impl Window {
    pub fn zeroed(len: usize) -> Self {
        Self {
            slots: vec![WindowSlot::default(); len],
        }
    }

    pub fn from_slots(slots: Vec<WindowSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[WindowSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&WindowSlot> {
        self.slots.get(index)
    }

    /// Replace the slot at `index`. Out-of-range indices are ignored so the
    /// length never changes.
    pub fn set(&mut self, index: usize, slot: WindowSlot) {
        if let Some(existing) = self.slots.get_mut(index) {
            *existing = slot;
        }
    }

    #[cfg(test)]
    pub fn newest(&self) -> Option<&WindowSlot> {
        self.slots.last()
    }
}
