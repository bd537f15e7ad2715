//! Tick timing utilities

use std::time::{Duration, Instant};

/// Tracks wall-clock time between animation ticks.
///
/// `dt` is measured, not fixed: a stalled host produces one larger step
/// on the next tick rather than a burst of small ones.
pub struct TickClock {
    last_tick: Instant,
    delta: Duration,
    tick_count: u64,
}

impl TickClock {
    /// Create a clock whose first tick measures from `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_tick: start,
            delta: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Call once per tick with the current time
    pub fn tick_at(&mut self, now: Instant) {
        // Instants from a caller may run backwards; treat that as zero elapsed.
        self.delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.tick_count += 1;
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time of the most recent tick
    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    /// Get total tick count
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
