//! Animation driver: one blocking tick function for a thin host loop.
//!
//! Each tick measures wall-clock `dt` since the previous one, advances the
//! garden, then redraws it. The tick period is a target, not a fixed
//! timestep: after a stall the next `dt` is simply larger.

use std::time::{Duration, Instant};

use crate::audio::FeatureVector;
use crate::canvas::Canvas;
use crate::core::Result;
use crate::core::time::TickClock;
use crate::tree::BranchStats;
use super::Garden;

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Seconds since the previous tick
    pub dt: f32,
    /// Ticks so far, including this one
    pub tick: u64,
    pub trees: usize,
    pub grass: usize,
    pub stats: BranchStats,
}

/// Drives a garden at a target tick period.
pub struct AnimationDriver {
    clock: TickClock,
    interval: Duration,
}

impl AnimationDriver {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// Driver whose first `dt` is measured from `start`
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            clock: TickClock::starting_at(start),
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Update every tree and grass patch, then clear and redraw the canvas.
    /// Canvas errors abort the tick and propagate.
    pub fn tick_at<C: Canvas + ?Sized>(
        &mut self,
        garden: &mut Garden,
        canvas: &mut C,
        now: Instant,
        live: Option<&FeatureVector>,
    ) -> Result<TickReport> {
        self.clock.tick_at(now);
        let dt = self.clock.delta_secs();

        garden.update(dt, live);
        let stats = garden.redraw(canvas)?;

        let report = TickReport {
            dt,
            tick: self.clock.tick_count(),
            trees: garden.trees().len(),
            grass: garden.grass().len(),
            stats,
        };
        log::trace!("Tick {}: dt={:.3}s segments={}", report.tick, dt, stats.segments);
        Ok(report)
    }

    /// [`tick_at`](Self::tick_at) with the system clock
    pub fn tick<C: Canvas + ?Sized>(
        &mut self,
        garden: &mut Garden,
        canvas: &mut C,
        live: Option<&FeatureVector>,
    ) -> Result<TickReport> {
        self.tick_at(garden, canvas, Instant::now(), live)
    }

    /// Time left until the next tick is due, zero if it is overdue.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        (self.clock.last_tick() + self.interval).saturating_duration_since(now)
    }

    /// Sleep until one interval after the previous tick.
    pub fn wait_for_next_tick(&self) {
        let wait = self.time_until_next(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}
