//! Volume-triggered planting for live mode.

use serde::{Deserialize, Serialize};

use crate::audio::FeatureVector;
use crate::core::Vec2;
use crate::math::Bounds;
use crate::tree::TreeId;
use super::Garden;

/// Plants a tree whenever live volume crosses a threshold, at most once per
/// interval.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlanter {
    pub enabled: bool,
    /// Volume that must be exceeded
    pub threshold: f32,
    /// Minimum seconds between plantings
    pub interval_secs: f64,
    /// Where auto-planted trees go
    pub area: Bounds,
    #[serde(skip)]
    last_plant: Option<f64>,
}

impl Default for AutoPlanter {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.3,
            interval_secs: 2.0,
            area: Bounds::new(Vec2::new(100.0, 200.0), Vec2::new(850.0, 480.0)),
            last_plant: None,
        }
    }
}

impl AutoPlanter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant from `features` if enabled, loud enough and off cooldown.
    /// `now_secs` is any monotonic seconds counter.
    pub fn check(&mut self, garden: &mut Garden, now_secs: f64, features: &FeatureVector) -> Option<TreeId> {
        if !self.enabled {
            return None;
        }
        if self.last_plant.is_some_and(|last| now_secs - last < self.interval_secs) {
            return None;
        }
        if features.volume <= self.threshold {
            return None;
        }

        let id = garden.plant_random_in(&self.area, Some(*features));
        self.last_plant = Some(now_secs);
        log::info!(
            "Auto-planted tree {} (volume {:.2} > {:.2})",
            id, features.volume, self.threshold
        );
        Some(id)
    }

    /// Forget the cooldown, e.g. when live mode restarts.
    pub fn reset(&mut self) {
        self.last_plant = None;
    }
}
