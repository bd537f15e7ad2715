//! Grass configuration.

use serde::{Deserialize, Serialize};

/// Ground-cover settings. Grass only appears once a garden is busy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Master on/off.
    pub enabled: bool,
    /// Tree count at which grass starts appearing.
    pub trigger_tree_count: usize,
    /// Target grass patches per tree once triggered.
    pub patches_per_tree: f32,
    /// Placement area, top-left corner (px).
    pub area_min: [f32; 2],
    /// Placement area, bottom-right corner (px).
    pub area_max: [f32; 2],
    /// Trees closer than this lend their leaf colors (px).
    pub color_radius: f32,
    /// Blade height range at full growth (px).
    pub height_range: [f32; 2],
    /// Patch width range (px).
    pub width_range: [f32; 2],
    /// Growth per second.
    pub growth_rate: f32,
    /// Sway phase advance per second (rad).
    pub sway_rate: f32,
    /// Sway amplitude at the blade tips (px).
    pub sway_amplitude: f32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_tree_count: 10,
            patches_per_tree: 0.5,
            area_min: [20.0, 450.0],
            area_max: [980.0, 550.0],
            color_radius: 150.0,
            height_range: [8.0, 15.0],
            width_range: [3.0, 8.0],
            growth_rate: 1.2,
            sway_rate: 3.0,
            sway_amplitude: 2.0,
        }
    }
}

impl GrassConfig {
    /// How many patches a garden with `tree_count` trees should carry.
    pub fn target_count(&self, tree_count: usize) -> usize {
        if !self.enabled || tree_count < self.trigger_tree_count {
            return 0;
        }
        (tree_count as f32 * self.patches_per_tree.max(0.0)).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_count() {
        let config = GrassConfig::default();
        assert_eq!(config.target_count(9), 0);
        assert_eq!(config.target_count(10), 5);
        assert_eq!(config.target_count(15), 7);

        let off = GrassConfig { enabled: false, ..GrassConfig::default() };
        assert_eq!(off.target_count(50), 0);
    }
}
