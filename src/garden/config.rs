//! Garden configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::grass::GrassConfig;
use crate::tree::{BranchConfig, StyleTable};

/// Deepest recursion any branch style may reach
const MAX_DEPTH: u32 = 12;
/// Upper bound on pine tiers and spokes per tier
const MAX_PINE_COUNT: u32 = 32;

/// Configuration for a garden.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Seed for the garden's random number generator
    pub seed: u64,
    /// Oldest trees are evicted beyond this count; `None` means unbounded
    pub max_trees: Option<usize>,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Trees are never planted above this line (px from the top)
    pub min_plant_y: f32,
    /// Animation tick period in milliseconds
    pub tick_interval_ms: u64,
    /// Built-in theme name
    pub theme: String,
    /// Color trees with their gradient pair instead of palette picks
    pub use_gradients: bool,
    /// Seed each tree's geometry so it does not jitter between frames
    pub stable_geometry: bool,
    pub branch: BranchConfig,
    pub grass: GrassConfig,
    pub style_table: StyleTable,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_trees: None,
            canvas_width: 1000.0,
            canvas_height: 600.0,
            min_plant_y: 50.0,
            tick_interval_ms: 50,
            theme: "warm".into(),
            use_gradients: false,
            stable_geometry: false,
            branch: BranchConfig::default(),
            grass: GrassConfig::default(),
            style_table: StyleTable::default(),
        }
    }
}

impl GardenConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let mut config: GardenConfig = serde_json::from_str(&data)?;
        config.validate();
        log::info!("Loaded garden config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved garden config to {}", path.display());
        Ok(())
    }

    /// Clamp nonsense values back into range, warning about each.
    pub fn validate(&mut self) {
        if self.max_trees == Some(0) {
            log::warn!("max_trees = 0 would reject every tree; treating as unbounded");
            self.max_trees = None;
        }
        if self.tick_interval_ms == 0 {
            log::warn!("tick_interval_ms = 0; using 1ms");
            self.tick_interval_ms = 1;
        }
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            log::warn!(
                "Canvas size {}x{} is not positive; using 1000x600",
                self.canvas_width, self.canvas_height
            );
            self.canvas_width = 1000.0;
            self.canvas_height = 600.0;
        }
        if !(0.0..=self.canvas_height).contains(&self.min_plant_y) {
            log::warn!("min_plant_y {} outside canvas; clamping", self.min_plant_y);
            self.min_plant_y = if self.min_plant_y.is_nan() {
                0.0
            } else {
                self.min_plant_y.clamp(0.0, self.canvas_height)
            };
        }
        if self.branch.max_depth > MAX_DEPTH {
            log::warn!("branch.max_depth {} is too deep; using {}", self.branch.max_depth, MAX_DEPTH);
            self.branch.max_depth = MAX_DEPTH;
        }
        if !positive(self.branch.min_length) {
            log::warn!("branch.min_length must be positive; using 1");
            self.branch.min_length = 1.0;
        }
        if !positive(self.branch.fractal_min_length) {
            log::warn!("branch.fractal_min_length must be positive; using 1");
            self.branch.fractal_min_length = 1.0;
        }
        if !positive(self.branch.blossom_spacing) {
            log::warn!("branch.blossom_spacing must be positive; using 10");
            self.branch.blossom_spacing = 10.0;
        }
        self.validate_style_table();
    }

    /// Fractal depth is `floor + floor(energy * gain)`, so the deepest
    /// reachable level is `floor + ceil(gain)`.
    fn validate_style_table(&mut self) {
        let table = &mut self.style_table;
        if !table.fractal_depth_gain.is_finite() || table.fractal_depth_gain < 0.0 {
            log::warn!("style_table.fractal_depth_gain {} is invalid; using 0", table.fractal_depth_gain);
            table.fractal_depth_gain = 0.0;
        }
        if table.fractal_depth_floor > MAX_DEPTH {
            log::warn!(
                "style_table.fractal_depth_floor {} is too deep; using {}",
                table.fractal_depth_floor, MAX_DEPTH
            );
            table.fractal_depth_floor = MAX_DEPTH;
        }
        let deepest = table.fractal_depth_floor as f32 + table.fractal_depth_gain.ceil();
        if deepest > MAX_DEPTH as f32 {
            let gain = (MAX_DEPTH - table.fractal_depth_floor) as f32;
            log::warn!("Fractal depth can reach {}; capping fractal_depth_gain at {}", deepest, gain);
            table.fractal_depth_gain = gain;
        }
        if !(1..=MAX_PINE_COUNT).contains(&table.pine_tiers) {
            log::warn!("style_table.pine_tiers {} out of range; clamping", table.pine_tiers);
            table.pine_tiers = table.pine_tiers.clamp(1, MAX_PINE_COUNT);
        }
        if !(1..=MAX_PINE_COUNT).contains(&table.pine_spokes) {
            log::warn!("style_table.pine_spokes {} out of range; clamping", table.pine_spokes);
            table.pine_spokes = table.pine_spokes.clamp(1, MAX_PINE_COUNT);
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FeatureVector;
    use crate::tree::{StyleShape, TreeStyle};

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("garden.json");

        let config = GardenConfig {
            seed: 99,
            max_trees: Some(20),
            theme: "aurora".into(),
            use_gradients: true,
            ..GardenConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = GardenConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");
        std::fs::write(&path, r#"{"max_trees": 3, "branch": {"max_depth": 4}}"#).unwrap();

        let loaded = GardenConfig::load(&path).unwrap();
        assert_eq!(loaded.max_trees, Some(3));
        assert_eq!(loaded.branch.max_depth, 4);
        assert_eq!(loaded.branch.min_length, 8.0);
        assert_eq!(loaded.tick_interval_ms, 50);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = GardenConfig {
            max_trees: Some(0),
            tick_interval_ms: 0,
            canvas_width: -5.0,
            min_plant_y: 5000.0,
            ..GardenConfig::default()
        };
        config.validate();
        assert_eq!(config.max_trees, None);
        assert_eq!(config.tick_interval_ms, 1);
        assert_eq!(config.canvas_width, 1000.0);
        assert_eq!(config.min_plant_y, 600.0);
    }

    #[test]
    fn test_validate_bounds_fractal_recursion() {
        let mut config = GardenConfig::default();
        config.branch.fractal_min_length = 0.0;
        config.style_table.fractal_depth_floor = 40;
        config.validate();

        assert!(config.branch.fractal_min_length > 0.0);
        let loud = FeatureVector::new(1.0, 1.0, 1.0);
        let neutral = FeatureVector::neutral();
        for features in [loud, neutral] {
            match config.style_table.derive(TreeStyle::Fractal, &features).shape {
                StyleShape::Fractal { depth } => assert!(depth <= MAX_DEPTH, "depth {depth}"),
                other => panic!("unexpected shape {other:?}"),
            }
        }

        let mut config = GardenConfig::default();
        config.style_table.fractal_depth_gain = 1e9;
        config.branch.fractal_min_length = f32::NAN;
        config.validate();
        assert_eq!(config.branch.fractal_min_length, 1.0);
        match config.style_table.derive(TreeStyle::Fractal, &loud).shape {
            StyleShape::Fractal { depth } => assert_eq!(depth, MAX_DEPTH),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_validate_keeps_defaults() {
        let mut config = GardenConfig::default();
        config.validate();
        assert_eq!(config, GardenConfig::default());
    }

    #[test]
    fn test_validate_clamps_pine_counts() {
        let mut config = GardenConfig::default();
        config.style_table.pine_tiers = 0;
        config.style_table.pine_spokes = 10_000;
        config.validate();
        assert_eq!(config.style_table.pine_tiers, 1);
        assert_eq!(config.style_table.pine_spokes, MAX_PINE_COUNT);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GardenConfig::load(dir.path().join("missing.json")).is_err());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(GardenConfig::load(&bad), Err(crate::core::Error::Json(_))));
    }
}
