//! Feature-to-geometry parameter table.
//!
//! `StyleTable::derive` is a pure function of `(style, features)`: the only
//! randomness in a tree's shape is applied at render time by the branch
//! generator, never here.

use serde::{Deserialize, Serialize};

use crate::audio::FeatureVector;
use super::style::TreeStyle;

/// Per-style adjustment applied on top of the base formulas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleModifier {
    pub height_scale: f32,
    /// Multiplier on the base branch count, floored afterwards
    pub branch_scale: f32,
    /// Added after scaling
    pub branch_delta: i32,
    /// Lower bound on the adjusted branch count
    pub min_branches: u32,
    pub angle_scale: f32,
    /// Fraction of the height taken by the trunk
    pub trunk_ratio: f32,
    pub leaf_density: f32,
}

impl StyleModifier {
    const fn new(
        height_scale: f32,
        branch_scale: f32,
        branch_delta: i32,
        min_branches: u32,
        angle_scale: f32,
        trunk_ratio: f32,
        leaf_density: f32,
    ) -> Self {
        Self { height_scale, branch_scale, branch_delta, min_branches, angle_scale, trunk_ratio, leaf_density }
    }
}

/// Modifiers for every style, one field each so config files stay readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleModifiers {
    pub classic: StyleModifier,
    pub weeping: StyleModifier,
    pub bushy: StyleModifier,
    pub tall: StyleModifier,
    pub wide: StyleModifier,
    pub spiral: StyleModifier,
    pub fractal: StyleModifier,
    pub pine: StyleModifier,
    pub cherry: StyleModifier,
}

impl Default for StyleModifiers {
    fn default() -> Self {
        Self {
            classic: StyleModifier::new(1.0, 1.0, 0, 1, 1.0, 0.3, 1.0),
            weeping: StyleModifier::new(0.8, 1.0, 2, 1, 0.5, 0.4, 1.5),
            bushy: StyleModifier::new(0.6, 1.0, 4, 1, 1.5, 0.2, 2.0),
            tall: StyleModifier::new(1.4, 1.0, -2, 2, 0.7, 0.5, 0.7),
            wide: StyleModifier::new(0.9, 1.0, 3, 1, 1.3, 0.25, 1.2),
            spiral: StyleModifier::new(1.1, 1.0, 0, 1, 1.0, 0.3, 1.0),
            fractal: StyleModifier::new(1.0, 0.7, 0, 2, 0.8, 0.35, 0.8),
            pine: StyleModifier::new(1.3, 1.0, 0, 1, 1.0, 0.2, 1.0),
            cherry: StyleModifier::new(0.85, 1.0, 0, 3, 1.2, 0.35, 1.0),
        }
    }
}

impl StyleModifiers {
    pub fn get(&self, style: TreeStyle) -> &StyleModifier {
        match style {
            TreeStyle::Classic => &self.classic,
            TreeStyle::Weeping => &self.weeping,
            TreeStyle::Bushy => &self.bushy,
            TreeStyle::Tall => &self.tall,
            TreeStyle::Wide => &self.wide,
            TreeStyle::Spiral => &self.spiral,
            TreeStyle::Fractal => &self.fractal,
            TreeStyle::Pine => &self.pine,
            TreeStyle::Cherry => &self.cherry,
        }
    }
}

/// Constants of the feature-to-geometry mapping.
///
/// Each base quantity is `floor + feature * gain`; styles then scale it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    /// Height at zero volume (px)
    pub height_floor: f32,
    /// Extra height at full volume (px)
    pub height_gain: f32,
    pub branch_floor: f32,
    /// Extra branches at full energy
    pub branch_gain: f32,
    /// Angle variance at zero pitch (degrees)
    pub angle_floor: f32,
    pub angle_gain: f32,
    /// Trunk width at full growth and zero volume (px)
    pub trunk_width: f32,
    /// Relative trunk widening at full volume
    pub trunk_width_volume_gain: f32,
    /// Growth per second at zero energy
    pub speed_floor: f32,
    pub speed_gain: f32,
    /// Sway phase speed at zero pitch (rad/s)
    pub sway_floor: f32,
    pub sway_gain: f32,
    /// Sway amplitude at full volume (px)
    pub amplitude_gain: f32,
    /// Sway amplitude at full live volume once mature (px)
    pub live_amplitude_gain: f32,
    pub weeping_droop: f32,
    /// Spiral turn at full pitch (degrees)
    pub spiral_turn_gain: f32,
    pub fractal_depth_floor: u32,
    pub fractal_depth_gain: f32,
    /// Needle tiers stacked up a pine's leader
    pub pine_tiers: u32,
    /// Radial needle branches per tier
    pub pine_spokes: u32,
    /// Tier radius at the base, relative to the crown length
    pub pine_spread: f32,
    pub styles: StyleModifiers,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            height_floor: 80.0,
            height_gain: 120.0,
            branch_floor: 2.0,
            branch_gain: 8.0,
            angle_floor: 25.0,
            angle_gain: 50.0,
            trunk_width: 12.0,
            trunk_width_volume_gain: 0.5,
            speed_floor: 0.015,
            speed_gain: 0.025,
            sway_floor: 0.5,
            sway_gain: 1.5,
            amplitude_gain: 5.0,
            live_amplitude_gain: 8.0,
            weeping_droop: 0.7,
            spiral_turn_gain: 360.0,
            fractal_depth_floor: 4,
            fractal_depth_gain: 3.0,
            pine_tiers: 6,
            pine_spokes: 8,
            pine_spread: 0.5,
            styles: StyleModifiers::default(),
        }
    }
}

/// Style-specific geometry, matched exhaustively by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StyleShape {
    /// Straight trunk, budgeted recursive branches
    Standard,
    /// Drooping polyline branches; droop grows with progress squared
    Weeping { droop_factor: f32 },
    /// Helical trunk, then standard branches from the tip
    Spiral { turn_deg: f32 },
    /// Binary recursion keyed only on remaining depth
    Fractal { depth: u32 },
    /// Straight leader with `tiers` needle layers narrowing upwards
    Pine { tiers: u32, spokes: u32, spread: f32 },
    /// Unbranched rising limbs with blossoms spaced along them
    Cherry,
}

/// Geometry derived once at planting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    pub height: f32,
    /// Trunk width at full growth (px)
    pub trunk_width_base: f32,
    /// Always at least 1
    pub branch_count: u32,
    pub angle_variance_deg: f32,
    pub trunk_ratio: f32,
    pub leaf_density: f32,
    /// Growth progress per second
    pub growth_speed: f32,
    /// Sway phase advance per second (rad)
    pub sway_speed: f32,
    pub sway_amplitude: f32,
    pub shape: StyleShape,
}

impl DerivedParameters {
    /// Length budget for everything above the trunk at full growth
    pub fn crown_length(&self) -> f32 {
        self.height * (1.0 - self.trunk_ratio)
    }
}

impl StyleTable {
    /// Map a style and feature vector to tree geometry.
    pub fn derive(&self, style: TreeStyle, features: &FeatureVector) -> DerivedParameters {
        let f = features.clamped();
        let m = self.styles.get(style);

        let base_height = self.height_floor + f.volume * self.height_gain;
        let base_branches = (self.branch_floor + f.energy * self.branch_gain).floor();
        let base_angle = self.angle_floor + f.pitch * self.angle_gain;

        let scaled = (base_branches * m.branch_scale).floor() as i64 + m.branch_delta as i64;
        let branch_count = scaled.max(m.min_branches as i64).max(1) as u32;

        // Extended features are neutral at 0.5 and when absent.
        let harmony_scale = 0.5 + f.harmony.unwrap_or(0.5);
        let timbre_scale = 0.8 + 0.4 * f.timbre.unwrap_or(0.5);

        let shape = match style {
            TreeStyle::Weeping => StyleShape::Weeping { droop_factor: self.weeping_droop },
            TreeStyle::Spiral => StyleShape::Spiral { turn_deg: f.pitch * self.spiral_turn_gain },
            TreeStyle::Fractal => StyleShape::Fractal {
                depth: self.fractal_depth_floor + (f.energy * self.fractal_depth_gain).floor().max(0.0) as u32,
            },
            TreeStyle::Pine => StyleShape::Pine {
                tiers: self.pine_tiers,
                spokes: self.pine_spokes,
                spread: self.pine_spread.max(0.0),
            },
            TreeStyle::Cherry => StyleShape::Cherry,
            TreeStyle::Classic | TreeStyle::Bushy | TreeStyle::Tall | TreeStyle::Wide => StyleShape::Standard,
        };

        DerivedParameters {
            height: (base_height * m.height_scale).max(0.0),
            trunk_width_base: (self.trunk_width * (1.0 + f.volume * self.trunk_width_volume_gain)).max(0.0),
            branch_count,
            angle_variance_deg: (base_angle * m.angle_scale * timbre_scale).max(0.0),
            trunk_ratio: m.trunk_ratio.clamp(0.0, 1.0),
            leaf_density: (m.leaf_density * harmony_scale).max(0.0),
            growth_speed: (self.speed_floor + f.energy * self.speed_gain).max(0.0),
            sway_speed: self.sway_floor + f.pitch * self.sway_gain,
            sway_amplitude: f.volume * self.amplitude_gain,
            shape,
        }
    }

    /// Mature-tree sway amplitude for a live volume reading
    pub fn live_sway_amplitude(&self, volume: f32) -> f32 {
        volume.clamp(0.0, 1.0) * self.live_amplitude_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_height_for_classic() {
        let table = StyleTable::default();
        let p = table.derive(TreeStyle::Classic, &FeatureVector::neutral());
        let midpoint = table.height_floor + 0.5 * table.height_gain;
        assert!((p.height - midpoint).abs() < 1e-4);
        assert!((p.height - 140.0).abs() < 1e-4);
        assert_eq!(p.branch_count, 6);
        assert!((p.angle_variance_deg - 50.0).abs() < 1e-4);
        assert_eq!(p.shape, StyleShape::Standard);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let table = StyleTable::default();
        let f = FeatureVector::new(0.37, 0.81, 0.12).with_timbre(0.3);
        for style in TreeStyle::ALL {
            assert_eq!(table.derive(style, &f), table.derive(style, &f));
        }
    }

    #[test]
    fn test_style_adjustments() {
        let table = StyleTable::default();
        let f = FeatureVector::neutral();
        let classic = table.derive(TreeStyle::Classic, &f);
        let tall = table.derive(TreeStyle::Tall, &f);
        let bushy = table.derive(TreeStyle::Bushy, &f);
        let fractal = table.derive(TreeStyle::Fractal, &f);

        assert!((tall.height - classic.height * 1.4).abs() < 1e-3);
        assert_eq!(tall.branch_count, 4);
        assert_eq!(bushy.branch_count, 10);
        assert_eq!(fractal.branch_count, 4);
        assert_eq!(fractal.shape, StyleShape::Fractal { depth: 5 });
    }

    #[test]
    fn test_style_extras() {
        let table = StyleTable::default();
        let f = FeatureVector::new(0.5, 0.25, 1.0);
        assert_eq!(
            table.derive(TreeStyle::Spiral, &f).shape,
            StyleShape::Spiral { turn_deg: 90.0 }
        );
        assert_eq!(
            table.derive(TreeStyle::Weeping, &f).shape,
            StyleShape::Weeping { droop_factor: 0.7 }
        );
        assert_eq!(table.derive(TreeStyle::Fractal, &f).shape, StyleShape::Fractal { depth: 7 });
    }

    #[test]
    fn test_pine_and_cherry_shapes() {
        let table = StyleTable::default();
        let f = FeatureVector::neutral();
        let pine = table.derive(TreeStyle::Pine, &f);
        assert_eq!(pine.shape, StyleShape::Pine { tiers: 6, spokes: 8, spread: 0.5 });
        assert!(pine.height > table.derive(TreeStyle::Classic, &f).height);

        let cherry = table.derive(TreeStyle::Cherry, &FeatureVector::new(0.5, 0.5, 0.0));
        assert_eq!(cherry.shape, StyleShape::Cherry);
        assert_eq!(cherry.branch_count, 3);
    }

    #[test]
    fn test_branch_count_never_zero() {
        let mut table = StyleTable::default();
        table.branch_floor = 0.0;
        table.branch_gain = 0.0;
        let p = table.derive(TreeStyle::Classic, &FeatureVector::new(0.0, 0.0, 0.0));
        assert_eq!(p.branch_count, 1);
    }

    #[test]
    fn test_out_of_range_features_are_clamped() {
        let table = StyleTable::default();
        let wild = FeatureVector { volume: 7.0, pitch: -3.0, energy: 2.0, timbre: None, harmony: None };
        let p = table.derive(TreeStyle::Classic, &wild);
        assert!((p.height - 200.0).abs() < 1e-4);
        assert!((p.angle_variance_deg - 25.0).abs() < 1e-4);
        assert_eq!(p.branch_count, 10);
    }

    #[test]
    fn test_extended_features() {
        let table = StyleTable::default();
        let plain = table.derive(TreeStyle::Classic, &FeatureVector::neutral());
        let rich = table.derive(TreeStyle::Classic, &FeatureVector::neutral().with_harmony(1.0));
        let bright = table.derive(TreeStyle::Classic, &FeatureVector::neutral().with_timbre(1.0));
        assert!((rich.leaf_density - plain.leaf_density * 1.5).abs() < 1e-5);
        assert!((bright.angle_variance_deg - plain.angle_variance_deg * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_growth_speed_rises_with_energy() {
        let table = StyleTable::default();
        let slow = table.derive(TreeStyle::Classic, &FeatureVector::new(0.5, 0.5, 0.0));
        let fast = table.derive(TreeStyle::Classic, &FeatureVector::new(0.5, 0.5, 1.0));
        assert!((slow.growth_speed - 0.015).abs() < 1e-6);
        assert!((fast.growth_speed - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_table_json_partial_override() {
        let table: StyleTable = serde_json::from_str(r#"{"height_floor": 100.0}"#).unwrap();
        assert_eq!(table.height_floor, 100.0);
        assert_eq!(table.styles, StyleModifiers::default());
    }
}
