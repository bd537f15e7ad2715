//! Tree entity: derived shape plus growth and sway state.

use std::f32::consts::TAU;

use rand::Rng;
use serde::Serialize;

use crate::audio::FeatureVector;
use crate::canvas::Canvas;
use crate::core::types::uniform;
use crate::core::{Result, Vec2};
use crate::math::Bounds;
use crate::palette::Theme;
use super::branch::{BranchConfig, BranchGenerator, BranchStats, LeafKind, Paint};
use super::params::{DerivedParameters, StyleShape, StyleTable};
use super::style::TreeStyle;

/// Garden-unique tree identifier, assigned in planting order
pub type TreeId = u64;

/// Branches only appear once growth passes this point
const BRANCH_THRESHOLD: f32 = 0.2;
/// Sway damping once a tree stops growing
const MATURE_SWAY_DAMPING: f32 = 0.3;
/// Pixels per spiral trunk step
const SPIRAL_STEP: f32 = 5.0;
/// Spiral trunk lateral radius at the tip (px)
const SPIRAL_RADIUS: f32 = 10.0;
/// Extra margin around the analytic hit box (px)
const HIT_MARGIN: f32 = 12.0;

/// Lifecycle stage. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GrowthStage {
    Seed,
    Growing,
    Mature,
}

/// Render-time settings shared by every tree in a garden.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub branch: &'a BranchConfig,
    /// Color with the tree's gradient pair instead of palette picks
    pub use_gradients: bool,
}

/// A planted tree.
#[derive(Clone, Debug, Serialize)]
pub struct Tree {
    id: TreeId,
    position: Vec2,
    style: TreeStyle,
    features: FeatureVector,
    derived: DerivedParameters,
    growth: f32,
    is_growing: bool,
    sway_phase: f32,
    sway_amplitude: f32,
    /// Seconds since planting
    age: f32,
    /// Gradient pair slot, wrapped by the active theme
    gradient_index: usize,
    live_sway_gain: f32,
}

impl Tree {
    /// Plant a seed. Derivation happens once, here.
    pub fn new<R: Rng + ?Sized>(
        id: TreeId,
        position: Vec2,
        style: TreeStyle,
        features: FeatureVector,
        table: &StyleTable,
        rng: &mut R,
    ) -> Self {
        let features = features.clamped();
        let derived = table.derive(style, &features);
        Self {
            id,
            position,
            style,
            features,
            derived,
            growth: 0.0,
            is_growing: true,
            sway_phase: uniform(rng, 0.0, TAU),
            sway_amplitude: derived.sway_amplitude,
            age: 0.0,
            gradient_index: rng.random_range(0..=u16::MAX as usize),
            live_sway_gain: table.live_amplitude_gain,
        }
    }

    /// Random style and random features
    pub fn random<R: Rng + ?Sized>(id: TreeId, position: Vec2, table: &StyleTable, rng: &mut R) -> Self {
        let style = TreeStyle::random(rng);
        let features = FeatureVector::random(rng);
        Self::new(id, position, style, features, table, rng)
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn style(&self) -> TreeStyle {
        self.style
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn derived(&self) -> &DerivedParameters {
        &self.derived
    }

    pub fn growth(&self) -> f32 {
        self.growth
    }

    pub fn is_growing(&self) -> bool {
        self.is_growing
    }

    pub fn sway_phase(&self) -> f32 {
        self.sway_phase
    }

    pub fn sway_amplitude(&self) -> f32 {
        self.sway_amplitude
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn gradient_index(&self) -> usize {
        self.gradient_index
    }

    pub fn stage(&self) -> GrowthStage {
        if self.growth <= 0.0 {
            GrowthStage::Seed
        } else if self.is_growing {
            GrowthStage::Growing
        } else {
            GrowthStage::Mature
        }
    }

    /// Move the tree without touching its growth.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Advance growth and sway by `dt` seconds.
    ///
    /// Growth is linear in time and saturates at exactly 1. Negative or
    /// non-finite `dt` counts as zero. Live features only affect mature
    /// trees, and only their sway amplitude.
    pub fn update(&mut self, dt: f32, live: Option<&FeatureVector>) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.age += dt;

        if self.is_growing {
            self.growth = (self.growth + self.derived.growth_speed * dt).min(1.0);
            if self.growth >= 1.0 {
                self.growth = 1.0;
                self.is_growing = false;
                log::debug!("Tree {} ({}) mature after {:.1}s", self.id, self.style, self.age);
            }
        }

        self.sway_phase = (self.sway_phase + self.derived.sway_speed * dt) % TAU;

        if let (Some(live), false) = (live, self.is_growing) {
            self.sway_amplitude = live.volume.clamp(0.0, 1.0) * self.live_sway_gain;
        }
    }

    /// Horizontal sway offset at the current phase
    pub fn sway_offset(&self) -> f32 {
        let damping = if self.is_growing { 1.0 } else { MATURE_SWAY_DAMPING };
        self.sway_phase.sin() * self.sway_amplitude * damping
    }

    /// Draw the tree. Seeds draw nothing.
    ///
    /// Branch geometry and leaf scatter are rolled from `rng` on every call.
    pub fn render<C, R>(
        &self,
        canvas: &mut C,
        theme: &Theme,
        ctx: &RenderContext<'_>,
        rng: &mut R,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        if self.growth <= 0.0 {
            return Ok(stats);
        }

        let d = &self.derived;
        let gradient = ctx.use_gradients.then(|| theme.gradient(self.gradient_index));
        let paint = Paint::new(theme, gradient);

        let sway = self.sway_offset();
        let trunk_height = d.height * d.trunk_ratio * self.growth;
        let trunk_width = (d.trunk_width_base * self.growth).max(1.0);
        let trunk_color = paint.wood(rng);

        let tip = match d.shape {
            StyleShape::Spiral { turn_deg } => {
                let points = self.spiral_trunk(trunk_height, turn_deg, sway);
                canvas.draw_polyline(&points, trunk_color, trunk_width)?;
                stats.segments += points.len().saturating_sub(1);
                points.last().copied().unwrap_or(self.position)
            }
            _ => {
                let tip = self.position + Vec2::new(sway, -trunk_height);
                canvas.draw_line(self.position, tip, trunk_color, trunk_width)?;
                stats.segments += 1;
                tip
            }
        };

        if self.growth <= BRANCH_THRESHOLD {
            return Ok(stats);
        }

        let branch_growth = (self.growth - BRANCH_THRESHOLD) / (1.0 - BRANCH_THRESHOLD);
        let crown_length = d.crown_length() * branch_growth;
        let branches = BranchGenerator {
            config: ctx.branch,
            paint,
            angle_variance: d.angle_variance_deg,
            leaf_density: d.leaf_density,
            leaf_kind: match d.shape {
                StyleShape::Weeping { .. } => LeafKind::Weeping,
                StyleShape::Fractal { .. } => LeafKind::Fractal,
                StyleShape::Pine { .. } => LeafKind::Needle,
                StyleShape::Cherry => LeafKind::Blossom,
                StyleShape::Standard | StyleShape::Spiral { .. } => LeafKind::Standard,
            },
        };

        let crown = match d.shape {
            StyleShape::Weeping { droop_factor } => branches.weeping(
                canvas,
                rng,
                tip,
                d.branch_count,
                crown_length,
                droop_factor,
                branch_growth,
            )?,
            StyleShape::Fractal { depth } => {
                branches.fractal(canvas, rng, tip, -90.0, crown_length, depth, branch_growth)?
            }
            StyleShape::Pine { tiers, spokes, spread } => branches.pine(
                canvas,
                rng,
                tip,
                crown_length,
                tiers,
                spokes,
                spread,
                branch_growth,
            )?,
            StyleShape::Cherry => {
                branches.cherry(canvas, rng, tip, d.branch_count, crown_length, branch_growth)?
            }
            StyleShape::Standard | StyleShape::Spiral { .. } => {
                branches.spread(canvas, rng, tip, d.branch_count, crown_length, branch_growth)?
            }
        };
        stats.merge(crown);
        Ok(stats)
    }

    /// Helical trunk path from the base up to `height`.
    fn spiral_trunk(&self, height: f32, turn_deg: f32, sway: f32) -> Vec<Vec2> {
        let steps = ((height / SPIRAL_STEP) as usize).max(1);
        (0..=steps)
            .map(|i| {
                let p = i as f32 / steps as f32;
                let x = (turn_deg * p).to_radians().sin() * SPIRAL_RADIUS * p;
                self.position + Vec2::new(x + sway, -height * p)
            })
            .collect()
    }

    /// Approximate hit box at the current growth, from derived parameters
    /// only. Seeds still get a small box around the base.
    pub fn bounds(&self) -> Bounds {
        let d = &self.derived;
        let reach = d.height * self.growth;
        let half_width = reach * 0.6 + d.sway_amplitude.max(self.sway_amplitude);
        let mut bounds = Bounds::at_point(self.position);
        bounds.expand(self.position + Vec2::new(-half_width, -reach));
        bounds.expand(self.position + Vec2::new(half_width, 0.0));
        bounds.padded(HIT_MARGIN)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.bounds().contains_point(point)
    }

    /// Short identifier like `WP-V45-P12-E80-0007`: style code, features
    /// scaled to 0..99, and the id.
    pub fn sound_code(&self) -> String {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 99.0) as u32;
        format!(
            "{}-V{:02}-P{:02}-E{:02}-{:04}",
            self.style.code(),
            scale(self.features.volume),
            scale(self.features.pitch),
            scale(self.features.energy),
            self.id % 10_000
        )
    }
}
