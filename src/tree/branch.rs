//! Recursive branch generator and leaf clusters.
//!
//! Nothing here is cached between frames. Each render walks the branch tree
//! again with fresh random angles, lengths and leaf scatter, which gives the
//! garden its living jitter. Passing a per-tree seeded RNG makes a tree
//! render identically every frame instead.
//!
//! Angles are in degrees in canvas space (y down), so `-90` points straight up.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::core::types::uniform;
use crate::core::{Result, Vec2};
use crate::palette::{Color, Lerp, Theme};

/// Crown progress at which needles and blossoms appear
const LATE_FOLIAGE: f32 = 0.6;

/// Limits and widths for branch recursion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Branches shorter than this become leaf clusters (px)
    pub min_length: f32,
    /// Deepest level that still draws a segment
    pub max_depth: u32,
    /// Segment width at depth 0 before growth scaling (px)
    pub base_width: f32,
    /// Fractal recursion stops below this length (px)
    pub fractal_min_length: f32,
    /// Half-size of the square leaves scatter into (px)
    pub leaf_scatter: f32,
    /// Polyline segments per weeping branch
    pub weeping_segments: u32,
    /// Limb length per blossom on cherry trees (px)
    pub blossom_spacing: f32,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            min_length: 8.0,
            max_depth: 5,
            base_width: 6.0,
            fractal_min_length: 5.0,
            leaf_scatter: 12.0,
            weeping_segments: 8,
            blossom_spacing: 10.0,
        }
    }
}

/// One pending branch during generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchNode {
    pub origin: Vec2,
    pub angle_deg: f32,
    pub length: f32,
    pub depth: u32,
    /// Remaining recursion allowance; 0 ends the branch
    pub branches_left: u32,
}

impl BranchNode {
    pub fn end(&self) -> Vec2 {
        self.origin + direction(self.angle_deg) * self.length
    }
}

/// Counts from one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BranchStats {
    /// Line segments drawn (polyline pieces count individually)
    pub segments: usize,
    pub leaf_clusters: usize,
    /// Individual leaf shapes
    pub leaves: usize,
    /// Deepest node visited, drawn or not
    pub max_depth: u32,
}

impl BranchStats {
    pub fn merge(&mut self, other: BranchStats) {
        self.segments += other.segments;
        self.leaf_clusters += other.leaf_clusters;
        self.leaves += other.leaves;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Leaf size and scatter variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LeafKind {
    #[default]
    Standard,
    /// Smaller leaves that hang below the cluster origin
    Weeping,
    /// Tiny leaves
    Fractal,
    /// Needle dots along pine spokes
    Needle,
    /// Flowers strung along cherry limbs
    Blossom,
}

impl LeafKind {
    fn size_range(self) -> (f32, f32) {
        match self {
            LeafKind::Standard => (3.0, 7.0),
            LeafKind::Weeping => (2.0, 6.0),
            LeafKind::Fractal => (1.0, 4.0),
            LeafKind::Needle => (0.8, 1.5),
            LeafKind::Blossom => (2.0, 4.0),
        }
    }
}

/// Color source for wood and leaves: the theme palette, or a two-color
/// gradient when gradient rendering is on.
#[derive(Clone, Copy, Debug)]
pub struct Paint<'a> {
    pub theme: &'a Theme,
    pub gradient: Option<(Color, Color)>,
}

impl<'a> Paint<'a> {
    pub fn new(theme: &'a Theme, gradient: Option<(Color, Color)>) -> Self {
        Self { theme, gradient }
    }

    pub fn wood<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        match self.gradient {
            Some((from, to)) => from.lerp(&to, 0.2),
            None => self.theme.trunk_color(rng),
        }
    }

    /// Leaf color; `t` is the leaf's relative position inside its cluster.
    pub fn leaf<R: Rng + ?Sized>(&self, rng: &mut R, t: f32) -> Color {
        match self.gradient {
            Some((from, to)) => from.lerp(&to, t),
            None => self.theme.leaf_color(rng),
        }
    }
}

/// Draws branches and leaves for one tree render.
pub struct BranchGenerator<'a> {
    pub config: &'a BranchConfig,
    pub paint: Paint<'a>,
    pub angle_variance: f32,
    pub leaf_density: f32,
    pub leaf_kind: LeafKind,
}

impl<'a> BranchGenerator<'a> {
    /// Fan `count` budgeted branches out from `origin`, spread evenly across
    /// twice the angle variance around straight up.
    pub fn spread<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        count: u32,
        crown_length: f32,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        let step = 2.0 * self.angle_variance / count.saturating_sub(1).max(1) as f32;
        for i in 0..count {
            let angle_deg = if count == 1 {
                -90.0
            } else {
                -90.0 - self.angle_variance + step * i as f32
            };
            let node = BranchNode {
                origin,
                angle_deg,
                length: crown_length * uniform(rng, 0.6, 1.0),
                depth: 0,
                branches_left: rng.random_range(1..=3),
            };
            stats.merge(self.grow_branch(canvas, rng, node, growth_scale)?);
        }
        Ok(stats)
    }

    /// Draw one branch and recurse into its children.
    ///
    /// Ends in a leaf cluster when the budget is spent, the branch is shorter
    /// than `min_length`, or it is deeper than `max_depth`.
    pub fn grow_branch<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        node: BranchNode,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        self.grow_into(canvas, rng, node, growth_scale, &mut stats)?;
        Ok(stats)
    }

    fn grow_into<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        node: BranchNode,
        growth_scale: f32,
        stats: &mut BranchStats,
    ) -> Result<()>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        stats.max_depth = stats.max_depth.max(node.depth);

        // NaN lengths fail the comparison, so depth is what bounds them.
        if node.branches_left == 0
            || node.length < self.config.min_length
            || node.depth > self.config.max_depth
        {
            stats.leaves += self.leaf_cluster(canvas, rng, node.origin)?;
            stats.leaf_clusters += 1;
            return Ok(());
        }

        let end = node.end();
        let width = ((self.config.base_width - node.depth as f32) * growth_scale).max(1.0);
        canvas.draw_line(node.origin, end, self.paint.wood(rng), width)?;
        stats.segments += 1;

        let variance = self.angle_variance * (1.0 - node.depth as f32 * 0.15);
        let child_length = node.length * uniform(rng, 0.6, 0.85);
        let children = if node.depth < 2 { rng.random_range(2..=3) } else { 2 };

        for i in 0..children {
            let offset = match i {
                0 => -uniform(rng, 15.0, variance),
                1 => uniform(rng, 15.0, variance),
                _ => uniform(rng, -10.0, 10.0),
            };
            let child = BranchNode {
                origin: end,
                angle_deg: node.angle_deg + offset,
                length: child_length,
                depth: node.depth + 1,
                branches_left: node.branches_left - 1,
            };
            self.grow_into(canvas, rng, child, growth_scale, stats)?;
        }
        Ok(())
    }

    /// Pure binary recursion down `depth` levels, ignoring any budget.
    pub fn fractal<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        angle_deg: f32,
        length: f32,
        depth: u32,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        self.fractal_into(canvas, rng, origin, angle_deg, length, depth, growth_scale, 0, &mut stats)?;
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn fractal_into<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        angle_deg: f32,
        length: f32,
        depth: u32,
        growth_scale: f32,
        level: u32,
        stats: &mut BranchStats,
    ) -> Result<()>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        stats.max_depth = stats.max_depth.max(level);

        if depth == 0 || length.is_nan() || length < self.config.fractal_min_length {
            stats.leaves += self.leaf_cluster(canvas, rng, origin)?;
            stats.leaf_clusters += 1;
            return Ok(());
        }

        let end = origin + direction(angle_deg) * length;
        let width = ((depth + 1) as f32 * growth_scale).max(1.0);
        canvas.draw_line(origin, end, self.paint.wood(rng), width)?;
        stats.segments += 1;

        let child_length = length * uniform(rng, 0.6, 0.8);
        let left = angle_deg - uniform(rng, 20.0, 40.0);
        let right = angle_deg + uniform(rng, 20.0, 40.0);
        for angle in [left, right] {
            self.fractal_into(canvas, rng, end, angle, child_length, depth - 1, growth_scale, level + 1, stats)?;
        }
        Ok(())
    }

    /// Drooping branches: each is a polyline fanned across the upper half
    /// plane whose droop grows with the square of progress along it.
    #[allow(clippy::too_many_arguments)]
    pub fn weeping<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        count: u32,
        crown_length: f32,
        droop_factor: f32,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        let segments = self.config.weeping_segments.max(1);
        let step = 120.0 / count.saturating_sub(1).max(1) as f32;
        let width = (4.0 * growth_scale).max(1.0);

        for i in 0..count {
            let angle_deg = if count == 1 { -90.0 } else { -150.0 + step * i as f32 };
            let length = crown_length * uniform(rng, 0.7, 1.0);
            let dir = direction(angle_deg);

            let points: Vec<Vec2> = (0..=segments)
                .map(|j| {
                    let p = j as f32 / segments as f32;
                    let droop = p * p * droop_factor * 50.0;
                    origin + dir * length * p + Vec2::new(0.0, droop)
                })
                .collect();

            canvas.draw_polyline(&points, self.paint.wood(rng), width)?;
            stats.segments += segments as usize;

            let tip = points.last().copied().unwrap_or(origin);
            stats.leaves += self.leaf_cluster(canvas, rng, tip)?;
            stats.leaf_clusters += 1;
        }
        Ok(stats)
    }

    /// Conifer crown: a straight leader from `origin` carrying `tiers`
    /// layers of radial needle spokes. Layers appear bottom-up as the crown
    /// grows and narrow towards the top; needles only show late in growth.
    #[allow(clippy::too_many_arguments)]
    pub fn pine<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        crown_length: f32,
        tiers: u32,
        spokes: u32,
        spread: f32,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        let tiers = tiers.max(1);
        let spokes = spokes.max(1);

        let top = origin - Vec2::new(0.0, crown_length);
        canvas.draw_line(origin, top, self.paint.wood(rng), (3.0 * growth_scale).max(1.0))?;
        stats.segments += 1;

        let base_radius = crown_length * spread;
        let width = (2.0 * growth_scale).max(1.0);
        for tier in 0..tiers {
            let level = tier as f32 / tiers as f32;
            if growth_scale < level {
                break;
            }
            stats.max_depth = 1;
            let center = origin - Vec2::new(0.0, crown_length * level);
            let radius = base_radius * (1.0 - level * 0.6);

            for spoke in 0..spokes {
                // Spokes ring the leader; seen side-on they sag slightly.
                let angle = (spoke as f32 / spokes as f32 * 360.0).to_radians();
                let reach = radius * uniform(rng, 0.8, 1.1);
                let end = center + Vec2::new(angle.cos() * reach, reach * 0.15);
                let color = self.paint.leaf(rng, level);
                canvas.draw_line(center, end, color, width)?;
                stats.segments += 1;

                if growth_scale >= LATE_FOLIAGE {
                    let needles = self.scaled_count(rng.random_range(3..=6));
                    for j in 0..needles {
                        let along = center.lerp(end, j as f32 / 6.0);
                        let at = along + Vec2::new(uniform(rng, -3.0, 3.0), uniform(rng, -2.0, 2.0));
                        canvas.draw_oval(at, self.leaf_size(rng), color)?;
                    }
                    if needles > 0 {
                        stats.leaves += needles;
                        stats.leaf_clusters += 1;
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Cherry crown: `count` unbranched limbs rising from `origin`, each
    /// lined with one blossom per `blossom_spacing` of its length once the
    /// crown is mostly grown.
    pub fn cherry<C, R>(
        &self,
        canvas: &mut C,
        rng: &mut R,
        origin: Vec2,
        count: u32,
        crown_length: f32,
        growth_scale: f32,
    ) -> Result<BranchStats>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut stats = BranchStats::default();
        let width = (3.0 * growth_scale).max(1.0);
        let spacing = self.config.blossom_spacing.max(1.0);

        for _ in 0..count {
            let angle = uniform(rng, -150.0, -30.0);
            let length = crown_length * uniform(rng, 0.6, 1.0);
            // Limbs arch outwards more than they climb
            let dir = direction(angle) * Vec2::new(1.0, 0.6);
            let end = origin + dir * length;
            canvas.draw_line(origin, end, self.paint.wood(rng), width)?;
            stats.segments += 1;
            stats.max_depth = 1;

            if growth_scale < LATE_FOLIAGE {
                continue;
            }
            let blossoms = if length.is_finite() {
                self.scaled_count((length / spacing).max(0.0) as u32)
            } else {
                0
            };
            for i in 0..blossoms {
                let t = i as f32 / blossoms.saturating_sub(1).max(1) as f32;
                let at = origin.lerp(end, t) + Vec2::new(uniform(rng, -5.0, 5.0), uniform(rng, -3.0, 3.0));
                canvas.draw_oval(at, self.leaf_size(rng), self.paint.leaf(rng, t))?;
            }
            if blossoms > 0 {
                stats.leaves += blossoms;
                stats.leaf_clusters += 1;
            }
        }
        Ok(stats)
    }

    fn scaled_count(&self, base: u32) -> usize {
        (base as f32 * self.leaf_density).floor().max(0.0) as usize
    }

    fn leaf_size<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (min, max) = self.leaf_kind.size_range();
        uniform(rng, min, max)
    }

    /// Scatter `uniform(2..=8) * leaf_density` leaves around `center`, each
    /// an oval, triangle or five-pointed star. Returns the number drawn.
    pub fn leaf_cluster<C, R>(&self, canvas: &mut C, rng: &mut R, center: Vec2) -> Result<usize>
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let count = (rng.random_range(2..=8u32) as f32 * self.leaf_density).floor().max(0.0) as usize;
        let scatter = self.config.leaf_scatter;
        let (size_min, size_max) = self.leaf_kind.size_range();

        for _ in 0..count {
            let mut offset = Vec2::new(uniform(rng, -scatter, scatter), uniform(rng, -scatter, scatter));
            if self.leaf_kind == LeafKind::Weeping {
                offset.y += offset.y.abs() * 0.5;
            }
            let size = uniform(rng, size_min, size_max);
            let t = if scatter > 0.0 { (offset.y + scatter) / (2.0 * scatter) } else { 0.5 };
            let color = self.paint.leaf(rng, t);
            let at = center + offset;

            match rng.random_range(0..3u8) {
                0 => canvas.draw_oval(at, size, color)?,
                1 => canvas.draw_polygon(
                    &[
                        at + Vec2::new(0.0, -size),
                        at + Vec2::new(-size, size),
                        at + Vec2::new(size, size),
                    ],
                    color,
                )?,
                _ => canvas.draw_polygon(&star(at, size), color)?,
            }
        }
        Ok(count)
    }
}

/// Unit vector for an angle in degrees
pub fn direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Five-pointed star, inner radius 0.4 of the outer.
fn star(center: Vec2, size: f32) -> Vec<Vec2> {
    (0..10)
        .map(|i| {
            let angle = i as f32 * PI / 5.0;
            let radius = if i % 2 == 0 { size } else { size * 0.4 };
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::core::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generator<'a>(config: &'a BranchConfig, theme: &'a Theme) -> BranchGenerator<'a> {
        BranchGenerator {
            config,
            paint: Paint::new(theme, None),
            angle_variance: 50.0,
            leaf_density: 1.0,
            leaf_kind: LeafKind::Standard,
        }
    }

    fn node(length: f32, branches_left: u32) -> BranchNode {
        BranchNode {
            origin: Vec2::new(100.0, 300.0),
            angle_deg: -90.0,
            length,
            depth: 0,
            branches_left,
        }
    }

    #[test]
    fn test_short_branch_is_only_a_leaf_cluster() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(1);

        let stats = branches.grow_branch(&mut canvas, &mut rng, node(4.0, 3), 1.0).unwrap();
        assert_eq!(stats.segments, 0);
        assert_eq!(stats.leaf_clusters, 1);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(canvas.line_count(), 0);
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(1);

        let stats = branches.grow_branch(&mut canvas, &mut rng, node(80.0, 0), 1.0).unwrap();
        assert_eq!(stats.segments, 0);
        assert_eq!(stats.leaf_clusters, 1);
    }

    #[test]
    fn test_recursion_is_bounded_by_depth() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut rng = StdRng::seed_from_u64(2);

        for length in [10.0, 60.0, 400.0, 1e6, f32::NAN] {
            let mut canvas = RecordingCanvas::new();
            let stats = branches.grow_branch(&mut canvas, &mut rng, node(length, 100), 1.0).unwrap();
            assert!(stats.max_depth <= config.max_depth + 1, "depth {}", stats.max_depth);
            // Each drawn segment has at most three children
            assert!(stats.segments <= 1 + 3 + 9 + 18 + 36 + 72);
        }
    }

    #[test]
    fn test_segments_start_where_parent_ends() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(3);

        branches.grow_branch(&mut canvas, &mut rng, node(50.0, 1), 1.0).unwrap();
        let first = canvas
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .unwrap();
        assert_eq!(first.0, Vec2::new(100.0, 300.0));
        assert!((first.1 - Vec2::new(100.0, 250.0)).length() < 1e-3);
    }

    #[test]
    fn test_colors_come_from_theme() {
        let config = BranchConfig::default();
        let theme = Theme::cool();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(4);

        branches.spread(&mut canvas, &mut rng, Vec2::new(200.0, 200.0), 5, 90.0, 1.0).unwrap();
        assert!(!canvas.is_empty());
        assert!(canvas.colors().all(|c| theme.contains(c)));
    }

    #[test]
    fn test_fractal_depth_zero_is_leaves() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(5);

        let stats = branches.fractal(&mut canvas, &mut rng, Vec2::ZERO, -90.0, 100.0, 0, 1.0).unwrap();
        assert_eq!(stats.segments, 0);
        assert_eq!(stats.leaf_clusters, 1);
    }

    #[test]
    fn test_fractal_full_binary_tree() {
        let config = BranchConfig { fractal_min_length: 0.0, ..BranchConfig::default() };
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(6);

        let stats = branches.fractal(&mut canvas, &mut rng, Vec2::ZERO, -90.0, 100.0, 4, 1.0).unwrap();
        assert_eq!(stats.segments, 15);
        assert_eq!(stats.leaf_clusters, 16);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn test_weeping_draws_polylines_with_droop() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = BranchGenerator { leaf_kind: LeafKind::Weeping, ..generator(&config, &theme) };
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(7);

        let stats = branches.weeping(&mut canvas, &mut rng, Vec2::ZERO, 3, 0.0, 0.7, 1.0).unwrap();
        assert_eq!(stats.segments, 24);
        assert_eq!(stats.leaf_clusters, 3);
        // Zero length leaves only the droop: every line ends lower than it starts
        for cmd in canvas.commands() {
            if let DrawCommand::Line { from, to, .. } = cmd {
                assert!(to.y > from.y);
            }
        }
    }

    #[test]
    fn test_pine_tiers_narrow_upwards() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = BranchGenerator { leaf_kind: LeafKind::Needle, ..generator(&config, &theme) };
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(11);
        let origin = Vec2::new(0.0, 200.0);

        let stats = branches.pine(&mut canvas, &mut rng, origin, 100.0, 6, 8, 0.5, 1.0).unwrap();
        assert_eq!(stats.segments, 1 + 6 * 8);
        assert_eq!(stats.leaf_clusters, 48);
        assert!(stats.leaves >= 48 * 3);

        // Spoke reach at each tier height never exceeds that tier's radius
        for cmd in canvas.commands() {
            if let DrawCommand::Line { from, to, .. } = cmd {
                if from.x == to.x {
                    continue;
                }
                let level = (origin.y - from.y) / 100.0;
                let radius = 50.0 * (1.0 - level * 0.6);
                assert!((to.x - from.x).abs() <= radius * 1.1 + 1e-3);
            }
        }
        assert!(canvas.colors().all(|c| theme.contains(c)));
    }

    #[test]
    fn test_young_pine_has_fewer_tiers_and_no_needles() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(12);

        let stats = branches.pine(&mut canvas, &mut rng, Vec2::ZERO, 100.0, 6, 8, 0.5, 0.2).unwrap();
        // Tiers at levels 0 and 1/6 only
        assert_eq!(stats.segments, 1 + 2 * 8);
        assert_eq!(stats.leaves, 0);
        assert_eq!(canvas.shape_count(), 0);
    }

    #[test]
    fn test_cherry_blossoms_follow_limb_length() {
        let config = BranchConfig::default();
        let theme = Theme::sunset();
        let branches = BranchGenerator { leaf_kind: LeafKind::Blossom, ..generator(&config, &theme) };
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(13);

        let stats = branches.cherry(&mut canvas, &mut rng, Vec2::new(0.0, 300.0), 5, 100.0, 1.0).unwrap();
        assert_eq!(stats.segments, 5);
        assert_eq!(stats.leaf_clusters, 5);
        // Limbs are 60..100px long at one blossom per 10px
        assert!((30..=50).contains(&stats.leaves), "leaves {}", stats.leaves);
        assert!(canvas.colors().all(|c| theme.contains(c)));
        for cmd in canvas.commands() {
            if let DrawCommand::Line { from, to, .. } = cmd {
                assert!(to.y < from.y, "limbs rise");
            }
        }
    }

    #[test]
    fn test_cherry_without_blossoms_before_late_growth() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(14);

        let stats = branches.cherry(&mut canvas, &mut rng, Vec2::ZERO, 3, 100.0, 0.5).unwrap();
        assert_eq!(stats.segments, 3);
        assert_eq!(stats.leaves, 0);
        assert_eq!(canvas.shape_count(), 0);
    }

    #[test]
    fn test_leaf_density_zero_draws_nothing() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = BranchGenerator { leaf_density: 0.0, ..generator(&config, &theme) };
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(8);

        assert_eq!(branches.leaf_cluster(&mut canvas, &mut rng, Vec2::ZERO).unwrap(), 0);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_gradient_paint() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let (from, to) = theme.gradient(0);
        let branches = BranchGenerator {
            paint: Paint::new(&theme, Some((from, to))),
            leaf_density: 3.0,
            ..generator(&config, &theme)
        };
        let mut canvas = RecordingCanvas::new();
        let mut rng = StdRng::seed_from_u64(9);

        branches.leaf_cluster(&mut canvas, &mut rng, Vec2::ZERO).unwrap();
        assert!(!canvas.is_empty());
        let lo = from.g.min(to.g);
        let hi = from.g.max(to.g);
        assert!(canvas.colors().all(|c| (lo..=hi).contains(&c.g)));
    }

    struct FailingCanvas;

    impl Canvas for FailingCanvas {
        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
        fn draw_line(&mut self, _: Vec2, _: Vec2, _: Color, _: f32) -> Result<()> {
            Err(Error::Canvas("surface lost".into()))
        }
        fn draw_oval(&mut self, _: Vec2, _: f32, _: Color) -> Result<()> {
            Ok(())
        }
        fn draw_polygon(&mut self, _: &[Vec2], _: Color) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_canvas_error_propagates() {
        let config = BranchConfig::default();
        let theme = Theme::warm();
        let branches = generator(&config, &theme);
        let mut rng = StdRng::seed_from_u64(10);

        let err = branches.grow_branch(&mut FailingCanvas, &mut rng, node(50.0, 2), 1.0).unwrap_err();
        assert!(matches!(err, Error::Canvas(_)));
    }
}
