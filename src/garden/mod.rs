//! Garden scene: the ordered set of trees and grass, the active theme, and
//! the garden's random number generator.
//!
//! Insertion order is planting order. With `max_trees` configured, planting
//! into a full garden evicts the oldest tree first.

pub mod config;
pub mod driver;
pub mod auto_plant;

pub use config::GardenConfig;
pub use driver::{AnimationDriver, TickReport};
pub use auto_plant::AutoPlanter;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{FeatureVector, TextAnalyzer};
use crate::canvas::Canvas;
use crate::core::types::uniform;
use crate::core::{Result, Vec2};
use crate::grass::Grass;
use crate::math::Bounds;
use crate::palette::{Color, Theme, builtin_themes};
use crate::tree::{BranchStats, RenderContext, Tree, TreeId, TreeStyle};

/// Golden-ratio multiplier used to spread tree ids across seeds
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// The scene every host drives.
pub struct Garden {
    config: GardenConfig,
    rng: StdRng,
    trees: VecDeque<Tree>,
    grass: Vec<Grass>,
    theme: Theme,
    next_id: TreeId,
    analyzer: TextAnalyzer,
}

impl Garden {
    /// Create an empty garden. Fails if the configured theme is unknown.
    pub fn new(mut config: GardenConfig) -> Result<Self> {
        config.validate();
        let theme = Theme::by_name(&config.theme)?;
        log::info!(
            "Garden created: seed={}, theme={}, max_trees={:?}",
            config.seed, theme.name, config.max_trees
        );
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            trees: VecDeque::new(),
            grass: Vec::new(),
            theme,
            next_id: 1,
            analyzer: TextAnalyzer::new(),
        })
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Trees in planting order
    pub fn trees(&self) -> &VecDeque<Tree> {
        &self.trees
    }

    pub fn grass(&self) -> &[Grass] {
        &self.grass
    }

    pub fn tree(&self, id: TreeId) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Canvas rectangle trees may be planted in
    pub fn plant_area(&self) -> Bounds {
        Bounds::new(
            Vec2::new(0.0, self.config.min_plant_y),
            Vec2::new(self.config.canvas_width, self.config.canvas_height),
        )
    }

    fn clamp_to_plant_area(&self, position: Vec2) -> Vec2 {
        let area = self.plant_area();
        let p = if position.is_finite() { position } else { area.center() };
        p.clamp(area.min, area.max)
    }

    /// Plant a tree with a random style. Missing features are randomised.
    pub fn plant(&mut self, position: Vec2, features: Option<FeatureVector>) -> TreeId {
        let style = TreeStyle::random(&mut self.rng);
        self.plant_styled(position, style, features)
    }

    /// Plant a tree of a given style.
    pub fn plant_styled(&mut self, position: Vec2, style: TreeStyle, features: Option<FeatureVector>) -> TreeId {
        let position = self.clamp_to_plant_area(position);
        let features = features.unwrap_or_else(|| FeatureVector::random(&mut self.rng));

        if let Some(max) = self.config.max_trees {
            while self.trees.len() >= max {
                if let Some(old) = self.trees.pop_front() {
                    log::info!("Garden full ({}), evicted tree {}", max, old.id());
                }
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        let tree = Tree::new(id, position, style, features, &self.config.style_table, &mut self.rng);
        log::info!(
            "Planted tree {} ({}) at ({:.0}, {:.0}) [{}]",
            id, style, position.x, position.y, tree.sound_code()
        );
        self.trees.push_back(tree);
        self.spawn_grass();
        id
    }

    /// Plant a tree whose style is given by name; unknown names are an error.
    pub fn plant_named(&mut self, position: Vec2, style: &str, features: Option<FeatureVector>) -> Result<TreeId> {
        let style: TreeStyle = style.parse()?;
        Ok(self.plant_styled(position, style, features))
    }

    /// Plant a tree from a text description of a sound.
    pub fn plant_from_text(&mut self, position: Vec2, text: &str) -> TreeId {
        let features = self.analyzer.analyze(text, &mut self.rng);
        self.plant(position, Some(features))
    }

    /// Plant somewhere inside `area` (clipped to the plant area).
    pub fn plant_random_in(&mut self, area: &Bounds, features: Option<FeatureVector>) -> TreeId {
        let position = Vec2::new(
            uniform(&mut self.rng, area.min.x, area.max.x),
            uniform(&mut self.rng, area.min.y, area.max.y),
        );
        self.plant(position, features)
    }

    /// Plant a random tree in the lower part of the canvas.
    pub fn plant_random(&mut self) -> TreeId {
        let (w, h) = (self.config.canvas_width, self.config.canvas_height);
        let area = Bounds::new(
            Vec2::new(w * 0.1, self.config.min_plant_y.max(h / 3.0)),
            Vec2::new(w * 0.9, h * 0.85),
        );
        self.plant_random_in(&area, None)
    }

    pub fn remove(&mut self, id: TreeId) -> Option<Tree> {
        let index = self.trees.iter().position(|t| t.id() == id)?;
        let tree = self.trees.remove(index);
        if tree.is_some() {
            log::info!("Removed tree {}", id);
        }
        tree
    }

    /// Remove every tree and grass patch and wipe the canvas.
    pub fn clear<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<()> {
        let (trees, grass) = (self.trees.len(), self.grass.len());
        self.trees.clear();
        self.grass.clear();
        canvas.clear()?;
        log::info!("Garden cleared ({} trees, {} grass)", trees, grass);
        Ok(())
    }

    /// Switch every tree to `theme`. Geometry is untouched; the next render
    /// picks colors from the new palette. Grass is recolored.
    pub fn retheme(&mut self, theme: Theme) {
        if theme.trunk.is_empty() || theme.leaves.is_empty() {
            log::warn!("Theme '{}' has an empty palette; fallback colors will be used", theme.name);
        }
        self.theme = theme;
        self.config.theme = self.theme.name.clone();
        for i in 0..self.grass.len() {
            let color = self.grass_color(self.grass[i].position());
            self.grass[i].set_color(color);
        }
        log::info!("Retheme: {}", self.theme.name);
    }

    /// Retheme to a built-in theme by name.
    pub fn retheme_named(&mut self, name: &str) -> Result<()> {
        let theme = Theme::by_name(name)?;
        self.retheme(theme);
        Ok(())
    }

    /// Advance to the next built-in theme, wrapping around.
    pub fn cycle_theme(&mut self) -> &Theme {
        let themes = builtin_themes();
        let next = themes
            .iter()
            .position(|t| t.name == self.theme.name)
            .map_or(0, |i| (i + 1) % themes.len());
        if let Some(theme) = themes.into_iter().nth(next) {
            self.retheme(theme);
        }
        &self.theme
    }

    /// Advance every tree and grass patch by `dt` seconds.
    pub fn update(&mut self, dt: f32, live: Option<&FeatureVector>) {
        for tree in &mut self.trees {
            tree.update(dt, live);
        }
        for grass in &mut self.grass {
            grass.update(dt);
        }
        log::trace!("Garden update dt={:.3} trees={} grass={}", dt, self.trees.len(), self.grass.len());
    }

    /// Clear the canvas and draw the whole scene, grass behind trees.
    pub fn redraw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<BranchStats> {
        canvas.clear()?;
        for grass in &self.grass {
            grass.render(canvas)?;
        }

        let ctx = RenderContext {
            branch: &self.config.branch,
            use_gradients: self.config.use_gradients,
        };
        let mut stats = BranchStats::default();
        for tree in &self.trees {
            let tree_stats = if self.config.stable_geometry {
                let mut rng = StdRng::seed_from_u64(self.config.seed ^ tree.id().wrapping_mul(SEED_SPREAD));
                tree.render(canvas, &self.theme, &ctx, &mut rng)?
            } else {
                tree.render(canvas, &self.theme, &ctx, &mut self.rng)?
            };
            stats.merge(tree_stats);
        }
        Ok(stats)
    }

    /// Topmost (most recently planted) tree under `point`.
    pub fn tree_at(&self, point: Vec2) -> Option<TreeId> {
        self.trees.iter().rev().find(|t| t.contains_point(point)).map(Tree::id)
    }

    /// Drag a tree to a new position. Growth is unaffected.
    pub fn move_tree(&mut self, id: TreeId, position: Vec2) -> bool {
        let position = self.clamp_to_plant_area(position);
        match self.trees.iter_mut().find(|t| t.id() == id) {
            Some(tree) => {
                tree.set_position(position);
                log::debug!("Moved tree {} to ({:.0}, {:.0})", id, position.x, position.y);
                true
            }
            None => false,
        }
    }

    /// Top up grass to the configured share of the tree count.
    fn spawn_grass(&mut self) {
        let target = self.config.grass.target_count(self.trees.len());
        if self.grass.len() >= target {
            return;
        }
        let area = &self.config.grass;
        let (min, max) = (Vec2::from(area.area_min), Vec2::from(area.area_max));
        let added = target - self.grass.len();
        for _ in 0..added {
            let position = Vec2::new(
                uniform(&mut self.rng, min.x, max.x),
                uniform(&mut self.rng, min.y, max.y),
            );
            let color = self.grass_color(position);
            let patch = Grass::new(position, color, &self.config.grass, &mut self.rng);
            self.grass.push(patch);
        }
        log::debug!("Spawned {} grass patches ({} total)", added, self.grass.len());
    }

    /// Tint of a leaf color from a nearby tree, or the theme's base grass.
    fn grass_color(&mut self, position: Vec2) -> Color {
        let radius = self.config.grass.color_radius;
        let nearby = self
            .trees
            .iter()
            .find(|t| t.position().distance(position) < radius)
            .map(Tree::gradient_index);

        match nearby {
            Some(index) => {
                let leaf = if self.config.use_gradients {
                    let (from, to) = self.theme.gradient(index);
                    if self.rng.random::<bool>() { from } else { to }
                } else {
                    self.theme.leaf_color(&mut self.rng)
                };
                leaf.grass_tint(&mut self.rng)
            }
            None => self.theme.grass_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::core::Error;
    use crate::tree::GrowthStage;

    fn garden(max_trees: Option<usize>) -> Garden {
        Garden::new(GardenConfig { max_trees, ..GardenConfig::default() }).unwrap()
    }

    fn ids(g: &Garden) -> Vec<TreeId> {
        g.trees().iter().map(Tree::id).collect()
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let config = GardenConfig { theme: "plaid".into(), ..GardenConfig::default() };
        assert!(matches!(Garden::new(config), Err(Error::UnknownTheme(_))));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut g = garden(Some(2));
        let t1 = g.plant(Vec2::new(100.0, 400.0), None);
        let t2 = g.plant(Vec2::new(200.0, 400.0), None);
        let t3 = g.plant(Vec2::new(300.0, 400.0), None);
        assert_eq!(ids(&g), vec![t2, t3]);
        assert!(g.tree(t1).is_none());
    }

    #[test]
    fn test_capacity_invariant_holds() {
        let n = 5;
        let mut g = garden(Some(n));
        let planted: Vec<TreeId> = (0..n + 7).map(|_| g.plant_random()).collect();
        assert_eq!(g.len(), n);
        assert_eq!(ids(&g), planted[planted.len() - n..].to_vec());
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut g = garden(None);
        for _ in 0..30 {
            g.plant_random();
        }
        assert_eq!(g.len(), 30);
    }

    #[test]
    fn test_plant_position_is_clamped() {
        let mut g = garden(None);
        let id = g.plant(Vec2::new(-50.0, 10.0), None);
        assert_eq!(g.tree(id).unwrap().position(), Vec2::new(0.0, 50.0));
        let id = g.plant(Vec2::new(5000.0, f32::NAN), None);
        assert_eq!(g.tree(id).unwrap().position(), Vec2::new(500.0, 325.0));
    }

    #[test]
    fn test_plant_named_and_text() {
        let mut g = garden(None);
        let id = g.plant_named(Vec2::new(300.0, 400.0), "fractal", None).unwrap();
        assert_eq!(g.tree(id).unwrap().style(), TreeStyle::Fractal);
        assert!(matches!(
            g.plant_named(Vec2::new(300.0, 400.0), "baobab", None),
            Err(Error::UnknownStyle(_))
        ));
        assert_eq!(g.len(), 1);

        let id = g.plant_from_text(Vec2::new(300.0, 400.0), "loud deep rhythmic");
        let f = g.tree(id).unwrap().features();
        assert!(f.volume > 0.5 && f.energy > 0.5);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut g = garden(None);
        let a = g.plant_random();
        let b = g.plant_random();
        assert!(g.remove(a).is_some());
        assert!(g.remove(a).is_none());
        assert_eq!(ids(&g), vec![b]);

        let mut canvas = RecordingCanvas::new();
        g.update(30.0, None);
        g.redraw(&mut canvas).unwrap();
        assert!(!canvas.is_empty());
        g.clear(&mut canvas).unwrap();
        assert!(g.is_empty());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_retheme_is_idempotent_and_colors_follow() {
        let mut g = garden(None);
        for _ in 0..5 {
            g.plant_random();
        }
        g.update(100.0, None);

        let cool = Theme::cool();
        g.retheme(cool.clone());
        let indices: Vec<usize> = g.trees().iter().map(Tree::gradient_index).collect();
        g.retheme(cool.clone());
        assert_eq!(g.theme(), &cool);
        assert_eq!(indices, g.trees().iter().map(Tree::gradient_index).collect::<Vec<_>>());

        let mut canvas = RecordingCanvas::new();
        g.redraw(&mut canvas).unwrap();
        assert!(canvas.colors().all(|c| cool.contains(c)));
    }

    #[test]
    fn test_retheme_keeps_geometry() {
        let mut g = garden(None);
        let id = g.plant_random();
        let before = *g.tree(id).unwrap().derived();
        g.retheme_named("mono").unwrap();
        assert_eq!(*g.tree(id).unwrap().derived(), before);
        assert!(g.retheme_named("plaid").is_err());
        assert_eq!(g.theme().name, "mono");
    }

    #[test]
    fn test_cycle_theme_wraps() {
        let mut g = garden(None);
        let names: Vec<String> = (0..5).map(|_| g.cycle_theme().name.clone()).collect();
        assert_eq!(names, ["cool", "mono", "sunset", "aurora", "warm"]);
    }

    #[test]
    fn test_update_grows_every_tree() {
        let mut g = garden(None);
        for _ in 0..4 {
            g.plant_random();
        }
        g.update(1.0, None);
        assert!(g.trees().iter().all(|t| t.stage() == GrowthStage::Growing));
        g.update(100.0, None);
        assert!(g.trees().iter().all(|t| t.stage() == GrowthStage::Mature));
    }

    #[test]
    fn test_grass_appears_after_trigger() {
        let mut g = garden(None);
        for _ in 0..9 {
            g.plant_random();
        }
        assert!(g.grass().is_empty());
        g.plant_random();
        assert_eq!(g.grass().len(), 5);
        g.plant_random();
        g.plant_random();
        assert_eq!(g.grass().len(), 6);
    }

    #[test]
    fn test_grass_without_neighbours_uses_base_color() {
        let mut config = GardenConfig::default();
        config.grass.trigger_tree_count = 1;
        config.grass.patches_per_tree = 1.0;
        config.grass.color_radius = 0.0;
        let mut g = Garden::new(config).unwrap();
        g.plant_random();
        assert_eq!(g.grass().len(), 1);
        assert_eq!(g.grass()[0].color(), g.theme().grass_base);

        g.retheme(Theme::aurora());
        assert_eq!(g.grass()[0].color(), Theme::aurora().grass_base);
    }

    #[test]
    fn test_tree_at_prefers_newest() {
        let mut g = garden(None);
        let a = g.plant(Vec2::new(400.0, 400.0), None);
        let b = g.plant(Vec2::new(405.0, 400.0), None);
        assert_eq!(g.tree_at(Vec2::new(402.0, 398.0)), Some(b));
        assert!(g.remove(b).is_some());
        assert_eq!(g.tree_at(Vec2::new(402.0, 398.0)), Some(a));
        assert_eq!(g.tree_at(Vec2::new(900.0, 100.0)), None);
    }

    #[test]
    fn test_move_tree_keeps_growth() {
        let mut g = garden(None);
        let id = g.plant(Vec2::new(400.0, 400.0), None);
        g.update(5.0, None);
        let growth = g.tree(id).unwrap().growth();
        assert!(g.move_tree(id, Vec2::new(700.0, 450.0)));
        let t = g.tree(id).unwrap();
        assert_eq!(t.position(), Vec2::new(700.0, 450.0));
        assert_eq!(t.growth(), growth);
        assert!(!g.move_tree(9999, Vec2::ZERO));
    }

    #[test]
    fn test_stable_geometry_repeats_frames() {
        let config = GardenConfig { stable_geometry: true, ..GardenConfig::default() };
        let mut g = Garden::new(config).unwrap();
        for _ in 0..3 {
            g.plant_random();
        }
        g.update(100.0, None);

        let mut first = RecordingCanvas::new();
        let mut second = RecordingCanvas::new();
        g.redraw(&mut first).unwrap();
        g.redraw(&mut second).unwrap();
        assert_eq!(first.commands(), second.commands());
    }

    #[test]
    fn test_default_geometry_jitters() {
        let mut g = garden(None);
        for _ in 0..3 {
            g.plant_random();
        }
        g.update(100.0, None);

        let mut first = RecordingCanvas::new();
        let mut second = RecordingCanvas::new();
        g.redraw(&mut first).unwrap();
        g.redraw(&mut second).unwrap();
        assert_ne!(first.commands(), second.commands());
    }

    #[test]
    fn test_same_seed_same_garden() {
        let build = || {
            let mut g = garden(None);
            for _ in 0..4 {
                g.plant_random();
            }
            g.update(3.0, None);
            let mut canvas = RecordingCanvas::new();
            g.redraw(&mut canvas).unwrap();
            canvas.commands().to_vec()
        };
        assert_eq!(build(), build());
    }
}
