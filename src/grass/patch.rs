//! A single grass patch.

use rand::Rng;
use serde::Serialize;

use crate::canvas::Canvas;
use crate::core::types::uniform;
use crate::core::{Result, Vec2};
use crate::palette::Color;
use super::config::GrassConfig;

/// Blades drawn per patch
const BLADES: usize = 3;

/// Three blades fanned from one base point, growing and swaying like a
/// very small tree.
#[derive(Clone, Debug, Serialize)]
pub struct Grass {
    position: Vec2,
    height: f32,
    width: f32,
    color: Color,
    growth: f32,
    is_growing: bool,
    sway_phase: f32,
    growth_rate: f32,
    sway_rate: f32,
    sway_amplitude: f32,
}

impl Grass {
    pub fn new<R: Rng + ?Sized>(position: Vec2, color: Color, config: &GrassConfig, rng: &mut R) -> Self {
        Self {
            position,
            height: uniform(rng, config.height_range[0], config.height_range[1]),
            width: uniform(rng, config.width_range[0], config.width_range[1]),
            color,
            growth: 0.0,
            is_growing: true,
            sway_phase: 0.0,
            growth_rate: config.growth_rate.max(0.0),
            sway_rate: config.sway_rate,
            sway_amplitude: config.sway_amplitude,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Recolor after a theme change
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn growth(&self) -> f32 {
        self.growth
    }

    pub fn is_growing(&self) -> bool {
        self.is_growing
    }

    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.is_growing {
            self.growth = (self.growth + dt * self.growth_rate).min(1.0);
            if self.growth >= 1.0 {
                self.is_growing = false;
            }
        }
        self.sway_phase = (self.sway_phase + dt * self.sway_rate) % std::f32::consts::TAU;
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        if self.growth <= 0.0 {
            return Ok(());
        }
        let sway = self.sway_phase.sin() * self.sway_amplitude;
        let height = self.height * self.growth;
        let width = (2.0 * self.growth).max(1.0);

        for i in 0..BLADES {
            let i = i as f32;
            let base = self.position + Vec2::new((i - 1.0) * self.width * 0.3, 0.0);
            let tip = base + Vec2::new(sway * (0.5 + i * 0.2), -height * (0.8 + i * 0.1));
            canvas.draw_line(base, tip, self.color, width)?;
        }
        Ok(())
    }
}
