//! Canvas that records draw calls instead of rasterizing them.

use serde::{Deserialize, Serialize};

use crate::core::{Result, Vec2};
use crate::palette::Color;
use super::Canvas;

/// One recorded primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    Oval { center: Vec2, radius: f32, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Line { color, .. }
            | DrawCommand::Oval { color, .. }
            | DrawCommand::Polygon { color, .. } => *color,
        }
    }
}

/// Retained list of everything drawn since the last `clear`.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of `clear` calls seen, i.e. frames started
    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    pub fn line_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count()
    }

    /// Ovals and polygons: the shapes leaves are made of
    pub fn shape_count(&self) -> usize {
        self.commands.len() - self.line_count()
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.commands.iter().map(DrawCommand::color)
    }

    /// Serialize the current frame
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) -> Result<()> {
        self.commands.clear();
        self.clears += 1;
        Ok(())
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) -> Result<()> {
        self.commands.push(DrawCommand::Line { from, to, color, width });
        Ok(())
    }

    fn draw_oval(&mut self, center: Vec2, radius: f32, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Oval { center, radius, color });
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color });
        Ok(())
    }
}
