//! Drawing sink consumed by trees and grass.
//!
//! The garden never owns a window or a pixel buffer. It issues a handful of
//! primitive calls against a [`Canvas`]; any 2D surface that can draw lines,
//! filled circles and filled polygons can host a garden. Errors raised by the
//! sink propagate unchanged out of every render call.

pub mod recording;

pub use recording::{DrawCommand, RecordingCanvas};

use crate::core::{Result, Vec2};
use crate::palette::Color;

/// Primitive 2D drawing operations, in canvas pixels with y pointing down.
pub trait Canvas {
    /// Erase everything drawn so far
    fn clear(&mut self) -> Result<()>;

    /// Stroke a straight segment with round caps
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) -> Result<()>;

    /// Fill a circle
    fn draw_oval(&mut self, center: Vec2, radius: f32, color: Color) -> Result<()>;

    /// Fill a closed polygon
    fn draw_polygon(&mut self, points: &[Vec2], color: Color) -> Result<()>;

    /// Stroke an open polyline as consecutive segments.
    fn draw_polyline(&mut self, points: &[Vec2], color: Color, width: f32) -> Result<()> {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color, width)?;
        }
        Ok(())
    }
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) -> Result<()> {
        (**self).draw_line(from, to, color, width)
    }

    fn draw_oval(&mut self, center: Vec2, radius: f32, color: Color) -> Result<()> {
        (**self).draw_oval(center, radius, color)
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) -> Result<()> {
        (**self).draw_polygon(points, color)
    }

    fn draw_polyline(&mut self, points: &[Vec2], color: Color, width: f32) -> Result<()> {
        (**self).draw_polyline(points, color, width)
    }
}
