//! Headless surface that records draw calls
//!
//! Used by the native runner and by tests to inspect what a frame draws.

use glam::Vec2;

use super::Surface;
use crate::sim::Color;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        line_width: f32,
    },
    Label {
        text: String,
        center: Vec2,
        font: String,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of circle outlines drawn
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn circle_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn circle_centers(&self) -> Vec<Vec2> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn fill_label(&mut self, text: &str, center: Vec2, font: &str, color: Color) {
        self.commands.push(DrawCommand::Label {
            text: text.to_string(),
            center,
            font: font.to_string(),
            color,
        });
    }
}
