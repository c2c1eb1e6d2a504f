//! Drawing backend contract.
//!
//! Geometries never rasterize anything themselves. They describe what to
//! draw as [`DrawCommand`]s and hand them to a [`DrawingContext`], which a
//! host implements on top of its renderer.

use serde::{Deserialize, Serialize};

use crate::animation::{Color, Point, Rect, Size, Transform2D};
use crate::error::Result;
use crate::time::TimeMs;

/// How a brush is applied to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// Resolved paint for one command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub stroke_thickness: f64,
    pub style: PaintStyle,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            stroke_thickness: 1.0,
            style: PaintStyle::Fill,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        brush: Brush,
        transform: Transform2D,
    },
    Ellipse {
        center: Point,
        radii: Size,
        brush: Brush,
        transform: Transform2D,
    },
    Line {
        from: Point,
        to: Point,
        brush: Brush,
        transform: Transform2D,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        brush: Brush,
        transform: Transform2D,
    },
    /// Measured bounds of a geometry, drawn when debug lines are enabled.
    DebugOutline { bounds: Rect, transform: Transform2D },
}

impl DrawCommand {
    pub fn transform(&self) -> &Transform2D {
        match self {
            Self::Rect { transform, .. }
            | Self::Ellipse { transform, .. }
            | Self::Line { transform, .. }
            | Self::Text { transform, .. }
            | Self::DebugOutline { transform, .. } => transform,
        }
    }
}

/// A rendering backend receiving one frame of commands at a time.
pub trait DrawingContext {
    /// Whether the canvas must hold its shared lock for the whole pass.
    fn requires_serialized_access(&self) -> bool {
        false
    }

    fn begin_frame(&mut self, _now: TimeMs) {}

    fn submit(&mut self, command: DrawCommand) -> Result<()>;

    fn end_frame(&mut self) {}
}

/// In-memory backend that records the commands of the latest frame.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    frames: u64,
    last_frame_time: Option<TimeMs>,
    serialized: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that asks the canvas for serialized access.
    pub fn serialized() -> Self {
        Self {
            serialized: true,
            ..Self::default()
        }
    }

    /// Commands submitted since the last `begin_frame`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of frames begun on this context.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_time(&self) -> Option<TimeMs> {
        self.last_frame_time
    }
}

impl DrawingContext for RecordingContext {
    fn requires_serialized_access(&self) -> bool {
        self.serialized
    }

    fn begin_frame(&mut self, now: TimeMs) {
        self.commands.clear();
        self.frames += 1;
        self.last_frame_time = Some(now);
    }

    fn submit(&mut self, command: DrawCommand) -> Result<()> {
        self.commands.push(command);
        Ok(())
    }
}
