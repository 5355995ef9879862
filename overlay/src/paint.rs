//! Painting: the seam between graphics and the host's drawing API.
//!
//! Graphics never touch a concrete canvas. They receive a `&mut dyn Painter`
//! and issue view-space primitives through it. Hosts implement [`Painter`]
//! over their real canvas; [`Recorder`] implements it by recording
//! [`DrawCommand`]s, which is what tests and the headless host use.
//!
//! Style is deliberately thin: a palette slot plus an ink role. Mapping slots
//! to concrete colours belongs to the host.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GLYPH_ADVANCE_RATIO, STROKE_WIDTH, TEXT_SIZE};
use crate::transform::{Point, Rect};

/// Error returned by painter operations and by [`crate::Graphic::draw`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaintError {
    /// The host drawing backend rejected the call.
    #[error("painter backend error: {0}")]
    Backend(String),
    /// A coordinate or size was NaN or infinite.
    #[error("non-finite geometry passed to {0}")]
    NonFinite(&'static str),
}

/// Which colour of a palette slot to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ink {
    /// Text colour.
    Foreground,
    /// Box and label-panel colour.
    Background,
}

/// Style for a single primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Palette slot, `0..NUM_COLORS`.
    pub palette: usize,
    pub ink: Ink,
    /// Stroke width in view pixels (strokes only).
    pub stroke_width: f64,
    /// Text size in view pixels (text only).
    pub text_size: f64,
}

impl Style {
    /// Outline in the slot's background colour.
    #[must_use]
    pub fn stroke(palette: usize) -> Self {
        Self { palette, ink: Ink::Background, stroke_width: STROKE_WIDTH, text_size: TEXT_SIZE }
    }

    /// Solid fill in the slot's background colour.
    #[must_use]
    pub fn fill(palette: usize) -> Self {
        Self { palette, ink: Ink::Background, stroke_width: 0.0, text_size: TEXT_SIZE }
    }

    /// Text in the slot's foreground colour.
    #[must_use]
    pub fn text(palette: usize) -> Self {
        Self { palette, ink: Ink::Foreground, stroke_width: 0.0, text_size: TEXT_SIZE }
    }
}

/// View-space drawing primitives.
pub trait Painter {
    /// Outline `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError`] if the backend cannot draw the rectangle.
    fn stroke_rect(&mut self, rect: Rect, style: Style) -> Result<(), PaintError>;

    /// Fill `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError`] if the backend cannot draw the rectangle.
    fn fill_rect(&mut self, rect: Rect, style: Style) -> Result<(), PaintError>;

    /// Draw `text` with its baseline starting at `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError`] if the backend cannot draw the text.
    fn fill_text(&mut self, text: &str, origin: Point, style: Style) -> Result<(), PaintError>;

    /// Advance width of `text` in view pixels.
    fn measure_text(&self, text: &str, style: Style) -> f64;
}

/// A recorded painter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    StrokeRect { rect: Rect, style: Style },
    FillRect { rect: Rect, style: Style },
    FillText { text: String, origin: Point, style: Style },
}

/// Painter that records every call instead of drawing.
///
/// Text is measured with a fixed advance per character.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drop recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Serialize the recorded commands as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

fn check_rect(rect: Rect, op: &'static str) -> Result<(), PaintError> {
    if [rect.left, rect.top, rect.right, rect.bottom].iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PaintError::NonFinite(op))
    }
}

impl Painter for Recorder {
    fn stroke_rect(&mut self, rect: Rect, style: Style) -> Result<(), PaintError> {
        check_rect(rect, "stroke_rect")?;
        self.commands.push(DrawCommand::StrokeRect { rect, style });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, style: Style) -> Result<(), PaintError> {
        check_rect(rect, "fill_rect")?;
        self.commands.push(DrawCommand::FillRect { rect, style });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: Style) -> Result<(), PaintError> {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(PaintError::NonFinite("fill_text"));
        }
        self.commands.push(DrawCommand::FillText { text: text.to_string(), origin, style });
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str, style: Style) -> f64 {
        text.chars().count() as f64 * style.text_size * GLYPH_ADVANCE_RATIO
    }
}
