//! Detected objects and the graphic that draws them.
//!
//! A [`DetectedObject`] carries image-space geometry exactly as the detector
//! reports it. [`ObjectGraphic`] maps it through the [`Overlay`] handle and
//! draws the bounding box plus a label panel above it: one tracking line,
//! then two lines per classification label.

#[cfg(test)]
#[path = "detection_test.rs"]
mod detection_test;

use serde::{Deserialize, Serialize};

use crate::consts::{NUM_COLORS, STROKE_WIDTH, TEXT_SIZE};
use crate::paint::{PaintError, Painter, Style};
use crate::surface::{Graphic, Overlay};
use crate::transform::{Point, Rect};

/// A classification attached to a detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Confidence in `0.0..=1.0`.
    pub confidence: f32,
    /// Index of the label in the classifier's label map.
    pub index: i32,
}

/// A single detector result in image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub bounding_box: Rect,
    /// Stable across frames while the detector tracks the object.
    pub tracking_id: Option<i32>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl DetectedObject {
    /// Palette slot for this object; untracked objects use slot 0.
    #[must_use]
    pub fn palette(&self) -> usize {
        self.tracking_id.map_or(0, |id| (id % NUM_COLORS).unsigned_abs() as usize)
    }

    /// First line of the label panel.
    #[must_use]
    pub fn tracking_line(&self) -> String {
        match self.tracking_id {
            Some(id) => format!("Tracking ID: {id}"),
            None => "Tracking ID: none".to_string(),
        }
    }
}

/// Second line for each label: confidence as a percentage plus label index.
#[must_use]
pub fn confidence_line(label: &Label) -> String {
    format!("{:.2}% confidence (index: {})", label.confidence * 100.0, label.index)
}

/// Draws one [`DetectedObject`].
#[derive(Debug, Clone)]
pub struct ObjectGraphic {
    object: DetectedObject,
}

impl ObjectGraphic {
    #[must_use]
    pub fn new(object: DetectedObject) -> Self {
        Self { object }
    }

    #[must_use]
    pub fn object(&self) -> &DetectedObject {
        &self.object
    }
}

impl Graphic for ObjectGraphic {
    fn draw(&self, painter: &mut dyn Painter, overlay: &Overlay<'_>) -> Result<(), PaintError> {
        let palette = self.object.palette();
        let text_style = Style::text(palette);
        let tracking = self.object.tracking_line();
        let line_height = TEXT_SIZE + STROKE_WIDTH;

        // Panel width is the widest line; its top sits above the box.
        let mut text_width = painter.measure_text(&tracking, text_style);
        let mut y_label_offset = -line_height;
        for label in &self.object.labels {
            text_width = text_width
                .max(painter.measure_text(&label.text, text_style))
                .max(painter.measure_text(&confidence_line(label), text_style));
            y_label_offset -= 2.0 * line_height;
        }

        let rect = overlay.map_rect(self.object.bounding_box);
        painter.stroke_rect(rect, Style::stroke(palette))?;

        let panel = Rect::new(
            rect.left - STROKE_WIDTH,
            rect.top + y_label_offset,
            rect.left + text_width + 2.0 * STROKE_WIDTH,
            rect.top,
        );
        painter.fill_rect(panel, Style::fill(palette))?;

        y_label_offset += TEXT_SIZE;
        painter.fill_text(&tracking, Point::new(rect.left, rect.top + y_label_offset), text_style)?;
        y_label_offset += line_height;

        for label in &self.object.labels {
            painter.fill_text(&label.text, Point::new(rect.left, rect.top + y_label_offset), text_style)?;
            y_label_offset += line_height;
            painter.fill_text(&confidence_line(label), Point::new(rect.left, rect.top + y_label_offset), text_style)?;
            y_label_offset += line_height;
        }
        Ok(())
    }
}
