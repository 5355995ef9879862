//! Shared numeric constants for the overlay crate.

// ── Transform ───────────────────────────────────────────────────

/// Scale factor used before the first successful recompute.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.0;

// ── Object graphic ──────────────────────────────────────────────

/// Label text size in view pixels.
pub const TEXT_SIZE: f64 = 54.0;

/// Bounding-box stroke width in view pixels.
pub const STROKE_WIDTH: f64 = 4.0;

/// Number of palette slots; tracking IDs cycle through them.
pub const NUM_COLORS: i32 = 10;

// ── Recorder ────────────────────────────────────────────────────

/// Average glyph advance as a fraction of text size, used by the recording painter.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.5;
