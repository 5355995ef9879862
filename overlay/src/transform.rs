//! Image-to-view coordinate transformation.
//!
//! Detection geometry is expressed in image pixels. The view is filled with a
//! crop-to-fill fit: the image is scaled uniformly until it covers the view on
//! both axes, and the excess on one axis is cropped symmetrically. The result
//! is a [`TransformState`] (scale factor, crop offsets, affine matrix) that is
//! computed by the pure [`recompute`] function and read by graphics through
//! its conversion helpers.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::OverlayError;
use crate::consts::DEFAULT_SCALE_FACTOR;

/// A point in either image or view space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle described by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Geometry of the frame fed to the detector.
///
/// Fields are private so every instance has passed [`ImageSourceInfo::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSourceInfo {
    width: u32,
    height: u32,
    mirrored: bool,
}

impl ImageSourceInfo {
    /// Validate and build source info for an upright image.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidDimension`] if either side is zero.
    pub fn new(width: u32, height: u32, mirrored: bool) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidDimension { width, height });
        }
        Ok(Self { width, height, mirrored })
    }

    /// Build source info for a camera frame that the detector will rotate upright.
    ///
    /// Frames rotated by 90 or 270 degrees are upright as `height x width`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidRotation`] for rotations other than
    /// 0, 90, 180 or 270, and [`OverlayError::InvalidDimension`] if either side is zero.
    pub fn from_rotated_frame(
        frame_width: u32,
        frame_height: u32,
        rotation_degrees: u32,
        mirrored: bool,
    ) -> Result<Self, OverlayError> {
        match rotation_degrees {
            0 | 180 => Self::new(frame_width, frame_height, mirrored),
            90 | 270 => Self::new(frame_height, frame_width, mirrored),
            other => Err(OverlayError::InvalidRotation(other)),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the image is horizontally flipped (front-facing camera).
    #[must_use]
    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Current pixel size of the display surface. Zero before first layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the viewport has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 2D affine transform in canvas `setTransform(a, b, c, d, e, f)` order.
///
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    /// Horizontal flip about the vertical line `x = axis_x`.
    #[must_use]
    pub fn flip_horizontal(axis_x: f64) -> Self {
        Self { a: -1.0, e: 2.0 * axis_x, ..Self::IDENTITY }
    }

    /// Compose so that `self` is applied first and `next` second.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Cached image-to-view mapping.
///
/// `post_scale_width_offset` / `post_scale_height_offset` are the pixels
/// cropped from each side of the scaled image; at most one is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformState {
    pub scale_factor: f64,
    pub post_scale_width_offset: f64,
    pub post_scale_height_offset: f64,
    /// View width the state was computed for; the mirror axis is its centre.
    pub view_width: f64,
    pub mirrored: bool,
    pub matrix: Affine,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            post_scale_width_offset: 0.0,
            post_scale_height_offset: 0.0,
            view_width: 0.0,
            mirrored: false,
            matrix: Affine::IDENTITY,
        }
    }
}

impl TransformState {
    /// Scale a length from image pixels to view pixels.
    #[must_use]
    pub fn scale(&self, image_px: f64) -> f64 {
        image_px * self.scale_factor
    }

    /// Map an image x coordinate into the view, flipping when mirrored.
    #[must_use]
    pub fn translate_x(&self, x: f64) -> f64 {
        let cropped = self.scale(x) - self.post_scale_width_offset;
        if self.mirrored { self.view_width - cropped } else { cropped }
    }

    /// Map an image y coordinate into the view.
    #[must_use]
    pub fn translate_y(&self, y: f64) -> f64 {
        self.scale(y) - self.post_scale_height_offset
    }

    #[must_use]
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(self.translate_x(p.x), self.translate_y(p.y))
    }

    /// Map an image rectangle into the view.
    ///
    /// Mirroring swaps the horizontal edges; the result is re-ordered so that
    /// `left <= right` still holds.
    #[must_use]
    pub fn map_rect(&self, rect: Rect) -> Rect {
        let x0 = self.translate_x(rect.left);
        let x1 = self.translate_x(rect.right);
        Rect {
            left: x0.min(x1),
            top: self.translate_y(rect.top),
            right: x0.max(x1),
            bottom: self.translate_y(rect.bottom),
        }
    }
}

/// Compute the crop-to-fill transform for `image` shown in `viewport`.
///
/// Returns `None` when the viewport has zero area; the caller keeps its
/// cached state and retries on a later repaint.
#[must_use]
pub fn recompute(image: ImageSourceInfo, viewport: Viewport) -> Option<TransformState> {
    if viewport.is_empty() {
        return None;
    }

    let view_w = f64::from(viewport.width);
    let view_h = f64::from(viewport.height);
    let image_w = f64::from(image.width);
    let image_h = f64::from(image.height);

    let view_aspect = view_w / view_h;
    let image_aspect = image.aspect_ratio();

    let (scale_factor, width_offset, height_offset) = if view_aspect > image_aspect {
        // View is relatively wider: crop top and bottom.
        (view_w / image_w, 0.0, (view_w / image_aspect - view_h) / 2.0)
    } else {
        // View is relatively taller: crop left and right.
        (view_h / image_h, (view_h * image_aspect - view_w) / 2.0, 0.0)
    };

    let mut matrix = Affine::scale(scale_factor, scale_factor).then(Affine::translation(-width_offset, -height_offset));
    if image.mirrored {
        matrix = matrix.then(Affine::flip_horizontal(view_w / 2.0));
    }

    Some(TransformState {
        scale_factor,
        post_scale_width_offset: width_offset,
        post_scale_height_offset: height_offset,
        view_width: view_w,
        mirrored: image.mirrored,
        matrix,
    })
}
