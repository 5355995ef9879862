//! Overlay surface: graphic registry, transform staleness, repaint.
//!
//! DESIGN
//! ======
//! Two producers touch a surface. The detection side reports frame geometry
//! and swaps graphics; the render side calls [`OverlaySurface::repaint`] once
//! per frame. Image info, viewport, the cached transform and the graphic list
//! live behind one `Mutex` so a repaint always sees a consistent snapshot.
//!
//! The transform is recomputed lazily: every geometry change sets `stale`,
//! and the next repaint recomputes it before drawing. Graphics receive an
//! [`Overlay`] handle for coordinate conversion; they hold no reference back
//! to the surface.
//!
//! TRADE-OFFS
//! ==========
//! The lock is held for the whole draw pass. Once `remove` returns, the
//! removed graphic is never drawn again, at the cost of blocking producers
//! while graphics draw. Repaint requests are issued after the lock is released.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::OverlayError;
use crate::paint::{PaintError, Painter};
use crate::transform::{self, Affine, ImageSourceInfo, Rect, TransformState, Viewport};

/// A drawable element registered on an [`OverlaySurface`].
///
/// Insertion order is draw order: later graphics paint on top.
pub trait Graphic: Send + Sync {
    /// Draw onto `painter`, converting image coordinates through `overlay`.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError`] if a painter call fails. The surface logs the
    /// error and continues with the next graphic.
    fn draw(&self, painter: &mut dyn Painter, overlay: &Overlay<'_>) -> Result<(), PaintError>;
}

/// Host hook for scheduling an asynchronous repaint.
pub trait RepaintRequester: Send + Sync {
    fn request_repaint(&self);
}

/// Requester that drops every request. Used when the host polls instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRepaint;

impl RepaintRequester for NoRepaint {
    fn request_repaint(&self) {}
}

/// Read-only coordinate services handed to graphics during a repaint.
pub struct Overlay<'a> {
    transform: &'a TransformState,
    image: Option<ImageSourceInfo>,
}

impl<'a> Overlay<'a> {
    /// Build a handle over an explicit transform (for drawing outside a surface).
    #[must_use]
    pub fn new(transform: &'a TransformState, image: Option<ImageSourceInfo>) -> Self {
        Self { transform, image }
    }

    /// Scale a length from image pixels to view pixels.
    #[must_use]
    pub fn scale(&self, image_px: f64) -> f64 {
        self.transform.scale(image_px)
    }

    #[must_use]
    pub fn translate_x(&self, x: f64) -> f64 {
        self.transform.translate_x(x)
    }

    #[must_use]
    pub fn translate_y(&self, y: f64) -> f64 {
        self.transform.translate_y(y)
    }

    /// Map an image rectangle to view space with `left <= right`.
    #[must_use]
    pub fn map_rect(&self, rect: Rect) -> Rect {
        self.transform.map_rect(rect)
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.transform.mirrored
    }

    /// Matrix mapping image coordinates to view coordinates.
    #[must_use]
    pub fn transformation_matrix(&self) -> Affine {
        self.transform.matrix
    }

    /// The full cached transform.
    #[must_use]
    pub fn transform(&self) -> &TransformState {
        self.transform
    }

    /// Image size in pixels, if the host has reported one.
    #[must_use]
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.map(|i| (i.width(), i.height()))
    }
}

/// What a single [`OverlaySurface::repaint`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepaintReport {
    /// The transform was stale and has been recomputed.
    pub recomputed: bool,
    /// Graphics whose `draw` returned `Ok`.
    pub drawn: usize,
    /// Graphics whose `draw` returned an error.
    pub failed: usize,
}

struct SurfaceState {
    image: Option<ImageSourceInfo>,
    viewport: Viewport,
    transform: TransformState,
    stale: bool,
    graphics: Vec<Arc<dyn Graphic>>,
}

impl SurfaceState {
    /// Recompute the transform if image and viewport are both ready.
    fn refresh_transform(&mut self) -> bool {
        let Some(image) = self.image else {
            debug!("overlay: image size unknown, drawing with current transform");
            return false;
        };
        let Some(next) = transform::recompute(image, self.viewport) else {
            debug!(width = self.viewport.width, height = self.viewport.height, "overlay: empty viewport, transform stays stale");
            return false;
        };
        debug!(
            scale = next.scale_factor,
            width_offset = next.post_scale_width_offset,
            height_offset = next.post_scale_height_offset,
            mirrored = next.mirrored,
            "overlay: transform recomputed"
        );
        self.transform = next;
        self.stale = false;
        true
    }
}

/// Thread-safe registry of graphics drawn over a detector's input image.
pub struct OverlaySurface {
    state: Mutex<SurfaceState>,
    repaint: Arc<dyn RepaintRequester>,
}

impl Default for OverlaySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySurface {
    /// Create a surface that ignores repaint requests.
    #[must_use]
    pub fn new() -> Self {
        Self::with_requester(Arc::new(NoRepaint))
    }

    /// Create a surface that forwards repaint requests to `repaint`.
    #[must_use]
    pub fn with_requester(repaint: Arc<dyn RepaintRequester>) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                image: None,
                viewport: Viewport::default(),
                transform: TransformState::default(),
                stale: true,
                graphics: Vec::new(),
            }),
            repaint,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Geometry inputs ---

    /// Replace the detector's input geometry and request a repaint.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidDimension`] if either side is zero. The
    /// surface is left unchanged.
    pub fn set_image_source_info(&self, width: u32, height: u32, mirrored: bool) -> Result<(), OverlayError> {
        self.set_image_source(ImageSourceInfo::new(width, height, mirrored)?);
        Ok(())
    }

    /// Like [`Self::set_image_source_info`] for a camera frame with a rotation.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidRotation`] or
    /// [`OverlayError::InvalidDimension`]. The surface is left unchanged.
    pub fn set_rotated_image_source_info(
        &self,
        frame_width: u32,
        frame_height: u32,
        rotation_degrees: u32,
        mirrored: bool,
    ) -> Result<(), OverlayError> {
        self.set_image_source(ImageSourceInfo::from_rotated_frame(
            frame_width,
            frame_height,
            rotation_degrees,
            mirrored,
        )?);
        Ok(())
    }

    /// Install already-validated source info, mark stale, request a repaint.
    pub fn set_image_source(&self, info: ImageSourceInfo) {
        {
            let mut state = self.lock();
            if state.image != Some(info) {
                debug!(width = info.width(), height = info.height(), mirrored = info.mirrored(), "overlay: image source changed");
            }
            state.image = Some(info);
            state.stale = true;
        }
        self.repaint.request_repaint();
    }

    /// Record a layout change. The next repaint picks it up.
    pub fn on_viewport_resized(&self, width: u32, height: u32) {
        let mut state = self.lock();
        state.viewport = Viewport::new(width, height);
        state.stale = true;
    }

    // --- Graphics ---

    /// Append a graphic. Does not request a repaint.
    pub fn add(&self, graphic: Arc<dyn Graphic>) {
        self.lock().graphics.push(graphic);
    }

    /// Remove `graphic` (matched by identity) and request a repaint.
    ///
    /// Returns whether the graphic was registered.
    pub fn remove(&self, graphic: &Arc<dyn Graphic>) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.graphics.len();
            state.graphics.retain(|g| !Arc::ptr_eq(g, graphic));
            state.graphics.len() != before
        };
        self.repaint.request_repaint();
        removed
    }

    /// Remove every graphic and request a repaint.
    pub fn clear(&self) {
        self.lock().graphics.clear();
        self.repaint.request_repaint();
    }

    /// Swap the whole graphic list in one step and request a repaint.
    ///
    /// A concurrent repaint sees either the old list or the new one.
    pub fn replace_all(&self, graphics: Vec<Arc<dyn Graphic>>) {
        self.lock().graphics = graphics;
        self.repaint.request_repaint();
    }

    /// Ask the host for a repaint (after a batch of [`Self::add`] calls).
    pub fn request_repaint(&self) {
        self.repaint.request_repaint();
    }

    // --- Render ---

    /// Recompute the transform if stale, then draw every graphic in order.
    pub fn repaint(&self, painter: &mut dyn Painter) -> RepaintReport {
        let mut guard = self.lock();
        let mut report = RepaintReport::default();
        if guard.stale {
            report.recomputed = guard.refresh_transform();
        }

        let state = &*guard;
        let overlay = Overlay::new(&state.transform, state.image);
        for (index, graphic) in state.graphics.iter().enumerate() {
            match graphic.draw(painter, &overlay) {
                Ok(()) => report.drawn += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(index, error = %e, "overlay: graphic draw failed");
                }
            }
        }
        report
    }

    // --- Queries ---

    #[must_use]
    pub fn image_source_info(&self) -> Option<ImageSourceInfo> {
        self.lock().image
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    /// Snapshot of the cached transform (may be stale).
    #[must_use]
    pub fn transform(&self) -> TransformState {
        self.lock().transform
    }

    /// Whether the next repaint will try to recompute the transform.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.lock().stale
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().graphics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().graphics.is_empty()
    }
}
