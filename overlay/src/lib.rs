//! Detection overlay: maps image-space detection results onto a display surface.
//!
//! Detection results arrive in the coordinate space of the frame the detector
//! saw. The display surface is usually a different size, a different aspect
//! ratio, and (for a front-facing camera) mirrored. This crate owns the
//! crop-to-fill transform between the two spaces and the thread-safe list of
//! graphics drawn with it. The host is responsible only for reporting frame
//! and layout geometry, registering graphics, and calling
//! [`surface::OverlaySurface::repaint`] once per rendered frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | Crop-to-fill scale, crop offsets, affine matrix, coordinate helpers |
//! | [`surface`] | Graphic registry, staleness tracking, repaint orchestration |
//! | [`paint`] | Painter trait (host canvas seam) and the recording painter |
//! | [`detection`] | Detected-object model and the graphic that draws it |
//! | [`consts`] | Shared numeric constants (text size, stroke width, palette size) |

pub mod consts;
pub mod detection;
pub mod paint;
pub mod surface;
pub mod transform;

pub use surface::{Graphic, Overlay, OverlaySurface, RepaintReport, RepaintRequester};
pub use transform::{Affine, ImageSourceInfo, Point, Rect, TransformState, Viewport};

/// Error returned when the host reports unusable frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// Image width or height was zero.
    #[error("invalid image dimensions {width}x{height}: both sides must be positive")]
    InvalidDimension { width: u32, height: u32 },
    /// Frame rotation was not a multiple of 90 degrees in `0..360`.
    #[error("unsupported frame rotation {0} degrees (expected 0, 90, 180 or 270)")]
    InvalidRotation(u32),
}
