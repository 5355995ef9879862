#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn image(w: u32, h: u32, mirrored: bool) -> ImageSourceInfo {
    ImageSourceInfo::new(w, h, mirrored).unwrap()
}

fn state(iw: u32, ih: u32, vw: u32, vh: u32, mirrored: bool) -> TransformState {
    recompute(image(iw, ih, mirrored), Viewport::new(vw, vh)).unwrap()
}

// --- ImageSourceInfo ---

#[test]
fn image_source_info_rejects_zero_width() {
    assert_eq!(
        ImageSourceInfo::new(0, 480, false),
        Err(OverlayError::InvalidDimension { width: 0, height: 480 })
    );
}

#[test]
fn image_source_info_rejects_zero_height() {
    assert_eq!(
        ImageSourceInfo::new(640, 0, true),
        Err(OverlayError::InvalidDimension { width: 640, height: 0 })
    );
}

#[test]
fn image_source_info_keeps_fields() {
    let info = image(640, 480, true);
    assert_eq!(info.width(), 640);
    assert_eq!(info.height(), 480);
    assert!(info.mirrored());
    assert!(approx_eq(info.aspect_ratio(), 640.0 / 480.0));
}

#[test]
fn rotated_frame_upright_keeps_dimensions() {
    let info = ImageSourceInfo::from_rotated_frame(1280, 720, 180, false).unwrap();
    assert_eq!((info.width(), info.height()), (1280, 720));
}

#[test]
fn rotated_frame_quarter_turn_swaps_dimensions() {
    let info = ImageSourceInfo::from_rotated_frame(1280, 720, 90, true).unwrap();
    assert_eq!((info.width(), info.height()), (720, 1280));
    assert!(info.mirrored());

    let info = ImageSourceInfo::from_rotated_frame(1280, 720, 270, false).unwrap();
    assert_eq!((info.width(), info.height()), (720, 1280));
}

#[test]
fn rotated_frame_rejects_odd_rotation() {
    assert_eq!(
        ImageSourceInfo::from_rotated_frame(1280, 720, 45, false),
        Err(OverlayError::InvalidRotation(45))
    );
    assert_eq!(
        ImageSourceInfo::from_rotated_frame(1280, 720, 360, false),
        Err(OverlayError::InvalidRotation(360))
    );
}

#[test]
fn rotated_frame_still_validates_dimensions() {
    assert_eq!(
        ImageSourceInfo::from_rotated_frame(0, 720, 90, false),
        Err(OverlayError::InvalidDimension { width: 720, height: 0 })
    );
}

// --- Viewport ---

#[test]
fn viewport_default_is_empty() {
    assert!(Viewport::default().is_empty());
}

#[test]
fn viewport_with_one_zero_side_is_empty() {
    assert!(Viewport::new(1080, 0).is_empty());
    assert!(Viewport::new(0, 1920).is_empty());
    assert!(!Viewport::new(1, 1).is_empty());
}

// --- Affine ---

#[test]
fn affine_identity_leaves_point() {
    let p = Point::new(12.5, -3.0);
    assert!(point_approx_eq(Affine::IDENTITY.apply(p), p));
    assert_eq!(Affine::default(), Affine::IDENTITY);
}

#[test]
fn affine_then_applies_in_order() {
    // Scale first, translate second: (2, 3) -> (4, 6) -> (14, 26).
    let m = Affine::scale(2.0, 2.0).then(Affine::translation(10.0, 20.0));
    assert!(point_approx_eq(m.apply(Point::new(2.0, 3.0)), Point::new(14.0, 26.0)));

    // Translate first, scale second: (2, 3) -> (12, 23) -> (24, 46).
    let m = Affine::translation(10.0, 20.0).then(Affine::scale(2.0, 2.0));
    assert!(point_approx_eq(m.apply(Point::new(2.0, 3.0)), Point::new(24.0, 46.0)));
}

#[test]
fn affine_flip_horizontal_reflects_about_axis() {
    let flip = Affine::flip_horizontal(320.0);
    assert!(point_approx_eq(flip.apply(Point::new(100.0, 7.0)), Point::new(540.0, 7.0)));
    assert!(point_approx_eq(flip.apply(Point::new(320.0, 0.0)), Point::new(320.0, 0.0)));
}

#[test]
fn affine_to_array_order() {
    let m = Affine { a: 1.0, b: 2.0, c: 3.0, d: 4.0, e: 5.0, f: 6.0 };
    assert_eq!(m.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

// --- recompute ---

#[test]
fn recompute_skips_empty_viewport() {
    assert!(recompute(image(640, 480, false), Viewport::new(0, 480)).is_none());
    assert!(recompute(image(640, 480, false), Viewport::default()).is_none());
}

#[test]
fn recompute_portrait_view_crops_horizontally() {
    let t = state(1280, 720, 1080, 1920, false);
    assert!(approx_eq(t.scale_factor, 1920.0 / 720.0));
    assert!(approx_eq(t.post_scale_width_offset, 3500.0 / 3.0));
    assert_eq!(t.post_scale_height_offset, 0.0);
    assert!(!t.mirrored);
}

#[test]
fn recompute_wide_view_crops_vertically() {
    // 4:3 image in a 16:9 view: scale to width, crop top and bottom.
    let t = state(640, 480, 1920, 1080, false);
    assert!(approx_eq(t.scale_factor, 3.0));
    assert_eq!(t.post_scale_width_offset, 0.0);
    assert!(approx_eq(t.post_scale_height_offset, (1440.0 - 1080.0) / 2.0));
}

#[test]
fn recompute_matching_aspect_has_no_crop() {
    let t = state(640, 480, 1280, 960, false);
    assert!(approx_eq(t.scale_factor, 2.0));
    assert!(approx_eq(t.post_scale_width_offset, 0.0));
    assert!(approx_eq(t.post_scale_height_offset, 0.0));
}

#[test]
fn recompute_covers_viewport_without_gaps() {
    let cases = [
        (1280, 720, 1080, 1920),
        (720, 1280, 1080, 1920),
        (640, 480, 1920, 1080),
        (480, 640, 300, 300),
        (1, 1000, 1000, 1),
        (1000, 1, 1, 1000),
        (333, 777, 1024, 768),
    ];
    for (iw, ih, vw, vh) in cases {
        let t = state(iw, ih, vw, vh, false);
        let scaled_w = f64::from(iw) * t.scale_factor;
        let scaled_h = f64::from(ih) * t.scale_factor;
        assert!(scaled_w + EPSILON >= f64::from(vw), "{iw}x{ih} in {vw}x{vh}: width gap");
        assert!(scaled_h + EPSILON >= f64::from(vh), "{iw}x{ih} in {vw}x{vh}: height gap");

        let zero_axes = [t.post_scale_width_offset, t.post_scale_height_offset]
            .iter()
            .filter(|o| **o == 0.0)
            .count();
        assert!(zero_axes >= 1, "{iw}x{ih} in {vw}x{vh}: both axes cropped");
        assert!(t.post_scale_width_offset >= -EPSILON);
        assert!(t.post_scale_height_offset >= -EPSILON);

        // The crop is symmetric: scaled size minus both offsets is the view size.
        assert!((scaled_h - 2.0 * t.post_scale_height_offset - f64::from(vh)).abs() < 1e-6);
        assert!((scaled_w - 2.0 * t.post_scale_width_offset - f64::from(vw)).abs() < 1e-6);
    }
}

#[test]
fn recompute_is_deterministic() {
    let a = state(1280, 720, 1080, 1920, true);
    let b = state(1280, 720, 1080, 1920, true);
    assert_eq!(a, b);
}

// --- conversion helpers ---

#[test]
fn default_state_is_identity() {
    let t = TransformState::default();
    assert_eq!(t.scale(10.0), 10.0);
    assert_eq!(t.translate_x(10.0), 10.0);
    assert_eq!(t.translate_y(10.0), 10.0);
    assert_eq!(t.matrix, Affine::IDENTITY);
}

#[test]
fn same_size_mirrored_point() {
    let t = state(640, 480, 640, 480, true);
    assert!(approx_eq(t.scale(100.0), 100.0));
    assert!(approx_eq(t.translate_x(100.0), 540.0));
    assert!(approx_eq(t.translate_y(50.0), 50.0));
}

#[test]
fn translate_applies_crop_offsets() {
    let t = state(1280, 720, 1080, 1920, false);
    let s = 1920.0 / 720.0;
    assert!(approx_eq(t.translate_x(640.0), 640.0 * s - 3500.0 / 3.0));
    assert!(approx_eq(t.translate_y(360.0), 960.0));
}

#[test]
fn image_centre_maps_to_view_centre() {
    for mirrored in [false, true] {
        let t = state(1280, 720, 1080, 1920, mirrored);
        let c = t.map_point(Point::new(640.0, 360.0));
        assert!(point_approx_eq(c, Point::new(540.0, 960.0)), "mirrored={mirrored}: {c:?}");
    }
}

#[test]
fn mirrored_translate_reflects_about_view_centre() {
    let cases = [(1280, 720, 1080, 1920), (640, 480, 1920, 1080), (640, 480, 640, 480)];
    for (iw, ih, vw, vh) in cases {
        let t = state(iw, ih, vw, vh, true);
        for x in [0.0, 13.0, 100.0, f64::from(iw) / 3.0] {
            let a = t.translate_x(x);
            let b = t.translate_x(f64::from(iw) - x);
            assert!(approx_eq(a + b, f64::from(vw)), "{iw}x{ih} in {vw}x{vh}, x={x}: {a} + {b}");
        }
    }
}

#[test]
fn matrix_agrees_with_helpers() {
    for mirrored in [false, true] {
        let t = state(1280, 720, 1080, 1920, mirrored);
        for p in [Point::new(0.0, 0.0), Point::new(100.0, 50.0), Point::new(1280.0, 720.0)] {
            assert!(point_approx_eq(t.matrix.apply(p), t.map_point(p)), "mirrored={mirrored}, p={p:?}");
        }
    }
}

#[test]
fn map_rect_keeps_left_of_right_when_mirrored() {
    let t = state(640, 480, 640, 480, true);
    let r = t.map_rect(Rect::new(100.0, 50.0, 200.0, 150.0));
    assert!(approx_eq(r.left, 440.0));
    assert!(approx_eq(r.right, 540.0));
    assert!(approx_eq(r.top, 50.0));
    assert!(approx_eq(r.bottom, 150.0));
    assert!(approx_eq(r.width(), 100.0));
}

#[test]
fn map_rect_scales_size() {
    let t = state(640, 480, 1280, 960, false);
    let r = t.map_rect(Rect::new(10.0, 20.0, 30.0, 60.0));
    assert!(approx_eq(r.width(), 40.0));
    assert!(approx_eq(r.height(), 80.0));
}
