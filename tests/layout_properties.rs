//! Layout engine properties checked across every built-in device.
//!
//! Each property runs over the full catalog, both orientations, both frame
//! modes and a grid of viewport sizes from degenerate to oversized.

use bezel_preview::{
    Catalog, DeviceClass, DeviceSpec, FrameMode, LayoutResult, Orientation, Viewport,
    compute_layout, compute_layout_with,
};

const MIN_SCALES: [f64; 3] = [0.1, 0.3, 1.0];
const ORIENTATIONS: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];
const MODES: [FrameMode; 2] = [FrameMode::Bezeled, FrameMode::ScreenOnly];

fn viewports() -> Vec<Viewport> {
    let sides = [1.0, 10.0, 120.0, 333.0, 640.0, 900.0, 1440.0, 2560.0, 8000.0];
    let mut out = Vec::new();
    for w in sides {
        for h in sides {
            out.push(Viewport::new(w, h));
        }
    }
    out
}

fn each_case(mut check: impl FnMut(&str, &DeviceSpec, Viewport, Orientation, FrameMode, f64)) {
    for (id, spec) in Catalog::builtin().all() {
        for viewport in viewports() {
            for orientation in ORIENTATIONS {
                for mode in MODES {
                    for min_scale in MIN_SCALES {
                        check(id, spec, viewport, orientation, mode, min_scale);
                    }
                }
            }
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Unswapped frame size for `mode`.
fn natural_frame(spec: &DeviceSpec, mode: FrameMode) -> (f64, f64) {
    match mode {
        FrameMode::Bezeled => (
            spec.logical_width + 2.0 * spec.bezel_thickness,
            spec.logical_height + 2.0 * spec.bezel_thickness + spec.class.chrome_height(),
        ),
        FrameMode::ScreenOnly => (spec.logical_width, spec.logical_height),
    }
}

#[test]
fn scale_stays_within_floor_and_ceiling() {
    each_case(|id, spec, viewport, orientation, mode, min_scale| {
        let r = compute_layout_with(spec, viewport, orientation, mode, min_scale);
        assert!(
            r.scale >= min_scale && r.scale <= 1.0,
            "{id} {viewport:?} {orientation:?} {mode:?}: scale {} outside [{min_scale}, 1]",
            r.scale
        );
    });
}

#[test]
fn repeated_calls_are_bit_identical() {
    each_case(|_, spec, viewport, orientation, mode, min_scale| {
        let a = compute_layout_with(spec, viewport, orientation, mode, min_scale);
        let b = compute_layout_with(spec, viewport, orientation, mode, min_scale);
        assert_eq!(a.scale.to_bits(), b.scale.to_bits());
        assert_eq!(a.frame_width.to_bits(), b.frame_width.to_bits());
        assert_eq!(a.frame_height.to_bits(), b.frame_height.to_bits());
        assert_eq!(a.is_landscape_swapped, b.is_landscape_swapped);
    });
}

#[test]
fn frame_dimensions_follow_swap_rule() {
    each_case(|id, spec, viewport, orientation, mode, min_scale| {
        let r = compute_layout_with(spec, viewport, orientation, mode, min_scale);
        let (w, h) = natural_frame(spec, mode);
        let should_swap = orientation == Orientation::Landscape && spec.class.rotates();
        assert_eq!(r.is_landscape_swapped, should_swap, "{id}");
        let expected = if should_swap { (h, w) } else { (w, h) };
        assert_eq!((r.frame_width, r.frame_height), expected, "{id}");
    });
}

#[test]
fn rendered_box_preserves_aspect_ratio() {
    each_case(|id, spec, viewport, orientation, mode, min_scale| {
        let r = compute_layout_with(spec, viewport, orientation, mode, min_scale);
        let rendered = r.rendered_width() / r.rendered_height();
        assert!(close(rendered, r.aspect_ratio()), "{id}: {rendered} vs {}", r.aspect_ratio());
    });
}

#[test]
fn fixed_orientation_classes_ignore_landscape() {
    for (id, spec) in Catalog::builtin().all() {
        if !matches!(spec.class, DeviceClass::Desktop | DeviceClass::Watch) {
            continue;
        }
        for viewport in viewports() {
            let portrait = compute_layout(spec, viewport, Orientation::Portrait, 0.1);
            let landscape = compute_layout(spec, viewport, Orientation::Landscape, 0.1);
            assert_eq!(portrait, landscape, "{id} rotated");
        }
    }
}

#[test]
fn growing_the_binding_axis_never_shrinks_scale() {
    for (id, spec) in Catalog::builtin().all() {
        for orientation in ORIENTATIONS {
            let mut previous: Option<LayoutResult> = None;
            for step in 1..=60 {
                let h = step as f64 * 40.0;
                let r = compute_layout(spec, Viewport::new(100_000.0, h), orientation, 0.1);
                if let Some(prev) = previous {
                    assert!(r.scale >= prev.scale, "{id}: height {h} lowered scale");
                }
                previous = Some(r);
            }

            let mut previous: Option<LayoutResult> = None;
            for step in 1..=60 {
                let w = step as f64 * 40.0;
                let r = compute_layout(spec, Viewport::new(w, 100_000.0), orientation, 0.1);
                if let Some(prev) = previous {
                    assert!(r.scale >= prev.scale, "{id}: width {w} lowered scale");
                }
                previous = Some(r);
            }
        }
    }
}

#[test]
fn oversized_viewport_renders_true_size() {
    for (id, spec) in Catalog::builtin().all() {
        let r = compute_layout(spec, Viewport::new(1e6, 1e6), Orientation::Portrait, 0.1);
        assert_eq!(r.scale, 1.0, "{id}");
        assert_eq!(r.rendered_width(), r.frame_width);
    }
}

// ---------------------------------------------------------------------------
// Worked scenarios with the 393x852 / bezel 12 phone
// ---------------------------------------------------------------------------

fn iphone() -> &'static DeviceSpec {
    Catalog::builtin().get("iphone-15-pro").unwrap()
}

#[test]
fn scenario_roomy_viewport() {
    let r = compute_layout(iphone(), Viewport::new(500.0, 900.0), Orientation::Portrait, 0.1);
    assert_eq!((r.frame_width, r.frame_height), (417.0, 876.0));
    assert_eq!(r.scale, 1.0);
}

#[test]
fn scenario_height_bound() {
    let r = compute_layout(iphone(), Viewport::new(300.0, 500.0), Orientation::Portrait, 0.1);
    assert_eq!((r.frame_width, r.frame_height), (417.0, 876.0));
    assert!((r.scale - 500.0 / 876.0).abs() < 1e-12);
}

#[test]
fn scenario_landscape() {
    let r = compute_layout(iphone(), Viewport::new(900.0, 400.0), Orientation::Landscape, 0.1);
    assert_eq!((r.frame_width, r.frame_height), (876.0, 417.0));
    assert!(r.is_landscape_swapped);
    assert!((r.scale - 400.0 / 417.0).abs() < 1e-12);
}

#[test]
fn scenario_degenerate_viewport() {
    let r = compute_layout(iphone(), Viewport::new(10.0, 10.0), Orientation::Portrait, 0.1);
    assert_eq!(r.scale, 0.1);
}

#[test]
fn scenario_desktop_landscape_request() {
    let spec = Catalog::builtin().get("macbook-air").unwrap();
    let r = compute_layout(spec, Viewport::new(2000.0, 2000.0), Orientation::Landscape, 0.1);
    assert!(!r.is_landscape_swapped);
    assert_eq!(r.frame_height, spec.logical_height + 2.0 * spec.bezel_thickness + 30.0);
}
