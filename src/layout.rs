//! Scale-to-fit layout engine.
//!
//! Fits a device frame (bezel plus class chrome) into an available viewport
//! with a single uniform scale factor. The frame never grows past its true
//! size and never shrinks below the configured floor; on tiny viewports it
//! overflows instead of vanishing.
//!
//! Everything here is pure: identical inputs give bit-identical outputs.

use serde::{Deserialize, Serialize};

use crate::device::DeviceSpec;

/// Space the frame must fit into, already net of toolbars and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub available_width: f64,
    pub available_height: f64,
}

impl Viewport {
    pub const fn new(available_width: f64, available_height: f64) -> Self {
        Self {
            available_width,
            available_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Portrait => Orientation::Landscape,
            Orientation::Landscape => Orientation::Portrait,
        }
    }
}

/// Whether the bezel and class chrome are part of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameMode {
    #[default]
    Bezeled,
    ScreenOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub scale: f64,
    /// Unscaled frame width, after any orientation swap.
    pub frame_width: f64,
    /// Unscaled frame height, after any orientation swap.
    pub frame_height: f64,
    pub is_landscape_swapped: bool,
}

impl LayoutResult {
    pub fn rendered_width(&self) -> f64 {
        self.frame_width * self.scale
    }

    pub fn rendered_height(&self) -> f64 {
        self.frame_height * self.scale
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.frame_width / self.frame_height
    }
}

/// Fit the full bezeled frame of `spec` into `viewport`.
pub fn compute_layout(
    spec: &DeviceSpec,
    viewport: Viewport,
    orientation: Orientation,
    min_scale: f64,
) -> LayoutResult {
    compute_layout_with(spec, viewport, orientation, FrameMode::Bezeled, min_scale)
}

/// General form of [`compute_layout`]. `FrameMode::ScreenOnly` treats bezel
/// and chrome as zero; swap and fit rules are unchanged.
///
/// `min_scale` must lie in `(0, 1]`.
pub fn compute_layout_with(
    spec: &DeviceSpec,
    viewport: Viewport,
    orientation: Orientation,
    mode: FrameMode,
    min_scale: f64,
) -> LayoutResult {
    debug_assert!(
        spec.logical_width > 0.0 && spec.logical_height > 0.0,
        "device logical size must be positive"
    );
    debug_assert!(
        min_scale > 0.0 && min_scale <= 1.0,
        "min_scale must lie in (0, 1], got {min_scale}"
    );

    let (bezel, chrome) = match mode {
        FrameMode::Bezeled => (spec.bezel_thickness, spec.class.chrome_height()),
        FrameMode::ScreenOnly => (0.0, 0.0),
    };

    let mut width = spec.logical_width + 2.0 * bezel;
    let mut height = spec.logical_height + 2.0 * bezel + chrome;

    let swapped = orientation == Orientation::Landscape && spec.class.rotates();
    if swapped {
        std::mem::swap(&mut width, &mut height);
    }

    let by_height = viewport.available_height / height;
    let by_width = viewport.available_width / width;

    LayoutResult {
        scale: clamp_scale(by_height.min(by_width), min_scale),
        frame_width: width,
        frame_height: height,
        is_landscape_swapped: swapped,
    }
}

// `f64::min`/`max` return the non-NaN operand, so a NaN candidate lands on a
// bound instead of propagating.
fn clamp_scale(raw: f64, min_scale: f64) -> f64 {
    raw.min(1.0).max(min_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;

    const MIN: f64 = 0.1;

    fn phone() -> DeviceSpec {
        DeviceSpec::new(DeviceClass::Phone, 393.0, 852.0, 3.0, 12.0)
    }

    fn laptop() -> DeviceSpec {
        DeviceSpec::new(DeviceClass::Desktop, 1280.0, 832.0, 2.0, 16.0)
    }

    fn watch() -> DeviceSpec {
        DeviceSpec::new(DeviceClass::Watch, 198.0, 242.0, 2.0, 10.0)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn roomy_viewport_caps_at_true_size() {
        let r = compute_layout(&phone(), Viewport::new(500.0, 900.0), Orientation::Portrait, MIN);
        assert_eq!(r.frame_width, 417.0);
        assert_eq!(r.frame_height, 876.0);
        assert_eq!(r.scale, 1.0);
        assert!(!r.is_landscape_swapped);
    }

    #[test]
    fn height_bound_portrait() {
        let r = compute_layout(&phone(), Viewport::new(300.0, 500.0), Orientation::Portrait, MIN);
        assert_eq!((r.frame_width, r.frame_height), (417.0, 876.0));
        assert!(close(r.scale, 500.0 / 876.0));
        assert!((r.scale - 0.571).abs() < 1e-3);
    }

    #[test]
    fn landscape_swaps_phone() {
        let r = compute_layout(&phone(), Viewport::new(900.0, 400.0), Orientation::Landscape, MIN);
        assert_eq!((r.frame_width, r.frame_height), (876.0, 417.0));
        assert!(r.is_landscape_swapped);
        assert!(close(r.scale, 400.0 / 417.0));
        assert!((r.scale - 0.959).abs() < 1e-3);
    }

    #[test]
    fn degenerate_viewport_hits_floor() {
        let r = compute_layout(&phone(), Viewport::new(10.0, 10.0), Orientation::Portrait, MIN);
        assert_eq!(r.scale, MIN);
        // Overflows the 10x10 viewport by design.
        assert!(r.rendered_width() > 10.0);
    }

    #[test]
    fn desktop_never_swaps_and_keeps_chrome() {
        let spec = laptop();
        let viewport = Viewport::new(1000.0, 800.0);
        let portrait = compute_layout(&spec, viewport, Orientation::Portrait, MIN);
        let landscape = compute_layout(&spec, viewport, Orientation::Landscape, MIN);
        assert!(!landscape.is_landscape_swapped);
        assert_eq!(landscape.frame_width, 1280.0 + 32.0);
        assert_eq!(landscape.frame_height, 832.0 + 32.0 + 30.0);
        assert_eq!(portrait, landscape);
    }

    #[test]
    fn watch_adds_bands_and_never_swaps() {
        let r = compute_layout(&watch(), Viewport::new(1000.0, 1000.0), Orientation::Landscape, MIN);
        assert!(!r.is_landscape_swapped);
        assert_eq!(r.frame_width, 218.0);
        assert_eq!(r.frame_height, 262.0 + 80.0);
        assert_eq!(r.scale, 1.0);
    }

    #[test]
    fn zero_and_negative_space_clamp_to_floor() {
        for viewport in [
            Viewport::new(0.0, 0.0),
            Viewport::new(-50.0, 400.0),
            Viewport::new(400.0, -1.0),
        ] {
            let r = compute_layout(&phone(), viewport, Orientation::Portrait, 0.3);
            assert_eq!(r.scale, 0.3, "viewport {viewport:?}");
        }
    }

    #[test]
    fn non_finite_viewport_stays_bounded() {
        let r = compute_layout(
            &phone(),
            Viewport::new(f64::NAN, f64::NAN),
            Orientation::Portrait,
            MIN,
        );
        assert!(r.scale.is_finite());
        assert!((MIN..=1.0).contains(&r.scale));

        let r = compute_layout(
            &phone(),
            Viewport::new(f64::INFINITY, f64::INFINITY),
            Orientation::Portrait,
            MIN,
        );
        assert_eq!(r.scale, 1.0);
    }

    #[test]
    fn screen_only_drops_bezel_and_chrome() {
        let viewport = Viewport::new(5000.0, 5000.0);
        let r = compute_layout_with(&phone(), viewport, Orientation::Portrait, FrameMode::ScreenOnly, MIN);
        assert_eq!((r.frame_width, r.frame_height), (393.0, 852.0));

        let r = compute_layout_with(&phone(), viewport, Orientation::Landscape, FrameMode::ScreenOnly, MIN);
        assert_eq!((r.frame_width, r.frame_height), (852.0, 393.0));
        assert!(r.is_landscape_swapped);

        let r = compute_layout_with(&laptop(), viewport, Orientation::Landscape, FrameMode::ScreenOnly, MIN);
        assert_eq!((r.frame_width, r.frame_height), (1280.0, 832.0));
        assert!(!r.is_landscape_swapped);
    }

    #[test]
    fn screen_only_equals_zero_bezel_phone() {
        let mut bare = phone();
        bare.bezel_thickness = 0.0;
        let viewport = Viewport::new(320.0, 480.0);
        let a = compute_layout_with(&phone(), viewport, Orientation::Portrait, FrameMode::ScreenOnly, MIN);
        let b = compute_layout(&bare, viewport, Orientation::Portrait, MIN);
        assert_eq!(a, b);
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let viewport = Viewport::new(333.3, 777.7);
        let a = compute_layout(&phone(), viewport, Orientation::Landscape, 0.2);
        let b = compute_layout(&phone(), viewport, Orientation::Landscape, 0.2);
        assert_eq!(a.scale.to_bits(), b.scale.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn rendered_box_preserves_aspect() {
        let r = compute_layout(&phone(), Viewport::new(300.0, 500.0), Orientation::Portrait, MIN);
        let rendered = r.rendered_width() / r.rendered_height();
        assert!(close(rendered, r.aspect_ratio()));
        assert!(close(r.aspect_ratio(), 417.0 / 876.0));
    }

    #[test]
    fn orientation_toggle() {
        assert_eq!(Orientation::Portrait.toggled(), Orientation::Landscape);
        assert_eq!(Orientation::Landscape.toggled(), Orientation::Portrait);
    }
}
