//! Frame rendering using vello.
//!
//! Draws a simplified device frame from a `PreviewGeometry`: body, screen,
//! class chrome (laptop hinge and base, watch bands), notch and home
//! indicator, plus the toggle bar and label strip. All frame parts are laid
//! out in unscaled frame units and placed with a single affine transform, so
//! the drawing can never disagree with the layout engine about proportions.

use vello::Scene;
use vello::kurbo::{Affine, Rect, RoundedRect, Stroke, Vec2};
use vello::peniko::{Color, Fill};

use crate::device::{DESKTOP_HINGE_HEIGHT, DeviceClass, DeviceSpec, WATCH_BAND_HEIGHT};
use crate::layout::{FrameMode, LayoutResult, Orientation};
use crate::preview::{PreviewGeometry, Selection};

pub const BG_COLOR: Color = Color::new([0.93, 0.93, 0.95, 1.0]);
const TOOLBAR_BG: Color = Color::new([1.0, 1.0, 1.0, 0.85]);
const TOGGLE_OFF: Color = Color::new([0.80, 0.80, 0.84, 1.0]);
const TOGGLE_ON: Color = Color::new([0.22, 0.46, 0.72, 1.0]);
const BODY_COLOR: Color = Color::new([0.12, 0.12, 0.13, 1.0]);
const BODY_EDGE: Color = Color::new([0.35, 0.35, 0.38, 1.0]);
const CHROME_COLOR: Color = Color::new([0.72, 0.73, 0.76, 1.0]);
const HINGE_COLOR: Color = Color::new([0.45, 0.46, 0.49, 1.0]);
const BAND_COLOR: Color = Color::new([0.25, 0.27, 0.30, 1.0]);
const SCREEN_COLOR: Color = Color::new([0.98, 0.98, 1.0, 1.0]);
const GRID_COLOR: Color = Color::new([0.0, 0.0, 0.0, 0.08]);
const INDICATOR_COLOR: Color = Color::new([0.0, 0.0, 0.0, 0.6]);
const LABEL_COLOR: Color = Color::new([0.0, 0.0, 0.0, 0.25]);

/// Logical-unit spacing of the grid drawn over the screen area.
const GRID_STEP: f64 = 100.0;
const TOGGLE_SIZE: f64 = 24.0;
const TOGGLE_GAP: f64 = 12.0;
const HOME_INDICATOR_HEIGHT: f64 = 5.0;

/// Frame parts in unscaled frame coordinates (origin at the frame's top-left).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParts {
    pub body: Option<RoundedRect>,
    pub screen: Rect,
    /// Hinge, base or band strips.
    pub chrome: Vec<(Rect, Color)>,
    pub notch: Option<RoundedRect>,
    pub home_indicator: Option<RoundedRect>,
}

pub fn frame_parts(spec: &DeviceSpec, layout: &LayoutResult, mode: FrameMode) -> FrameParts {
    let (w, h) = (layout.frame_width, layout.frame_height);

    if mode == FrameMode::ScreenOnly {
        return FrameParts {
            body: None,
            screen: Rect::new(0.0, 0.0, w, h),
            chrome: Vec::new(),
            notch: None,
            home_indicator: None,
        };
    }

    let b = spec.bezel_thickness;
    let (body, chrome) = match spec.class {
        DeviceClass::Phone | DeviceClass::Tablet => {
            let radius = if spec.is_samsung_style { b * 1.5 } else { b * 3.0 };
            (RoundedRect::new(0.0, 0.0, w, h, radius), Vec::new())
        }
        DeviceClass::Desktop => {
            let lid_h = spec.logical_height + 2.0 * b;
            let hinge_y = lid_h + DESKTOP_HINGE_HEIGHT;
            let chrome = vec![
                (Rect::new(w * 0.3, lid_h, w * 0.7, hinge_y), HINGE_COLOR),
                (Rect::new(0.0, hinge_y, w, h), CHROME_COLOR),
            ];
            (RoundedRect::new(0.0, 0.0, w, lid_h, b), chrome)
        }
        DeviceClass::Watch => {
            let case_bottom = h - WATCH_BAND_HEIGHT;
            let chrome = vec![
                (Rect::new(w * 0.2, 0.0, w * 0.8, WATCH_BAND_HEIGHT), BAND_COLOR),
                (Rect::new(w * 0.2, case_bottom, w * 0.8, h), BAND_COLOR),
            ];
            (
                RoundedRect::new(0.0, WATCH_BAND_HEIGHT, w, case_bottom, b * 4.0),
                chrome,
            )
        }
    };

    let outer = body.rect();
    let screen = outer.inset(-b);

    // Notch sits on the top edge in portrait and moves to the left edge when
    // the frame is rotated.
    let notch = spec.has_notch.then(|| {
        let depth = (b * 1.5).max(6.0);
        if layout.is_landscape_swapped {
            let len = screen.height() * 0.3;
            let y0 = screen.center().y - len / 2.0;
            RoundedRect::new(screen.x0, y0, screen.x0 + depth, y0 + len, depth / 2.0)
        } else {
            let len = screen.width() * 0.3;
            let x0 = screen.center().x - len / 2.0;
            RoundedRect::new(x0, screen.y0, x0 + len, screen.y0 + depth, depth / 2.0)
        }
    });

    let home_indicator = spec.has_home_indicator.then(|| {
        let len = screen.width() * 0.35;
        let x0 = screen.center().x - len / 2.0;
        let y1 = screen.y1 - 8.0;
        RoundedRect::new(
            x0,
            y1 - HOME_INDICATOR_HEIGHT,
            x0 + len,
            y1,
            HOME_INDICATOR_HEIGHT / 2.0,
        )
    });

    FrameParts {
        body: Some(body),
        screen,
        chrome,
        notch,
        home_indicator,
    }
}

/// Draw the full preview. `root` maps window logical px to surface pixels.
pub fn render_preview(
    scene: &mut Scene,
    root: Affine,
    width: f64,
    height: f64,
    geometry: &PreviewGeometry,
) {
    let bg_rect = Rect::new(0.0, 0.0, width, height);
    scene.fill(Fill::NonZero, root, BG_COLOR, None, &bg_rect);

    draw_toolbar(scene, root, geometry);
    draw_frame(scene, root, geometry);

    let label = geometry.label;
    let pill_w = (label.width() * 0.4).min(160.0);
    let pill = RoundedRect::new(
        label.center().x - pill_w / 2.0,
        label.y0 + label.height() * 0.3,
        label.center().x + pill_w / 2.0,
        label.y1 - label.height() * 0.3,
        4.0,
    );
    scene.fill(Fill::NonZero, root, LABEL_COLOR, None, &pill);
}

/// Landscape and screen-only toggle states, left to right.
pub fn toolbar_toggles(target: &Selection) -> [bool; 2] {
    [
        target.orientation == Orientation::Landscape,
        target.mode == FrameMode::ScreenOnly,
    ]
}

fn draw_toolbar(scene: &mut Scene, root: Affine, geometry: &PreviewGeometry) {
    let bar = geometry.toolbar;
    if bar.height() <= 0.0 {
        return;
    }
    scene.fill(
        Fill::NonZero,
        root,
        TOOLBAR_BG,
        None,
        &RoundedRect::from_rect(bar, 8.0),
    );

    let size = TOGGLE_SIZE.min(bar.height() - 8.0).max(0.0);
    let y0 = bar.center().y - size / 2.0;
    let mut x0 = bar.x0 + TOGGLE_GAP;
    for on in toolbar_toggles(&geometry.target) {
        let toggle = RoundedRect::new(x0, y0, x0 + size, y0 + size, size / 4.0);
        let color = if on { TOGGLE_ON } else { TOGGLE_OFF };
        scene.fill(Fill::NonZero, root, color, None, &toggle);
        x0 += size + TOGGLE_GAP;
    }
}

fn draw_frame(scene: &mut Scene, root: Affine, geometry: &PreviewGeometry) {
    let layout = &geometry.layout;
    let scale = layout.scale * geometry.presentation;
    let transform = root
        * Affine::translate(geometry.frame.center().to_vec2())
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(
            -layout.frame_width / 2.0,
            -layout.frame_height / 2.0,
        ));

    let parts = frame_parts(&geometry.spec, layout, geometry.selection.mode);

    for (strip, color) in &parts.chrome {
        scene.fill(Fill::NonZero, transform, *color, None, strip);
    }
    if let Some(body) = &parts.body {
        scene.fill(Fill::NonZero, transform, BODY_COLOR, None, body);
        scene.stroke(&Stroke::new(2.0), transform, BODY_EDGE, None, body);
    }

    let screen = parts.screen;
    scene.fill(Fill::NonZero, transform, SCREEN_COLOR, None, &screen);

    // Grid in logical units; the spacing stays fixed while the frame scales.
    let grid = Stroke::new(1.0);
    let mut x = screen.x0 + GRID_STEP;
    while x < screen.x1 {
        let line = vello::kurbo::Line::new((x, screen.y0), (x, screen.y1));
        scene.stroke(&grid, transform, GRID_COLOR, None, &line);
        x += GRID_STEP;
    }
    let mut y = screen.y0 + GRID_STEP;
    while y < screen.y1 {
        let line = vello::kurbo::Line::new((screen.x0, y), (screen.x1, y));
        scene.stroke(&grid, transform, GRID_COLOR, None, &line);
        y += GRID_STEP;
    }

    if let Some(notch) = &parts.notch {
        scene.fill(Fill::NonZero, transform, BODY_COLOR, None, notch);
    }
    if let Some(indicator) = &parts.home_indicator {
        scene.fill(Fill::NonZero, transform, INDICATOR_COLOR, None, indicator);
    }
}
