//! Preview session: the host-facing driver of the layout engine.
//!
//! Tracks the window size, the chrome reserved for the toggle bar and the
//! device label, and the device/orientation/mode selection. Every
//! `geometry()` call reflects the committed selection; the switch
//! transition only contributes a cosmetic `presentation` factor.

use statig::prelude::*;
use tracing::debug;
use vello::kurbo::Rect;

use crate::catalog::{Catalog, CatalogError, UnknownDeviceError};
use crate::config::{ConfigError, LayoutConfig, PreviewConfig};
use crate::device::DeviceSpec;
use crate::layout::{self, FrameMode, LayoutResult, Orientation, Viewport};
use crate::state_machine::transition_sm::{State, TransitionEvent, TransitionMachine};

/// Everything the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub device: String,
    pub orientation: Orientation,
    pub mode: FrameMode,
}

/// What embedded content is told about its device. Independent of scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentReport {
    pub logical_width: f64,
    pub logical_height: f64,
    pub pixel_ratio: f64,
    pub orientation: Orientation,
}

/// Placement of the scaled frame and overlay controls, in window logical px.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewGeometry {
    pub selection: Selection,
    /// Pending selection the controls should show; equals `selection` once
    /// the transition settles.
    pub target: Selection,
    pub spec: DeviceSpec,
    pub layout: LayoutResult,
    /// Rendered frame box, centered in the content area.
    pub frame: Rect,
    /// Toggle bar across the top of the window.
    pub toolbar: Rect,
    /// Device label directly below the frame.
    pub label: Rect,
    /// Transition multiplier on top of `layout.scale`; drawing only.
    pub presentation: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    UnknownDevice(#[from] UnknownDeviceError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("selected device was removed from the catalog: {0}")]
    SelectionRemoved(#[from] UnknownDeviceError),
}

#[derive(Debug, Clone, PartialEq)]
struct MemoKey {
    selection: Selection,
    window: (f64, f64),
    layout: LayoutConfig,
}

pub struct PreviewSession {
    catalog: Catalog,
    config: PreviewConfig,
    window: (f64, f64),
    transition: StateMachine<TransitionMachine>,
    memo: Option<(MemoKey, PreviewGeometry)>,
}

impl PreviewSession {
    /// Start on `config.startup`, sized to `config.window`.
    pub fn new(catalog: Catalog, config: PreviewConfig) -> Result<Self, SessionError> {
        config.validate()?;
        catalog.get(&config.startup.device)?;
        let selection = Selection {
            device: config.startup.device.clone(),
            orientation: config.startup.orientation,
            mode: if config.startup.screen_only {
                FrameMode::ScreenOnly
            } else {
                FrameMode::Bezeled
            },
        };
        let transition =
            TransitionMachine::new(selection, config.animation.clone()).state_machine();
        Ok(Self {
            window: (config.window.width, config.window.height),
            catalog,
            config,
            transition,
            memo: None,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn committed(&self) -> &Selection {
        &self.transition.inner().committed
    }

    /// Where the user is heading; equals `committed()` once settled.
    pub fn target(&self) -> &Selection {
        self.transition.inner().target()
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self.transition.state(), State::Settled {})
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.window = (width, height);
    }

    /// Space left for the frame after padding, toolbar and label.
    pub fn viewport(&self) -> Viewport {
        let l = &self.config.layout;
        let (width, height) = self.window;
        Viewport::new(
            width - 2.0 * l.padding,
            height - 2.0 * l.padding - l.toolbar_height - l.label_height,
        )
    }

    pub fn request_device(&mut self, id: &str) -> Result<(), UnknownDeviceError> {
        self.catalog.get(id)?;
        let mut next = self.target().clone();
        next.device = id.to_string();
        self.request(next);
        Ok(())
    }

    /// Move `step` devices through the catalog from the current target.
    pub fn cycle_device(&mut self, step: isize) -> Result<(), UnknownDeviceError> {
        let next = self.catalog.neighbor(&self.target().device, step)?.to_string();
        self.request_device(&next)
    }

    pub fn toggle_orientation(&mut self) {
        let mut next = self.target().clone();
        next.orientation = next.orientation.toggled();
        self.request(next);
    }

    pub fn toggle_screen_only(&mut self) {
        let mut next = self.target().clone();
        next.mode = match next.mode {
            FrameMode::Bezeled => FrameMode::ScreenOnly,
            FrameMode::ScreenOnly => FrameMode::Bezeled,
        };
        self.request(next);
    }

    fn request(&mut self, selection: Selection) {
        self.transition.handle(&TransitionEvent::Request(selection));
    }

    pub fn tick(&mut self, dt_secs: f64) {
        self.transition.handle(&TransitionEvent::Tick(dt_secs));
    }

    /// Swap in a reloaded config. On error the previous config stays active.
    pub fn apply_config(&mut self, config: PreviewConfig) -> Result<(), ReloadError> {
        config.validate()?;
        let catalog = Catalog::with_custom(&config.devices)?;
        catalog.get(&self.committed().device)?;
        catalog.get(&self.target().device)?;

        self.transition
            .handle(&TransitionEvent::Retime(config.animation.clone()));
        self.catalog = catalog;
        self.config = config;
        self.memo = None;
        Ok(())
    }

    pub fn content_report(&self) -> Result<ContentReport, UnknownDeviceError> {
        let selection = self.committed();
        let spec = self.catalog.get(&selection.device)?;
        Ok(ContentReport {
            logical_width: spec.logical_width,
            logical_height: spec.logical_height,
            pixel_ratio: spec.pixel_ratio,
            orientation: selection.orientation,
        })
    }

    pub fn geometry(&mut self) -> Result<PreviewGeometry, UnknownDeviceError> {
        let presentation =
            TransitionMachine::presentation(self.transition.state(), &self.config.animation);
        let target = self.target().clone();
        let key = MemoKey {
            selection: self.committed().clone(),
            window: self.window,
            layout: self.config.layout.clone(),
        };

        if let Some((cached_key, cached)) = &self.memo {
            if *cached_key == key {
                return Ok(PreviewGeometry {
                    target,
                    presentation,
                    ..cached.clone()
                });
            }
        }

        let spec = *self.catalog.get(&key.selection.device)?;
        let viewport = self.viewport();
        let result = layout::compute_layout_with(
            &spec,
            viewport,
            key.selection.orientation,
            key.selection.mode,
            key.layout.min_scale,
        );
        debug!(
            target: "layout",
            device = %key.selection.device,
            scale = result.scale,
            frame_w = result.frame_width,
            frame_h = result.frame_height,
            "layout recomputed"
        );

        let mut geometry = place(&key.layout, self.window, viewport, spec, result, &key.selection, presentation);
        geometry.target = target;
        self.memo = Some((key, geometry.clone()));
        Ok(geometry)
    }
}

fn place(
    l: &LayoutConfig,
    window: (f64, f64),
    viewport: Viewport,
    spec: DeviceSpec,
    result: LayoutResult,
    selection: &Selection,
    presentation: f64,
) -> PreviewGeometry {
    let content_x = l.padding;
    let content_y = l.padding + l.toolbar_height;

    let rendered_w = result.rendered_width();
    let rendered_h = result.rendered_height();
    let x = content_x + (viewport.available_width - rendered_w) / 2.0;
    let y = content_y + (viewport.available_height - rendered_h) / 2.0;
    let frame = Rect::new(x, y, x + rendered_w, y + rendered_h);

    let toolbar = Rect::new(
        l.padding,
        l.padding,
        window.0 - l.padding,
        l.padding + l.toolbar_height,
    );
    let label = Rect::new(frame.x0, frame.y1, frame.x1, frame.y1 + l.label_height);

    PreviewGeometry {
        selection: selection.clone(),
        target: selection.clone(),
        spec,
        layout: result,
        frame,
        toolbar,
        label,
        presentation,
    }
}
