//! bezel-preview: interactive device frame preview.
//!
//! Opens a window showing the selected device frame fitted to the window,
//! or answers catalog/layout queries headlessly with `--list-devices` and
//! `--fit`.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use vello::kurbo::Affine;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window};

use vello::wgpu;

use bezel_preview::config_watcher::{self, ConfigWatcher};
use bezel_preview::{
    Catalog, FrameMode, Orientation, PreviewConfig, PreviewSession, ReloadError, Viewport,
    compute_layout_with, logging, render,
};

/// Device bezel preview
#[derive(Parser, Debug)]
#[command(name = "bezel-preview", version, about = "Device bezel preview")]
struct Args {
    /// Device id to start on (see --list-devices)
    #[arg(short, long)]
    device: Option<String>,

    /// Start in landscape orientation
    #[arg(short, long)]
    landscape: bool,

    /// Hide the bezel and chrome, showing only the screen area
    #[arg(short, long)]
    screen_only: bool,

    /// Scale floor in (0, 1]; overrides layout.min_scale
    #[arg(long)]
    min_scale: Option<f64>,

    /// Start in windowed mode instead of fullscreen
    #[arg(short, long)]
    windowed: bool,

    /// Config file (default: ~/.config/bezel-preview/preview.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the device catalog and exit
    #[arg(long)]
    list_devices: bool,

    /// Print the layout for a WIDTHxHEIGHT viewport and exit
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    fit: Option<(f64, f64)>,
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension {v:?}: {e}"))
    };
    Ok((parse(w)?, parse(h)?))
}

#[derive(Debug)]
enum UserEvent {
    ConfigChanged(String),
}

#[derive(Debug)]
enum RenderState {
    Active {
        surface: Box<RenderSurface<'static>>,
        valid_surface: bool,
        window: Arc<Window>,
    },
    Suspended(Option<Arc<Window>>),
}

struct App {
    context: RenderContext,
    renderers: Vec<Option<Renderer>>,
    state: RenderState,
    scene: Scene,
    session: PreviewSession,
    overrides: Overrides,
    windowed: bool,
    last_frame: Instant,
    title: String,
}

impl App {
    fn request_redraw(&self) {
        if let RenderState::Active { window, .. } = &self.state {
            window.request_redraw();
        }
    }

    /// Restart the frame clock before a new transition so idle time is not
    /// counted as animation progress.
    fn before_request(&mut self) {
        if !self.session.is_animating() {
            self.last_frame = Instant::now();
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let RenderState::Suspended(cached_window) = &mut self.state else {
            return;
        };

        let window = match cached_window.take() {
            Some(window) => window,
            None => match create_window(event_loop, self.windowed, self.session.config()) {
                Ok(window) => window,
                Err(e) => {
                    error!("failed to create window: {e:#}");
                    event_loop.exit();
                    return;
                }
            },
        };

        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        self.session.resize(
            size.width as f64 / scale_factor,
            size.height as f64 / scale_factor,
        );

        let surface_future = self.context.create_surface(
            window.clone(),
            size.width,
            size.height,
            wgpu::PresentMode::AutoVsync,
        );
        let surface = match pollster::block_on(surface_future) {
            Ok(surface) => surface,
            Err(e) => {
                error!("failed to create surface: {e}");
                event_loop.exit();
                return;
            }
        };

        self.renderers
            .resize_with(self.context.devices.len(), || None);
        if self.renderers[surface.dev_id].is_none() {
            match Renderer::new(
                &self.context.devices[surface.dev_id].device,
                RendererOptions::default(),
            ) {
                Ok(renderer) => self.renderers[surface.dev_id] = Some(renderer),
                Err(e) => {
                    error!("failed to create renderer: {e}");
                    event_loop.exit();
                    return;
                }
            }
        }

        window.request_redraw();
        self.state = RenderState::Active {
            surface: Box::new(surface),
            valid_surface: true,
            window,
        };
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let RenderState::Active { window, .. } = &self.state {
            self.state = RenderState::Suspended(Some(window.clone()));
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::ConfigChanged(text) => {
                match reload(&mut self.session, &text, &self.overrides) {
                    Ok(()) => {
                        info!(target: "config", "config reloaded");
                        self.request_redraw();
                    }
                    Err(e) => warn!(target: "config", "ignoring config change: {e}"),
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (surface, valid_surface, window) = match &mut self.state {
            RenderState::Active {
                surface,
                valid_surface,
                window,
            } if window.id() == window_id => (surface, valid_surface, window.clone()),
            _ => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                match logical_key {
                    Key::Named(NamedKey::Escape) => {
                        event_loop.exit();
                        return;
                    }
                    Key::Named(NamedKey::ArrowRight) => {
                        self.before_request();
                        if let Err(e) = self.session.cycle_device(1) {
                            warn!("cannot cycle devices: {e}");
                        }
                    }
                    Key::Named(NamedKey::ArrowLeft) => {
                        self.before_request();
                        if let Err(e) = self.session.cycle_device(-1) {
                            warn!("cannot cycle devices: {e}");
                        }
                    }
                    Key::Character(ref c) if c.eq_ignore_ascii_case("o") => {
                        self.before_request();
                        self.session.toggle_orientation();
                    }
                    Key::Character(ref c) if c.eq_ignore_ascii_case("s") => {
                        self.before_request();
                        self.session.toggle_screen_only();
                    }
                    _ => return,
                }
                window.request_redraw();
            }

            WindowEvent::Resized(size) => {
                if size.width != 0 && size.height != 0 {
                    self.context
                        .resize_surface(surface, size.width, size.height);
                    *valid_surface = true;
                    let scale_factor = window.scale_factor();
                    self.session.resize(
                        size.width as f64 / scale_factor,
                        size.height as f64 / scale_factor,
                    );
                    window.request_redraw();
                } else {
                    *valid_surface = false;
                }
            }

            WindowEvent::RedrawRequested => {
                if !*valid_surface {
                    return;
                }

                let now = Instant::now();
                let dt = now.duration_since(self.last_frame).as_secs_f64();
                self.last_frame = now;
                self.session.tick(dt);

                let geometry = match self.session.geometry() {
                    Ok(geometry) => geometry,
                    Err(e) => {
                        error!("cannot lay out preview: {e}");
                        return;
                    }
                };

                let title = format!(
                    "bezel-preview | {} | {} | {:.0}%",
                    geometry.selection.device,
                    orientation_name(geometry.selection.orientation),
                    geometry.layout.scale * 100.0
                );
                if title != self.title {
                    window.set_title(&title);
                    self.title = title;
                }

                let scale_factor = window.scale_factor();
                let width = surface.config.width as f64;
                let height = surface.config.height as f64;

                self.scene.reset();
                render::render_preview(
                    &mut self.scene,
                    Affine::scale(scale_factor),
                    width / scale_factor,
                    height / scale_factor,
                    &geometry,
                );

                let device_handle = &self.context.devices[surface.dev_id];
                let Some(renderer) = self.renderers[surface.dev_id].as_mut() else {
                    return;
                };

                if let Err(e) = renderer.render_to_texture(
                    &device_handle.device,
                    &device_handle.queue,
                    &self.scene,
                    &surface.target_view,
                    &vello::RenderParams {
                        base_color: render::BG_COLOR,
                        width: surface.config.width,
                        height: surface.config.height,
                        antialiasing_method: AaConfig::Msaa16,
                    },
                ) {
                    error!("failed to render frame: {e}");
                    return;
                }

                let surface_texture = match surface.surface.get_current_texture() {
                    Ok(texture) => texture,
                    Err(e) => {
                        warn!("failed to get surface texture: {e}");
                        return;
                    }
                };

                let mut encoder =
                    device_handle
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Surface Blit"),
                        });
                surface.blitter.copy(
                    &device_handle.device,
                    &mut encoder,
                    &surface.target_view,
                    &surface_texture
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default()),
                );
                device_handle.queue.submit([encoder.finish()]);
                surface_texture.present();
                let _ = device_handle.device.poll(wgpu::PollType::Poll);

                // Keep drawing only while a transition is running.
                if self.session.is_animating() {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let path = config_watcher::default_config_path();
            if let Err(e) = config_watcher::ensure_default_config(
                &path,
                &config_watcher::default_config_content(),
            ) {
                warn!(target: "config", "could not write default config {}: {e}", path.display());
            }
            path
        }
    };

    let overrides = Overrides::from_args(&args);
    let mut config = load_config(&config_path, args.config.is_some())?;
    overrides.apply(&mut config);
    config.validate().context("invalid settings")?;

    let catalog = Catalog::with_custom(&config.devices).context("invalid custom devices")?;

    if args.list_devices {
        print_catalog(&catalog);
        return Ok(());
    }

    if let Some((width, height)) = args.fit {
        return print_fit(&catalog, &config, width, height);
    }

    let session = PreviewSession::new(catalog, config).context("could not start preview")?;
    info!(device = %session.committed().device, "starting preview");

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;

    let proxy = event_loop.create_proxy();
    let _watcher = if config_path.exists() {
        match ConfigWatcher::start(config_path.clone(), move |text| {
            let _ = proxy.send_event(UserEvent::ConfigChanged(text));
        }) {
            Ok(watcher) => {
                info!(target: "config", path = %watcher.path().display(), "watching config");
                Some(watcher)
            }
            Err(e) => {
                warn!(target: "config", "config hot-reload disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let mut app = App {
        context: RenderContext::new(),
        renderers: vec![],
        state: RenderState::Suspended(None),
        scene: Scene::new(),
        session,
        overrides,
        windowed: args.windowed,
        last_frame: Instant::now(),
        title: String::new(),
    };

    event_loop
        .run_app(&mut app)
        .context("event loop failed")?;

    Ok(())
}

/// Read the config without validating it, since command-line overrides
/// still have to be layered on top. A missing default file falls back to
/// compiled defaults; a missing explicit file is an error.
fn load_config(path: &Path, explicit: bool) -> Result<PreviewConfig> {
    if !path.exists() {
        if explicit {
            bail!("config file not found: {}", path.display());
        }
        return Ok(PreviewConfig::default());
    }
    let text = config_watcher::load_config_text(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    PreviewConfig::parse(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Command-line settings that win over the config file, at startup and on
/// every reload.
#[derive(Debug, Clone, Default, PartialEq)]
struct Overrides {
    device: Option<String>,
    landscape: bool,
    screen_only: bool,
    min_scale: Option<f64>,
}

impl Overrides {
    fn from_args(args: &Args) -> Self {
        Self {
            device: args.device.clone(),
            landscape: args.landscape,
            screen_only: args.screen_only,
            min_scale: args.min_scale,
        }
    }

    fn apply(&self, config: &mut PreviewConfig) {
        if let Some(device) = &self.device {
            config.startup.device = device.clone();
        }
        if self.landscape {
            config.startup.orientation = Orientation::Landscape;
        }
        if self.screen_only {
            config.startup.screen_only = true;
        }
        if let Some(min_scale) = self.min_scale {
            config.layout.min_scale = min_scale;
        }
    }
}

/// Hot-reload path: parse `text`, re-apply the overrides, then hand the
/// result to the session, which validates it and keeps its old config on
/// any error.
fn reload(session: &mut PreviewSession, text: &str, overrides: &Overrides) -> Result<(), ReloadError> {
    let mut config = PreviewConfig::parse(text)?;
    overrides.apply(&mut config);
    session.apply_config(config)
}

fn print_catalog(catalog: &Catalog) {
    println!(
        "{:<18} {:<8} {:>12} {:>6} {:>6}",
        "ID", "CLASS", "LOGICAL", "RATIO", "BEZEL"
    );
    for (id, spec) in catalog.all() {
        println!(
            "{:<18} {:<8} {:>12} {:>6} {:>6}",
            id,
            spec.class,
            format!("{}x{}", spec.logical_width, spec.logical_height),
            spec.pixel_ratio,
            spec.bezel_thickness
        );
    }
}

fn print_fit(catalog: &Catalog, config: &PreviewConfig, width: f64, height: f64) -> Result<()> {
    let startup = &config.startup;
    let spec = catalog.get(&startup.device)?;
    let mode = if startup.screen_only {
        FrameMode::ScreenOnly
    } else {
        FrameMode::Bezeled
    };
    let result = compute_layout_with(
        spec,
        Viewport::new(width, height),
        startup.orientation,
        mode,
        config.layout.min_scale,
    );

    println!("device       {} ({})", startup.device, spec.class);
    println!("orientation  {}", orientation_name(startup.orientation));
    println!("viewport     {width} x {height}");
    println!("frame        {} x {}", result.frame_width, result.frame_height);
    println!("scale        {:.4}", result.scale);
    println!(
        "rendered     {:.1} x {:.1}",
        result.rendered_width(),
        result.rendered_height()
    );
    println!("swapped      {}", result.is_landscape_swapped);
    println!(
        "content      {} x {} @ {}x",
        spec.logical_width, spec.logical_height, spec.pixel_ratio
    );
    Ok(())
}

fn create_window(
    event_loop: &ActiveEventLoop,
    windowed: bool,
    config: &PreviewConfig,
) -> Result<Arc<Window>> {
    let mut attr = Window::default_attributes().with_title("bezel-preview");

    if !windowed {
        attr = attr.with_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        attr = attr.with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width,
            config.window.height,
        ));
    }

    Ok(Arc::new(event_loop.create_window(attr)?))
}
