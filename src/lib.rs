//! bezel-preview: device frames around an embedded view.
//!
//! The core is a pure scale-to-fit engine ([`layout`]) driven by an
//! immutable device table ([`catalog`]). [`preview`] wraps both for a host
//! window: chrome reservations, control placement, and the device-switch
//! transition. [`render`] draws the result with vello.

pub mod catalog;
pub mod config;
pub mod config_watcher;
pub mod device;
pub mod layout;
pub mod logging;
pub mod preview;
pub mod render;
pub mod state_machine;

pub use catalog::{Catalog, CatalogError, CustomDevice, UnknownDeviceError};
pub use config::{ConfigError, PreviewConfig};
pub use device::{DeviceClass, DeviceSpec, DeviceSpecError};
pub use layout::{FrameMode, LayoutResult, Orientation, Viewport, compute_layout, compute_layout_with};
pub use preview::{
    ContentReport, PreviewGeometry, PreviewSession, ReloadError, Selection, SessionError,
};
