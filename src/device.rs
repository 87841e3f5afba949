//! Device specifications.
//!
//! A `DeviceSpec` describes the logical content area of a device plus the
//! bezel drawn around it. The `DeviceClass` discriminant decides which fixed
//! chrome (laptop hinge and base, watch bands) is added to the frame and
//! whether the frame may rotate.

use serde::{Deserialize, Serialize};

/// Laptop hinge strip below the lid.
pub const DESKTOP_HINGE_HEIGHT: f64 = 10.0;
/// Laptop base strip below the hinge.
pub const DESKTOP_BASE_HEIGHT: f64 = 20.0;
/// Height of each watch band (one above, one below the case).
pub const WATCH_BAND_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Phone,
    Tablet,
    Desktop,
    Watch,
}

impl DeviceClass {
    /// Fixed chrome height added below/around the bezel, in logical units.
    pub fn chrome_height(self) -> f64 {
        match self {
            DeviceClass::Phone | DeviceClass::Tablet => 0.0,
            DeviceClass::Desktop => DESKTOP_HINGE_HEIGHT + DESKTOP_BASE_HEIGHT,
            DeviceClass::Watch => 2.0 * WATCH_BAND_HEIGHT,
        }
    }

    /// Desktop and watch frames keep their natural orientation.
    pub fn rotates(self) -> bool {
        matches!(self, DeviceClass::Phone | DeviceClass::Tablet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Phone => "phone",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
            DeviceClass::Watch => "watch",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Immutable description of one previewable device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub logical_width: f64,
    pub logical_height: f64,
    /// Handed to embedded content; the layout engine ignores it.
    pub pixel_ratio: f64,
    pub bezel_thickness: f64,
    pub class: DeviceClass,
    #[serde(default)]
    pub has_notch: bool,
    #[serde(default)]
    pub has_home_indicator: bool,
    #[serde(default)]
    pub is_samsung_style: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceSpecError {
    #[error("logical size must be positive and finite, got {width}x{height}")]
    NonPositiveSize { width: f64, height: f64 },
    #[error("bezel thickness must be non-negative and finite, got {0}")]
    NegativeBezel(f64),
    #[error("pixel ratio must be positive and finite, got {0}")]
    NonPositivePixelRatio(f64),
}

impl DeviceSpec {
    pub const fn new(
        class: DeviceClass,
        logical_width: f64,
        logical_height: f64,
        pixel_ratio: f64,
        bezel_thickness: f64,
    ) -> Self {
        Self {
            logical_width,
            logical_height,
            pixel_ratio,
            bezel_thickness,
            class,
            has_notch: false,
            has_home_indicator: false,
            is_samsung_style: false,
        }
    }

    pub const fn with_notch(mut self) -> Self {
        self.has_notch = true;
        self
    }

    pub const fn with_home_indicator(mut self) -> Self {
        self.has_home_indicator = true;
        self
    }

    pub const fn samsung_style(mut self) -> Self {
        self.is_samsung_style = true;
        self
    }

    /// Check `logical_width > 0 && logical_height > 0 && bezel_thickness >= 0`.
    pub fn validate(&self) -> Result<(), DeviceSpecError> {
        let size_ok = self.logical_width.is_finite()
            && self.logical_height.is_finite()
            && self.logical_width > 0.0
            && self.logical_height > 0.0;
        if !size_ok {
            return Err(DeviceSpecError::NonPositiveSize {
                width: self.logical_width,
                height: self.logical_height,
            });
        }
        if !(self.bezel_thickness.is_finite() && self.bezel_thickness >= 0.0) {
            return Err(DeviceSpecError::NegativeBezel(self.bezel_thickness));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(DeviceSpecError::NonPositivePixelRatio(self.pixel_ratio));
        }
        Ok(())
    }
}
