//! Preview configuration.
//!
//! Every tunable (scale floor, chrome reservations, startup selection,
//! transition timing, window size, custom devices) lives in a single
//! `PreviewConfig` that round-trips through TOML. Missing sections and keys
//! fall back to compiled defaults.

use serde::{Deserialize, Serialize};

use crate::catalog::CustomDevice;
use crate::layout::Orientation;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse preview config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("layout.min_scale must lie in (0, 1], got {0}")]
    MinScale(f64),
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("animation.shrink_factor must lie in (0, 1], got {0}")]
    ShrinkFactor(f64),
}

// ---------------------------------------------------------------------------
// PreviewConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub layout: LayoutConfig,
    pub startup: StartupConfig,
    pub animation: AnimationConfig,
    pub window: WindowConfig,
    pub devices: Vec<CustomDevice>,
}

/// Scale floor and the space reserved around the frame.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_scale: f64,
    /// Toggle bar above the frame.
    pub toolbar_height: f64,
    /// Device label below the frame.
    pub label_height: f64,
    /// Margin on every side of the window.
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StartupConfig {
    pub device: String,
    pub orientation: Orientation,
    pub screen_only: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub shrink_secs: f64,
    pub grow_secs: f64,
    /// Presentation factor at the midpoint of a device switch.
    pub shrink_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            toolbar_height: 48.0,
            label_height: 32.0,
            padding: 16.0,
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            device: "iphone-15-pro".to_string(),
            orientation: Orientation::Portrait,
            screen_only: false,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            shrink_secs: 0.15,
            grow_secs: 0.2,
            shrink_factor: 0.9,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 900.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing and validation
// ---------------------------------------------------------------------------

impl PreviewConfig {
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Parse and validate. Custom devices are validated when the catalog is
    /// built from them.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse only. Callers that layer overrides on top validate afterwards.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min_scale = self.layout.min_scale;
        if !(min_scale > 0.0 && min_scale <= 1.0) {
            return Err(ConfigError::MinScale(min_scale));
        }

        let non_negative = [
            ("layout.toolbar_height", self.layout.toolbar_height),
            ("layout.label_height", self.layout.label_height),
            ("layout.padding", self.layout.padding),
            ("animation.shrink_secs", self.animation.shrink_secs),
            ("animation.grow_secs", self.animation.grow_secs),
            ("window.width", self.window.width),
            ("window.height", self.window.height),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let factor = self.animation.shrink_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::ShrinkFactor(factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;

    #[test]
    fn defaults() {
        let c = PreviewConfig::default();
        assert!((c.layout.min_scale - 0.1).abs() < f64::EPSILON);
        assert!((c.layout.toolbar_height - 48.0).abs() < f64::EPSILON);
        assert!((c.layout.label_height - 32.0).abs() < f64::EPSILON);
        assert!((c.layout.padding - 16.0).abs() < f64::EPSILON);
        assert_eq!(c.startup.device, "iphone-15-pro");
        assert_eq!(c.startup.orientation, Orientation::Portrait);
        assert!(!c.startup.screen_only);
        assert!((c.animation.shrink_factor - 0.9).abs() < f64::EPSILON);
        assert!(c.devices.is_empty());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let original = PreviewConfig::default();
        let parsed = PreviewConfig::from_toml(&original.to_toml()).expect("roundtrip parse failed");
        assert_eq!(parsed, original);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let partial = r#"
[layout]
min_scale = 0.3

[startup]
orientation = "landscape"
"#;
        let c = PreviewConfig::from_toml(partial).expect("partial parse failed");
        assert!((c.layout.min_scale - 0.3).abs() < f64::EPSILON);
        assert_eq!(c.startup.orientation, Orientation::Landscape);
        // Untouched keys
        assert!((c.layout.toolbar_height - 48.0).abs() < f64::EPSILON);
        assert_eq!(c.startup.device, "iphone-15-pro");
        assert!((c.window.width - 1280.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_toml() {
        let result = PreviewConfig::from_toml("this is not [[ valid toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn min_scale_bounds() {
        for bad in ["0.0", "-0.2", "1.5", "nan"] {
            let text = format!("[layout]\nmin_scale = {bad}\n");
            assert!(
                matches!(PreviewConfig::from_toml(&text), Err(ConfigError::MinScale(_))),
                "min_scale = {bad} should be rejected"
            );
        }
        assert!(PreviewConfig::from_toml("[layout]\nmin_scale = 1.0\n").is_ok());
    }

    #[test]
    fn negative_reservation_rejected() {
        let err = PreviewConfig::from_toml("[layout]\ntoolbar_height = -4.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative { field: "layout.toolbar_height", .. }
        ));
    }

    #[test]
    fn shrink_factor_bounds() {
        let err = PreviewConfig::from_toml("[animation]\nshrink_factor = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ShrinkFactor(_)));
    }

    #[test]
    fn custom_devices_parse() {
        let text = r#"
[[devices]]
id = "kiosk"
class = "tablet"
logical_width = 1080.0
logical_height = 1920.0
pixel_ratio = 1.0
bezel_thickness = 24.0

[[devices]]
id = "foldable"
class = "phone"
logical_width = 344.0
logical_height = 882.0
pixel_ratio = 2.625
bezel_thickness = 8.0
has_notch = true
"#;
        let c = PreviewConfig::from_toml(text).expect("parse failed");
        assert_eq!(c.devices.len(), 2);
        assert_eq!(c.devices[0].id, "kiosk");
        assert_eq!(c.devices[0].spec.class, DeviceClass::Tablet);
        assert!(c.devices[1].spec.has_notch);
        assert!(!c.devices[1].spec.is_samsung_style);
    }
}
