//! Device catalog.
//!
//! The built-in table is constructed once per process and never mutated.
//! Custom devices from `preview.toml` are appended to a clone of it, so the
//! declaration order of the built-ins is always preserved.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::device::{DeviceClass, DeviceSpec, DeviceSpecError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device: {0}")]
pub struct UnknownDeviceError(pub String);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate device id: {0}")]
    Duplicate(String),
    #[error("invalid device {id}: {source}")]
    Invalid {
        id: String,
        #[source]
        source: DeviceSpecError,
    },
}

/// A user-defined device, as written in `[[devices]]` tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDevice {
    pub id: String,
    #[serde(flatten)]
    pub spec: DeviceSpec,
}

const BUILTIN_DEVICES: [(&str, DeviceSpec); 10] = [
    (
        "iphone-15-pro",
        DeviceSpec::new(DeviceClass::Phone, 393.0, 852.0, 3.0, 12.0)
            .with_notch()
            .with_home_indicator(),
    ),
    (
        "iphone-se",
        DeviceSpec::new(DeviceClass::Phone, 375.0, 667.0, 2.0, 14.0),
    ),
    (
        "pixel-8",
        DeviceSpec::new(DeviceClass::Phone, 412.0, 915.0, 2.625, 12.0).with_home_indicator(),
    ),
    (
        "galaxy-s24",
        DeviceSpec::new(DeviceClass::Phone, 360.0, 780.0, 3.0, 10.0)
            .with_home_indicator()
            .samsung_style(),
    ),
    (
        "ipad-air",
        DeviceSpec::new(DeviceClass::Tablet, 820.0, 1180.0, 2.0, 18.0).with_home_indicator(),
    ),
    (
        "ipad-mini",
        DeviceSpec::new(DeviceClass::Tablet, 744.0, 1133.0, 2.0, 18.0).with_home_indicator(),
    ),
    (
        "galaxy-tab-s9",
        DeviceSpec::new(DeviceClass::Tablet, 800.0, 1280.0, 2.0, 16.0).samsung_style(),
    ),
    (
        "macbook-air",
        DeviceSpec::new(DeviceClass::Desktop, 1280.0, 832.0, 2.0, 16.0).with_notch(),
    ),
    (
        "desktop-1080p",
        DeviceSpec::new(DeviceClass::Desktop, 1920.0, 1080.0, 1.0, 12.0),
    ),
    (
        "apple-watch-45",
        DeviceSpec::new(DeviceClass::Watch, 198.0, 242.0, 2.0, 10.0),
    ),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    entries: BUILTIN_DEVICES
        .iter()
        .map(|(id, spec)| ((*id).to_string(), *spec))
        .collect(),
});

/// Ordered mapping from device id to `DeviceSpec`.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, DeviceSpec)>,
}

impl Catalog {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Built-in devices followed by `custom`, in the order given.
    pub fn with_custom(custom: &[CustomDevice]) -> Result<Catalog, CatalogError> {
        let mut catalog = Self::builtin().clone();
        for device in custom {
            if catalog.position(&device.id).is_some() {
                return Err(CatalogError::Duplicate(device.id.clone()));
            }
            device.spec.validate().map_err(|source| CatalogError::Invalid {
                id: device.id.clone(),
                source,
            })?;
            info!(id = %device.id, class = %device.spec.class, "registered custom device");
            catalog.entries.push((device.id.clone(), device.spec));
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Result<&DeviceSpec, UnknownDeviceError> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, spec)| spec)
            .ok_or_else(|| UnknownDeviceError(id.to_string()))
    }

    /// All devices in declaration order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &DeviceSpec)> {
        self.entries.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| entry_id == id)
    }

    /// The id `step` entries away from `id`, wrapping at both ends.
    pub fn neighbor(&self, id: &str, step: isize) -> Result<&str, UnknownDeviceError> {
        let index = self
            .position(id)
            .ok_or_else(|| UnknownDeviceError(id.to_string()))?;
        let len = self.entries.len() as isize;
        let next = (index as isize + step).rem_euclid(len) as usize;
        Ok(self.entries[next].0.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
