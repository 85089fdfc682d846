//! Device discovery over hidapi

use std::ffi::CString;

use hidapi::HidApi;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::hid_feature::HidFeatureDevice;
use crate::types::InterfaceInfo;
use crate::{FeatureDevice, HidBackend};

/// Whether hidapi exposes one device per usage on the build platform.
///
/// Windows splits a USB interface into one HID device per top-level
/// collection; Linux and macOS hand out one device per interface.
pub const PLATFORM_USAGE_SUBDIVIDED: bool = cfg!(target_os = "windows");

/// HID backend using the system hidapi library
pub struct HidapiBackend {
    api: Mutex<HidApi>,
    usage_subdivided: bool,
}

impl HidapiBackend {
    /// Initialize hidapi with the platform's usage subdivision behaviour
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self {
            api: Mutex::new(api),
            usage_subdivided: PLATFORM_USAGE_SUBDIVIDED,
        })
    }

    /// Override the usage subdivision flag
    pub fn with_usage_subdivided(mut self, subdivided: bool) -> Self {
        self.usage_subdivided = subdivided;
        self
    }
}

impl HidBackend for HidapiBackend {
    fn enumerate(&self, vid: u16, pid: u16) -> Result<Vec<InterfaceInfo>, TransportError> {
        let mut api = self.api.lock();
        api.refresh_devices()?;

        let interfaces: Vec<InterfaceInfo> = api
            .device_list()
            .filter(|d| d.vendor_id() == vid && d.product_id() == pid)
            .map(|d| InterfaceInfo {
                vid,
                pid,
                interface_number: d.interface_number(),
                usage_page: d.usage_page(),
                usage: d.usage(),
                path: d.path().to_string_lossy().into_owned(),
            })
            .collect();

        debug!(
            "Enumerated {} interfaces for {:04X}:{:04X}",
            interfaces.len(),
            vid,
            pid
        );
        Ok(interfaces)
    }

    fn open(&self, path: &str) -> Result<Box<dyn FeatureDevice>, TransportError> {
        let c_path = CString::new(path)
            .map_err(|_| TransportError::Hid(format!("Invalid device path: {path:?}")))?;
        let device = self.api.lock().open_path(&c_path)?;
        Ok(Box::new(HidFeatureDevice::new(device, path)))
    }

    fn usage_subdivided(&self) -> bool {
        self.usage_subdivided
    }
}
