//! Feature report access to one opened HID interface

use hidapi::HidDevice;
use tracing::debug;

use crate::error::TransportError;
use crate::FeatureDevice;

/// An open hidapi device used for feature reports only
///
/// The handle is closed when this value is dropped.
pub struct HidFeatureDevice {
    device: HidDevice,
    path: String,
}

impl HidFeatureDevice {
    pub fn new(device: HidDevice, path: &str) -> Self {
        debug!("Opened {}", path);
        Self {
            device,
            path: path.to_string(),
        }
    }
}

impl FeatureDevice for HidFeatureDevice {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        // hidapi reports failure as an error, so success means the whole buffer went out
        self.device.send_feature_report(data)?;
        Ok(data.len())
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>, TransportError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; len];
        buf[0] = report_id;
        let read = self.device.get_feature_report(&mut buf)?;
        buf.truncate(read);
        Ok(buf)
    }
}

impl Drop for HidFeatureDevice {
    fn drop(&mut self) {
        debug!("Closed {}", self.path);
    }
}
