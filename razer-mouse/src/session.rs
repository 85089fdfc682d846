//! Command session for one connected device
//!
//! A session owns no open handle. Each query opens the interface by path,
//! runs exactly one exchange and drops the handle before returning.

use std::fmt;
use std::sync::Arc;

use razer_transport::protocol::Command;
use razer_transport::{FlowControl, Frame, HidBackend};
use tracing::{debug, warn};

use crate::error::DeviceError;

/// Battery percentage from the raw 0..=255 level byte
pub fn battery_percent(raw: u8) -> u8 {
    ((raw as f32 / 255.0) * 100.0).round() as u8
}

/// Live binding between a catalog entry and a connected interface
pub struct CommandSession {
    backend: Arc<dyn HidBackend>,
    flow: FlowControl,
    name: String,
    product_id: u16,
    path: String,
    transaction_id: u8,
}

impl CommandSession {
    pub fn new(
        backend: Arc<dyn HidBackend>,
        flow: FlowControl,
        name: impl Into<String>,
        product_id: u16,
        path: impl Into<String>,
        transaction_id: u8,
    ) -> Self {
        Self {
            backend,
            flow,
            name: name.into(),
            product_id,
            path: path.into(),
            transaction_id,
        }
    }

    /// Display name from the catalog
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_id(&self) -> u16 {
        self.product_id
    }

    /// Platform path of the matched interface
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Transaction id stamped into every request
    pub fn transaction_id(&self) -> u8 {
        self.transaction_id
    }

    /// Open the interface, run one exchange for `command`, close it again
    pub fn exchange(&self, command: Command) -> Result<Frame, DeviceError> {
        let mut request = Frame::request(self.transaction_id, &command);
        let mut device = self.backend.open(&self.path)?;
        debug!("{} -> {} ({})", self.name, command.name(), self.path);
        let response = self.flow.exchange(device.as_mut(), &mut request)?;
        Ok(response)
    }

    /// Battery level in percent
    pub fn read_battery_level(&self) -> Result<u8, DeviceError> {
        let response = self.exchange(Command::BATTERY_LEVEL)?;
        Ok(battery_percent(response.arguments[1]))
    }

    /// Whether the device is on its charger
    pub fn read_charging_status(&self) -> Result<bool, DeviceError> {
        let response = self.exchange(Command::CHARGING_STATUS)?;
        Ok(response.arguments[1] != 0)
    }

    /// Battery level in percent, or -1 if the device did not answer
    pub fn query_battery_level(&self) -> i32 {
        match self.read_battery_level() {
            Ok(level) => level as i32,
            Err(e) => {
                warn!("Battery query failed for {}: {}", self.name, e);
                -1
            }
        }
    }

    /// Charging state, `false` if the device did not answer
    pub fn query_charging_status(&self) -> bool {
        self.read_charging_status().unwrap_or_else(|e| {
            warn!("Charging query failed for {}: {}", self.name, e);
            false
        })
    }
}

impl fmt::Debug for CommandSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSession")
            .field("name", &self.name)
            .field("product_id", &format_args!("0x{:04X}", self.product_id))
            .field("path", &self.path)
            .field("transaction_id", &format_args!("0x{:02X}", self.transaction_id))
            .finish()
    }
}
