//! Transport layer for Razer peripheral communication
//!
//! This crate covers everything below a device session:
//!
//! - `protocol`: the 90-byte frame codec and command constants
//! - `catalog`: known devices and their transaction families
//! - `flow_control`: the send/receive/retry exchange state machine
//! - a hidapi backend for enumeration and feature report I/O
//!
//! The [`HidBackend`] and [`FeatureDevice`] traits are the seams used by
//! higher layers, so sessions can be driven by fakes in tests.

pub mod catalog;
pub mod error;
pub mod flow_control;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_feature;

pub use catalog::{
    Catalog, DeviceDescriptor, FamilyGroup, TransactionFamily, VENDOR_ID,
};
pub use error::TransportError;
pub use flow_control::{FlowConfig, FlowControl, Pacer, ThreadSleep};
pub use protocol::{Command, Frame, Status};
pub use types::InterfaceInfo;

pub use discovery::{HidapiBackend, PLATFORM_USAGE_SUBDIVIDED};
pub use hid_feature::HidFeatureDevice;

/// One opened HID interface, accessed through feature reports
///
/// Dropping the value closes the underlying handle.
pub trait FeatureDevice {
    /// Write a feature report. `data[0]` is the report ID.
    ///
    /// Returns the number of bytes accepted by the device.
    fn send_feature_report(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Read a feature report of up to `len` bytes, report ID first
    fn get_feature_report(&mut self, report_id: u8, len: usize) -> Result<Vec<u8>, TransportError>;
}

/// Platform HID access: enumeration and opening interfaces by path
pub trait HidBackend {
    /// List every HID interface exposed by `vid:pid`
    fn enumerate(&self, vid: u16, pid: u16) -> Result<Vec<InterfaceInfo>, TransportError>;

    /// Open an interface previously returned by [`HidBackend::enumerate`]
    fn open(&self, path: &str) -> Result<Box<dyn FeatureDevice>, TransportError>;

    /// Whether the platform splits one interface into a device per usage.
    ///
    /// When true, interface matching must also compare usage page and usage.
    fn usage_subdivided(&self) -> bool;
}
