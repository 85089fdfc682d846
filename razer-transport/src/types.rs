//! Common types for transport layer

/// One HID interface as reported by enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB interface number (-1 when the platform does not report one)
    pub interface_number: i32,
    /// HID usage page of the top-level collection
    pub usage_page: u16,
    /// HID usage of the top-level collection
    pub usage: u16,
    /// Platform device path, used to open the interface
    pub path: String,
}
