//! Transport error types

use thiserror::Error;

/// Errors that can occur while framing, sending or receiving a command
#[derive(Error, Debug)]
pub enum TransportError {
    // Frame codec
    #[error("Malformed frame: expected 90 bytes, got {len}")]
    MalformedFrame { len: usize },

    #[error("Checksum mismatch: computed 0x{expected:02X}, frame carries 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    // HID-level errors
    #[error("Short feature report write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    #[error("Short feature report read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("HID error: {0}")]
    Hid(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    // Exchange state machine
    #[error(
        "Response does not match request: expected class 0x{expected_class:02X} id 0x{expected_id:02X}, \
         got class 0x{actual_class:02X} id 0x{actual_id:02X}"
    )]
    ProtocolMismatch {
        expected_class: u8,
        expected_id: u8,
        actual_class: u8,
        actual_id: u8,
    },

    #[error("Command 0x{class:02X}/0x{id:02X} not supported by device")]
    CommandNotSupported { class: u8, id: u8 },

    #[error("Command 0x{class:02X}/0x{id:02X} failed")]
    CommandFailed { class: u8, id: u8 },

    #[error("Unknown response status 0x{0:02X}")]
    UnknownStatus(u8),

    #[error("Command aborted after {tries} tries")]
    ExchangeAborted { tries: usize },
}

impl TransportError {
    /// True for failures raised by the HID primitives themselves
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::ShortWrite { .. }
                | Self::ShortRead { .. }
                | Self::Hid(_)
                | Self::HidPermissionDenied(_)
        )
    }
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::Hid(msg)
        }
    }
}
