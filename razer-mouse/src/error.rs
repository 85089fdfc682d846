//! Device layer error types

use razer_transport::TransportError;
use thiserror::Error;

/// Errors from session and registry operations
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No connected device with this product id
    #[error("Unknown device: product id 0x{0:04X}")]
    UnknownDevice(u16),
}
